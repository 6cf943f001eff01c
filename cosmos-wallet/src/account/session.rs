//! Wallet session
//!
//! A [`Session`] binds one mnemonic to a chain configuration and an RPC
//! client. The mnemonic never changes after construction; only the display
//! name and the logging toggle can be updated, and neither affects signing.

use serde_json::{json, Value};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::config::ClientConfig;
use crate::crypto::keys::{DerivationPath, KeyPair};
use crate::crypto::mnemonic::{Mnemonic, MnemonicStrength};
use crate::error::{Error, Result};
use crate::keystore::{self, KeyStoreRecord};
use crate::transaction::{
    sign_transaction, with_field, AccountState, BroadcastMode, Fee, Message, RpcClient,
    SignedTransaction, Transaction,
};
use super::address::{derive_account, Address};

/// Field set to the sender's address in every message sent through a session
pub const AUTHOR_ADDRESS_FIELD: &str = "authorAddress";

/// A wallet session bound to one mnemonic
pub struct Session<C: RpcClient> {
    mnemonic: Mnemonic,
    config: ClientConfig,
    base_path: DerivationPath,
    /// Index 0 address
    address: Address,
    /// Index 0 key pair
    key_pair: KeyPair,
    client: C,
    name: Option<String>,
    log: bool,
}

impl<C: RpcClient> Session<C> {
    /// Create a session around a fresh 256-bit mnemonic
    pub fn random(config: ClientConfig, client: C) -> Result<Self> {
        Self::with_mnemonic(Mnemonic::generate(MnemonicStrength::Words24)?, config, client)
    }

    /// Create a session from an existing mnemonic phrase
    pub fn from_mnemonic(phrase: &str, config: ClientConfig, client: C) -> Result<Self> {
        Self::with_mnemonic(Mnemonic::parse(phrase)?, config, client)
    }

    /// Create a session from mnemonic entropy
    pub fn from_entropy(entropy: &[u8], config: ClientConfig, client: C) -> Result<Self> {
        Self::with_mnemonic(Mnemonic::from_entropy(entropy)?, config, client)
    }

    /// Create a session from a keystore record
    pub fn from_keystore(password: &str, record: &KeyStoreRecord, config: ClientConfig, client: C) -> Result<Self> {
        let contents = keystore::decrypt(password, record)?;

        let text = std::str::from_utf8(&contents.secret)
            .map_err(|_| Error::MalformedKeyStoreRecord("Decrypted secret is not hex text".to_string()))?;
        let entropy = Zeroizing::new(
            hex::decode(text)
                .map_err(|_| Error::MalformedKeyStoreRecord("Decrypted secret is not hex-encoded entropy".to_string()))?,
        );

        let session = Self::from_entropy(&entropy, config, client)?;
        info!("Restored session {} from keystore", session.address);
        Ok(session)
    }

    /// Create a session from keystore file contents
    pub fn from_keystore_json(password: &str, data: &str, config: ClientConfig, client: C) -> Result<Self> {
        if password.is_empty() {
            return Err(Error::InsufficientData("Missing password".to_string()));
        }
        if data.trim().is_empty() {
            return Err(Error::InsufficientData("Missing keystore data".to_string()));
        }

        Self::from_keystore(password, &KeyStoreRecord::from_json(data)?, config, client)
    }

    fn with_mnemonic(mnemonic: Mnemonic, config: ClientConfig, client: C) -> Result<Self> {
        config.validate()?;
        let base_path = config.base_path()?;
        let (address, key_pair) = derive_account(&mnemonic, &base_path, &config.bech32_prefix, 0)?;

        debug!("Session created for {}", address);

        Ok(Self {
            mnemonic,
            config,
            base_path,
            address,
            key_pair,
            client,
            name: None,
            log: false,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_logging(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_logging(&mut self, log: bool) {
        self.log = log;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn logging(&self) -> bool {
        self.log
    }

    pub fn mnemonic(&self) -> &Mnemonic {
        &self.mnemonic
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Address of account index 0
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Key pair of account index 0
    pub fn key_pair(&self) -> &KeyPair {
        &self.key_pair
    }

    /// Derive the address of another account index
    pub fn address_for_index(&self, index: u32) -> Result<Address> {
        derive_account(&self.mnemonic, &self.base_path, &self.config.bech32_prefix, index)
            .map(|(address, _)| address)
    }

    /// Derive the key pair of another account index
    pub fn key_pair_for_index(&self, index: u32) -> Result<KeyPair> {
        derive_account(&self.mnemonic, &self.base_path, &self.config.bech32_prefix, index)
            .map(|(_, key_pair)| key_pair)
    }

    /// Sign messages against an already fetched account state
    pub fn sign_messages(
        &self,
        messages: Vec<Message>,
        account: AccountState,
        mode: BroadcastMode,
    ) -> Result<SignedTransaction> {
        let transaction = Transaction::new(
            messages,
            self.config.chain_id.clone(),
            Fee::with_gas(self.config.default_gas),
            account,
        );

        sign_transaction(&transaction, &self.key_pair, mode)
    }

    /// Fetch the account state and sign `messages` as one transaction
    pub async fn signed_transaction(&self, messages: Vec<Message>, mode: BroadcastMode) -> Result<SignedTransaction> {
        let account = self.client.account_state(self.address.as_str()).await?;
        self.sign_messages(messages, account, mode)
    }

    /// Sign and broadcast a single message
    pub async fn send(&self, msg_type: &str, value: &Value, mode: BroadcastMode) -> Result<Value> {
        let message = Message::new(msg_type, self.authored(value));
        let transaction = self.signed_transaction(vec![message], mode).await?;

        self.broadcast(&transaction, msg_type).await
    }

    /// Sign and broadcast several messages in one transaction
    ///
    /// All messages share a single account number and sequence.
    pub async fn send_multi(&self, messages: &[Message], mode: BroadcastMode) -> Result<Value> {
        if messages.is_empty() {
            return Err(Error::InsufficientData("No messages to send".to_string()));
        }

        let authored: Vec<Message> = messages
            .iter()
            .map(|m| Message::new(m.msg_type.clone(), self.authored(&m.value)))
            .collect();
        let label = messages
            .iter()
            .map(|m| m.msg_type.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let transaction = self.signed_transaction(authored, mode).await?;
        self.broadcast(&transaction, &label).await
    }

    /// Broadcast a signed transaction through the RPC client
    pub async fn broadcast(&self, transaction: &SignedTransaction, label: &str) -> Result<Value> {
        let response = self.client.broadcast(transaction).await?;

        if self.log {
            let prefix = match &self.name {
                Some(name) => format!("{}/{}", name, label),
                None => label.to_string(),
            };
            let msg = transaction.messages().first().cloned().unwrap_or(Value::Null);
            info!("{} msg: {} response: {}", prefix, msg, response);
        }

        Ok(response)
    }

    /// Encrypt the mnemonic entropy under `password`
    pub fn to_keystore(&self, password: &str) -> Result<KeyStoreRecord> {
        if password.is_empty() {
            return Err(Error::InsufficientData("Missing password".to_string()));
        }

        let entropy = self.mnemonic.to_entropy()?;
        let secret = Zeroizing::new(hex::encode(&entropy[..]));
        let record = keystore::encrypt(password, secret.as_bytes(), None)?;

        info!("Exported keystore for {}", self.address);
        Ok(record)
    }

    /// Keystore record as JSON, optionally pretty printed
    pub fn to_keystore_json(&self, password: &str, pretty: bool) -> Result<String> {
        self.to_keystore(password)?.to_json(pretty)
    }

    fn authored(&self, value: &Value) -> Value {
        with_field(value, AUTHOR_ADDRESS_FIELD, json!(self.address.as_str()))
    }
}

impl<C: RpcClient> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("address", &self.address)
            .field("chain_id", &self.config.chain_id)
            .field("name", &self.name)
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}
