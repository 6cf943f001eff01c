//! Transaction, fee and broadcast envelope types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::crypto::hash::sha256;
use crate::error::{Error, Result};
use super::value::{canonical_json, normalize_numbers};

/// Public key type tag expected by the chain
pub const PUB_KEY_TYPE: &str = "tendermint/PubKeySecp256k1";

/// A single `{type, value}` message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message route, e.g. `cosmos-sdk/MsgSend`
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Message body
    pub value: Value,
}

impl Message {
    pub fn new(msg_type: impl Into<String>, value: Value) -> Self {
        Self {
            msg_type: msg_type.into(),
            value,
        }
    }
}

/// An amount of one denomination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }
}

/// Transaction fee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    /// Fee amounts
    pub amount: Vec<Coin>,
    /// Gas limit
    pub gas: u64,
}

impl Fee {
    /// A fee with no amounts and the given gas limit
    pub fn with_gas(gas: u64) -> Self {
        Self {
            amount: Vec::new(),
            gas,
        }
    }

    pub fn add_amount(mut self, coin: Coin) -> Self {
        self.amount.push(coin);
        self
    }
}

/// How the node should handle a broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastMode {
    /// Return immediately
    Async,
    /// Return after the transaction passed validation
    Sync,
    /// Return after the transaction was committed in a block
    #[default]
    Block,
}

impl BroadcastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Async => "async",
            Self::Sync => "sync",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for BroadcastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BroadcastMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "async" => Ok(Self::Async),
            "sync" => Ok(Self::Sync),
            "block" => Ok(Self::Block),
            other => Err(Error::Serialization(format!("Unknown broadcast mode: {}", other))),
        }
    }
}

/// Account number and sequence as reported by the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountState {
    #[serde(deserialize_with = "u64_from_number_or_string", default)]
    pub account_number: u64,
    #[serde(deserialize_with = "u64_from_number_or_string", default)]
    pub sequence: u64,
}

// Goes through `Value`: untagged enums cannot buffer arbitrary precision numbers
fn u64_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid unsigned integer: {}", n))),
        Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!("expected number or string, got {}", other))),
    }
}

/// An unsigned transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Messages, signed and executed in order
    pub msgs: Vec<Message>,
    /// Chain id
    pub chain_id: String,
    /// Fee
    pub fee: Fee,
    /// Memo
    pub memo: String,
    /// Account number, fetched from the chain before signing
    pub account_number: u64,
    /// Sequence, fetched from the chain before signing
    pub sequence: u64,
}

impl Transaction {
    /// Create a transaction for the given account state with an empty memo
    pub fn new(msgs: Vec<Message>, chain_id: impl Into<String>, fee: Fee, account: AccountState) -> Self {
        Self {
            msgs,
            chain_id: chain_id.into(),
            fee,
            memo: String::new(),
            account_number: account.account_number,
            sequence: account.sequence,
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// The sign document: this transaction with every number stringified
    pub fn sign_doc(&self) -> Result<Value> {
        Ok(normalize_numbers(&serde_json::to_value(self)?))
    }

    /// Canonical bytes of the sign document
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        Ok(canonical_json(&self.sign_doc()?)?.into_bytes())
    }

    /// SHA-256 of the canonical bytes, the digest that gets signed
    pub fn sign_bytes_hash(&self) -> Result<[u8; 32]> {
        Ok(sha256(&self.canonical_bytes()?))
    }
}

/// Public key entry of a signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKeyInfo {
    #[serde(rename = "type")]
    pub key_type: String,
    /// Base64 of the compressed public key
    pub value: String,
}

/// One signature of a broadcast transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub account_number: String,
    pub sequence: String,
    /// Base64 of the compact `r || s` signature
    pub signature: String,
    pub pub_key: PubKeyInfo,
}

/// Transaction body of the broadcast envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdTx {
    pub msg: Vec<Value>,
    pub fee: Value,
    pub signatures: Vec<StdSignature>,
    pub memo: String,
}

/// A signed transaction, ready to be posted to `/txs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub tx: StdTx,
    pub mode: BroadcastMode,
}

impl SignedTransaction {
    pub fn mode(&self) -> BroadcastMode {
        self.mode
    }

    /// Normalized messages that were signed
    pub fn messages(&self) -> &[Value] {
        &self.tx.msg
    }

    /// Base64 signature of the first signer
    pub fn signature(&self) -> Option<&str> {
        self.tx.signatures.first().map(|s| s.signature.as_str())
    }

    /// Base64 public key of the first signer
    pub fn public_key(&self) -> Option<&str> {
        self.tx.signatures.first().map(|s| s.pub_key.value.as_str())
    }

    /// Comma separated message types, used as a label in logs
    pub fn message_types(&self) -> String {
        self.tx.msg
            .iter()
            .filter_map(|m| m.get("type").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
