//! Address management

use std::fmt;

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::hash::hash160;
use crate::crypto::keys::{derive_key_pair, DerivationPath, KeyPair, PublicKey};
use crate::crypto::mnemonic::Mnemonic;
use crate::error::{Error, Result};

/// A bech32 account address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Address {
    /// The bech32 address string
    pub address: String,
    /// The derivation path used to generate this address
    pub path: String,
}

impl Address {
    /// Create a new address
    pub fn new(address: String, path: String) -> Self {
        Self { address, path }
    }

    /// Get the address string
    pub fn as_str(&self) -> &str {
        &self.address
    }

    /// Get the derivation path
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.address
    }
}

/// Encode the HASH160 of a compressed public key as a bech32 address
pub fn public_key_to_address(public_key: &PublicKey, prefix: &str) -> Result<String> {
    let hrp = Hrp::parse(prefix)
        .map_err(|e| Error::InvalidAddress(format!("Invalid prefix '{}': {}", prefix, e)))?;

    bech32::encode::<Bech32>(hrp, &hash160(public_key.as_bytes()))
        .map_err(|e| Error::InvalidAddress(e.to_string()))
}

/// Split a bech32 address into its prefix and 20-byte payload
pub fn decode_address(address: &str) -> Result<(String, [u8; 20])> {
    let (hrp, data) = bech32::decode(address)
        .map_err(|e| Error::InvalidAddress(format!("{}: {}", address, e)))?;

    let payload: [u8; 20] = data.as_slice().try_into()
        .map_err(|_| Error::InvalidAddress(format!("Invalid payload length {} in {}", data.len(), address)))?;

    Ok((hrp.to_string(), payload))
}

/// Validate an address for a specific prefix
pub fn validate_address(address: &str, prefix: &str) -> bool {
    match decode_address(address) {
        Ok((hrp, _)) => hrp.eq_ignore_ascii_case(prefix),
        Err(_) => false,
    }
}

/// Derive the address and key pair of one account index
///
/// This walks the whole path from the mnemonic on every call.
pub fn derive_account(
    mnemonic: &Mnemonic,
    base_path: &DerivationPath,
    prefix: &str,
    index: u32,
) -> Result<(Address, KeyPair)> {
    let path = base_path.child(index)?;
    let seed = mnemonic.to_seed()?;
    let key_pair = derive_key_pair(&seed[..], &path)?;
    let address = public_key_to_address(key_pair.public_key(), prefix)?;

    debug!("Derived account {} at {}", address, path);

    Ok((Address::new(address, path.to_string()), key_pair))
}
