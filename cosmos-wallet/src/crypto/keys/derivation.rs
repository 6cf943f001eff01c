//! Derivation paths and key containers

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// First hardened child index
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// A BIP-32 derivation path such as `m/44'/118'/0'/0`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    components: Vec<u32>,
}

impl DerivationPath {
    /// Parse a BIP-32 derivation path
    pub fn parse(path: &str) -> Result<Self> {
        let rest = match path.strip_prefix('m') {
            Some(rest) => rest,
            None => return Err(Error::KeyDerivation(format!("Invalid derivation path: {}", path))),
        };

        if !rest.is_empty() && !rest.starts_with('/') {
            return Err(Error::KeyDerivation(format!("Invalid derivation path: {}", path)));
        }

        let mut components = Vec::new();
        for component in rest.split('/').skip(1) {
            if component.is_empty() {
                return Err(Error::KeyDerivation(format!("Empty component in derivation path: {}", path)));
            }

            let (digits, hardened) = match component.strip_suffix('\'').or_else(|| component.strip_suffix('h')) {
                Some(digits) => (digits, true),
                None => (component, false),
            };

            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::KeyDerivation(format!("Invalid derivation path component: {}", component)));
            }

            let index = digits.parse::<u32>()
                .ok()
                .filter(|index| *index < HARDENED_OFFSET)
                .ok_or_else(|| Error::KeyDerivation(format!("Invalid derivation path component: {}", component)))?;

            components.push(if hardened { index + HARDENED_OFFSET } else { index });
        }

        Ok(Self { components })
    }

    /// Append a non-hardened terminal index
    pub fn child(&self, index: u32) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(Error::KeyDerivation(format!("Account index out of range: {}", index)));
        }

        let mut components = self.components.clone();
        components.push(index);
        Ok(Self { components })
    }

    pub fn components(&self) -> &[u32] {
        &self.components
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for component in &self.components {
            if *component >= HARDENED_OFFSET {
                write!(f, "/{}'", component - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{}", component)?;
            }
        }
        Ok(())
    }
}

/// A secp256k1 private key, wiped from memory on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; 32],
}

impl PrivateKey {
    /// Create a new private key from bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the raw private key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for PrivateKey {}

/// A compressed secp256k1 public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: [u8; 33],
}

impl PublicKey {
    /// Create a new public key from compressed bytes
    pub fn new(bytes: [u8; 33]) -> Self {
        Self { bytes }
    }

    /// Get the compressed public key bytes
    pub fn as_bytes(&self) -> &[u8; 33] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.bytes)
    }
}

/// A secp256k1 key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// The private key
    private_key: PrivateKey,
    /// The public key
    public_key: PublicKey,
}

impl KeyPair {
    /// Create a new key pair, checking that the public key belongs to the private key
    pub fn new(private_key: PrivateKey, public_key: PublicKey) -> Result<Self> {
        let expected = super::curve::public_key_from_private(&private_key)?;
        if expected != public_key {
            return Err(Error::KeyDerivation("Public key does not match private key".to_string()));
        }
        Ok(Self { private_key, public_key })
    }

    /// Pair keys the caller has just derived from each other
    pub(crate) fn from_derived(private_key: PrivateKey, public_key: PublicKey) -> Self {
        Self { private_key, public_key }
    }

    /// Build a key pair from a private key alone
    pub fn from_private_key(private_key: PrivateKey) -> Result<Self> {
        let public_key = super::curve::public_key_from_private(&private_key)?;
        Ok(Self { private_key, public_key })
    }

    /// Get the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}
