//! Keystore file format
//!
//! ```json
//! { "sk": "<hex ciphertext>", "salt": "<hex, 32 bytes>", "iv": "<hex, 16 bytes>",
//!   "mac": "<hex, 32 bytes>", "pk": "<cleartext public material or empty>" }
//! ```
//!
//! There is no version field; the algorithms are implied by the layout.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use super::kdf::{IV_LENGTH, SALT_LENGTH};
use super::mac::MAC_LENGTH;

/// A password-protected keystore record
///
/// Missing JSON keys deserialize as empty strings and are rejected by
/// [`KeyStoreRecord::decode`], so an incomplete file is reported as malformed
/// rather than as a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyStoreRecord {
    /// Encrypted secret
    #[serde(default)]
    pub sk: String,
    /// PBKDF2 salt
    #[serde(default)]
    pub salt: String,
    /// AES-CBC initialization vector
    #[serde(default)]
    pub iv: String,
    /// Keccak-256 MAC
    #[serde(default)]
    pub mac: String,
    /// Public material, stored in clear
    #[serde(default)]
    pub pk: String,
}

/// Binary form of a record's encrypted fields
pub(crate) struct DecodedRecord {
    pub ciphertext: Vec<u8>,
    pub salt: [u8; SALT_LENGTH],
    pub iv: [u8; IV_LENGTH],
    pub mac: [u8; MAC_LENGTH],
}

impl KeyStoreRecord {
    /// Parse a record from keystore file contents
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|e| Error::MalformedKeyStoreRecord(e.to_string()))
    }

    /// Serialize the record, pretty output uses two-space indentation
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub(crate) fn decode(&self) -> Result<DecodedRecord> {
        Ok(DecodedRecord {
            ciphertext: decode_field("sk", &self.sk)?,
            salt: decode_fixed("salt", &self.salt)?,
            iv: decode_fixed("iv", &self.iv)?,
            mac: decode_fixed("mac", &self.mac)?,
        })
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    if value.is_empty() {
        return Err(Error::MalformedKeyStoreRecord(format!("Missing field: {}", name)));
    }

    hex::decode(value).map_err(|e| Error::MalformedKeyStoreRecord(format!("Invalid hex in {}: {}", name, e)))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> Result<[u8; N]> {
    let bytes = decode_field(name, value)?;
    bytes.as_slice().try_into().map_err(|_| {
        Error::MalformedKeyStoreRecord(format!("Invalid length for {}: expected {} bytes, got {}", name, N, bytes.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KeyStoreRecord {
        KeyStoreRecord {
            sk: "00".repeat(16),
            salt: "11".repeat(SALT_LENGTH),
            iv: "22".repeat(IV_LENGTH),
            mac: "33".repeat(MAC_LENGTH),
            pk: String::new(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json(false).unwrap()).unwrap();
        for key in ["sk", "pk", "salt", "iv", "mac"] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test]
    fn test_pretty_json_roundtrip() {
        let pretty = sample().to_json(true).unwrap();
        assert!(pretty.contains("\n  \"sk\""));
        assert_eq!(KeyStoreRecord::from_json(&pretty).unwrap(), sample());
    }

    #[test]
    fn test_missing_mac_is_malformed() {
        let mut json: serde_json::Value = serde_json::from_str(&sample().to_json(false).unwrap()).unwrap();
        json.as_object_mut().unwrap().remove("mac");
        let record = KeyStoreRecord::from_json(&json.to_string()).unwrap();
        assert!(record.mac.is_empty());

        match record.decode() {
            Err(Error::MalformedKeyStoreRecord(message)) => assert!(message.contains("mac")),
            other => panic!("expected malformed record, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_invalid_hex_and_lengths_are_malformed() {
        let mut bad_hex = sample();
        bad_hex.iv = "zz".repeat(IV_LENGTH);
        assert!(matches!(bad_hex.decode(), Err(Error::MalformedKeyStoreRecord(_))));

        let mut short_salt = sample();
        short_salt.salt = "11".repeat(SALT_LENGTH - 1);
        assert!(matches!(short_salt.decode(), Err(Error::MalformedKeyStoreRecord(_))));
    }

    #[test]
    fn test_unparsable_json_is_malformed() {
        assert!(matches!(KeyStoreRecord::from_json("not json"), Err(Error::MalformedKeyStoreRecord(_))));
        assert!(matches!(KeyStoreRecord::from_json(r#"{"sk": 5}"#), Err(Error::MalformedKeyStoreRecord(_))));
    }
}
