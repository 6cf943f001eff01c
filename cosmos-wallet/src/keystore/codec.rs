//! Keystore encryption and decryption

use tracing::warn;
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use super::cipher::{self, CIPHER_KEY_LENGTH};
use super::kdf::{derive_key, random_salt_and_iv, DERIVED_KEY_LENGTH};
use super::mac::{compute_mac, verify_mac};
use super::record::KeyStoreRecord;

/// Plaintext recovered from a keystore record
pub struct KeyStoreContents {
    /// Decrypted secret, wiped on drop
    pub secret: Zeroizing<Vec<u8>>,
    /// Public material stored alongside the secret
    pub public_material: String,
}

/// Encrypt `secret` under `password`
///
/// `public_material` is stored in clear; `None` stores an empty string.
pub fn encrypt(password: &str, secret: &[u8], public_material: Option<&str>) -> Result<KeyStoreRecord> {
    if password.is_empty() {
        return Err(Error::InsufficientData("Missing password".to_string()));
    }
    if secret.is_empty() {
        return Err(Error::InsufficientData("Missing secret".to_string()));
    }

    let (salt, iv) = random_salt_and_iv();
    let key = derive_key(password, &salt);

    let ciphertext = cipher::encrypt(&cipher_key(&key), &iv, secret);
    let mac = compute_mac(&key, &ciphertext);

    Ok(KeyStoreRecord {
        sk: hex::encode(&ciphertext),
        salt: hex::encode(salt),
        iv: hex::encode(iv),
        mac: hex::encode(mac),
        pk: public_material.unwrap_or_default().to_string(),
    })
}

/// Decrypt a record, verifying its MAC first
pub fn decrypt(password: &str, record: &KeyStoreRecord) -> Result<KeyStoreContents> {
    if password.is_empty() {
        return Err(Error::InsufficientData("Missing password".to_string()));
    }

    let decoded = record.decode()?;
    let key = derive_key(password, &decoded.salt);

    if !verify_mac(&key, &decoded.ciphertext, &decoded.mac) {
        warn!("Keystore MAC verification failed");
        return Err(Error::AuthenticationFailure);
    }

    let secret = cipher::decrypt(&cipher_key(&key), &decoded.iv, &decoded.ciphertext)?;

    Ok(KeyStoreContents {
        secret,
        public_material: record.pk.clone(),
    })
}

fn cipher_key(key: &[u8; DERIVED_KEY_LENGTH]) -> Zeroizing<[u8; CIPHER_KEY_LENGTH]> {
    let mut cipher_key = Zeroizing::new([0u8; CIPHER_KEY_LENGTH]);
    cipher_key.copy_from_slice(&key[..CIPHER_KEY_LENGTH]);
    cipher_key
}
