//! Password-protected keystore
//!
//! A keystore record holds a secret encrypted with AES-256-CBC under the
//! first half of a PBKDF2-HMAC-SHA512 key, authenticated by a Keccak-256 MAC
//! keyed with the second half. The MAC is checked before anything is
//! decrypted.

pub mod cipher;
mod codec;
pub mod kdf;
pub mod mac;
mod record;

pub use codec::*;
pub use record::KeyStoreRecord;
