//! AES-256-CBC encryption of keystore secrets

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use super::kdf::IV_LENGTH;

/// AES-256 key length
pub const CIPHER_KEY_LENGTH: usize = 32;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Encrypt with PKCS#7 padding
pub fn encrypt(key: &[u8; CIPHER_KEY_LENGTH], iv: &[u8; IV_LENGTH], plaintext: &[u8]) -> Vec<u8> {
    Aes256CbcEnc::new(&(*key).into(), &(*iv).into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Decrypt and strip PKCS#7 padding
///
/// A padding failure is reported as [`Error::AuthenticationFailure`]: callers
/// only decrypt after the MAC matched, so bad padding means a bad record.
pub fn decrypt(key: &[u8; CIPHER_KEY_LENGTH], iv: &[u8; IV_LENGTH], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    Aes256CbcDec::new(&(*key).into(), &(*iv).into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| Error::AuthenticationFailure)
}
