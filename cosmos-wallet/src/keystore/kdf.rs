//! Password-based key derivation for keystore files

use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;
use zeroize::Zeroizing;

/// Salt length in bytes
pub const SALT_LENGTH: usize = 32;

/// IV length in bytes
pub const IV_LENGTH: usize = 16;

/// PBKDF2 iteration count
pub const KDF_ITERATIONS: u32 = 1000;

/// Derived key length; the first half encrypts, the second half authenticates
pub const DERIVED_KEY_LENGTH: usize = 64;

/// Derive the 64-byte keystore key from a password and salt
pub fn derive_key(password: &str, salt: &[u8]) -> Zeroizing<[u8; DERIVED_KEY_LENGTH]> {
    let mut key = Zeroizing::new([0u8; DERIVED_KEY_LENGTH]);
    pbkdf2_hmac::<Sha512>(password.as_bytes(), salt, KDF_ITERATIONS, &mut key[..]);
    key
}

/// Draw one random block and split it into salt and IV
pub fn random_salt_and_iv() -> ([u8; SALT_LENGTH], [u8; IV_LENGTH]) {
    let mut block = Zeroizing::new([0u8; SALT_LENGTH + IV_LENGTH]);
    OsRng.fill_bytes(&mut block[..]);

    let mut salt = [0u8; SALT_LENGTH];
    let mut iv = [0u8; IV_LENGTH];
    salt.copy_from_slice(&block[..SALT_LENGTH]);
    iv.copy_from_slice(&block[SALT_LENGTH..]);

    (salt, iv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_is_deterministic() {
        let salt = [9u8; SALT_LENGTH];
        assert_eq!(derive_key("pw", &salt), derive_key("pw", &salt));
    }

    #[test]
    fn test_derive_key_depends_on_inputs() {
        let salt = [9u8; SALT_LENGTH];
        let other_salt = [8u8; SALT_LENGTH];

        assert_ne!(derive_key("pw", &salt), derive_key("pw2", &salt));
        assert_ne!(derive_key("pw", &salt), derive_key("pw", &other_salt));
    }

    #[test]
    fn test_random_salt_and_iv_differ_between_calls() {
        let (salt_a, iv_a) = random_salt_and_iv();
        let (salt_b, iv_b) = random_salt_and_iv();

        assert_ne!(salt_a, salt_b);
        assert_ne!(iv_a, iv_b);
    }
}
