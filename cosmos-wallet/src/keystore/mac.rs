//! Keccak-256 message authentication for keystore files
//!
//! mac = keccak256(derived_key[32..64] || ciphertext). The MAC half of the
//! derived key never touches the cipher.

use crate::crypto::hash::keccak256;
use super::cipher::CIPHER_KEY_LENGTH;
use super::kdf::DERIVED_KEY_LENGTH;

/// MAC length in bytes
pub const MAC_LENGTH: usize = 32;

/// Compute the MAC of a ciphertext under a derived key
pub fn compute_mac(derived_key: &[u8; DERIVED_KEY_LENGTH], ciphertext: &[u8]) -> [u8; MAC_LENGTH] {
    keccak256(&[&derived_key[CIPHER_KEY_LENGTH..], ciphertext])
}

/// Recompute the MAC and compare it with `expected` in constant time
pub fn verify_mac(derived_key: &[u8; DERIVED_KEY_LENGTH], ciphertext: &[u8], expected: &[u8]) -> bool {
    constant_time_eq(&compute_mac(derived_key, ciphertext), expected)
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mac_ignores_cipher_half_of_key() {
        let mut key = [0u8; DERIVED_KEY_LENGTH];
        let reference = compute_mac(&key, b"ciphertext");

        key[0] = 0xff;
        assert_eq!(compute_mac(&key, b"ciphertext"), reference);

        key[CIPHER_KEY_LENGTH] = 0xff;
        assert_ne!(compute_mac(&key, b"ciphertext"), reference);
    }

    #[test]
    fn test_verify_mac() {
        let key = [5u8; DERIVED_KEY_LENGTH];
        let mac = compute_mac(&key, b"data");

        assert!(verify_mac(&key, b"data", &mac));
        assert!(!verify_mac(&key, b"datb", &mac));
        assert!(!verify_mac(&key, b"data", &mac[..31]));
    }
}
