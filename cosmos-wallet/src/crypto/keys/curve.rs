//! secp256k1 hierarchical derivation and ECDSA signing

use hmac::{Hmac, Mac};
use secp256k1::{ecdsa, Message, PublicKey as Secp256k1PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use super::derivation::{DerivationPath, KeyPair, PrivateKey, PublicKey, HARDENED_OFFSET};

/// An intermediate node of the derivation tree
struct ExtendedKey {
    secret_key: SecretKey,
    chain_code: Zeroizing<[u8; 32]>,
}

/// Derive a key pair from a BIP-39 seed and derivation path
pub fn derive_key_pair(seed: &[u8], path: &DerivationPath) -> Result<KeyPair> {
    let secp = Secp256k1::new();

    let mut node = derive_master_key(seed)?;
    for component in path.components() {
        node = derive_child_key(&secp, &node, *component)?;
    }

    let public_key = Secp256k1PublicKey::from_secret_key(&secp, &node.secret_key);
    let private_key = PrivateKey::new(node.secret_key.secret_bytes());
    let public_key = PublicKey::new(public_key.serialize());

    Ok(KeyPair::from_derived(private_key, public_key))
}

/// Compute the compressed public key of a private key
pub fn public_key_from_private(private_key: &PrivateKey) -> Result<PublicKey> {
    let secp = Secp256k1::signing_only();
    let secret_key = SecretKey::from_slice(private_key.as_bytes())
        .map_err(|e| Error::KeyDerivation(format!("Invalid secret key: {}", e)))?;

    Ok(PublicKey::new(Secp256k1PublicKey::from_secret_key(&secp, &secret_key).serialize()))
}

/// Sign a 32-byte digest, returning the compact `r || s` signature
///
/// Nonces follow RFC 6979 and `s` is normalized to the lower half of the
/// curve order, so the same key and digest always give the same signature.
pub fn sign_digest(private_key: &PrivateKey, digest: &[u8; 32]) -> Result<[u8; 64]> {
    let secp = Secp256k1::signing_only();
    let secret_key = SecretKey::from_slice(private_key.as_bytes())
        .map_err(|e| Error::SigningFailure(format!("Invalid secret key: {}", e)))?;
    let message = Message::from_digest_slice(digest)
        .map_err(|e| Error::SigningFailure(format!("Invalid digest: {}", e)))?;

    Ok(secp.sign_ecdsa(&message, &secret_key).serialize_compact())
}

/// Verify a compact signature over a 32-byte digest
pub fn verify_digest(public_key: &PublicKey, digest: &[u8; 32], signature: &[u8]) -> Result<bool> {
    let secp = Secp256k1::verification_only();
    let public_key = Secp256k1PublicKey::from_slice(public_key.as_bytes())
        .map_err(|e| Error::SigningFailure(format!("Invalid public key: {}", e)))?;
    let signature = ecdsa::Signature::from_compact(signature)
        .map_err(|e| Error::SigningFailure(format!("Invalid signature: {}", e)))?;
    let message = Message::from_digest_slice(digest)
        .map_err(|e| Error::SigningFailure(format!("Invalid digest: {}", e)))?;

    Ok(secp.verify_ecdsa(&message, &signature, &public_key).is_ok())
}

/// Derive the master key from a seed
fn derive_master_key(seed: &[u8]) -> Result<ExtendedKey> {
    let mut hmac = Hmac::<Sha512>::new_from_slice(b"Bitcoin seed")
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;

    hmac.update(seed);
    split_node(&hmac.finalize().into_bytes())
}

/// Derive a child key from a parent key
fn derive_child_key(
    secp: &Secp256k1<secp256k1::All>,
    parent: &ExtendedKey,
    index: u32,
) -> Result<ExtendedKey> {
    let mut data = Zeroizing::new(Vec::with_capacity(37));

    if index >= HARDENED_OFFSET {
        data.push(0);
        data.extend_from_slice(&parent.secret_key.secret_bytes());
    } else {
        let parent_public_key = Secp256k1PublicKey::from_secret_key(secp, &parent.secret_key);
        data.extend_from_slice(&parent_public_key.serialize());
    }
    data.extend_from_slice(&index.to_be_bytes());

    let mut hmac = Hmac::<Sha512>::new_from_slice(&parent.chain_code[..])
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;
    hmac.update(&data);
    let child = split_node(&hmac.finalize().into_bytes())?;

    // child = IL + parent (mod n)
    let secret_key = child.secret_key
        .add_tweak(&Scalar::from(parent.secret_key))
        .map_err(|e| Error::KeyDerivation(format!("Key addition error: {}", e)))?;

    Ok(ExtendedKey {
        secret_key,
        chain_code: child.chain_code,
    })
}

fn split_node(output: &[u8]) -> Result<ExtendedKey> {
    let secret_key = SecretKey::from_slice(&output[0..32])
        .map_err(|e| Error::KeyDerivation(format!("Invalid derived key: {}", e)))?;

    let mut chain_code = Zeroizing::new([0u8; 32]);
    chain_code.copy_from_slice(&output[32..64]);

    Ok(ExtendedKey { secret_key, chain_code })
}
