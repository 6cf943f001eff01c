//! Signing and verification of transactions

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};
use tracing::debug;

use crate::crypto::hash::sha256;
use crate::crypto::keys::{sign_digest, verify_digest, KeyPair, PublicKey};
use crate::error::{Error, Result};
use super::types::{BroadcastMode, PubKeyInfo, SignedTransaction, StdSignature, StdTx, Transaction, PUB_KEY_TYPE};
use super::value::canonical_json;

/// Sign a transaction and wrap it in a broadcast envelope
///
/// The envelope carries the normalized messages and fee, exactly as they
/// appear in the signed document.
pub fn sign_transaction(transaction: &Transaction, key_pair: &KeyPair, mode: BroadcastMode) -> Result<SignedTransaction> {
    let sign_doc = transaction.sign_doc()?;
    let digest = sha256(canonical_json(&sign_doc)?.as_bytes());
    let signature = sign_digest(key_pair.private_key(), &digest)?;

    debug!(
        "Signed transaction with {} message(s), account_number {}, sequence {}",
        transaction.msgs.len(),
        transaction.account_number,
        transaction.sequence
    );

    let msg = sign_doc.get("msgs")
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| Error::Serialization("Sign document has no messages".to_string()))?;
    let fee = sign_doc.get("fee")
        .cloned()
        .ok_or_else(|| Error::Serialization("Sign document has no fee".to_string()))?;

    Ok(SignedTransaction {
        tx: StdTx {
            msg,
            fee,
            signatures: vec![StdSignature {
                account_number: transaction.account_number.to_string(),
                sequence: transaction.sequence.to_string(),
                signature: BASE64.encode(signature),
                pub_key: PubKeyInfo {
                    key_type: PUB_KEY_TYPE.to_string(),
                    value: key_pair.public_key().to_base64(),
                },
            }],
            memo: transaction.memo.clone(),
        },
        mode,
    })
}

/// Check every signature of an envelope against the document it claims to sign
pub fn verify_signature(signed: &SignedTransaction, chain_id: &str) -> Result<bool> {
    if signed.tx.signatures.is_empty() {
        return Ok(false);
    }

    for entry in &signed.tx.signatures {
        let sign_doc = json!({
            "msgs": signed.tx.msg,
            "chain_id": chain_id,
            "fee": signed.tx.fee,
            "memo": signed.tx.memo,
            "account_number": entry.account_number,
            "sequence": entry.sequence,
        });
        let digest = sha256(canonical_json(&sign_doc)?.as_bytes());

        let public_key = decode_public_key(&entry.pub_key.value)?;
        let signature = BASE64.decode(&entry.signature)
            .map_err(|e| Error::SigningFailure(format!("Invalid signature encoding: {}", e)))?;

        if !verify_digest(&public_key, &digest, &signature)? {
            return Ok(false);
        }
    }

    Ok(true)
}

fn decode_public_key(encoded: &str) -> Result<PublicKey> {
    let bytes = BASE64.decode(encoded)
        .map_err(|e| Error::SigningFailure(format!("Invalid public key encoding: {}", e)))?;
    let bytes: [u8; 33] = bytes.as_slice().try_into()
        .map_err(|_| Error::SigningFailure(format!("Invalid public key length: {}", bytes.len())))?;
    Ok(PublicKey::new(bytes))
}
