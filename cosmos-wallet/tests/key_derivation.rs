//! Tests for mnemonic handling and key derivation

use cosmos_wallet::account::{derive_account, public_key_to_address, validate_address};
use cosmos_wallet::crypto::keys::*;
use cosmos_wallet::crypto::mnemonic::*;
use cosmos_wallet::Error;

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn cosmos_base() -> DerivationPath {
    DerivationPath::parse("m/44'/118'/0'/0").unwrap()
}

#[test]
fn test_mnemonic_entropy_roundtrip() {
    let entropy: Vec<u8> = (0u8..32).collect();
    let phrase = entropy_to_mnemonic(&entropy).unwrap();

    assert_eq!(phrase.split_whitespace().count(), 24);
    assert_eq!(mnemonic_to_entropy(&phrase).unwrap().as_slice(), entropy.as_slice());
    assert!(validate_mnemonic(&phrase).unwrap());
}

#[test]
fn test_generated_mnemonics_differ() {
    let first = Mnemonic::generate(MnemonicStrength::Words24).unwrap();
    let second = Mnemonic::generate(MnemonicStrength::Words24).unwrap();

    assert_eq!(first.word_count(), 24);
    assert_ne!(first, second);
}

#[test]
fn test_invalid_mnemonics_are_rejected() {
    // bad checksum
    let bad_checksum = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
    assert!(matches!(Mnemonic::parse(bad_checksum), Err(Error::InvalidMnemonic(_))));

    // unknown word
    let unknown = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon zzzz";
    assert!(matches!(Mnemonic::parse(unknown), Err(Error::InvalidMnemonic(_))));

    // entropy of an unsupported length
    assert!(matches!(entropy_to_mnemonic(&[0u8; 15]), Err(Error::InvalidMnemonic(_))));
}

#[test]
fn test_derivation_is_deterministic() {
    let mnemonic = Mnemonic::parse(ABANDON).unwrap();

    let (first_address, first_keys) = derive_account(&mnemonic, &cosmos_base(), "cosmos", 7).unwrap();
    let (second_address, second_keys) = derive_account(&mnemonic, &cosmos_base(), "cosmos", 7).unwrap();

    assert_eq!(first_address, second_address);
    assert_eq!(first_keys, second_keys);
    assert_eq!(first_address.path(), "m/44'/118'/0'/0/7");
}

#[test]
fn test_address_matches_public_key() {
    let mnemonic = Mnemonic::parse(ABANDON).unwrap();
    let (address, key_pair) = derive_account(&mnemonic, &cosmos_base(), "cosmos", 0).unwrap();

    assert_eq!(address.as_str(), "cosmos19rl4cm2hmr8afy4kldpxz3fka4jguq0auqdal4");
    assert_eq!(public_key_to_address(key_pair.public_key(), "cosmos").unwrap(), address.address);
    assert!(validate_address(address.as_str(), "cosmos"));
}

#[test]
fn test_direct_derivation_matches_account_derivation() {
    let mnemonic = Mnemonic::parse(ABANDON).unwrap();
    let seed = mnemonic_to_seed(ABANDON, None).unwrap();

    let path = cosmos_base().child(2).unwrap();
    let direct = derive_key_pair(&seed[..], &path).unwrap();
    let (_, via_account) = derive_account(&mnemonic, &cosmos_base(), "cosmos", 2).unwrap();

    assert_eq!(direct, via_account);
}

#[test]
fn test_hardened_account_index_is_rejected() {
    let mnemonic = Mnemonic::parse(ABANDON).unwrap();
    assert!(derive_account(&mnemonic, &cosmos_base(), "cosmos", HARDENED_OFFSET).is_err());
}

#[test]
fn test_path_parsing() {
    let path: DerivationPath = "m/44h/118'/0'/0/3".parse().unwrap();

    assert_eq!(path.components(), &[44 + HARDENED_OFFSET, 118 + HARDENED_OFFSET, HARDENED_OFFSET, 0, 3]);
    assert_eq!(path.to_string(), "m/44'/118'/0'/0/3");
    assert!(DerivationPath::parse("m/44'/x").is_err());
}
