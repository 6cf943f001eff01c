//! Cryptographic primitives and operations
//!
//! This module provides functionality for mnemonic generation, key derivation,
//! and the hash functions required for wallet management.

pub mod hash;
pub mod keys;
pub mod mnemonic;

pub use keys::*;
pub use mnemonic::*;
