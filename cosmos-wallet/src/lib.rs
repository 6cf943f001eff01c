//! Cosmos Wallet - Wallet toolkit for Cosmos SDK based chains
//!
//! This library manages BIP-39 mnemonics, derives secp256k1 accounts and
//! bech32 addresses, signs amino JSON transactions for the legacy REST
//! endpoint, and stores mnemonic entropy in password protected keystores.

pub mod error;
pub mod config;
pub mod crypto;
pub mod account;
pub mod transaction;
pub mod keystore;

// Re-export commonly used types for convenience
pub use account::{Address, Session};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use keystore::KeyStoreRecord;
pub use transaction::{BroadcastMode, HttpRpcClient, Message, RpcClient, SignedTransaction};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
