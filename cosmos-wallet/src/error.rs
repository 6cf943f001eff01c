//! Error types for the cosmos-wallet library

use thiserror::Error;

/// Custom error type for cosmos-wallet operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Insufficient data provided: {0}")]
    InsufficientData(String),

    /// Wrong password and tampered records are deliberately indistinguishable
    #[error("Message authentication code mismatch")]
    AuthenticationFailure,

    #[error("Malformed keystore record: {0}")]
    MalformedKeyStoreRecord(String),

    #[error("Network error: {0}")]
    NetworkFailure(String),

    #[error("Signing error: {0}")]
    SigningFailure(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::NetworkFailure(e.to_string())
    }
}

/// Result type for cosmos-wallet operations
pub type Result<T> = std::result::Result<T, Error>;
