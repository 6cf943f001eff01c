//! Client configuration
//!
//! A [`ClientConfig`] is an explicit value handed to every session at
//! construction. Defaults:
//!
//! | Field                  | Default                 | Environment variable           |
//! |------------------------|-------------------------|--------------------------------|
//! | `blockchain_url`       | `http://localhost:1317` | `COSMOS_BLOCKCHAIN_URL`        |
//! | `chain_id`             | `vc-core-chain`         | `COSMOS_CHAIN_ID`              |
//! | `base_derivation_path` | `m/44'/118'/0'/0`       | `COSMOS_BASE_BIP44_PATH`       |
//! | `bech32_prefix`        | `cosmos`                | `COSMOS_BECH32_PREFIX`         |
//! | `default_gas`          | `200000000`             | `COSMOS_DEFAULT_GAS`           |
//! | `request_timeout`      | none                    | `COSMOS_REQUEST_TIMEOUT_SECS`  |

use std::time::Duration;

use crate::crypto::keys::DerivationPath;
use crate::error::{Error, Result};

pub const DEFAULT_BLOCKCHAIN_URL: &str = "http://localhost:1317";
pub const DEFAULT_CHAIN_ID: &str = "vc-core-chain";
pub const DEFAULT_BASE_BIP44_PATH: &str = "m/44'/118'/0'/0";
pub const DEFAULT_BECH32_PREFIX: &str = "cosmos";
pub const DEFAULT_GAS: u64 = 200_000_000;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the chain's REST endpoint
    pub blockchain_url: String,
    /// Chain id embedded in every sign document
    pub chain_id: String,
    /// Derivation path prefix, the account index is appended to it
    pub base_derivation_path: String,
    /// Human-readable part of bech32 addresses
    pub bech32_prefix: String,
    /// Gas limit used for the default fee
    pub default_gas: u64,
    /// Optional HTTP request timeout
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            blockchain_url: DEFAULT_BLOCKCHAIN_URL.to_string(),
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            base_derivation_path: DEFAULT_BASE_BIP44_PATH.to_string(),
            bech32_prefix: DEFAULT_BECH32_PREFIX.to_string(),
            default_gas: DEFAULT_GAS,
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create configuration for a given endpoint and chain id
    pub fn new(blockchain_url: impl Into<String>, chain_id: impl Into<String>) -> Self {
        Self {
            blockchain_url: blockchain_url.into(),
            chain_id: chain_id.into(),
            ..Self::default()
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let default_gas = match std::env::var("COSMOS_DEFAULT_GAS") {
            Ok(value) => value
                .parse()
                .map_err(|_| Error::Config(format!("Invalid COSMOS_DEFAULT_GAS: {}", value)))?,
            Err(_) => defaults.default_gas,
        };

        let request_timeout = match std::env::var("COSMOS_REQUEST_TIMEOUT_SECS") {
            Ok(value) => Some(Duration::from_secs(value.parse().map_err(|_| {
                Error::Config(format!("Invalid COSMOS_REQUEST_TIMEOUT_SECS: {}", value))
            })?)),
            Err(_) => defaults.request_timeout,
        };

        let config = Self {
            blockchain_url: std::env::var("COSMOS_BLOCKCHAIN_URL")
                .unwrap_or(defaults.blockchain_url),
            chain_id: std::env::var("COSMOS_CHAIN_ID").unwrap_or(defaults.chain_id),
            base_derivation_path: std::env::var("COSMOS_BASE_BIP44_PATH")
                .unwrap_or(defaults.base_derivation_path),
            bech32_prefix: std::env::var("COSMOS_BECH32_PREFIX")
                .unwrap_or(defaults.bech32_prefix),
            default_gas,
            request_timeout,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn with_bech32_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.bech32_prefix = prefix.into();
        self
    }

    pub fn with_base_derivation_path(mut self, path: impl Into<String>) -> Self {
        self.base_derivation_path = path.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Parsed form of `base_derivation_path`
    pub fn base_path(&self) -> Result<DerivationPath> {
        DerivationPath::parse(&self.base_derivation_path)
    }

    /// Check every field that later operations rely on
    pub fn validate(&self) -> Result<()> {
        if self.blockchain_url.trim().is_empty() {
            return Err(Error::Config("Blockchain URL must not be empty".to_string()));
        }

        if self.chain_id.trim().is_empty() {
            return Err(Error::Config("Chain id must not be empty".to_string()));
        }

        self.base_path()
            .map_err(|e| Error::Config(format!("Invalid base derivation path: {}", e)))?;

        bech32::Hrp::parse(&self.bech32_prefix)
            .map_err(|e| Error::Config(format!("Invalid bech32 prefix '{}': {}", self.bech32_prefix, e)))?;

        Ok(())
    }
}
