//! RPC collaborator used to read account state and broadcast transactions

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use super::types::{AccountState, SignedTransaction};

/// Source of chain state and sink for signed transactions
///
/// Implementations must not retry: a failed broadcast may already have
/// consumed the sequence number.
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Fetch the current account number and sequence of `address`
    async fn account_state(&self, address: &str) -> Result<AccountState>;

    /// Post a signed transaction and return the node's response untouched
    async fn broadcast(&self, transaction: &SignedTransaction) -> Result<Value>;
}

/// [`RpcClient`] backed by the chain's REST endpoint
#[derive(Debug, Clone)]
pub struct HttpRpcClient {
    /// Base URL without trailing slash
    base_url: String,
    /// HTTP client
    client: reqwest::Client,
}

impl HttpRpcClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.blockchain_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn accounts_url(&self, address: &str) -> String {
        format!("{}/auth/accounts/{}", self.base_url, address)
    }

    fn txs_url(&self) -> String {
        format!("{}/txs", self.base_url)
    }
}

#[async_trait]
impl RpcClient for HttpRpcClient {
    async fn account_state(&self, address: &str) -> Result<AccountState> {
        let url = self.accounts_url(address);
        debug!("Fetching account state from {}", url);

        let response: Value = self.client.get(&url)
            .send()
            .await?
            .json()
            .await?;

        parse_account_response(&response)
    }

    async fn broadcast(&self, transaction: &SignedTransaction) -> Result<Value> {
        let url = self.txs_url();
        info!("Broadcasting [{}] to {} (mode {})", transaction.message_types(), url, transaction.mode);

        let response = self.client.post(&url)
            .json(transaction)
            .send()
            .await?
            .json()
            .await?;

        Ok(response)
    }
}

/// Extract `result.value.{account_number, sequence}` from an accounts response
pub fn parse_account_response(response: &Value) -> Result<AccountState> {
    let value = response.pointer("/result/value")
        .ok_or_else(|| Error::UnexpectedResponse(format!("No result.value in account response: {}", response)))?;

    serde_json::from_value(value.clone())
        .map_err(|e| Error::UnexpectedResponse(format!("Invalid account state: {}", e)))
}
