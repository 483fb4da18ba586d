//! FCD Client
//!
//! Terra FCD exposes contract smart queries as
//! `GET {base}/wasm/contracts/{address}/store?query_msg={json}`.
//! Each call is a single request: no retries, the caller decides what a
//! failure means.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::ports::{ContractQueryPort, QueryError};

/// Default public FCD endpoint
pub const DEFAULT_FCD_URL: &str = "https://fcd.terra.dev";

/// Configuration for the FcdClient
#[derive(Debug, Clone)]
pub struct FcdConfig {
    /// FCD base URL, without trailing slash
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for FcdConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FCD_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl FcdConfig {
    /// Create config with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// HTTP client for FCD contract store queries
#[derive(Debug, Clone)]
pub struct FcdClient {
    config: FcdConfig,
    http: Client,
}

impl FcdClient {
    /// Create a new FcdClient with default configuration
    pub fn new() -> Result<Self, QueryError> {
        Self::with_config(FcdConfig::default())
    }

    /// Create a new FcdClient with custom configuration
    pub fn with_config(config: FcdConfig) -> Result<Self, QueryError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    /// Get the configured base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn store_url(&self, contract_address: &str) -> String {
        format!(
            "{}/wasm/contracts/{}/store",
            self.config.base_url.trim_end_matches('/'),
            contract_address
        )
    }
}

#[async_trait]
impl ContractQueryPort for FcdClient {
    async fn query_contract(
        &self,
        contract_address: &str,
        query_msg: &Value,
    ) -> Result<Value, QueryError> {
        let message = serde_json::to_string(query_msg)
            .map_err(|e| QueryError::EncodeError(e.to_string()))?;
        let url = self.store_url(contract_address);

        tracing::debug!("GET {} query_msg={}", url, message);

        let response = self
            .http
            .get(&url)
            .query(&[("query_msg", message.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::StatusError {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| QueryError::ParseError(format!("Failed to parse JSON: {}", e)))
    }
}
