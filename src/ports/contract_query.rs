//! Contract Query Port
//!
//! Read-only smart query against a CosmWasm contract: a JSON message goes in,
//! the endpoint's JSON response comes back untouched.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Endpoint returned {status}: {body}")]
    StatusError { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Failed to encode query message: {0}")]
    EncodeError(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContractQueryPort: Send + Sync {
    /// Run `query_msg` against `contract_address` and return the raw response body
    async fn query_contract(
        &self,
        contract_address: &str,
        query_msg: &Value,
    ) -> Result<Value, QueryError>;
}
