//! In-memory CW721 contract for tests
//!
//! Answers `all_tokens` and `nft_info` queries from a fixed token list and
//! records every query it receives.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::contract_query::{ContractQueryPort, QueryError};

/// Fake CW721 contract that records calls and serves canned metadata
#[derive(Debug, Default, Clone)]
pub struct InMemoryCw721 {
    token_ids: Vec<String>,
    extensions: HashMap<String, Value>,
    failing: HashSet<String>,
    ignore_cursor: bool,
    calls: Arc<Mutex<Vec<Value>>>,
}

impl InMemoryCw721 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add a token with its `extension` object
    pub fn with_token(mut self, token_id: &str, extension: Value) -> Self {
        self.token_ids.push(token_id.to_string());
        self.extensions.insert(token_id.to_string(), extension);
        self
    }

    /// Builder method to add a token whose `nft_info` has no extension
    pub fn with_bare_token(mut self, token_id: &str) -> Self {
        self.token_ids.push(token_id.to_string());
        self
    }

    /// Builder method to make `nft_info` for a token fail with a 500
    pub fn with_failure(mut self, token_id: &str) -> Self {
        self.failing.insert(token_id.to_string());
        self
    }

    /// Builder method to serve the first page for every `all_tokens` call
    pub fn ignoring_cursor(mut self) -> Self {
        self.ignore_cursor = true;
        self
    }

    /// Get all recorded query messages
    pub fn get_calls(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `all_tokens` pages served
    pub fn page_calls(&self) -> usize {
        self.get_calls()
            .iter()
            .filter(|c| c.get("all_tokens").is_some())
            .count()
    }

    fn all_tokens(&self, limit: usize, start_after: Option<&str>) -> Value {
        let start = match start_after {
            Some(cursor) if !self.ignore_cursor => self
                .token_ids
                .iter()
                .position(|id| id == cursor)
                .map_or(self.token_ids.len(), |i| i + 1),
            _ => 0,
        };
        let tokens: Vec<&String> = self.token_ids.iter().skip(start).take(limit).collect();
        json!({ "result": { "tokens": tokens } })
    }

    fn nft_info(&self, token_id: &str) -> Result<Value, QueryError> {
        if self.failing.contains(token_id) {
            return Err(QueryError::StatusError {
                status: 500,
                body: format!("failed to load token {}", token_id),
            });
        }
        match self.extensions.get(token_id) {
            Some(extension) => Ok(json!({
                "result": { "token_uri": null, "extension": extension }
            })),
            None => Ok(json!({ "result": { "token_uri": null } })),
        }
    }
}

#[async_trait]
impl ContractQueryPort for InMemoryCw721 {
    async fn query_contract(
        &self,
        _contract_address: &str,
        query_msg: &Value,
    ) -> Result<Value, QueryError> {
        self.calls.lock().unwrap().push(query_msg.clone());

        if let Some(q) = query_msg.get("all_tokens") {
            let limit = q.get("limit").and_then(Value::as_u64).unwrap_or(10) as usize;
            let start_after = q.get("start_after").and_then(Value::as_str);
            return Ok(self.all_tokens(limit, start_after));
        }

        if let Some(token_id) = query_msg
            .get("nft_info")
            .and_then(|q| q.get("token_id"))
            .and_then(Value::as_str)
        {
            return self.nft_info(token_id);
        }

        Err(QueryError::StatusError {
            status: 400,
            body: format!("unknown query: {}", query_msg),
        })
    }
}
