//! CW721 fetch errors

use thiserror::Error;

use crate::domain::TokenId;
use crate::ports::QueryError;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Remote query '{query}' failed for contract {contract}: {source}")]
    RemoteQuery {
        contract: String,
        query: &'static str,
        #[source]
        source: QueryError,
    },

    #[error("Unexpected '{query}' response from contract {contract}: {reason}")]
    UnexpectedResponse {
        contract: String,
        query: &'static str,
        reason: String,
    },

    #[error("Token index did not advance: cursor {cursor} was already used")]
    PaginationStalled { cursor: TokenId },

    #[error("Token index exceeded {max_pages} pages without an empty page")]
    PageLimitExceeded { max_pages: usize },

    #[error("Malformed metadata for token {token_id}: {reason}")]
    MalformedMetadata { token_id: TokenId, reason: String },
}

impl FetchError {
    /// Network failure, bad response shape, or a misbehaving index
    pub fn is_remote_query(&self) -> bool {
        !matches!(self, FetchError::MalformedMetadata { .. })
    }

    pub fn is_malformed_metadata(&self) -> bool {
        matches!(self, FetchError::MalformedMetadata { .. })
    }
}
