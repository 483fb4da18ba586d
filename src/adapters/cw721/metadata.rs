//! Metadata Fetcher
//!
//! Resolves one token id to its on-chain metadata via `nft_info`, and
//! flattens the `extension` into a `TokenRecord` whose attributes double as
//! first-class trait fields.

use super::error::FetchError;
use super::messages::{Cw721QueryMsg, MetadataExtension, NftInfoResponse};
use super::query::run_query;
use crate::domain::{TokenId, TokenRecord};
use crate::ports::ContractQueryPort;

/// Fetches per-token metadata
pub struct MetadataFetcher<'a, P: ContractQueryPort + ?Sized> {
    port: &'a P,
}

impl<'a, P: ContractQueryPort + ?Sized> MetadataFetcher<'a, P> {
    pub fn new(port: &'a P) -> Self {
        Self { port }
    }

    /// Fetch and flatten the metadata of one token
    pub async fn get_token_info(
        &self,
        contract_address: &str,
        token_id: &TokenId,
    ) -> Result<TokenRecord, FetchError> {
        let msg = Cw721QueryMsg::NftInfo {
            token_id: token_id.as_str().to_string(),
        };
        let info: NftInfoResponse = run_query(self.port, contract_address, &msg).await?;
        parse_extension(token_id, info)
    }
}

/// Turn an `nft_info` result into a `TokenRecord`
pub fn parse_extension(token_id: &TokenId, info: NftInfoResponse) -> Result<TokenRecord, FetchError> {
    let malformed = |reason: String| FetchError::MalformedMetadata {
        token_id: token_id.clone(),
        reason,
    };

    let raw = info
        .extension
        .ok_or_else(|| malformed("missing extension".to_string()))?;
    let extension: MetadataExtension =
        serde_json::from_value(raw).map_err(|e| malformed(format!("invalid extension: {}", e)))?;
    let attributes = extension
        .attributes
        .ok_or_else(|| malformed("missing extension.attributes".to_string()))?;

    Ok(TokenRecord {
        token_id: token_id.clone(),
        name: extension.name,
        image: extension.image,
        attributes,
        extra: extension.extra,
    })
}
