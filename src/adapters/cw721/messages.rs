//! CW721 query messages and response shapes
//!
//! Only the two read queries the collector needs: `all_tokens` and `nft_info`.
//! FCD wraps every answer as `{"height": ..., "result": ...}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::AttributeEntry;

/// Query messages understood by CW721 contracts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cw721QueryMsg {
    AllTokens {
        limit: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        start_after: Option<String>,
    },
    NftInfo {
        token_id: String,
    },
}

impl Cw721QueryMsg {
    /// Short name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Cw721QueryMsg::AllTokens { .. } => "all_tokens",
            Cw721QueryMsg::NftInfo { .. } => "nft_info",
        }
    }
}

/// FCD response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct QueryEnvelope<T> {
    pub result: T,
}

/// `all_tokens` result
#[derive(Debug, Clone, Deserialize)]
pub struct TokensResponse {
    pub tokens: Vec<String>,
}

/// `nft_info` result
#[derive(Debug, Clone, Deserialize)]
pub struct NftInfoResponse {
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub extension: Option<Value>,
}

/// On-chain metadata extension (the fields the rarity pipeline reads)
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataExtension {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub attributes: Option<Vec<AttributeEntry>>,
    /// Every other extension key, kept as published
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_tokens_first_page_omits_cursor() {
        let msg = Cw721QueryMsg::AllTokens {
            limit: 30,
            start_after: None,
        };
        assert_eq!(serde_json::to_value(&msg).unwrap(), json!({"all_tokens": {"limit": 30}}));
    }

    #[test]
    fn test_all_tokens_with_cursor() {
        let msg = Cw721QueryMsg::AllTokens {
            limit: 30,
            start_after: Some("42".into()),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"all_tokens": {"limit": 30, "start_after": "42"}})
        );
    }

    #[test]
    fn test_nft_info_message() {
        let msg = Cw721QueryMsg::NftInfo {
            token_id: "7".into(),
        };
        assert_eq!(serde_json::to_value(&msg).unwrap(), json!({"nft_info": {"token_id": "7"}}));
        assert_eq!(msg.name(), "nft_info");
    }

    #[test]
    fn test_extension_keeps_unknown_fields() {
        let extension: MetadataExtension = serde_json::from_value(json!({
            "name": "Punk #1",
            "image": "ipfs://cid1",
            "description": "A punk",
            "external_url": "https://example.com/1",
            "attributes": []
        }))
        .unwrap();

        assert_eq!(extension.name.as_deref(), Some("Punk #1"));
        assert_eq!(extension.extra.len(), 2);
        assert_eq!(extension.extra["description"], json!("A punk"));
        assert!(!extension.extra.contains_key("attributes"));
    }

    #[test]
    fn test_nft_info_response_null_extension() {
        let parsed: QueryEnvelope<NftInfoResponse> =
            serde_json::from_value(json!({"height": "10", "result": {"token_uri": null, "extension": null}}))
                .unwrap();
        assert!(parsed.result.extension.is_none());
    }
}
