//! Token Types
//!
//! Core types for a single CW721 token: its identifier, its attribute list,
//! and the flattened record the rarity engine works on.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// Opaque token identifier, unique within a contract.
///
/// Doubles as the pagination cursor (`start_after`) and the `nft_info` lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ordering used for rank tie-breaks.
    ///
    /// Numeric ids compare as integers ("9" < "10"); anything else falls back
    /// to byte-wise comparison. A numeric id sorts before a non-numeric one.
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<u128>(), other.0.parse::<u128>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TokenId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A trait value as stored on chain: either a string or a JSON number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraitValue {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for TraitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitValue::Text(s) => f.write_str(s),
            TraitValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for TraitValue {
    fn from(s: &str) -> Self {
        TraitValue::Text(s.to_string())
    }
}

impl From<i64> for TraitValue {
    fn from(n: i64) -> Self {
        TraitValue::Number(n.into())
    }
}

/// One `{trait_type, value}` entry from a token's `extension.attributes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub trait_type: String,
    /// `null` on chain is kept as `None` and scored under the missing bucket
    #[serde(default)]
    pub value: Option<TraitValue>,
}

impl AttributeEntry {
    pub fn new(trait_type: impl Into<String>, value: impl Into<TraitValue>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: Some(value.into()),
        }
    }
}

/// Flattened view of one token's metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token_id: TokenId,
    pub name: Option<String>,
    /// Image URI as published in the token's extension (usually `ipfs://...`)
    pub image: Option<String>,
    /// Attributes in the order the contract returned them
    pub attributes: Vec<AttributeEntry>,
    /// Remaining extension fields (description, external_url, ...)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl TokenRecord {
    pub fn new(token_id: impl Into<TokenId>, image: Option<String>, attributes: Vec<AttributeEntry>) -> Self {
        Self {
            token_id: token_id.into(),
            name: None,
            image,
            attributes,
            extra: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Value of a trait type as a first-class field.
    ///
    /// When a trait type is listed more than once the last entry wins.
    /// `None` covers both an absent trait and an explicit `null`.
    pub fn trait_value(&self, trait_type: &str) -> Option<&TraitValue> {
        self.attributes
            .iter()
            .rev()
            .find(|a| a.trait_type == trait_type)
            .and_then(|a| a.value.as_ref())
    }

    /// Trait types in attribute order, duplicates removed
    pub fn trait_types(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::with_capacity(self.attributes.len());
        for attr in &self.attributes {
            if !seen.contains(&attr.trait_type.as_str()) {
                seen.push(&attr.trait_type);
            }
        }
        seen
    }
}
