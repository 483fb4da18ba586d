//! Rarity Engine
//!
//! rarity.tools-style scoring: a token's rarity score is the sum, over every
//! trait type in the scoring universe, of `1 / probability` of the token's
//! value for that trait. Lower probability means a larger contribution, so
//! rarer combinations score higher and rank closer to 1.
//!
//! Scoring is a pure function of its input: the same records and settings
//! always produce the same table.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::frequency::{TraitFrequencyTable, ValueKey};
use super::image::{resolve_ipfs_url, DEFAULT_IPFS_GATEWAY};
use super::token::{TokenId, TokenRecord, TraitValue};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RarityError {
    #[error("Token {0} has no image reference")]
    InvalidImageReference(TokenId),

    #[error("Token {token_id}: value '{value}' for trait '{trait_type}' missing from frequency table")]
    ScoringJoin {
        token_id: TokenId,
        trait_type: String,
        value: String,
    },

    #[error("Reference record {0} not found in collection")]
    ReferenceRecordNotFound(TokenId),

    #[error("No trait types to score under schema '{0}'")]
    EmptyTraitUniverse(TraitSchema),

    #[error("Invalid rarity setting: {0}")]
    InvalidSetting(String),
}

/// Which trait types take part in scoring
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TraitSchema {
    /// Trait types of the first record; types introduced later are ignored
    #[default]
    FirstRecord,
    /// Trait types of a designated record
    Record(TokenId),
    /// Every trait type seen anywhere, in first-seen order
    Union,
}

impl FromStr for TraitSchema {
    type Err = RarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(TraitSchema::FirstRecord),
            "union" => Ok(TraitSchema::Union),
            other => match other.strip_prefix("token:") {
                Some(id) if !id.is_empty() => Ok(TraitSchema::Record(TokenId::new(id))),
                _ => Err(RarityError::InvalidSetting(format!(
                    "trait_schema must be 'first', 'union' or 'token:<id>', got '{}'",
                    s
                ))),
            },
        }
    }
}

impl fmt::Display for TraitSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitSchema::FirstRecord => f.write_str("first"),
            TraitSchema::Union => f.write_str("union"),
            TraitSchema::Record(id) => write!(f, "token:{}", id),
        }
    }
}

/// Ordering applied to tokens with exactly equal scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Ascending token id (numeric when both ids are integers)
    #[default]
    TokenId,
    /// Keep collection order
    InputOrder,
}

impl FromStr for TieBreak {
    type Err = RarityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "token_id" => Ok(TieBreak::TokenId),
            "input_order" => Ok(TieBreak::InputOrder),
            _ => Err(RarityError::InvalidSetting(format!(
                "tie_break must be 'token_id' or 'input_order', got '{}'",
                s
            ))),
        }
    }
}

/// Scoring settings
#[derive(Debug, Clone, PartialEq)]
pub struct RarityConfig {
    pub trait_schema: TraitSchema,
    pub tie_break: TieBreak,
    /// Prefix substituted for a leading `ipfs://`
    pub ipfs_gateway: String,
}

impl Default for RarityConfig {
    fn default() -> Self {
        Self {
            trait_schema: TraitSchema::default(),
            tie_break: TieBreak::default(),
            ipfs_gateway: DEFAULT_IPFS_GATEWAY.to_string(),
        }
    }
}

/// One token's value for one scored trait, joined with its frequency
#[derive(Debug, Clone, PartialEq)]
pub struct TraitScore {
    pub value: Option<TraitValue>,
    pub count: usize,
    pub probability: f64,
}

/// A scored and ranked token
#[derive(Debug, Clone, PartialEq)]
pub struct RankedToken {
    pub record: TokenRecord,
    pub ipfs_url: String,
    /// Aligned with `CollectionTable::trait_types`
    pub traits: Vec<TraitScore>,
    pub rarity_score: f64,
    /// 1 = rarest
    pub rarity_ranking: usize,
}

impl RankedToken {
    pub fn token_id(&self) -> &TokenId {
        &self.record.token_id
    }
}

/// Scored collection, rows in rank order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionTable {
    /// Extension fields outside name/image/attributes, in first-seen order
    pub extra_fields: Vec<String>,
    pub trait_types: Vec<String>,
    pub frequencies: Vec<TraitFrequencyTable>,
    pub rows: Vec<RankedToken>,
}

impl CollectionTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn find(&self, token_id: &TokenId) -> Option<&RankedToken> {
        self.rows.iter().find(|r| &r.record.token_id == token_id)
    }
}

/// Computes trait frequencies, rarity scores and rankings
#[derive(Debug, Clone, Default)]
pub struct RarityEngine {
    config: RarityConfig,
}

impl RarityEngine {
    pub fn new(config: RarityConfig) -> Self {
        Self { config }
    }

    /// Score and rank a collection
    pub fn score(&self, records: &[TokenRecord]) -> Result<CollectionTable, RarityError> {
        let ipfs_urls = records
            .iter()
            .map(|r| {
                r.image
                    .as_deref()
                    .map(|image| resolve_ipfs_url(image, &self.config.ipfs_gateway))
                    .ok_or_else(|| RarityError::InvalidImageReference(r.token_id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if records.is_empty() {
            return Ok(CollectionTable::default());
        }

        let trait_types = self.trait_universe(records)?;
        if trait_types.is_empty() {
            return Err(RarityError::EmptyTraitUniverse(self.config.trait_schema.clone()));
        }
        let frequencies: Vec<TraitFrequencyTable> = trait_types
            .iter()
            .map(|t| TraitFrequencyTable::build(t, records))
            .collect();

        tracing::debug!(
            "Scoring {} tokens over {} trait types ({})",
            records.len(),
            trait_types.len(),
            self.config.trait_schema
        );

        let mut rows = Vec::with_capacity(records.len());
        for (record, ipfs_url) in records.iter().zip(ipfs_urls) {
            let traits = Self::join_frequencies(record, &frequencies)?;
            let counts: Vec<usize> = traits.iter().map(|t| t.count).collect();
            let rarity_score = rarity_score(records.len(), &counts);
            rows.push(RankedToken {
                record: record.clone(),
                ipfs_url,
                traits,
                rarity_score,
                rarity_ranking: 0,
            });
        }

        self.rank(&mut rows);

        Ok(CollectionTable {
            extra_fields: extra_fields(records),
            trait_types,
            frequencies,
            rows,
        })
    }

    /// Trait types that take part in scoring, without duplicates
    pub fn trait_universe(&self, records: &[TokenRecord]) -> Result<Vec<String>, RarityError> {
        let types: Vec<String> = match &self.config.trait_schema {
            TraitSchema::FirstRecord => records
                .first()
                .map(|r| r.trait_types().into_iter().map(String::from).collect())
                .unwrap_or_default(),
            TraitSchema::Record(id) => records
                .iter()
                .find(|r| &r.token_id == id)
                .ok_or_else(|| RarityError::ReferenceRecordNotFound(id.clone()))?
                .trait_types()
                .into_iter()
                .map(String::from)
                .collect(),
            TraitSchema::Union => {
                let mut all: Vec<String> = Vec::new();
                for t in records.iter().flat_map(|r| r.trait_types()) {
                    if !all.iter().any(|seen| seen == t) {
                        all.push(t.to_string());
                    }
                }
                all
            }
        };
        Ok(types)
    }

    pub(crate) fn join_frequencies(
        record: &TokenRecord,
        frequencies: &[TraitFrequencyTable],
    ) -> Result<Vec<TraitScore>, RarityError> {
        frequencies
            .iter()
            .map(|table| {
                let value = record.trait_value(table.trait_type());
                let key = ValueKey::from_value(value);
                let freq = table.get(&key).ok_or_else(|| RarityError::ScoringJoin {
                    token_id: record.token_id.clone(),
                    trait_type: table.trait_type().to_string(),
                    value: key.to_string(),
                })?;
                Ok(TraitScore {
                    value: value.cloned(),
                    count: freq.count,
                    probability: freq.probability,
                })
            })
            .collect()
    }

    /// Sort by descending score and assign 1-based rankings
    fn rank(&self, rows: &mut [RankedToken]) {
        // sort_by is stable, so InputOrder falls out of Ordering::Equal
        let tie_break = self.config.tie_break;
        rows.sort_by(|a, b| {
            b.rarity_score
                .total_cmp(&a.rarity_score)
                .then_with(|| match tie_break {
                    TieBreak::TokenId => a.record.token_id.natural_cmp(&b.record.token_id),
                    TieBreak::InputOrder => Ordering::Equal,
                })
        });
        for (i, row) in rows.iter_mut().enumerate() {
            row.rarity_ranking = i + 1;
        }
    }
}

fn extra_fields(records: &[TokenRecord]) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    for key in records.iter().flat_map(|r| r.extra.keys()) {
        if !fields.contains(key) {
            fields.push(key.clone());
        }
    }
    fields
}

/// Sum of `total / count` over every scored trait.
///
/// Computed as one reduced fraction when it fits in `u128`, so equal sums
/// always round to the same `f64` regardless of trait order.
fn rarity_score(total: usize, counts: &[usize]) -> f64 {
    match exact_score(total, counts) {
        Some((num, den)) => num as f64 / den as f64,
        None => {
            let mut terms: Vec<f64> = counts.iter().map(|&c| total as f64 / c as f64).collect();
            terms.sort_by(f64::total_cmp);
            terms.into_iter().fold(0.0, |acc, x| acc + x)
        }
    }
}

fn exact_score(total: usize, counts: &[usize]) -> Option<(u128, u128)> {
    let total = total as u128;
    let (mut num, mut den) = (0u128, 1u128);
    for &count in counts {
        let count = count as u128;
        if count == 0 {
            return None;
        }
        let lcm = den.checked_mul(count / gcd(den, count))?;
        num = num
            .checked_mul(lcm / den)?
            .checked_add(total.checked_mul(lcm / count)?)?;
        den = lcm;
        let g = gcd(num, den);
        num /= g;
        den /= g;
    }
    Some((num, den))
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::AttributeEntry;
    use approx::assert_relative_eq;

    fn record(id: &str, attrs: &[(&str, &str)]) -> TokenRecord {
        TokenRecord::new(
            id,
            Some(format!("ipfs://cid{}", id)),
            attrs.iter().map(|(t, v)| AttributeEntry::new(*t, *v)).collect(),
        )
    }

    fn backgrounds() -> Vec<TokenRecord> {
        vec![
            record("1", &[("Background", "Red")]),
            record("2", &[("Background", "Red")]),
            record("3", &[("Background", "Blue")]),
        ]
    }

    #[test]
    fn test_background_scenario() {
        let table = RarityEngine::default().score(&backgrounds()).unwrap();

        let blue = table.find(&TokenId::new("3")).unwrap();
        assert_relative_eq!(blue.rarity_score, 3.0);
        assert_eq!(blue.rarity_ranking, 1);

        for id in ["1", "2"] {
            let red = table.find(&TokenId::new(id)).unwrap();
            assert_relative_eq!(red.rarity_score, 1.5);
            assert!(red.rarity_ranking > blue.rarity_ranking);
        }
    }

    #[test]
    fn test_ipfs_url_derived() {
        let table = RarityEngine::default().score(&backgrounds()).unwrap();
        let row = table.find(&TokenId::new("1")).unwrap();
        assert_eq!(row.ipfs_url, "https://cf-ipfs.com/ipfs/cid1");
    }

    #[test]
    fn test_missing_image_rejected() {
        let mut records = backgrounds();
        records[1].image = None;
        let err = RarityEngine::default().score(&records).unwrap_err();
        assert_eq!(err, RarityError::InvalidImageReference(TokenId::new("2")));
    }

    #[test]
    fn test_rankings_are_permutation() {
        let records: Vec<TokenRecord> = (0..17)
            .map(|i| {
                let color = ["Red", "Blue", "Green"][i % 3];
                let hat = if i % 5 == 0 { "Crown" } else { "Cap" };
                record(&i.to_string(), &[("Background", color), ("Hat", hat)])
            })
            .collect();

        let table = RarityEngine::default().score(&records).unwrap();
        let mut ranks: Vec<usize> = table.rows.iter().map(|r| r.rarity_ranking).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=17).collect::<Vec<_>>());
        assert!(table.rows.iter().all(|r| r.rarity_score > 0.0));
    }

    #[test]
    fn test_score_is_deterministic() {
        let records = backgrounds();
        let engine = RarityEngine::default();
        assert_eq!(engine.score(&records).unwrap(), engine.score(&records).unwrap());
    }

    #[test]
    fn test_tie_break_token_id_numeric() {
        let records = vec![
            record("10", &[("Background", "Red")]),
            record("9", &[("Background", "Red")]),
        ];
        let table = RarityEngine::default().score(&records).unwrap();
        assert_eq!(table.rows[0].token_id(), &TokenId::new("9"));
        assert_eq!(table.rows[1].token_id(), &TokenId::new("10"));
    }

    #[test]
    fn test_tie_break_input_order() {
        let records = vec![
            record("10", &[("Background", "Red")]),
            record("9", &[("Background", "Red")]),
        ];
        let engine = RarityEngine::new(RarityConfig {
            tie_break: TieBreak::InputOrder,
            ..Default::default()
        });
        let table = engine.score(&records).unwrap();
        assert_eq!(table.rows[0].token_id(), &TokenId::new("10"));
        assert_eq!(table.rows[1].rarity_ranking, 2);
    }

    #[test]
    fn test_first_record_schema_ignores_later_traits() {
        let records = vec![
            record("1", &[("A", "x"), ("B", "y")]),
            record("2", &[("A", "x"), ("B", "z"), ("C", "rare")]),
            record("3", &[("A", "w"), ("B", "y")]),
        ];
        let table = RarityEngine::default().score(&records).unwrap();
        assert_eq!(table.trait_types, vec!["A", "B"]);

        // C does not contribute: A=x (2/3) + B=z (1/3)
        let row = table.find(&TokenId::new("2")).unwrap();
        assert_eq!(row.traits.len(), 2);
        assert_relative_eq!(row.rarity_score, 1.5 + 3.0);
    }

    #[test]
    fn test_union_schema_includes_later_traits() {
        let records = vec![
            record("1", &[("A", "x")]),
            record("2", &[("A", "x"), ("C", "rare")]),
        ];
        let engine = RarityEngine::new(RarityConfig {
            trait_schema: TraitSchema::Union,
            ..Default::default()
        });
        let table = engine.score(&records).unwrap();
        assert_eq!(table.trait_types, vec!["A", "C"]);

        // token 1 has C missing (1/2), token 2 has C=rare (1/2)
        let row = table.find(&TokenId::new("1")).unwrap();
        assert_eq!(row.traits[1].value, None);
        assert_relative_eq!(row.rarity_score, 1.0 + 2.0);
    }

    #[test]
    fn test_reference_record_schema() {
        let records = vec![record("1", &[("A", "x")]), record("2", &[("A", "x"), ("B", "y")])];

        let engine = RarityEngine::new(RarityConfig {
            trait_schema: TraitSchema::Record(TokenId::new("2")),
            ..Default::default()
        });
        assert_eq!(engine.score(&records).unwrap().trait_types, vec!["A", "B"]);

        let engine = RarityEngine::new(RarityConfig {
            trait_schema: TraitSchema::Record(TokenId::new("99")),
            ..Default::default()
        });
        assert_eq!(
            engine.score(&records).unwrap_err(),
            RarityError::ReferenceRecordNotFound(TokenId::new("99"))
        );
    }

    #[test]
    fn test_duplicate_trait_type_scored_once() {
        let records = vec![
            record("1", &[("A", "x"), ("A", "x")]),
            record("2", &[("A", "y")]),
        ];
        let table = RarityEngine::default().score(&records).unwrap();
        assert_eq!(table.trait_types, vec!["A"]);
        assert_relative_eq!(table.rows[0].rarity_score, 2.0);
    }

    #[test]
    fn test_extra_fields_collected_across_records() {
        let records = vec![
            record("1", &[("A", "x")]).with_extra("description", "first"),
            record("2", &[("A", "y")])
                .with_extra("description", "second")
                .with_extra("animation_url", "ipfs://anim"),
        ];
        let table = RarityEngine::default().score(&records).unwrap();
        assert_eq!(table.extra_fields, vec!["description", "animation_url"]);
    }

    #[test]
    fn test_empty_collection() {
        let table = RarityEngine::default().score(&[]).unwrap();
        assert!(table.is_empty());
        assert!(table.trait_types.is_empty());
    }

    #[test]
    fn test_equal_sums_tie_break_on_token_id() {
        // tokens 1-3 each hold one 1/7 value and two 6/7 values, in different traits
        let records = vec![
            record("3", &[("A", "a"), ("B", "b"), ("C", "rare")]),
            record("1", &[("A", "rare"), ("B", "b"), ("C", "c")]),
            record("2", &[("A", "a"), ("B", "rare"), ("C", "c")]),
            record("4", &[("A", "a"), ("B", "b"), ("C", "c")]),
            record("5", &[("A", "a"), ("B", "b"), ("C", "c")]),
            record("6", &[("A", "a"), ("B", "b"), ("C", "c")]),
            record("7", &[("A", "a"), ("B", "b"), ("C", "c")]),
        ];
        let table = RarityEngine::default().score(&records).unwrap();

        let top: Vec<&str> = table.rows[..3].iter().map(|r| r.token_id().as_str()).collect();
        assert_eq!(top, vec!["1", "2", "3"]);
        assert_eq!(table.rows[0].rarity_score, table.rows[1].rarity_score);
        assert_eq!(table.rows[1].rarity_score, table.rows[2].rarity_score);
        assert_relative_eq!(table.rows[0].rarity_score, 7.0 + 7.0 / 6.0 + 7.0 / 6.0);
    }

    #[test]
    fn test_score_independent_of_trait_order() {
        let forward = rarity_score(7, &[1, 6, 6]);
        assert_eq!(forward, rarity_score(7, &[6, 1, 6]));
        assert_eq!(forward, rarity_score(7, &[6, 6, 1]));
        assert_eq!(rarity_score(3, &[1]), 3.0);
        assert_eq!(rarity_score(3, &[2]), 1.5);
    }

    #[test]
    fn test_empty_trait_universe_rejected() {
        let records = vec![
            record("1", &[]),
            record("2", &[("A", "x"), ("B", "y")]),
            record("3", &[("A", "x"), ("B", "z")]),
        ];
        let err = RarityEngine::default().score(&records).unwrap_err();
        assert_eq!(err, RarityError::EmptyTraitUniverse(TraitSchema::FirstRecord));

        let engine = RarityEngine::new(RarityConfig {
            trait_schema: TraitSchema::Union,
            ..Default::default()
        });
        let table = engine.score(&records).unwrap();
        assert!(table.rows.iter().all(|r| r.rarity_score > 0.0));
    }

    #[test]
    fn test_join_rejects_value_outside_table() {
        let frequencies = vec![TraitFrequencyTable::build("Background", &backgrounds())];
        let stranger = record("4", &[("Background", "Green")]);

        let err = RarityEngine::join_frequencies(&stranger, &frequencies).unwrap_err();
        assert_eq!(
            err,
            RarityError::ScoringJoin {
                token_id: TokenId::new("4"),
                trait_type: "Background".to_string(),
                value: "Green".to_string(),
            }
        );

        let joined = RarityEngine::join_frequencies(&backgrounds()[2], &frequencies).unwrap();
        assert_eq!(joined[0].count, 1);
    }

    #[test]
    fn test_parse_settings() {
        assert_eq!("first".parse::<TraitSchema>().unwrap(), TraitSchema::FirstRecord);
        assert_eq!("union".parse::<TraitSchema>().unwrap(), TraitSchema::Union);
        assert_eq!(
            "token:42".parse::<TraitSchema>().unwrap(),
            TraitSchema::Record(TokenId::new("42"))
        );
        assert!("token:".parse::<TraitSchema>().is_err());
        assert!("all".parse::<TraitSchema>().is_err());

        assert_eq!("token_id".parse::<TieBreak>().unwrap(), TieBreak::TokenId);
        assert_eq!("input_order".parse::<TieBreak>().unwrap(), TieBreak::InputOrder);
        assert!("random".parse::<TieBreak>().is_err());
    }
}
