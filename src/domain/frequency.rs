//! Trait Frequency Table
//!
//! Per trait type, how often each value occurs across the collection.
//! Tokens without the trait (or with a `null` value) are counted in a
//! dedicated missing bucket so every token contributes to the distribution.

use std::collections::HashMap;
use std::fmt;

use super::token::{TokenRecord, TraitValue};

/// Grouping key for a trait value.
///
/// Text and numbers are kept apart so `"1"` and `1` form different groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKey {
    Missing,
    Number(String),
    Text(String),
}

impl ValueKey {
    pub fn from_value(value: Option<&TraitValue>) -> Self {
        match value {
            None => ValueKey::Missing,
            Some(TraitValue::Text(s)) => ValueKey::Text(s.clone()),
            Some(TraitValue::Number(n)) => ValueKey::Number(n.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ValueKey::Missing)
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKey::Missing => Ok(()),
            ValueKey::Number(s) | ValueKey::Text(s) => f.write_str(s),
        }
    }
}

/// Count and probability of one observed value
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFrequency {
    pub value: ValueKey,
    pub count: usize,
    /// `count / total tokens`
    pub probability: f64,
}

/// Frequency distribution of one trait type over a collection
#[derive(Debug, Clone, PartialEq)]
pub struct TraitFrequencyTable {
    trait_type: String,
    total: usize,
    /// Most common first, ties by value
    entries: Vec<ValueFrequency>,
    index: HashMap<ValueKey, usize>,
}

impl TraitFrequencyTable {
    /// Build the table for `trait_type` over every record
    pub fn build(trait_type: &str, records: &[TokenRecord]) -> Self {
        let mut counts: HashMap<ValueKey, usize> = HashMap::new();
        for record in records {
            *counts
                .entry(ValueKey::from_value(record.trait_value(trait_type)))
                .or_insert(0) += 1;
        }

        let total = records.len();
        let mut entries: Vec<ValueFrequency> = counts
            .into_iter()
            .map(|(value, count)| ValueFrequency {
                value,
                count,
                probability: count as f64 / total as f64,
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.value.clone(), i))
            .collect();

        Self {
            trait_type: trait_type.to_string(),
            total,
            entries,
            index,
        }
    }

    pub fn trait_type(&self) -> &str {
        &self.trait_type
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn entries(&self) -> &[ValueFrequency] {
        &self.entries
    }

    /// Look up the frequency of a value; `None` if it was never observed
    pub fn get(&self, key: &ValueKey) -> Option<&ValueFrequency> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Number of distinct values, the missing bucket included
    pub fn distinct_values(&self) -> usize {
        self.entries.len()
    }
}
