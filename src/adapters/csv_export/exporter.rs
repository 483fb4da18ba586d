//! CSV Exporter
//!
//! Writes a scored collection as `{contract}_nft.csv`: one row per token in
//! rank order, header included, no index column. The extension and trait
//! columns depend on the collection, so the header is built per table.
//!
//! A trait or extension field whose name clashes with a fixed column is
//! written as `trait_{name}` or `extension_{name}`; any clash left after that
//! rejects the table.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::domain::{CollectionTable, RankedToken};

const LEADING_COLUMNS: [&str; 4] = ["token_id", "name", "image", "ipfs_url"];
const TRAILING_COLUMNS: [&str; 2] = ["rarity_score", "rarity_ranking"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write output file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Column '{0}' appears more than once in the header")]
    DuplicateColumn(String),
}

/// Writes ranked tables to an output directory
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn table_path(&self, contract_address: &str) -> PathBuf {
        self.output_dir.join(format!("{}_nft.csv", contract_address))
    }

    pub fn trait_summary_path(&self, contract_address: &str) -> PathBuf {
        self.output_dir.join(format!("{}_traits.csv", contract_address))
    }

    /// Write the ranked table, returning the file path
    pub fn write_table(
        &self,
        contract_address: &str,
        table: &CollectionTable,
    ) -> Result<PathBuf, ExportError> {
        let path = self.table_path(contract_address);
        table_header(table)?;
        write_table_to(create_file(&path)?, table)?;
        tracing::info!("Wrote {} rows to {}", table.len(), path.display());
        Ok(path)
    }

    /// Write one row per (trait type, value) with its count and probability
    pub fn write_trait_summary(
        &self,
        contract_address: &str,
        table: &CollectionTable,
    ) -> Result<PathBuf, ExportError> {
        let path = self.trait_summary_path(contract_address);
        write_trait_summary_to(create_file(&path)?, table)?;
        tracing::info!("Wrote trait summary to {}", path.display());
        Ok(path)
    }
}

fn create_file(path: &Path) -> Result<File, ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

fn is_fixed_column(name: &str) -> bool {
    LEADING_COLUMNS.contains(&name) || TRAILING_COLUMNS.contains(&name)
}

/// Header row for a table
pub fn table_header(table: &CollectionTable) -> Result<Vec<String>, ExportError> {
    let mut header: Vec<String> = LEADING_COLUMNS.iter().map(|s| s.to_string()).collect();
    header.extend(table.extra_fields.iter().map(|field| {
        if is_fixed_column(field) {
            format!("extension_{}", field)
        } else {
            field.clone()
        }
    }));

    let taken: HashSet<String> = header.iter().cloned().collect();
    header.extend(table.trait_types.iter().map(|trait_type| {
        if is_fixed_column(trait_type) || taken.contains(trait_type) {
            format!("trait_{}", trait_type)
        } else {
            trait_type.clone()
        }
    }));
    for trait_type in &table.trait_types {
        header.push(format!("{}_count", trait_type));
        header.push(format!("{}_probability", trait_type));
    }
    header.extend(TRAILING_COLUMNS.iter().map(|s| s.to_string()));

    let mut seen = HashSet::with_capacity(header.len());
    if let Some(dup) = header.iter().find(|column| !seen.insert(column.as_str())) {
        return Err(ExportError::DuplicateColumn(dup.clone()));
    }
    Ok(header)
}

fn extra_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn table_row(row: &RankedToken, extra_fields: &[String]) -> Vec<String> {
    let record = &row.record;
    let mut fields = vec![
        record.token_id.to_string(),
        record.name.clone().unwrap_or_default(),
        record.image.clone().unwrap_or_default(),
        row.ipfs_url.clone(),
    ];
    fields.extend(extra_fields.iter().map(|key| extra_cell(record.extra.get(key))));
    fields.extend(
        row.traits
            .iter()
            .map(|t| t.value.as_ref().map(|v| v.to_string()).unwrap_or_default()),
    );
    for t in &row.traits {
        fields.push(t.count.to_string());
        fields.push(t.probability.to_string());
    }
    fields.push(row.rarity_score.to_string());
    fields.push(row.rarity_ranking.to_string());
    fields
}

pub fn write_table_to<W: Write>(writer: W, table: &CollectionTable) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table_header(table)?)?;
    for row in &table.rows {
        csv.write_record(table_row(row, &table.extra_fields))?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_trait_summary_to<W: Write>(
    writer: W,
    table: &CollectionTable,
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["trait_type", "value", "count", "probability"])?;
    for freq in &table.frequencies {
        for entry in freq.entries() {
            csv.write_record([
                freq.trait_type().to_string(),
                entry.value.to_string(),
                entry.count.to_string(),
                entry.probability.to_string(),
            ])?;
        }
    }
    csv.flush()?;
    Ok(())
}
