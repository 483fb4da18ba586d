//! Collection Checkpoint
//!
//! Persists the token records fetched so far, so a run that aborted halfway
//! through a large collection can be resumed without refetching everything.
//! The collection itself stays fail-fast: a checkpoint is only a head start
//! for the next run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::token::TokenRecord;

#[derive(Error, Debug, Clone)]
pub enum CheckpointError {
    #[error("Failed to serialize checkpoint: {0}")]
    SerializationError(String),

    #[error("Failed to deserialize checkpoint: {0}")]
    DeserializationError(String),

    #[error("Failed to write checkpoint file: {0}")]
    WriteError(String),

    #[error("Failed to read checkpoint file: {0}")]
    ReadError(String),

    #[error("Failed to delete checkpoint file: {0}")]
    DeleteError(String),

    #[error("Failed to create directory: {0}")]
    DirectoryError(String),
}

/// Records collected for one contract, in collection order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionCheckpoint {
    pub contract_address: String,
    pub saved_at: DateTime<Utc>,
    pub records: Vec<TokenRecord>,
}

/// Outcome of looking for a checkpoint on startup
#[derive(Debug, Clone)]
pub enum RecoveryStatus {
    /// Nothing to resume
    NoCheckpoint,
    Recovered(CollectionCheckpoint),
    /// Unreadable or belongs to another contract; the run starts from scratch
    Corrupted(String),
}

impl CollectionCheckpoint {
    pub fn new(contract_address: impl Into<String>, records: Vec<TokenRecord>) -> Self {
        Self {
            contract_address: contract_address.into(),
            saved_at: Utc::now(),
            records,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), CheckpointError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CheckpointError::DirectoryError(e.to_string()))?;
        }

        let content = serde_json::to_string(self)
            .map_err(|e| CheckpointError::SerializationError(e.to_string()))?;

        fs::write(path, content).map_err(|e| CheckpointError::WriteError(e.to_string()))?;

        tracing::debug!(
            "Checkpoint saved: {} records for {} -> {}",
            self.records.len(),
            self.contract_address,
            path.display()
        );

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Option<Self>, CheckpointError> {
        if !path.exists() {
            return Ok(None);
        }

        let content =
            fs::read_to_string(path).map_err(|e| CheckpointError::ReadError(e.to_string()))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let checkpoint: Self = serde_json::from_str(&content)
            .map_err(|e| CheckpointError::DeserializationError(e.to_string()))?;

        tracing::info!(
            "Checkpoint loaded: {} records for {} (saved {})",
            checkpoint.records.len(),
            checkpoint.contract_address,
            checkpoint.saved_at
        );

        Ok(Some(checkpoint))
    }

    pub fn delete(path: &Path) -> Result<(), CheckpointError> {
        if path.exists() {
            fs::remove_file(path).map_err(|e| CheckpointError::DeleteError(e.to_string()))?;
            tracing::info!("Checkpoint deleted: {}", path.display());
        }
        Ok(())
    }

    /// Load a checkpoint and check it belongs to `contract_address`
    pub fn try_recover(path: &Path, contract_address: &str) -> RecoveryStatus {
        match Self::load(path) {
            Ok(Some(checkpoint)) => {
                if checkpoint.contract_address != contract_address {
                    return RecoveryStatus::Corrupted(format!(
                        "Checkpoint is for contract {}, not {}",
                        checkpoint.contract_address, contract_address
                    ));
                }
                RecoveryStatus::Recovered(checkpoint)
            }
            Ok(None) => RecoveryStatus::NoCheckpoint,
            Err(e) => RecoveryStatus::Corrupted(e.to_string()),
        }
    }

    /// `{contract}_checkpoint.json` inside `dir`
    pub fn default_path(dir: &Path, contract_address: &str) -> PathBuf {
        dir.join(format!("{}_checkpoint.json", contract_address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::AttributeEntry;
    use tempfile::tempdir;

    fn create_test_checkpoint() -> CollectionCheckpoint {
        CollectionCheckpoint::new(
            "terra1abc",
            vec![
                TokenRecord::new(
                    "1",
                    Some("ipfs://one".into()),
                    vec![AttributeEntry::new("Background", "Red")],
                ),
                TokenRecord::new("2", Some("ipfs://two".into()), vec![]),
            ],
        )
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");
        let checkpoint = create_test_checkpoint();

        checkpoint.save(&path).unwrap();
        let loaded = CollectionCheckpoint::load(&path).unwrap().unwrap();
        assert_eq!(loaded, checkpoint);
    }

    #[test]
    fn test_load_nonexistent() {
        let dir = tempdir().unwrap();
        let loaded = CollectionCheckpoint::load(&dir.path().join("missing.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");
        create_test_checkpoint().save(&path).unwrap();

        CollectionCheckpoint::delete(&path).unwrap();
        assert!(!path.exists());

        // deleting again is fine
        CollectionCheckpoint::delete(&path).unwrap();
    }

    #[test]
    fn test_try_recover_other_contract() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");
        create_test_checkpoint().save(&path).unwrap();

        let status = CollectionCheckpoint::try_recover(&path, "terra1other");
        assert!(matches!(status, RecoveryStatus::Corrupted(_)));

        let status = CollectionCheckpoint::try_recover(&path, "terra1abc");
        assert!(matches!(status, RecoveryStatus::Recovered(_)));
    }

    #[test]
    fn test_try_recover_corrupted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("checkpoint.json");
        fs::write(&path, "{ invalid json }").unwrap();

        let status = CollectionCheckpoint::try_recover(&path, "terra1abc");
        assert!(matches!(status, RecoveryStatus::Corrupted(_)));
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("checkpoint.json");
        create_test_checkpoint().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_default_path() {
        let path = CollectionCheckpoint::default_path(Path::new("/data"), "terra1abc");
        assert_eq!(path, PathBuf::from("/data/terra1abc_checkpoint.json"));
    }
}
