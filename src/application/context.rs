//! Pipeline Context
//!
//! Everything one run needs to know, passed explicitly to each component.

use std::path::{Path, PathBuf};

use crate::adapters::cw721::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE};
use crate::domain::{CollectionCheckpoint, RarityConfig};

/// Default number of newly fetched tokens between checkpoint saves
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 25;

/// Where and how often collection progress is persisted
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointSettings {
    pub path: PathBuf,
    pub interval: usize,
}

/// Settings for one rarity run against one contract
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineContext {
    pub contract_address: String,
    pub page_size: u32,
    pub max_pages: usize,
    pub output_dir: PathBuf,
    /// `None` keeps the run fully in memory
    pub checkpoint: Option<CheckpointSettings>,
    pub rarity: RarityConfig,
    /// Also write `{contract}_traits.csv`
    pub trait_summary: bool,
}

impl PipelineContext {
    /// Defaults for a contract, writing to the current directory
    pub fn new(contract_address: impl Into<String>) -> Self {
        Self {
            contract_address: contract_address.into(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            output_dir: PathBuf::from("."),
            checkpoint: None,
            rarity: RarityConfig::default(),
            trait_summary: false,
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Enable checkpointing next to the output files
    pub fn with_checkpoint(mut self, interval: usize) -> Self {
        let path = CollectionCheckpoint::default_path(&self.output_dir, &self.contract_address);
        self.checkpoint = Some(CheckpointSettings { path, interval });
        self
    }

    pub fn checkpoint_path(&self) -> Option<&Path> {
        self.checkpoint.as_ref().map(|c| c.path.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let ctx = PipelineContext::new("terra1abc");
        assert_eq!(ctx.page_size, 30);
        assert_eq!(ctx.output_dir, PathBuf::from("."));
        assert!(ctx.checkpoint.is_none());
        assert!(!ctx.trait_summary);
    }

    #[test]
    fn test_checkpoint_follows_output_dir() {
        let ctx = PipelineContext::new("terra1abc")
            .with_output_dir("/tmp/out")
            .with_checkpoint(10);
        assert_eq!(
            ctx.checkpoint_path(),
            Some(Path::new("/tmp/out/terra1abc_checkpoint.json"))
        );
        assert_eq!(ctx.checkpoint.unwrap().interval, 10);
    }
}
