use thiserror::Error;

use crate::adapters::csv_export::ExportError;
use crate::adapters::cw721::FetchError;
use crate::domain::{CheckpointError, RarityError};

/// Anything that aborts a rarity run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Collection failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Scoring failed: {0}")]
    Rarity(#[from] RarityError),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}
