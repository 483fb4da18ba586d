//! Application Layer - wiring the collection pipeline together

pub mod context;
pub mod collector;
pub mod error;
pub mod pipeline;

pub use context::{CheckpointSettings, PipelineContext, DEFAULT_CHECKPOINT_INTERVAL};
pub use collector::CollectionCollector;
pub use error::PipelineError;
pub use pipeline::{RarityPipeline, RunSummary};
