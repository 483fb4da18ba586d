//! Rarity Pipeline
//!
//! One run, start to finish: collect every token, score the collection,
//! write the CSV. The whole run is a single `Result`; nothing is written
//! unless collection and scoring both succeed.

use std::path::PathBuf;

use crate::adapters::csv_export::CsvExporter;
use crate::domain::{CollectionCheckpoint, CollectionTable, RarityEngine};
use crate::ports::ContractQueryPort;

use super::collector::CollectionCollector;
use super::context::PipelineContext;
use super::error::PipelineError;

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub table: CollectionTable,
    pub table_path: PathBuf,
    pub trait_summary_path: Option<PathBuf>,
}

pub struct RarityPipeline<P: ContractQueryPort> {
    port: P,
    ctx: PipelineContext,
}

impl<P: ContractQueryPort> RarityPipeline<P> {
    pub fn new(port: P, ctx: PipelineContext) -> Self {
        Self { port, ctx }
    }

    /// Collect and score without writing anything
    pub async fn score(&self) -> Result<CollectionTable, PipelineError> {
        let records = CollectionCollector::new(&self.port, &self.ctx).collect().await?;
        let table = RarityEngine::new(self.ctx.rarity.clone()).score(&records)?;
        Ok(table)
    }

    /// Collect, score and export
    pub async fn run(&self) -> Result<RunSummary, PipelineError> {
        tracing::info!(
            "Ranking collection {} (trait schema: {}, tie break: {:?})",
            self.ctx.contract_address,
            self.ctx.rarity.trait_schema,
            self.ctx.rarity.tie_break
        );

        let table = self.score().await?;

        let exporter = CsvExporter::new(&self.ctx.output_dir);
        let table_path = exporter.write_table(&self.ctx.contract_address, &table)?;
        let trait_summary_path = if self.ctx.trait_summary {
            Some(exporter.write_trait_summary(&self.ctx.contract_address, &table)?)
        } else {
            None
        };

        if let Some(path) = self.ctx.checkpoint_path() {
            CollectionCheckpoint::delete(path)?;
        }

        if let Some(top) = table.rows.first() {
            tracing::info!(
                "Rarest token: {} (score {:.2}) of {}",
                top.token_id(),
                top.rarity_score,
                table.len()
            );
        }

        Ok(RunSummary {
            table,
            table_path,
            trait_summary_path,
        })
    }
}
