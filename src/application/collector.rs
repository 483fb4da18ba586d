//! Collection Collector
//!
//! Enumerates a contract's token ids, then fetches metadata for each one in
//! order, one request at a time. The first failed fetch aborts the whole
//! collection: there is no partial result and no retry. When checkpointing
//! is enabled, progress is saved before the error is returned so the next
//! run can pick up where this one stopped.

use std::collections::HashMap;

use crate::adapters::cw721::{MetadataFetcher, TokenIndexFetcher};
use crate::domain::{CollectionCheckpoint, RecoveryStatus, TokenId, TokenRecord};
use crate::ports::ContractQueryPort;

use super::context::{CheckpointSettings, PipelineContext};
use super::error::PipelineError;

pub struct CollectionCollector<'a, P: ContractQueryPort + ?Sized> {
    port: &'a P,
    ctx: &'a PipelineContext,
}

impl<'a, P: ContractQueryPort + ?Sized> CollectionCollector<'a, P> {
    pub fn new(port: &'a P, ctx: &'a PipelineContext) -> Self {
        Self { port, ctx }
    }

    /// Fetch every token's record, in token index order
    pub async fn collect(&self) -> Result<Vec<TokenRecord>, PipelineError> {
        let contract = self.ctx.contract_address.as_str();

        let token_ids = TokenIndexFetcher::new(self.port)
            .with_page_size(self.ctx.page_size)
            .with_max_pages(self.ctx.max_pages)
            .list_all_tokens(contract)
            .await?;

        let mut recovered = self.recover();
        let metadata = MetadataFetcher::new(self.port);
        let total = token_ids.len();
        let mut records: Vec<TokenRecord> = Vec::with_capacity(total);
        let mut fetched_since_save = 0usize;

        for (i, token_id) in token_ids.iter().enumerate() {
            if let Some(record) = recovered.remove(token_id) {
                records.push(record);
                continue;
            }

            match metadata.get_token_info(contract, token_id).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::error!("Failed to fetch token {}: {}", token_id, e);
                    if let Some(settings) = &self.ctx.checkpoint {
                        if let Err(save_err) = self.save_checkpoint(settings, &records) {
                            tracing::warn!("Could not save checkpoint: {}", save_err);
                        }
                    }
                    return Err(e.into());
                }
            }

            tracing::info!("Processed {} / {}", i + 1, total);

            fetched_since_save += 1;
            if let Some(settings) = &self.ctx.checkpoint {
                if fetched_since_save >= settings.interval.max(1) {
                    self.save_checkpoint(settings, &records)?;
                    fetched_since_save = 0;
                }
            }
        }

        Ok(records)
    }

    /// Records from a previous run, keyed by id
    fn recover(&self) -> HashMap<TokenId, TokenRecord> {
        let Some(settings) = &self.ctx.checkpoint else {
            return HashMap::new();
        };

        match CollectionCheckpoint::try_recover(&settings.path, &self.ctx.contract_address) {
            RecoveryStatus::Recovered(checkpoint) => {
                tracing::info!(
                    "Resuming from checkpoint with {} tokens already fetched",
                    checkpoint.records.len()
                );
                checkpoint
                    .records
                    .into_iter()
                    .map(|r| (r.token_id.clone(), r))
                    .collect()
            }
            RecoveryStatus::Corrupted(reason) => {
                tracing::warn!("Ignoring checkpoint {}: {}", settings.path.display(), reason);
                HashMap::new()
            }
            RecoveryStatus::NoCheckpoint => HashMap::new(),
        }
    }

    fn save_checkpoint(
        &self,
        settings: &CheckpointSettings,
        records: &[TokenRecord],
    ) -> Result<(), PipelineError> {
        CollectionCheckpoint::new(self.ctx.contract_address.clone(), records.to_vec())
            .save(&settings.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cw721::FetchError;
    use crate::ports::mocks::InMemoryCw721;
    use crate::ports::{MockContractQueryPort, QueryError};
    use serde_json::{json, Value};
    use tempfile::tempdir;

    fn extension(background: &str) -> Value {
        json!({
            "image": "ipfs://cid",
            "attributes": [{"trait_type": "Background", "value": background}]
        })
    }

    fn contract(n: usize) -> InMemoryCw721 {
        (0..n).fold(InMemoryCw721::new(), |mock, i| {
            mock.with_token(&format!("t{}", i), extension("Red"))
        })
    }

    #[tokio::test]
    async fn test_collect_preserves_token_order() {
        let mock = contract(5);
        let ctx = PipelineContext::new("terra1abc");
        let records = CollectionCollector::new(&mock, &ctx).collect().await.unwrap();

        let ids: Vec<&str> = records.iter().map(|r| r.token_id.as_str()).collect();
        assert_eq!(ids, vec!["t0", "t1", "t2", "t3", "t4"]);
    }

    #[tokio::test]
    async fn test_single_failure_aborts_collection() {
        let mock = contract(5).with_failure("t2");
        let ctx = PipelineContext::new("terra1abc");
        let err = CollectionCollector::new(&mock, &ctx).collect().await.unwrap_err();

        assert!(matches!(err, PipelineError::Fetch(ref e) if e.is_remote_query()));
        // no fetch after the failing token
        let nft_info_calls = mock
            .get_calls()
            .iter()
            .filter(|c| c.get("nft_info").is_some())
            .count();
        assert_eq!(nft_info_calls, 3);
    }

    #[tokio::test]
    async fn test_no_metadata_fetch_when_index_fails() {
        let mut port = MockContractQueryPort::new();
        port.expect_query_contract()
            .times(1)
            .returning(|_, _| Err(QueryError::ParseError("boom".into())));

        let ctx = PipelineContext::new("terra1abc");
        let err = CollectionCollector::new(&port, &ctx).collect().await.unwrap_err();
        assert!(matches!(err, PipelineError::Fetch(FetchError::RemoteQuery { query: "all_tokens", .. })));
    }

    #[tokio::test]
    async fn test_failure_saves_checkpoint_and_resume_skips_fetched() {
        let dir = tempdir().unwrap();
        let ctx = PipelineContext::new("terra1abc")
            .with_output_dir(dir.path())
            .with_checkpoint(100);

        let failing = contract(4).with_failure("t2");
        assert!(CollectionCollector::new(&failing, &ctx).collect().await.is_err());

        let saved = CollectionCheckpoint::load(ctx.checkpoint_path().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(saved.records.len(), 2);

        let healthy = contract(4);
        let records = CollectionCollector::new(&healthy, &ctx).collect().await.unwrap();
        assert_eq!(records.len(), 4);

        let fetched: Vec<Value> = healthy
            .get_calls()
            .into_iter()
            .filter(|c| c.get("nft_info").is_some())
            .collect();
        assert_eq!(
            fetched,
            vec![
                json!({"nft_info": {"token_id": "t2"}}),
                json!({"nft_info": {"token_id": "t3"}}),
            ]
        );
    }

    #[tokio::test]
    async fn test_checkpoint_saved_every_interval() {
        let dir = tempdir().unwrap();
        let ctx = PipelineContext::new("terra1abc")
            .with_output_dir(dir.path())
            .with_checkpoint(2);

        let mock = contract(5);
        CollectionCollector::new(&mock, &ctx).collect().await.unwrap();

        // last save happened after the 4th token
        let saved = CollectionCheckpoint::load(ctx.checkpoint_path().unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(saved.records.len(), 4);
    }
}
