use std::sync::Arc;

use indexer_chain_client::ChainClient;
use indexer_common::model::Heights;
use indexer_ingester::{ingest_block_timestamps, ingest_pairs, ingest_tokens};
use indexer_store::Store;

use crate::error::SyncError;

/// Per-kind batch/concurrency knobs the controller threads through to the
/// ingester, mirroring `[sync.*]` in `indexer.toml` (spec.md §6).
#[derive(Debug, Clone, Copy)]
pub struct SyncConfig {
    pub block_timestamps_batch_size: u64,
    pub block_timestamps_concurrency: usize,
    pub pairs_block_range: u64,
    pub pairs_concurrency: usize,
    pub tokens_concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            block_timestamps_batch_size: 100,
            block_timestamps_concurrency: 2,
            pairs_block_range: 200,
            pairs_concurrency: 2,
            tokens_concurrency: 2,
        }
    }
}

/// One chain's factory addresses, read-only inputs to the pair pipeline.
#[derive(Debug, Clone)]
pub struct Factories {
    pub v2: Option<String>,
    pub v3: Option<String>,
}

/// Orchestrates one archive-sync pass against a single chain: reads the
/// chain tip and persisted heights, then backfills block timestamps, then
/// pairs plus the tokens those pairs reference (spec.md §4.5). Idempotent:
/// a cancelled or failed pass leaves whatever it already committed, and the
/// next pass reconciles state by re-reading heights.
pub struct SyncController {
    client: ChainClient,
    store: Arc<dyn Store>,
    factories: Factories,
    config: SyncConfig,
}

/// The height deltas a pass computed, reported back to the caller purely
/// for logging/observability — the controller doesn't return rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncReport {
    pub tip: u64,
    pub heights_before: Heights,
    pub block_timestamps_inserted: usize,
    pub pairs_inserted: usize,
    pub tokens_inserted: usize,
}

impl SyncController {
    pub fn new(
        client: ChainClient,
        store: Arc<dyn Store>,
        factories: Factories,
        config: SyncConfig,
    ) -> Self {
        Self {
            client,
            store,
            factories,
            config,
        }
    }

    /// `ArchiveSync`: one backfill pass from persisted height to chain tip
    /// (spec.md §4.5). Steps 3-4 run in sequence — block timestamps
    /// complete before pairs+tokens start, matching the ordering guarantee
    /// in spec.md §5.
    pub async fn archive_sync(&self) -> Result<SyncReport, SyncError> {
        let tip = self.client.get_block_number().await?;
        let heights = self.store.heights().await?;

        let mut report = SyncReport {
            tip,
            heights_before: heights,
            ..Default::default()
        };

        if tip > heights.blocks {
            let from = if heights.blocks == 0 { 0 } else { heights.blocks + 1 };
            let rows = ingest_block_timestamps(
                self.client.clone(),
                from,
                tip,
                self.config.block_timestamps_batch_size,
                self.config.block_timestamps_concurrency,
            )
            .await;
            report.block_timestamps_inserted = rows.len();
            self.store.bulk_insert_block_timestamp(&rows).await?;
        }

        if tip > heights.pairs {
            let from = if heights.pairs == 0 { 0 } else { heights.pairs + 1 };
            let pairs = ingest_pairs(
                &self.client,
                self.store.chain_id(),
                from,
                tip,
                self.factories.v2.as_deref(),
                self.factories.v3.as_deref(),
                self.config.pairs_block_range,
                self.config.pairs_concurrency,
            )
            .await?;
            report.pairs_inserted = pairs.len();
            self.store.bulk_insert_pair_info(&pairs).await?;

            let missing = self.store.pairs_without_token_info().await?;
            let tokens = ingest_tokens(
                self.client.clone(),
                self.store.chain_id(),
                missing,
                self.config.tokens_concurrency,
            )
            .await;
            report.tokens_inserted = tokens.len();
            self.store.bulk_insert_token_info(&tokens).await?;
        }

        Ok(report)
    }

    /// Extension point: tip-following live sync, left unimplemented per
    /// spec.md §4.5/§9 — whether it should poll or subscribe to new-block
    /// notifications is an open question the spec declines to resolve.
    pub async fn live_sync(&self, _from_block: u64) {}

    /// Extension point: a block-oracle that would let `live_sync` learn
    /// about new blocks without polling `get_block_number` itself. Also
    /// left unimplemented per spec.md §4.5.
    pub async fn block_oracle(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use indexer_common::model::{BlockTimestamp, Pair, Token};
    use indexer_store::{PairFilter, PairSortBy, QueryOptions, StoreError, TokenFilter, TokenSortBy};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeStore {
        chain_id: u64,
        heights: Heights,
        block_timestamps: Mutex<Vec<BlockTimestamp>>,
        pairs: Mutex<Vec<Pair>>,
        tokens: Mutex<Vec<Token>>,
    }

    #[async_trait]
    impl Store for FakeStore {
        fn chain_id(&self) -> u64 {
            self.chain_id
        }
        async fn init(&self) -> Result<(), StoreError> {
            Ok(())
        }
        async fn ready(&self) -> Result<(), StoreError> {
            Ok(())
        }
        async fn heights(&self) -> Result<Heights, StoreError> {
            Ok(self.heights)
        }
        async fn get_block_at_timestamp(&self, _: u64) -> Result<BlockTimestamp, StoreError> {
            Err(StoreError::NotFound)
        }
        async fn get_block_timestamps(&self, _: u64, _: u64) -> Result<Vec<BlockTimestamp>, StoreError> {
            Ok(vec![])
        }
        async fn insert_block_timestamp(&self, row: BlockTimestamp) -> Result<(), StoreError> {
            self.block_timestamps.lock().unwrap().push(row);
            Ok(())
        }
        async fn bulk_insert_block_timestamp(&self, rows: &[BlockTimestamp]) -> Result<(), StoreError> {
            self.block_timestamps.lock().unwrap().extend_from_slice(rows);
            Ok(())
        }
        async fn find_tokens(&self, _: &TokenFilter, _: QueryOptions<TokenSortBy>) -> Result<Vec<Token>, StoreError> {
            Ok(vec![])
        }
        async fn get_token_count(&self) -> Result<i64, StoreError> {
            Ok(self.tokens.lock().unwrap().len() as i64)
        }
        async fn insert_token_info(&self, token: Token) -> Result<(), StoreError> {
            self.tokens.lock().unwrap().push(token);
            Ok(())
        }
        async fn bulk_insert_token_info(&self, tokens: &[Token]) -> Result<(), StoreError> {
            self.tokens.lock().unwrap().extend_from_slice(tokens);
            Ok(())
        }
        async fn find_pairs(&self, _: &PairFilter, _: QueryOptions<PairSortBy>) -> Result<Vec<Pair>, StoreError> {
            Ok(vec![])
        }
        async fn get_pair_count(&self) -> Result<i64, StoreError> {
            Ok(self.pairs.lock().unwrap().len() as i64)
        }
        async fn insert_pair_info(&self, pair: Pair) -> Result<(), StoreError> {
            self.pairs.lock().unwrap().push(pair);
            Ok(())
        }
        async fn bulk_insert_pair_info(&self, pairs: &[Pair]) -> Result<(), StoreError> {
            self.pairs.lock().unwrap().extend_from_slice(pairs);
            Ok(())
        }
        async fn unique_addresses_from_pairs(&self) -> Result<Vec<String>, StoreError> {
            Ok(vec![])
        }
        async fn unique_addresses_from_tokens(&self) -> Result<Vec<String>, StoreError> {
            Ok(vec![])
        }
        async fn pairs_without_token_info(&self) -> Result<Vec<String>, StoreError> {
            Ok(vec![])
        }
    }

    #[test]
    fn sync_config_defaults_match_spec() {
        let cfg = SyncConfig::default();
        assert_eq!(cfg.block_timestamps_batch_size, 100);
        assert_eq!(cfg.block_timestamps_concurrency, 2);
        assert_eq!(cfg.pairs_block_range, 200);
    }

    #[tokio::test]
    async fn second_pass_against_static_tip_is_a_noop() {
        // Heights already at tip: archive_sync should skip both legs.
        let store: Arc<dyn Store> = Arc::new(FakeStore {
            chain_id: 1,
            heights: Heights {
                blocks: 100,
                tokens: 100,
                pairs: 100,
            },
            ..Default::default()
        });

        // Can't reach a live chain in a unit test; just verify the height
        // comparison logic directly (the full archive_sync path that hits
        // the network is covered by the ingester's own RPC-call tests).
        let heights = store.heights().await.unwrap();
        let tip = 100u64;
        assert!(!(tip > heights.blocks));
        assert!(!(tip > heights.pairs));
    }
}
