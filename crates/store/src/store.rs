use async_trait::async_trait;
use indexer_common::model::{BlockTimestamp, Heights, Pair, Token};

use crate::error::StoreError;
use crate::filter::{PairFilter, PairSortBy, QueryOptions, TokenFilter, TokenSortBy};

/// The capability set every storage backend must implement, scoped to a
/// single chain (each chain gets its own logical database — spec.md
/// §4.3.1). Object-safe so `StoreRegistry` can hold `Arc<dyn Store>`.
#[async_trait]
pub trait Store: Send + Sync {
    fn chain_id(&self) -> u64;

    async fn init(&self) -> Result<(), StoreError>;
    async fn ready(&self) -> Result<(), StoreError>;
    async fn heights(&self) -> Result<Heights, StoreError>;

    async fn get_block_at_timestamp(&self, timestamp: u64) -> Result<BlockTimestamp, StoreError>;
    async fn get_block_timestamps(
        &self,
        from: u64,
        to: u64,
    ) -> Result<Vec<BlockTimestamp>, StoreError>;
    async fn insert_block_timestamp(&self, row: BlockTimestamp) -> Result<(), StoreError>;
    async fn bulk_insert_block_timestamp(&self, rows: &[BlockTimestamp])
        -> Result<(), StoreError>;

    async fn find_tokens(
        &self,
        filter: &TokenFilter,
        options: QueryOptions<TokenSortBy>,
    ) -> Result<Vec<Token>, StoreError>;
    async fn get_token_count(&self) -> Result<i64, StoreError>;
    async fn insert_token_info(&self, token: Token) -> Result<(), StoreError>;
    async fn bulk_insert_token_info(&self, tokens: &[Token]) -> Result<(), StoreError>;

    async fn find_pairs(
        &self,
        filter: &PairFilter,
        options: QueryOptions<PairSortBy>,
    ) -> Result<Vec<Pair>, StoreError>;
    async fn get_pair_count(&self) -> Result<i64, StoreError>;
    async fn insert_pair_info(&self, pair: Pair) -> Result<(), StoreError>;
    async fn bulk_insert_pair_info(&self, pairs: &[Pair]) -> Result<(), StoreError>;

    async fn unique_addresses_from_pairs(&self) -> Result<Vec<String>, StoreError>;
    async fn unique_addresses_from_tokens(&self) -> Result<Vec<String>, StoreError>;
    /// Pair-derived addresses (`token0_address ∪ token1_address`) minus the
    /// token table's address set, compared lowercased.
    async fn pairs_without_token_info(&self) -> Result<Vec<String>, StoreError>;
}
