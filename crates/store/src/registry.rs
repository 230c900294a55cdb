use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use crate::store::Store;

/// Process-wide `chain_id → Store` map, read-heavy and write-once at
/// startup (spec.md §4.4). Guarded by a `std::sync::RwLock` so concurrent
/// lookups never observe a partially-populated map.
#[derive(Default)]
pub struct StoreRegistry {
    stores: RwLock<HashMap<u64, Arc<dyn Store>>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only ever called during startup wiring, before any request traffic.
    pub fn register(&self, store: Arc<dyn Store>) {
        let mut stores = self.stores.write().expect("store registry lock poisoned");
        stores.insert(store.chain_id(), store);
    }

    pub fn get(&self, chain_id: u64) -> Option<Arc<dyn Store>> {
        let stores = self.stores.read().expect("store registry lock poisoned");
        stores.get(&chain_id).cloned()
    }

    pub fn get_all(&self) -> Vec<Arc<dyn Store>> {
        let stores = self.stores.read().expect("store registry lock poisoned");
        stores.values().cloned().collect()
    }

    pub fn chain_ids(&self) -> Vec<u64> {
        let stores = self.stores.read().expect("store registry lock poisoned");
        stores.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use indexer_common::model::{BlockTimestamp, Heights, Pair, Token};

    use crate::error::StoreError;
    use crate::filter::{PairFilter, PairSortBy, QueryOptions, TokenFilter, TokenSortBy};

    struct StubStore(u64);

    #[async_trait]
    impl Store for StubStore {
        fn chain_id(&self) -> u64 {
            self.0
        }
        async fn init(&self) -> Result<(), StoreError> {
            Ok(())
        }
        async fn ready(&self) -> Result<(), StoreError> {
            Ok(())
        }
        async fn heights(&self) -> Result<Heights, StoreError> {
            Ok(Heights::default())
        }
        async fn get_block_at_timestamp(&self, _: u64) -> Result<BlockTimestamp, StoreError> {
            Err(StoreError::NotFound)
        }
        async fn get_block_timestamps(
            &self,
            _: u64,
            _: u64,
        ) -> Result<Vec<BlockTimestamp>, StoreError> {
            Ok(vec![])
        }
        async fn insert_block_timestamp(&self, _: BlockTimestamp) -> Result<(), StoreError> {
            Ok(())
        }
        async fn bulk_insert_block_timestamp(
            &self,
            _: &[BlockTimestamp],
        ) -> Result<(), StoreError> {
            Ok(())
        }
        async fn find_tokens(
            &self,
            _: &TokenFilter,
            _: QueryOptions<TokenSortBy>,
        ) -> Result<Vec<Token>, StoreError> {
            Ok(vec![])
        }
        async fn get_token_count(&self) -> Result<i64, StoreError> {
            Ok(0)
        }
        async fn insert_token_info(&self, _: Token) -> Result<(), StoreError> {
            Ok(())
        }
        async fn bulk_insert_token_info(&self, _: &[Token]) -> Result<(), StoreError> {
            Ok(())
        }
        async fn find_pairs(
            &self,
            _: &PairFilter,
            _: QueryOptions<PairSortBy>,
        ) -> Result<Vec<Pair>, StoreError> {
            Ok(vec![])
        }
        async fn get_pair_count(&self) -> Result<i64, StoreError> {
            Ok(0)
        }
        async fn insert_pair_info(&self, _: Pair) -> Result<(), StoreError> {
            Ok(())
        }
        async fn bulk_insert_pair_info(&self, _: &[Pair]) -> Result<(), StoreError> {
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
    fn lookup_returns_none_for_unregistered_chain() {
        let registry = StoreRegistry::new();
        assert!(registry.get(999).is_none());
    }

    #[test]
    fn register_then_lookup_round_trips() {
        let registry = StoreRegistry::new();
        registry.register(Arc::new(StubStore(1)));
        registry.register(Arc::new(StubStore(56)));

        assert_eq!(registry.get(1).unwrap().chain_id(), 1);
        assert_eq!(registry.get(56).unwrap().chain_id(), 56);
        assert_eq!(registry.get_all().len(), 2);
    }
}
