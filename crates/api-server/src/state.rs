use std::sync::Arc;

use indexer_auth::Authenticator;
use indexer_common::ChainDescriptor;
use indexer_ratelimit::{RateLimitStrategy, RateLimiter};
use indexer_store::StoreRegistry;

/// Everything a request handler needs, shared across the whole process.
#[derive(Clone)]
pub struct AppState {
    pub store_registry: Arc<StoreRegistry>,
    pub authenticator: Arc<Authenticator>,
    pub rate_limiter: Option<Arc<RateLimiter>>,
    pub rate_limit_strategy: RateLimitStrategy,
    /// Chain descriptors in registration order; served as-is by
    /// `idx_getChains` (the RPC URL is already stripped by
    /// `ChainDescriptor`'s own `serde(skip_serializing)`).
    pub chains: Vec<ChainDescriptor>,
}

impl AppState {
    pub fn new(
        store_registry: Arc<StoreRegistry>,
        authenticator: Arc<Authenticator>,
        rate_limiter: Option<Arc<RateLimiter>>,
        rate_limit_strategy: RateLimitStrategy,
        chains: Vec<ChainDescriptor>,
    ) -> Self {
        Self {
            store_registry,
            authenticator,
            rate_limiter,
            rate_limit_strategy,
            chains,
        }
    }
}
