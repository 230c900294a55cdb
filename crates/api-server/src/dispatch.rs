use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use indexer_api_decl::{
    ChainIdParams, EmptyParams, FindPairsParams, FindTokensParams, GetBlockAtTimestampParams,
    GetBlockTimestampsParams, Validate,
};
use indexer_auth::AuthLevel;
use indexer_store::Store;

use crate::error::RpcDispatchError;
use crate::state::AppState;

/// Minimum [`AuthLevel`] a method prefix demands, or `None` if the prefix
/// isn't recognized at all (spec.md §4.6).
fn required_level(method: &str) -> Option<AuthLevel> {
    if method.starts_with("idx_") {
        Some(AuthLevel::Basic)
    } else if method.starts_with("auth_") {
        Some(AuthLevel::Master)
    } else {
        None
    }
}

fn parse_params<T: serde::de::DeserializeOwned + Validate>(
    params: &Value,
) -> Result<T, RpcDispatchError> {
    let parsed: T = serde_json::from_value(params.clone())
        .map_err(|e| RpcDispatchError::InvalidParams(e.to_string()))?;
    parsed
        .validate()
        .map_err(|e| RpcDispatchError::InvalidParams(e.0))?;
    Ok(parsed)
}

fn resolve_store(state: &AppState, chain_id: u64) -> Result<Arc<dyn Store>, RpcDispatchError> {
    state
        .store_registry
        .get(chain_id)
        .ok_or(RpcDispatchError::InvalidChainId)
}

/// Authorizes then executes one JSON-RPC method. Returns the `result`
/// value on success; the caller envelopes it into a `JrpcResponse`.
pub async fn dispatch(
    state: &AppState,
    level: AuthLevel,
    method: &str,
    params: &Value,
) -> Result<Value, RpcDispatchError> {
    let Some(min_level) = required_level(method) else {
        return Err(RpcDispatchError::MethodNotFound(method.to_string()));
    };
    if level < min_level {
        return Err(RpcDispatchError::Auth(indexer_auth::AuthError::Unauthorized));
    }

    match method {
        "idx_getBlockNumber" => {
            parse_params::<EmptyParams>(params)?;
            let mut heights: BTreeMap<String, u64> = BTreeMap::new();
            for store in state.store_registry.get_all() {
                let h = store.heights().await?;
                heights.insert(store.chain_id().to_string(), h.blocks);
            }
            Ok(serde_json::to_value(heights).expect("map of u64 always serializes"))
        }
        "idx_getChains" => {
            parse_params::<EmptyParams>(params)?;
            Ok(serde_json::to_value(&state.chains).expect("chain descriptors always serialize"))
        }
        "idx_getHeights" => {
            let p = parse_params::<ChainIdParams>(params)?;
            let store = resolve_store(state, p.chain_id)?;
            let heights = store.heights().await?;
            Ok(serde_json::to_value(heights).expect("heights always serialize"))
        }
        "idx_getBlockTimestamps" => {
            let p = parse_params::<GetBlockTimestampsParams>(params)?;
            let store = resolve_store(state, p.chain_id)?;
            let rows = store.get_block_timestamps(p.from_block, p.to_block).await?;
            Ok(serde_json::to_value(rows).expect("block timestamps always serialize"))
        }
        "idx_getBlockAtTimestamp" => {
            let p = parse_params::<GetBlockAtTimestampParams>(params)?;
            let store = resolve_store(state, p.chain_id)?;
            let row = store.get_block_at_timestamp(p.timestamp).await?;
            Ok(serde_json::to_value(row).expect("block timestamp always serializes"))
        }
        "idx_findTokens" => {
            let p = parse_params::<FindTokensParams>(params)?;
            let store = resolve_store(state, p.chain_id)?;
            let tokens = store.find_tokens(&p.store_filter(), p.store_options()).await?;
            Ok(serde_json::to_value(tokens).expect("tokens always serialize"))
        }
        "idx_getTokenCount" => {
            let p = parse_params::<ChainIdParams>(params)?;
            let store = resolve_store(state, p.chain_id)?;
            let count = store.get_token_count().await?;
            Ok(Value::from(count))
        }
        "idx_findPairs" => {
            let p = parse_params::<FindPairsParams>(params)?;
            let store = resolve_store(state, p.chain_id)?;
            let filter = p.store_filter().map_err(|e| RpcDispatchError::InvalidParams(e.0))?;
            let pairs = store.find_pairs(&filter, p.store_options()).await?;
            Ok(serde_json::to_value(pairs).expect("pairs always serialize"))
        }
        "idx_getPairCount" => {
            let p = parse_params::<ChainIdParams>(params)?;
            let store = resolve_store(state, p.chain_id)?;
            let count = store.get_pair_count().await?;
            Ok(Value::from(count))
        }
        // Declared in the catalog, never implemented (spec.md §4.6).
        "idx_getTokenOhlcv" | "idx_getTokenHolders" | "idx_getTokenBalance" => {
            Err(RpcDispatchError::NotImplemented)
        }
        "auth_generateKey" => {
            parse_params::<EmptyParams>(params)?;
            let key = state.authenticator.register().await?;
            Ok(Value::from(key))
        }
        other => Err(RpcDispatchError::MethodNotFound(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idx_prefix_requires_basic() {
        assert_eq!(required_level("idx_getChains"), Some(AuthLevel::Basic));
    }

    #[test]
    fn auth_prefix_requires_master() {
        assert_eq!(required_level("auth_generateKey"), Some(AuthLevel::Master));
    }

    #[test]
    fn unrecognized_prefix_has_no_level() {
        assert_eq!(required_level("eth_getBalance"), None);
    }
}
