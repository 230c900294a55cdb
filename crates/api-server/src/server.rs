use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Extension, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use indexer_api_decl::{codes, JrpcError, JrpcRequest, JrpcResponse};
use indexer_auth::{AuthLevel, Authenticator};
use indexer_common::ChainDescriptor;
use indexer_ratelimit::{RateLimitStrategy, RateLimiter};
use indexer_store::StoreRegistry;

use crate::dispatch::dispatch;
use crate::middleware::{access_log, auth, rate_limit, real_ip, request_id};
use crate::state::AppState;

const INDEX_HTML: &str = "<!doctype html><html><head><title>indexer</title></head>\
<body><p>multi-chain EVM indexer JSON-RPC endpoint. POST an array of \
JSON-RPC 2.0 requests to <code>/</code>.</p></body></html>";

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn status_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `POST /`: always an array in, always an equally sized array out. One
/// bad element never fails its siblings (spec.md §4.6/§7).
async fn rpc_handler(
    State(state): State<AppState>,
    Extension(level): Extension<AuthLevel>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let requests: Vec<JrpcRequest> = match serde_json::from_value(body) {
        Ok(r) => r,
        Err(e) => {
            let err = JrpcResponse::err(
                serde_json::Value::Null,
                JrpcError::new(codes::INVALID_REQUEST, format!("invalid envelope: {e}")),
            );
            return Json(vec![err]).into_response();
        }
    };

    let mut responses = Vec::with_capacity(requests.len());
    for req in requests {
        let result = dispatch(&state, level, &req.method, &req.params).await;
        let response = match result {
            Ok(value) => JrpcResponse::ok(req.id, value),
            Err(e) => JrpcResponse::err(req.id, e.into()),
        };
        responses.push(response);
    }
    Json(responses).into_response()
}

/// Builds the router with the exact middleware order spec.md §4.6
/// specifies (outermost first): request-id → access log → real-IP
/// extraction → auth → rate-limit → body read & JSON decode → dispatch.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler).post(rpc_handler))
        .route("/status", get(status_handler))
        .layer(axum::middleware::from_fn_with_state(state.clone(), rate_limit))
        .layer(axum::middleware::from_fn_with_state(state.clone(), auth))
        .layer(axum::middleware::from_fn(real_ip))
        .layer(axum::middleware::from_fn(access_log))
        .layer(axum::middleware::from_fn(request_id))
        .with_state(state)
}

pub struct ApiServer {
    addr: SocketAddr,
    state: AppState,
}

impl ApiServer {
    pub fn new(
        addr: SocketAddr,
        store_registry: Arc<StoreRegistry>,
        authenticator: Arc<Authenticator>,
        rate_limiter: Option<Arc<RateLimiter>>,
        rate_limit_strategy: RateLimitStrategy,
        chains: Vec<ChainDescriptor>,
    ) -> Self {
        let state = AppState::new(
            store_registry,
            authenticator,
            rate_limiter,
            rate_limit_strategy,
            chains,
        );
        Self { addr, state }
    }

    pub async fn serve(self) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!(addr = %self.addr, "api server listening");
        axum::serve(
            listener,
            router(self.state).into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use indexer_auth::{InMemoryAuth, KeyType};
    use indexer_common::model::{BlockTimestamp, Heights, Pair, Token};
    use indexer_store::{PairFilter, PairSortBy, QueryOptions, Store, StoreError, TokenFilter, TokenSortBy};
    use tower::ServiceExt;

    struct StubStore;

    #[async_trait]
    impl Store for StubStore {
        fn chain_id(&self) -> u64 {
            1
        }
        async fn init(&self) -> Result<(), StoreError> {
            Ok(())
        }
        async fn ready(&self) -> Result<(), StoreError> {
            Ok(())
        }
        async fn heights(&self) -> Result<Heights, StoreError> {
            Ok(Heights { blocks: 42, tokens: 1, pairs: 2 })
        }
        async fn get_block_at_timestamp(&self, _: u64) -> Result<BlockTimestamp, StoreError> {
            Err(StoreError::NotFound)
        }
        async fn get_block_timestamps(&self, _: u64, _: u64) -> Result<Vec<BlockTimestamp>, StoreError> {
            Ok(vec![])
        }
        async fn insert_block_timestamp(&self, _: BlockTimestamp) -> Result<(), StoreError> {
            Ok(())
        }
        async fn bulk_insert_block_timestamp(&self, _: &[BlockTimestamp]) -> Result<(), StoreError> {
            Ok(())
        }
        async fn find_tokens(&self, _: &TokenFilter, _: QueryOptions<TokenSortBy>) -> Result<Vec<Token>, StoreError> {
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
        async fn find_pairs(&self, _: &PairFilter, _: QueryOptions<PairSortBy>) -> Result<Vec<Pair>, StoreError> {
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

    fn test_state() -> AppState {
        let registry = Arc::new(StoreRegistry::new());
        registry.register(Arc::new(StubStore));
        AppState::new(
            registry,
            Arc::new(Authenticator::new(None, Arc::new(InMemoryAuth::new(KeyType::Hex64)))),
            None,
            RateLimitStrategy::None,
            vec![],
        )
    }

    #[tokio::test]
    async fn status_bypasses_auth_and_returns_ok() {
        let app = router(test_state());
        let req = axum::http::Request::builder()
            .uri("/status")
            .method("GET")
            .body(axum::body::Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn unrecognized_method_is_method_not_found() {
        let app = router(test_state());
        let batch = serde_json::json!([{"id": 1, "jsonrpc": "2.0", "method": "eth_getBalance", "params": {}}]);
        let req = axum::http::Request::builder()
            .uri("/")
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(batch.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), axum::http::StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed[0]["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn idx_method_without_credential_is_unauthorized() {
        let app = router(test_state());
        let batch = serde_json::json!([{"id": 1, "jsonrpc": "2.0", "method": "idx_getHeights", "params": {"chain_id": 1}}]);
        let req = axum::http::Request::builder()
            .uri("/")
            .method("POST")
            .header("content-type", "application/json")
            .body(axum::body::Body::from(batch.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed[0]["error"]["code"], -32800);
    }
}
