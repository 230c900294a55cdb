use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use indexer_api_decl::{codes, JrpcError, JrpcResponse};

use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";
const AUTH_HEADER: &str = "Authentication";

/// Outermost layer: stamps every response with a request id, generating
/// one if the caller didn't supply it.
pub async fn request_id(mut req: Request<axum::body::Body>, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut resp = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    resp
}

#[derive(Clone)]
pub struct RequestId(pub String);

/// Second layer: logs method, path, status and latency for every request.
pub async fn access_log(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();

    let start = Instant::now();
    let resp = next.run(req).await;
    let elapsed = start.elapsed();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status = resp.status().as_u16(),
        elapsed_ms = elapsed.as_millis() as u64,
        "request served"
    );
    resp
}

#[derive(Clone)]
pub struct ClientIp(pub String);

/// Third layer: resolves the caller's address from `X-Forwarded-For` (first
/// hop) or the socket's peer address, so auth/rate-limit can key on it.
pub async fn real_ip(
    connect_info: Option<ConnectInfo<SocketAddr>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let ip = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .or_else(|| connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string());
    req.extensions_mut().insert(ClientIp(ip));
    next.run(req).await
}

fn bypasses_gate(path: &str) -> bool {
    path == "/status"
}

/// Fourth layer: resolves an `AuthLevel` from the `Authentication` header
/// and stashes it for `dispatch` to consult per-method (spec.md §4.6/§4.7).
/// `/status` bypasses this entirely.
pub async fn auth(
    State(state): State<AppState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    if bypasses_gate(req.uri().path()) {
        return next.run(req).await;
    }

    let header = req
        .headers()
        .get(AUTH_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let level = state.authenticator.authenticate(header.as_deref()).await;
    req.extensions_mut().insert(level);
    next.run(req).await
}

/// Fifth layer: fixed-window rate limiting keyed by IP or bearer token per
/// configuration (spec.md §4.8). `/status` bypasses this entirely.
pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    if bypasses_gate(req.uri().path()) {
        return next.run(req).await;
    }

    let Some(limiter) = &state.rate_limiter else {
        return next.run(req).await;
    };

    let key = match state.rate_limit_strategy {
        indexer_ratelimit::RateLimitStrategy::None => None,
        indexer_ratelimit::RateLimitStrategy::Ip => req
            .extensions()
            .get::<ClientIp>()
            .map(|ip| ip.0.clone()),
        indexer_ratelimit::RateLimitStrategy::Key => req
            .headers()
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(indexer_auth::strip_bearer_prefix)
            .map(str::to_string),
    };

    let Some(key) = key else {
        return next.run(req).await;
    };

    let (remaining, reset) = limiter.check_limit(&key);
    if remaining == 0 {
        let body = JrpcResponse::err(
            Value::Null,
            JrpcError::new(codes::RATE_LIMITED, "Too Many Requests"),
        );
        let mut resp = (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response();
        insert_rate_limit_headers(&mut resp, limiter.limit(), remaining, reset);
        return resp;
    }

    let mut resp = next.run(req).await;
    insert_rate_limit_headers(&mut resp, limiter.limit(), remaining, reset);
    resp
}

fn insert_rate_limit_headers(resp: &mut Response, limit: u32, remaining: u32, reset: i64) {
    let headers = resp.headers_mut();
    if let Ok(v) = HeaderValue::from_str(&limit.to_string()) {
        headers.insert("x-ratelimit-limit", v);
    }
    if let Ok(v) = HeaderValue::from_str(&remaining.to_string()) {
        headers.insert("x-ratelimit-remaining", v);
    }
    if let Ok(v) = HeaderValue::from_str(&reset.to_string()) {
        headers.insert("x-ratelimit-reset", v);
    }
}
