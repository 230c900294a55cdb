use jsonrpsee::types::ErrorCode;

use indexer_api_decl::{codes, JrpcError};
use indexer_auth::AuthError;
use indexer_store::StoreError;

/// Everything that can go wrong while serving one JSON-RPC element, after
/// the method-prefix/auth gate has already passed (spec.md §7).
#[derive(thiserror::Error, Debug)]
pub enum RpcDispatchError {
    #[error("{0}")]
    InvalidParams(String),
    #[error("method not found: {0}")]
    MethodNotFound(String),
    #[error("not implemented")]
    NotImplemented,
    #[error("invalid chain_id")]
    InvalidChainId,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<RpcDispatchError> for JrpcError {
    fn from(e: RpcDispatchError) -> Self {
        match e {
            RpcDispatchError::InvalidParams(msg) => {
                JrpcError::new(ErrorCode::InvalidParams.code(), msg)
            }
            RpcDispatchError::InvalidChainId => {
                JrpcError::new(ErrorCode::InvalidParams.code(), "invalid chain_id")
            }
            RpcDispatchError::MethodNotFound(_method) => {
                JrpcError::new(ErrorCode::MethodNotFound.code(), "Method not found")
            }
            RpcDispatchError::NotImplemented => {
                JrpcError::new(codes::NOT_IMPLEMENTED, "Not Implemented")
            }
            RpcDispatchError::Store(StoreError::NotFound) => {
                JrpcError::new(ErrorCode::InvalidParams.code(), "not found")
            }
            RpcDispatchError::Store(StoreError::InvalidFilter(msg)) => {
                JrpcError::new(ErrorCode::InvalidParams.code(), msg)
            }
            RpcDispatchError::Store(other) => {
                tracing::error!(error = %other, "store error during dispatch");
                JrpcError::new(ErrorCode::InternalError.code(), "internal server error")
            }
            RpcDispatchError::Auth(e) => {
                tracing::warn!(error = %e, "auth backend error during dispatch");
                JrpcError::new(codes::UNAUTHORIZED, "unauthorized")
            }
        }
    }
}
