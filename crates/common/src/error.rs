use thiserror::Error;

/// Crate-wide error type for everything that doesn't have a more specific
/// error enum of its own (chain-client, store, and auth each define their
/// own `#[error]` enums and only reach for this one at their edges).
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("no row found")]
    NotFound,

    #[error("unknown chain_id {0}")]
    UnknownChain(u64),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("internal server error")]
    Internal(#[source] anyhow::Error),
}

impl IndexerError {
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}
