use thiserror::Error;

/// Errors that propagate out of a pipeline entirely, as opposed to the
/// per-element batch failures the pipelines themselves swallow (spec.md
/// §4.2.4): today that's just `eth_getLogs`, which has no batch to
/// partially fail — one call, one outcome.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("chain client error: {0}")]
    ChainClient(#[from] indexer_chain_client::ChainClientError),
}
