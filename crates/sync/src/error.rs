use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("chain client error: {0}")]
    ChainClient(#[from] indexer_chain_client::ChainClientError),
    #[error("store error: {0}")]
    Store(#[from] indexer_store::StoreError),
}
