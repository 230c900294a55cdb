use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainClientError {
    #[error("invalid rpc url: {0}")]
    InvalidUrl(String),
    #[error("batch element failed: {0}")]
    BatchElement(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("abi decode failed: {0}")]
    AbiDecode(String),
    #[error("unsupported method: {0}")]
    Unsupported(String),
}
