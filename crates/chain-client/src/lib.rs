pub mod abi;
pub mod client;
pub mod error;
pub mod types;

pub use client::ChainClient;
pub use error::ChainClientError;
pub use types::{ContractCreator, RawLog, TokenMetadataRaw};
