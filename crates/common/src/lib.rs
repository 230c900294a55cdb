pub mod addr;
pub mod chain;
pub mod error;
pub mod model;

pub use addr::{ZERO_ADDRESS, ZERO_HASH};
pub use chain::ChainDescriptor;
pub use error::IndexerError;
pub use model::{BlockTimestamp, Heights, Pair, PoolType, Token};
