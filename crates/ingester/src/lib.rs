pub mod block_timestamps;
pub mod error;
pub mod pairs;
pub mod tokens;
pub mod worker_pool;

pub use block_timestamps::ingest_block_timestamps;
pub use error::IngestError;
pub use pairs::ingest_pairs;
pub use tokens::ingest_tokens;
