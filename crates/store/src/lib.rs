pub mod error;
pub mod filter;
pub mod postgres;
pub mod registry;
pub mod store;

pub use error::StoreError;
pub use filter::{PairFilter, PairSortBy, QueryOptions, SortOrder, TokenFilter, TokenSortBy};
pub use postgres::PostgresStore;
pub use registry::StoreRegistry;
pub use store::Store;
