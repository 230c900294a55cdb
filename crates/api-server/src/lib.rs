//! HTTP entrypoint for the indexer's JSON-RPC-2.0 surface: `axum` routing,
//! the `tower` middleware stack spec.md §4.6 specifies, and per-method
//! dispatch against whichever `Store` the request's `chain_id` resolves to.

pub mod dispatch;
pub mod error;
pub mod middleware;
pub mod server;
pub mod state;

pub use error::RpcDispatchError;
pub use server::{router, ApiServer};
pub use state::AppState;
