//! Wire-level declarations for the indexer's JSON-RPC-2.0 surface: the
//! request/response envelope, per-method parameter structs, and the
//! pre-dispatch validation they implement. `indexer-api-server` owns
//! dispatch, auth and rate-limiting; this crate only owns shapes and the
//! rules a request must satisfy before a `Store` call is made.

pub mod envelope;
pub mod methods;
pub mod validate;

pub use envelope::{codes, JrpcError, JrpcRequest, JrpcResponse};
pub use methods::{
    ChainIdParams, EmptyParams, FindPairsParams, FindTokensParams, GetBlockAtTimestampParams,
    GetBlockTimestampsParams, PairFilterWire, QueryOptionsWire, TokenFilterWire,
};
pub use validate::{Validate, ValidationError};
