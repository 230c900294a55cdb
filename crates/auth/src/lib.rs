pub mod authenticator;
pub mod backend;
pub mod error;
pub mod memory;
pub mod noauth;
pub mod sql;
pub mod types;

pub use authenticator::Authenticator;
pub use backend::AuthBackend;
pub use error::AuthError;
pub use memory::InMemoryAuth;
pub use noauth::NoAuth;
pub use sql::SqlAuth;
pub use types::{generate_key, strip_bearer_prefix, AuthLevel, KeyType, KeyUsage};
