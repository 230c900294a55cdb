use async_trait::async_trait;

use crate::error::AuthError;
use crate::types::{AuthLevel, KeyUsage};

/// Common surface for the three auth backends (spec.md §9 "Polymorphic
/// auth"): resolve a presented key to an [`AuthLevel`], mint new keys, and
/// record usage off the hot path.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Resolves a bearer key, having already ruled out the master key.
    /// Backends only ever return `Basic` or fail with `Unauthorized`/
    /// `InvalidKey` — they never themselves grant `Master`.
    async fn resolve(&self, key: &str) -> Result<AuthLevel, AuthError>;
    async fn register(&self) -> Result<String, AuthError>;
    async fn update_usage(&self, key: &str, delta: &KeyUsage) -> Result<(), AuthError>;
}
