use async_trait::async_trait;

use crate::backend::AuthBackend;
use crate::error::AuthError;
use crate::types::{AuthLevel, KeyUsage};

/// `auth/noauth.go`'s `NoAuthProvider`: every request is `Master`.
#[derive(Default)]
pub struct NoAuth;

#[async_trait]
impl AuthBackend for NoAuth {
    async fn resolve(&self, _key: &str) -> Result<AuthLevel, AuthError> {
        Ok(AuthLevel::Master)
    }

    async fn register(&self) -> Result<String, AuthError> {
        Ok(String::new())
    }

    async fn update_usage(&self, _key: &str, _delta: &KeyUsage) -> Result<(), AuthError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn any_key_resolves_master() {
        let backend = NoAuth;
        assert_eq!(backend.resolve("anything").await.unwrap(), AuthLevel::Master);
        assert_eq!(backend.resolve("").await.unwrap(), AuthLevel::Master);
    }
}
