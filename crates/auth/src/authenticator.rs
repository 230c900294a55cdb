use std::sync::Arc;

use crate::backend::AuthBackend;
use crate::noauth::NoAuth;
use crate::types::{strip_bearer_prefix, AuthLevel, KeyUsage};

/// Wraps a backend with the master-key short-circuit every provider in
/// `original_source/auth/*.go` re-implements inline. A configured,
/// non-empty master key that matches the presented credential always wins;
/// otherwise the request is handed to the backend.
pub struct Authenticator {
    master_key: Option<String>,
    backend: Arc<dyn AuthBackend>,
}

impl Authenticator {
    pub fn new(master_key: Option<String>, backend: Arc<dyn AuthBackend>) -> Self {
        let master_key = master_key.filter(|k| !k.is_empty());
        Self { master_key, backend }
    }

    /// `header_value` is the raw `Authentication` header, if present. A
    /// missing header is not a short-circuit to `Unauthorized`: it still
    /// reaches the backend as an empty key, since `original_source/auth/
    /// noauth.go`'s `Authenticate` ignores the request entirely and always
    /// succeeds — the no-auth backend must grant `Master` even with no
    /// credential presented (spec.md §4.7).
    pub async fn authenticate(&self, header_value: Option<&str>) -> AuthLevel {
        let key = header_value.map(strip_bearer_prefix).unwrap_or("");

        if let Some(master) = &self.master_key {
            if key == master {
                return AuthLevel::Master;
            }
        }

        self.backend
            .resolve(key)
            .await
            .unwrap_or(AuthLevel::Unauthorized)
    }

    pub async fn register(&self) -> Result<String, crate::error::AuthError> {
        self.backend.register().await
    }

    pub async fn update_usage(
        &self,
        key: &str,
        delta: &KeyUsage,
    ) -> Result<(), crate::error::AuthError> {
        self.backend.update_usage(key, delta).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryAuth;
    use crate::types::KeyType;

    #[tokio::test]
    async fn master_key_short_circuits_backend() {
        let auth = Authenticator::new(
            Some("top-secret".to_string()),
            Arc::new(InMemoryAuth::new(KeyType::Hex64)),
        );
        let level = auth.authenticate(Some("Bearer top-secret")).await;
        assert_eq!(level, AuthLevel::Master);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let auth = Authenticator::new(None, Arc::new(InMemoryAuth::new(KeyType::Hex64)));
        assert_eq!(auth.authenticate(None).await, AuthLevel::Unauthorized);
    }

    #[tokio::test]
    async fn registered_key_resolves_to_basic_via_backend() {
        let backend = Arc::new(InMemoryAuth::new(KeyType::Hex64));
        let key = backend.register().await.unwrap();
        let auth = Authenticator::new(None, backend);
        let header = format!("Bearer {key}");
        assert_eq!(auth.authenticate(Some(&header)).await, AuthLevel::Basic);
    }

    #[tokio::test]
    async fn noauth_backend_grants_master_even_without_a_credential() {
        let auth = Authenticator::new(None, Arc::new(NoAuth));
        assert_eq!(auth.authenticate(None).await, AuthLevel::Master);
    }

    #[tokio::test]
    async fn empty_master_key_is_treated_as_unset() {
        let auth = Authenticator::new(
            Some(String::new()),
            Arc::new(InMemoryAuth::new(KeyType::Hex64)),
        );
        assert_eq!(
            auth.authenticate(Some("Bearer ")).await,
            AuthLevel::Unauthorized
        );
    }
}
