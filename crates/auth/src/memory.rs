use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::backend::AuthBackend;
use crate::error::AuthError;
use crate::types::{generate_key, AuthLevel, KeyType, KeyUsage};

/// Mirrors `auth/memory_provider.go`'s `MemoryProvider`: an `RwLock`-guarded
/// map of key → usage, reads dominate.
pub struct InMemoryAuth {
    key_type: KeyType,
    keys: RwLock<HashMap<String, KeyUsage>>,
}

impl InMemoryAuth {
    pub fn new(key_type: KeyType) -> Self {
        Self {
            key_type,
            keys: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AuthBackend for InMemoryAuth {
    async fn resolve(&self, key: &str) -> Result<AuthLevel, AuthError> {
        let keys = self.keys.read().expect("in-memory auth lock poisoned");
        if keys.contains_key(key) {
            Ok(AuthLevel::Basic)
        } else {
            Err(AuthError::InvalidKey)
        }
    }

    async fn register(&self) -> Result<String, AuthError> {
        let key = generate_key(self.key_type);
        let mut keys = self.keys.write().expect("in-memory auth lock poisoned");
        keys.insert(key.clone(), KeyUsage::default());
        Ok(key)
    }

    async fn update_usage(&self, key: &str, delta: &KeyUsage) -> Result<(), AuthError> {
        let mut keys = self.keys.write().expect("in-memory auth lock poisoned");
        if let Some(usage) = keys.get_mut(key) {
            usage.requests += delta.requests;
            usage.last_ip = delta.last_ip.clone();
            usage.last_access = delta.last_access;
            for (method, count) in &delta.method_usage {
                *usage.method_usage.entry(method.clone()).or_insert(0) += count;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registered_key_resolves_basic() {
        let backend = InMemoryAuth::new(KeyType::Hex64);
        let key = backend.register().await.unwrap();
        assert_eq!(backend.resolve(&key).await.unwrap(), AuthLevel::Basic);
    }

    #[tokio::test]
    async fn unknown_key_is_invalid() {
        let backend = InMemoryAuth::new(KeyType::Hex64);
        assert!(backend.resolve("nope").await.is_err());
    }
}
