use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Gates method prefixes: `idx_*` requires at least `Basic`, `auth_*`
/// requires `Master`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum AuthLevel {
    Unauthorized = 0,
    Basic = 1,
    Master = 2,
}

/// Per-key usage counters, updated off the serving hot path (`auth/usage.go`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyUsage {
    pub requests: u64,
    pub last_ip: String,
    pub last_access: i64,
    pub method_usage: HashMap<String, u64>,
}

impl KeyUsage {
    pub fn record(&mut self, ip: &str, method: &str, accessed_at: i64) {
        self.requests += 1;
        self.last_ip = ip.to_string();
        self.last_access = accessed_at;
        *self.method_usage.entry(method.to_string()).or_insert(0) += 1;
    }
}

/// How a key is rendered: `GenerateKey` in `auth/keys.go`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Uuid,
    Hex16,
    Hex32,
    Hex64,
    Hex128,
    Hex256,
}

impl KeyType {
    /// Random byte length backing each hex variant (half the advertised
    /// hex character count).
    fn hex_byte_len(self) -> Option<usize> {
        match self {
            KeyType::Uuid => None,
            KeyType::Hex16 => Some(8),
            KeyType::Hex32 => Some(16),
            KeyType::Hex64 => Some(32),
            KeyType::Hex128 => Some(64),
            KeyType::Hex256 => Some(128),
        }
    }
}

/// `Authentication: Bearer <key>` → credential string, stripped of prefix.
pub fn strip_bearer_prefix(header_value: &str) -> &str {
    header_value.strip_prefix("Bearer ").unwrap_or(header_value)
}

pub fn generate_key(key_type: KeyType) -> String {
    match key_type.hex_byte_len() {
        None => uuid::Uuid::new_v4().to_string(),
        Some(len) => {
            let mut bytes = vec![0u8; len];
            rand::Rng::fill(&mut rand::thread_rng(), bytes.as_mut_slice());
            hex::encode(bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_key_lengths_match_advertised_character_count() {
        assert_eq!(generate_key(KeyType::Hex16).len(), 16);
        assert_eq!(generate_key(KeyType::Hex32).len(), 32);
        assert_eq!(generate_key(KeyType::Hex64).len(), 64);
        assert_eq!(generate_key(KeyType::Hex128).len(), 128);
        assert_eq!(generate_key(KeyType::Hex256).len(), 256);
    }

    #[test]
    fn uuid_key_parses_as_uuid() {
        let key = generate_key(KeyType::Uuid);
        assert!(uuid::Uuid::parse_str(&key).is_ok());
    }

    #[test]
    fn strip_bearer_prefix_removes_scheme() {
        assert_eq!(strip_bearer_prefix("Bearer abc123"), "abc123");
        assert_eq!(strip_bearer_prefix("abc123"), "abc123");
    }

    #[test]
    fn auth_level_ordering_gates_correctly() {
        assert!(AuthLevel::Unauthorized < AuthLevel::Basic);
        assert!(AuthLevel::Basic < AuthLevel::Master);
    }
}
