use serde::{Deserialize, Serialize};

/// Static per-chain configuration surfaced to API consumers (minus the RPC
/// URL, which is never exposed outside the process).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainDescriptor {
    pub chain_id: u64,
    pub name: String,
    pub short_name: String,
    pub explorer_url: String,
    pub router_v2: String,
    pub factory_v2: String,
    pub router_v3: String,
    pub factory_v3: String,
    pub block_duration: u64,
    /// Not serialized to API consumers; present so the descriptor is the
    /// single source of truth for "how do I reach this chain".
    #[serde(skip_serializing)]
    pub rpc_url: String,
}

impl ChainDescriptor {
    /// `short_name` is truncated to 25 chars; it doubles as the logical
    /// Postgres database name for this chain (spec.md §4.3.1).
    pub fn normalized_short_name(&self) -> String {
        let mut s = self.short_name.clone();
        s.truncate(25);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(short_name: &str) -> ChainDescriptor {
        ChainDescriptor {
            chain_id: 1,
            name: "ethereum".into(),
            short_name: short_name.into(),
            explorer_url: "https://etherscan.io".into(),
            router_v2: "0x0".into(),
            factory_v2: "0x0".into(),
            router_v3: "0x0".into(),
            factory_v3: "0x0".into(),
            block_duration: 12,
            rpc_url: "http://localhost:8545".into(),
        }
    }

    #[test]
    fn truncates_short_name_to_25_chars() {
        let d = descriptor(&"a".repeat(40));
        assert_eq!(d.normalized_short_name().len(), 25);
    }

    #[test]
    fn leaves_short_names_untouched() {
        let d = descriptor("eth-main");
        assert_eq!(d.normalized_short_name(), "eth-main");
    }
}
