//! Address/hash lowercasing and sentinel constants.
//!
//! Every address and hash the indexer persists or compares is a lowercased
//! hex string. The sentinels below are what the ingester substitutes when
//! an on-chain lookup comes back empty (e.g. `ots_getContractCreator` is
//! unsupported by the node).

/// 42-char zero address, used as the default `Token.creator`.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// 66-char zero hash, used as the default `Token.creation_hash`.
pub const ZERO_HASH: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Lowercases a hex-like string in place semantics (returns a new `String`).
pub fn lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// Extracts the low 20 bytes of a right-padded 32-byte indexed address topic
/// and returns it as a lowercased `0x`-prefixed address.
pub fn address_from_topic(topic: &str) -> String {
    let trimmed = topic.trim_start_matches("0x");
    let start = trimmed.len().saturating_sub(40);
    format!("0x{}", trimmed[start..].to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_low_20_bytes() {
        let topic = "0x000000000000000000000000aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        assert_eq!(
            address_from_topic(topic),
            "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
        );
    }

    #[test]
    fn lowercases() {
        assert_eq!(lower("0xABCDEF"), "0xabcdef");
    }
}
