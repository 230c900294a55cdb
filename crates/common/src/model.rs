use serde::{Deserialize, Serialize};

use crate::addr::{lower, ZERO_ADDRESS, ZERO_HASH};

/// An ERC-20-like token, keyed by `(chain_id, address)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub chain_id: u64,
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub creator: String,
    pub creation_hash: String,
    pub created_at: u64,
}

impl Token {
    /// Builds a token with the `"unknown"`/zero-sentinel defaults the
    /// ingester falls back to when on-chain metadata can't be read.
    pub fn new(chain_id: u64, address: &str) -> Self {
        Self {
            chain_id,
            address: lower(address),
            name: "unknown".to_string(),
            symbol: "unknown".to_string(),
            decimals: 0,
            creator: ZERO_ADDRESS.to_string(),
            creation_hash: ZERO_HASH.to_string(),
            created_at: 0,
        }
    }

    /// Lowercases every address/hash field, per the global invariant that
    /// all persisted addresses and hashes are lowercase hex.
    pub fn lowercased(mut self) -> Self {
        self.address = lower(&self.address);
        self.creator = lower(&self.creator);
        self.creation_hash = lower(&self.creation_hash);
        self
    }
}

/// A single chain block's header timestamp, keyed by `(chain_id, block)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockTimestamp {
    pub block: u64,
    pub timestamp: u64,
}

/// Whether a liquidity pool is a constant-product (V2) or
/// concentrated-liquidity (V3) AMM pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[repr(u8)]
pub enum PoolType {
    V2 = 2,
    V3 = 3,
}

impl PoolType {
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

/// An AMM pool creation event, keyed by `(chain_id, hash)` where `hash` is
/// the creation transaction hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pair {
    pub chain_id: u64,
    pub hash: String,
    pub token0_address: String,
    pub token1_address: String,
    pub pool_address: String,
    /// V2 = 0; V3 = uint24 fee tier.
    pub fee: i64,
    /// V2 = 0; V3 = int24 tick spacing.
    pub tick_spacing: i64,
    pub pool_type: PoolType,
    pub created_at: u64,
}

impl Pair {
    /// Lowercases every address/hash field, per the global invariant.
    pub fn lowercased(mut self) -> Self {
        self.hash = lower(&self.hash);
        self.token0_address = lower(&self.token0_address);
        self.token1_address = lower(&self.token1_address);
        self.pool_address = lower(&self.pool_address);
        self
    }
}

/// Per-chain max height across each table; 0 on an empty table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Heights {
    pub blocks: u64,
    pub tokens: u64,
    pub pairs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_defaults_to_unknown_and_zero_sentinels() {
        let t = Token::new(1, "0xABCDEF0000000000000000000000000000000000");
        assert_eq!(t.name, "unknown");
        assert_eq!(t.symbol, "unknown");
        assert_eq!(t.decimals, 0);
        assert_eq!(t.creator, ZERO_ADDRESS);
        assert_eq!(t.creation_hash, ZERO_HASH);
        assert_eq!(t.address, "0xabcdef0000000000000000000000000000000000");
    }

    #[test]
    fn pair_lowercased_normalizes_all_address_fields() {
        let p = Pair {
            chain_id: 1,
            hash: "0xABCD".into(),
            token0_address: "0xAAA".into(),
            token1_address: "0xBBB".into(),
            pool_address: "0xCCC".into(),
            fee: 3000,
            tick_spacing: 60,
            pool_type: PoolType::V3,
            created_at: 100,
        }
        .lowercased();

        assert_eq!(p.hash, "0xabcd");
        assert_eq!(p.token0_address, "0xaaa");
        assert_eq!(p.token1_address, "0xbbb");
        assert_eq!(p.pool_address, "0xccc");
    }
}
