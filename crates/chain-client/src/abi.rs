//! Topic0 signatures and ABI decoding for the two factory event shapes this
//! indexer understands. Grounded on `original_source/eth/method_pairs.go`,
//! which parses a single factory ABI once and keeps reusing it per log.

use alloy_dyn_abi::{DynSolType, DynSolValue};
use alloy_primitives::{keccak256, Address, B256};

use crate::error::ChainClientError;

pub const V2_PAIR_CREATED_SIG: &str = "PairCreated(address,address,address,uint256)";
pub const V3_POOL_CREATED_SIG: &str = "PoolCreated(address,address,uint24,int24,address)";

/// Keccak-256 of the canonical event signature, compared against `topics[0]`.
pub fn topic0(signature: &str) -> B256 {
    keccak256(signature.as_bytes())
}

/// Indexed address topics are right-padded 32-byte words; the address is the
/// low 20 bytes.
pub fn address_from_topic(topic: &B256) -> Address {
    Address::from_slice(&topic.as_slice()[12..])
}

/// Big-endian integer from a topic word (used for V3's indexed `fee`).
pub fn int_from_topic(topic: &B256) -> i64 {
    let bytes = topic.as_slice();
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[24..32]);
    i64::from_be_bytes(buf)
}

pub struct V2PairCreatedData {
    pub pool_address: Address,
    pub pair_index: u64,
}

/// Decodes a V2 `PairCreated` event's non-indexed data: `(address, uint256)`.
pub fn decode_v2_data(data: &[u8]) -> Result<V2PairCreatedData, ChainClientError> {
    let ty = DynSolType::Tuple(vec![DynSolType::Address, DynSolType::Uint(256)]);
    let decoded = ty
        .abi_decode(data)
        .map_err(|e| ChainClientError::AbiDecode(e.to_string()))?;
    let DynSolValue::Tuple(values) = decoded else {
        return Err(ChainClientError::AbiDecode(
            "expected tuple for PairCreated data".into(),
        ));
    };
    let pool_address = values[0]
        .as_address()
        .ok_or_else(|| ChainClientError::AbiDecode("PairCreated.pool_address".into()))?;
    let pair_index = values[1]
        .as_uint()
        .map(|(u, _)| u.to::<u64>())
        .ok_or_else(|| ChainClientError::AbiDecode("PairCreated.pair_index".into()))?;
    Ok(V2PairCreatedData {
        pool_address,
        pair_index,
    })
}

pub struct V3PoolCreatedData {
    pub tick_spacing: i64,
    pub pool_address: Address,
}

/// Decodes a V3 `PoolCreated` event's non-indexed data: `(int24, address)`.
pub fn decode_v3_data(data: &[u8]) -> Result<V3PoolCreatedData, ChainClientError> {
    let ty = DynSolType::Tuple(vec![DynSolType::Int(24), DynSolType::Address]);
    let decoded = ty
        .abi_decode(data)
        .map_err(|e| ChainClientError::AbiDecode(e.to_string()))?;
    let DynSolValue::Tuple(values) = decoded else {
        return Err(ChainClientError::AbiDecode(
            "expected tuple for PoolCreated data".into(),
        ));
    };
    let tick_spacing = values[0]
        .as_int()
        .map(|(i, _)| i.as_i64())
        .ok_or_else(|| ChainClientError::AbiDecode("PoolCreated.tick_spacing".into()))?;
    let pool_address = values[1]
        .as_address()
        .ok_or_else(|| ChainClientError::AbiDecode("PoolCreated.pool_address".into()))?;
    Ok(V3PoolCreatedData {
        tick_spacing,
        pool_address,
    })
}
