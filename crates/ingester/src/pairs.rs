use futures::stream::{self, StreamExt, TryStreamExt};

use indexer_chain_client::abi::{
    address_from_topic, decode_v2_data, decode_v3_data, int_from_topic, topic0,
    V2_PAIR_CREATED_SIG, V3_POOL_CREATED_SIG,
};
use indexer_chain_client::{ChainClient, ChainClientError, RawLog};
use indexer_common::addr::lower;
use indexer_common::model::{Pair, PoolType};

use crate::block_timestamps::partition_range;

fn hex_to_u64(s: &str) -> u64 {
    let s = s.trim_start_matches("0x");
    if s.is_empty() {
        return 0;
    }
    u64::from_str_radix(s, 16).unwrap_or(0)
}

/// Decodes one V2 `PairCreated` log. Requires exactly 3 topics
/// (`[sig, token0, token1]`); non-indexed `data` decodes to
/// `(pool_address, pair_index)`. Shape mismatches are skipped (return
/// `None`), never hard errors — spec.md §4.2.3 step 3.
fn decode_v2_log(log: &RawLog) -> Option<Pair> {
    if log.topics.len() != 3 {
        tracing::warn!(topics = log.topics.len(), "V2 PairCreated: wrong topic count, skipping");
        return None;
    }
    let token0 = address_from_topic_str(&log.topics[1]);
    let token1 = address_from_topic_str(&log.topics[2]);
    let data = hex::decode(log.data.trim_start_matches("0x")).ok()?;
    let decoded = match decode_v2_data(&data) {
        Ok(d) => d,
        Err(err) => {
            tracing::warn!(error = %err, "V2 PairCreated: abi decode failed, skipping");
            return None;
        }
    };

    Some(
        Pair {
            chain_id: 0,
            hash: log.transaction_hash.clone(),
            token0_address: token0,
            token1_address: token1,
            pool_address: decoded.pool_address.to_string(),
            fee: 0,
            tick_spacing: 0,
            pool_type: PoolType::V2,
            created_at: hex_to_u64(&log.block_number),
        }
        .lowercased(),
    )
}

/// Decodes one V3 `PoolCreated` log. Requires exactly 4 topics
/// (`[sig, token0, token1, fee]`); non-indexed `data` decodes to
/// `(tick_spacing, pool_address)`. Shape mismatches are skipped — spec.md
/// §4.2.3 step 4.
fn decode_v3_log(log: &RawLog) -> Option<Pair> {
    if log.topics.len() != 4 {
        tracing::warn!(topics = log.topics.len(), "V3 PoolCreated: wrong topic count, skipping");
        return None;
    }
    let token0 = address_from_topic_str(&log.topics[1]);
    let token1 = address_from_topic_str(&log.topics[2]);
    let fee = int_from_topic_str(&log.topics[3]);
    let data = hex::decode(log.data.trim_start_matches("0x")).ok()?;
    let decoded = match decode_v3_data(&data) {
        Ok(d) => d,
        Err(err) => {
            tracing::warn!(error = %err, "V3 PoolCreated: abi decode failed, skipping");
            return None;
        }
    };

    Some(
        Pair {
            chain_id: 0,
            hash: log.transaction_hash.clone(),
            token0_address: token0,
            token1_address: token1,
            pool_address: decoded.pool_address.to_string(),
            fee,
            tick_spacing: decoded.tick_spacing,
            pool_type: PoolType::V3,
            created_at: hex_to_u64(&log.block_number),
        }
        .lowercased(),
    )
}

fn address_from_topic_str(topic: &str) -> String {
    let bytes = hex::decode(topic.trim_start_matches("0x")).unwrap_or_default();
    let mut word = [0u8; 32];
    let len = bytes.len().min(32);
    word[32 - len..].copy_from_slice(&bytes[bytes.len() - len..]);
    address_from_topic(&alloy_primitives::B256::from(word)).to_string()
}

fn int_from_topic_str(topic: &str) -> i64 {
    let bytes = hex::decode(topic.trim_start_matches("0x")).unwrap_or_default();
    let mut word = [0u8; 32];
    let len = bytes.len().min(32);
    word[32 - len..].copy_from_slice(&bytes[bytes.len() - len..]);
    int_from_topic(&alloy_primitives::B256::from(word))
}

/// Scans one `[from, to]` window for both factories' creation events in
/// parallel and decodes every log into a [`Pair`] (spec.md §4.2.3). A
/// factory address of `None` skips that variant's filter entirely (a chain
/// may run only a V2 or only a V3 deployment).
async fn ingest_pairs_window(
    client: &ChainClient,
    chain_id: u64,
    from: u64,
    to: u64,
    factory_v2: Option<&str>,
    factory_v3: Option<&str>,
) -> Result<Vec<Pair>, ChainClientError> {
    let v2_topic = format!("0x{}", hex::encode(topic0(V2_PAIR_CREATED_SIG)));
    let v3_topic = format!("0x{}", hex::encode(topic0(V3_POOL_CREATED_SIG)));

    let (v2_logs, v3_logs) = tokio::try_join!(
        async {
            match factory_v2 {
                Some(addr) => client.filter_logs(from, to, addr, &v2_topic).await,
                None => Ok(Vec::new()),
            }
        },
        async {
            match factory_v3 {
                Some(addr) => client.filter_logs(from, to, addr, &v3_topic).await,
                None => Ok(Vec::new()),
            }
        },
    )?;

    let mut pairs: Vec<Pair> = Vec::with_capacity(v2_logs.len() + v3_logs.len());
    pairs.extend(v2_logs.iter().filter_map(decode_v2_log));
    pairs.extend(v3_logs.iter().filter_map(decode_v3_log));
    for pair in &mut pairs {
        pair.chain_id = chain_id;
    }
    Ok(pairs)
}

/// Partitions `[from, to]` into `block_range`-sized windows (`[sync.pairs]`'s
/// `blockRange`, spec.md §6) and scans each with up to `concurrency` windows
/// in flight at once, mirroring the block-timestamp pipeline's worker-pool
/// discipline. Unlike the per-element batch failures the metadata pipelines
/// swallow, a window's `eth_getLogs` failure has no smaller unit to
/// partially fail, so it propagates upward and aborts the whole scan
/// (spec.md §4.2.4).
pub async fn ingest_pairs(
    client: &ChainClient,
    chain_id: u64,
    from: u64,
    to: u64,
    factory_v2: Option<&str>,
    factory_v3: Option<&str>,
    block_range: u64,
    concurrency: usize,
) -> Result<Vec<Pair>, ChainClientError> {
    if from > to {
        return Ok(Vec::new());
    }
    let windows = partition_range(from, to, block_range);
    let concurrency = concurrency.max(1);

    let results: Vec<Vec<Pair>> = stream::iter(windows.into_iter().map(|(lo, hi)| {
        let client = client.clone();
        let factory_v2 = factory_v2.map(str::to_string);
        let factory_v3 = factory_v3.map(str::to_string);
        async move {
            ingest_pairs_window(
                &client,
                chain_id,
                lo,
                hi,
                factory_v2.as_deref(),
                factory_v3.as_deref(),
            )
            .await
        }
    }))
    .buffer_unordered(concurrency)
    .try_collect()
    .await?;

    Ok(results.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_dyn_abi::DynSolValue;
    use alloy_primitives::{Address, U256};

    fn pad_address(addr: &str) -> String {
        let addr = addr.trim_start_matches("0x");
        format!("0x{:0>64}", addr)
    }

    fn pad_u64(n: u64) -> String {
        format!("0x{:0>64x}", n)
    }

    #[test]
    fn decodes_v2_pair_created_log() {
        let token0 = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
        let token1 = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
        let pool: Address = "0xcccccccccccccccccccccccccccccccccccccc".parse().unwrap();

        let value = DynSolValue::Tuple(vec![
            DynSolValue::Address(pool),
            DynSolValue::Uint(U256::from(1u64), 256),
        ]);
        let data = value.abi_encode();

        let log = RawLog {
            address: "0xfactory".into(),
            topics: vec![
                "0xsig".into(),
                pad_address(token0),
                pad_address(token1),
            ],
            data: format!("0x{}", hex::encode(&data)),
            block_number: pad_u64(100),
            transaction_hash: "0xdeadbeef".into(),
        };

        let pair = decode_v2_log(&log).expect("decodes");
        assert_eq!(pair.token0_address, format!("0x{token0}"));
        assert_eq!(pair.token1_address, format!("0x{token1}"));
        assert_eq!(pair.pool_address, "0xcccccccccccccccccccccccccccccccccccccc");
        assert_eq!(pair.pool_type, PoolType::V2);
        assert_eq!(pair.fee, 0);
        assert_eq!(pair.tick_spacing, 0);
        assert_eq!(pair.created_at, 100);
    }

    #[test]
    fn decodes_v3_pool_created_log_with_fee_and_tick_spacing() {
        let token_a = "1111111111111111111111111111111111111111";
        let token_b = "2222222222222222222222222222222222222222";
        let pool: Address = "0x3333333333333333333333333333333333333333".parse().unwrap();

        let value = DynSolValue::Tuple(vec![
            DynSolValue::Int(alloy_primitives::I256::try_from(60i64).unwrap(), 24),
            DynSolValue::Address(pool),
        ]);
        let data = value.abi_encode();

        let log = RawLog {
            address: "0xfactory".into(),
            topics: vec![
                "0xsig".into(),
                pad_address(token_a),
                pad_address(token_b),
                pad_u64(3000),
            ],
            data: format!("0x{}", hex::encode(&data)),
            block_number: pad_u64(200),
            transaction_hash: "0xcafebabe".into(),
        };

        let pair = decode_v3_log(&log).expect("decodes");
        assert_eq!(pair.token0_address, format!("0x{token_a}"));
        assert_eq!(pair.token1_address, format!("0x{token_b}"));
        assert_eq!(pair.fee, 3000);
        assert_eq!(pair.tick_spacing, 60);
        assert_eq!(pair.pool_type, PoolType::V3);
        assert_eq!(pair.created_at, 200);
    }

    #[test]
    fn wrong_topic_count_is_skipped_not_erred() {
        let log = RawLog {
            address: "0xfactory".into(),
            topics: vec!["0xsig".into()],
            data: "0x".into(),
            block_number: pad_u64(1),
            transaction_hash: "0xdead".into(),
        };
        assert!(decode_v2_log(&log).is_none());
        assert!(decode_v3_log(&log).is_none());
    }

    #[tokio::test]
    async fn ingest_pairs_is_a_noop_over_an_empty_range() {
        let client = ChainClient::new("http://127.0.0.1:1").unwrap();
        let pairs = ingest_pairs(&client, 1, 10, 5, None, None, 200, 2).await.unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn block_range_chunks_a_wide_scan_into_windows() {
        let windows = partition_range(0, 450, 200);
        assert_eq!(windows, vec![(0, 199), (200, 399), (400, 450)]);
    }
}
