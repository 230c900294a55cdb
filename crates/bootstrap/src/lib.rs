//! Cold-start CSV adapters (spec.md §6), grounded 1:1 on
//! `original_source/adapter/adapter.go`: each file has a header row,
//! subsequent rows are parsed positionally, a dedup map collapses repeated
//! keys (first occurrence wins), and the result is sorted ascending by the
//! entity's natural ordering column. Treated as an external collaborator
//! by the rest of the workspace — nothing downstream depends on this
//! crate, it only feeds `Store::BulkInsert*` at cold-start time.

pub mod error;

use std::collections::HashMap;
use std::path::Path;

use indexer_common::model::{BlockTimestamp, Pair, PoolType, Token};

pub use error::BootstrapError;

fn parse_i64(s: &str) -> i64 {
    s.trim().parse().unwrap_or(0)
}

fn parse_u64(s: &str) -> u64 {
    s.trim().parse().unwrap_or(0)
}

fn parse_u8(s: &str) -> u8 {
    s.trim().parse().unwrap_or(0)
}

fn open_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, BootstrapError> {
    let file = std::fs::File::open(path)
        .map_err(|e| BootstrapError::Io(path.display().to_string(), e))?;
    Ok(csv::ReaderBuilder::new().has_headers(true).from_reader(file))
}

/// Columns: `token0, token1, pool_type, pool_address, fee, tick_spacing,
/// created_at, hash`. `hash` dedups; output sorted by `created_at` asc.
pub fn pairs_from_csv(path: impl AsRef<Path>) -> Result<Vec<Pair>, BootstrapError> {
    let mut reader = open_reader(path.as_ref())?;
    let mut by_hash: HashMap<String, Pair> = HashMap::new();

    for record in reader.records() {
        let record = record?;
        if record.len() < 8 {
            continue;
        }
        let hash = record[7].to_string();
        by_hash.entry(hash.clone()).or_insert_with(|| {
            let pool_type = if parse_u8(&record[2]) == 3 {
                PoolType::V3
            } else {
                PoolType::V2
            };
            Pair {
                chain_id: 0,
                hash,
                token0_address: record[0].to_string(),
                token1_address: record[1].to_string(),
                pool_address: record[3].to_string(),
                fee: parse_i64(&record[4]),
                tick_spacing: parse_i64(&record[5]),
                pool_type,
                created_at: parse_u64(&record[6]),
            }
        });
    }

    let mut pairs: Vec<Pair> = by_hash.into_values().collect();
    pairs.sort_by_key(|p| p.created_at);
    Ok(pairs)
}

/// Columns: `address, name, symbol, decimals, creator, created_at_block`.
/// `address` dedups; `chain_id` is left `0` for the caller to set; output
/// sorted by `created_at` asc.
pub fn tokens_from_csv(path: impl AsRef<Path>) -> Result<Vec<Token>, BootstrapError> {
    let mut reader = open_reader(path.as_ref())?;
    let mut by_address: HashMap<String, Token> = HashMap::new();

    for record in reader.records() {
        let record = record?;
        if record.len() < 6 {
            continue;
        }
        let address = record[0].to_string();
        by_address.entry(address.clone()).or_insert_with(|| Token {
            chain_id: 0,
            address,
            name: record[1].to_string(),
            symbol: record[2].to_string(),
            decimals: parse_u8(&record[3]),
            creator: record[4].to_string(),
            creation_hash: indexer_common::ZERO_HASH.to_string(),
            created_at: parse_u64(&record[5]),
        });
    }

    let mut tokens: Vec<Token> = by_address.into_values().collect();
    tokens.sort_by_key(|t| t.created_at);
    Ok(tokens)
}

/// Columns: `block, timestamp`. `block` dedups; output sorted by `block`
/// asc.
pub fn block_timestamps_from_csv(
    path: impl AsRef<Path>,
) -> Result<Vec<BlockTimestamp>, BootstrapError> {
    let mut reader = open_reader(path.as_ref())?;
    let mut by_block: HashMap<u64, BlockTimestamp> = HashMap::new();

    for record in reader.records() {
        let record = record?;
        if record.len() < 2 {
            continue;
        }
        let block = parse_u64(&record[0]);
        by_block.entry(block).or_insert(BlockTimestamp {
            block,
            timestamp: parse_u64(&record[1]),
        });
    }

    let mut rows: Vec<BlockTimestamp> = by_block.into_values().collect();
    rows.sort_by_key(|r| r.block);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn pairs_csv_dedups_by_hash_and_sorts_by_created_at() {
        let file = write_csv(
            "token0,token1,pool_type,pool_address,fee,tick_spacing,created_at,hash\n\
             0xa,0xb,3,0xpool1,3000,60,200,0xhash1\n\
             0xc,0xd,2,0xpool2,0,0,100,0xhash2\n\
             0xa,0xb,3,0xpool1,3000,60,999,0xhash1\n",
        );
        let pairs = pairs_from_csv(file.path()).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].created_at, 100);
        assert_eq!(pairs[1].created_at, 200);
        assert_eq!(pairs[1].pool_type, PoolType::V3);
    }

    #[test]
    fn tokens_csv_dedups_by_address() {
        let file = write_csv(
            "address,name,symbol,decimals,creator,created_at_block\n\
             0xaaa,Wrapped Ether,WETH,18,0xcreator,50\n\
             0xaaa,Duplicate,DUP,18,0xcreator,999\n\
             0xbbb,USD Coin,USDC,6,0xcreator,10\n",
        );
        let tokens = tokens_from_csv(file.path()).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].created_at, 10);
        assert_eq!(tokens[1].name, "Wrapped Ether");
    }

    #[test]
    fn block_timestamps_csv_dedups_by_block_and_sorts() {
        let file = write_csv("block,timestamp\n102,1700\n100,1690\n100,9999\n");
        let rows = block_timestamps_from_csv(file.path()).unwrap();
        assert_eq!(rows, vec![
            BlockTimestamp { block: 100, timestamp: 1690 },
            BlockTimestamp { block: 102, timestamp: 1700 },
        ]);
    }
}
