use indexer_chain_client::ChainClient;
use indexer_common::model::BlockTimestamp;

use crate::worker_pool::run_pooled;

/// Partitions `[from, to]` (inclusive) into contiguous batches of at most
/// `batch_size` blocks each, per spec.md §4.2.1.
pub fn partition_range(from: u64, to: u64, batch_size: u64) -> Vec<(u64, u64)> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::new();
    let mut start = from;
    while start <= to {
        let end = start.saturating_add(batch_size - 1).min(to);
        batches.push((start, end));
        if end == to {
            break;
        }
        start = end + 1;
    }
    batches
}

/// Fetches block timestamps over `[from, to]` inclusive. Each `batch_size`
/// chunk is issued as one `eth_getBlockByNumber` RPC batch; a batch that
/// fails outright is logged and contributes no rows, but siblings still
/// complete (spec.md §4.2.4 — a single element/batch error never aborts
/// the pipeline).
pub async fn ingest_block_timestamps(
    client: ChainClient,
    from: u64,
    to: u64,
    batch_size: u64,
    concurrency: usize,
) -> Vec<BlockTimestamp> {
    if from > to {
        return Vec::new();
    }
    let batches = partition_range(from, to, batch_size);

    let results = run_pooled(batches, concurrency, move |(lo, hi)| {
        let client = client.clone();
        async move {
            match client.get_block_headers(lo, hi).await {
                Ok(rows) => rows,
                Err(err) => {
                    tracing::warn!(from = lo, to = hi, error = %err, "block-timestamp batch failed");
                    Vec::new()
                }
            }
        }
    })
    .await;

    results.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitions_exact_multiples() {
        assert_eq!(
            partition_range(0, 299, 100),
            vec![(0, 99), (100, 199), (200, 299)]
        );
    }

    #[test]
    fn partitions_with_remainder() {
        assert_eq!(partition_range(0, 250, 100), vec![(0, 99), (100, 199), (200, 250)]);
    }

    #[test]
    fn single_block_range_is_one_batch() {
        assert_eq!(partition_range(42, 42, 100), vec![(42, 42)]);
    }

    #[test]
    fn empty_batch_size_is_clamped_to_one() {
        assert_eq!(partition_range(0, 2, 0), vec![(0, 0), (1, 1), (2, 2)]);
    }
}
