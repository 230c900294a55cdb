use indexer_chain_client::ChainClient;
use indexer_common::addr::{lower, ZERO_ADDRESS, ZERO_HASH};
use indexer_common::model::Token;

use crate::worker_pool::run_pooled;

/// Stage-2 batch size is fixed at 50, independent of the configured
/// token-metadata concurrency (spec.md §4.2.2).
pub const STAGE2_BATCH_SIZE: usize = 50;

/// Hex-decodes a `name()`/`symbol()` `eth_call` return value as raw ASCII
/// bytes (not an ABI-decoded dynamic `string` — many legacy ERC-20s return
/// a padded `bytes32` instead, and this decode has to tolerate both), trims
/// trailing NUL padding. `None`/empty/`0x` downgrades to `"unknown"`;
/// undecodable hex downgrades to an empty string rather than aborting the
/// token (grounded on `original_source/eth/methods.go`'s `hexToString`).
pub fn hex_to_string(hex_str: Option<&str>) -> String {
    let Some(hex_str) = hex_str else {
        return "unknown".to_string();
    };
    if hex_str.is_empty() || hex_str == "0x" {
        return "unknown".to_string();
    }
    let trimmed = hex_str.trim_start_matches("0x");
    match hex::decode(trimmed) {
        Ok(bytes) => String::from_utf8_lossy(&bytes)
            .trim_matches('\u{0}')
            .to_string(),
        Err(_) => String::new(),
    }
}

/// Hex-to-`u8` for `decimals()`; parse failure downgrades to `0` rather
/// than aborting the token (spec.md §4.2.2).
pub fn hex_to_decimals(hex_str: Option<&str>) -> u8 {
    let Some(hex_str) = hex_str else {
        return 0;
    };
    let trimmed = hex_str.trim_start_matches("0x");
    if trimmed.is_empty() {
        return 0;
    }
    u8::from_str_radix(trimmed, 16).unwrap_or(0)
}

/// Stage 1: one 4-element `eth_call`/`ots_getContractCreator` batch per
/// token, decoded into a [`Token`] with `created_at` still `0` (set in
/// stage 2). A batch that errors outright is dropped from the result —
/// siblings still complete (spec.md §4.2.4).
pub async fn stage1_token_metadata(
    client: ChainClient,
    addresses: Vec<String>,
    concurrency: usize,
) -> Vec<Token> {
    let addresses: Vec<String> = {
        let mut seen = std::collections::HashSet::new();
        addresses
            .into_iter()
            .map(|a| lower(&a))
            .filter(|a| seen.insert(a.clone()))
            .collect()
    };

    run_pooled(addresses, concurrency, move |address| {
        let client = client.clone();
        async move {
            match client.token_metadata_batch(&address).await {
                Ok(raw) => Some(Token {
                    chain_id: 0, // filled in by the caller, which knows the chain
                    address: lower(&address),
                    name: hex_to_string(raw.name_hex.as_deref()),
                    symbol: hex_to_string(raw.symbol_hex.as_deref()),
                    decimals: hex_to_decimals(raw.decimals_hex.as_deref()),
                    creator: raw
                        .creator
                        .as_ref()
                        .map(|c| lower(&c.creator))
                        .filter(|c| !c.is_empty())
                        .unwrap_or_else(|| ZERO_ADDRESS.to_string()),
                    creation_hash: raw
                        .creator
                        .as_ref()
                        .map(|c| lower(&c.creation_hash))
                        .filter(|h| !h.is_empty())
                        .unwrap_or_else(|| ZERO_HASH.to_string()),
                    created_at: 0,
                }),
                Err(err) => {
                    tracing::warn!(address = %address, error = %err, "token metadata batch failed");
                    None
                }
            }
        }
    })
    .await
    .into_iter()
    .flatten()
    .collect()
}

/// Stage 2: resolves each token's `creation_hash` to a block number via
/// `eth_getTransactionByHash`, batched in groups of [`STAGE2_BATCH_SIZE`].
/// Runs strictly after stage 1 completes (spec.md §4.2.2).
pub async fn stage2_resolve_created_at(
    client: ChainClient,
    tokens: Vec<Token>,
    concurrency: usize,
) -> Vec<Token> {
    let chunks: Vec<Vec<Token>> = tokens
        .chunks(STAGE2_BATCH_SIZE)
        .map(|c| c.to_vec())
        .collect();

    let resolved = run_pooled(chunks, concurrency, move |chunk| {
        let client = client.clone();
        async move {
            let hashes: Vec<String> = chunk.iter().map(|t| t.creation_hash.clone()).collect();
            match client.tx_block_numbers_batch(&hashes).await {
                Ok(block_numbers) => chunk
                    .into_iter()
                    .zip(block_numbers)
                    .map(|(mut token, block)| {
                        token.created_at = block;
                        token
                    })
                    .collect::<Vec<_>>(),
                Err(err) => {
                    tracing::warn!(error = %err, "stage-2 token batch failed");
                    chunk
                }
            }
        }
    })
    .await;

    resolved.into_iter().flatten().collect()
}

/// Runs both stages for a chain's token set, stamping `chain_id` on the
/// result (stage 1/2 are chain-agnostic so they can stay unit-testable
/// without a chain id in scope).
pub async fn ingest_tokens(
    client: ChainClient,
    chain_id: u64,
    addresses: Vec<String>,
    batch_concurrency: usize,
) -> Vec<Token> {
    let stage1 = stage1_token_metadata(client.clone(), addresses, batch_concurrency).await;
    let stage2 = stage2_resolve_created_at(client, stage1, batch_concurrency).await;
    stage2
        .into_iter()
        .map(|mut t| {
            t.chain_id = chain_id;
            t
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_string_empty_payload_is_unknown() {
        assert_eq!(hex_to_string(Some("0x")), "unknown");
        assert_eq!(hex_to_string(Some("")), "unknown");
        assert_eq!(hex_to_string(None), "unknown");
    }

    #[test]
    fn hex_to_string_trims_trailing_nuls() {
        // "USD Coin" padded to 32 bytes, as a naive bytes32 symbol return would be.
        let mut bytes = b"USD Coin".to_vec();
        bytes.resize(32, 0);
        let hex_str = format!("0x{}", hex::encode(bytes));
        assert_eq!(hex_to_string(Some(&hex_str)), "USD Coin");
    }

    #[test]
    fn hex_to_string_bad_hex_is_empty_not_unknown() {
        assert_eq!(hex_to_string(Some("0xzz")), "");
    }

    #[test]
    fn hex_to_decimals_parses_and_defaults_to_zero() {
        assert_eq!(hex_to_decimals(Some("0x12")), 18);
        assert_eq!(hex_to_decimals(Some("0x")), 0);
        assert_eq!(hex_to_decimals(None), 0);
        assert_eq!(hex_to_decimals(Some("0xzz")), 0);
    }
}
