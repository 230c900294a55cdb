use alloy::rpc::client::{BatchRequest, ClientBuilder, RpcClient};
use url::Url;

use crate::error::ChainClientError;
use crate::types::{ContractCreator, RawLog, TokenMetadataRaw};
use indexer_common::model::BlockTimestamp;

/// Encapsulates one EVM JSON-RPC endpoint. Mirrors
/// `original_source/eth/methods.go`'s `Network` type: batched calls built
/// and dispatched in a single round trip, then inspected element-by-element.
///
/// Cheaply `Clone`: `RpcClient` is `Arc`-backed, so every ingest worker task
/// can hold its own handle without wrapping the client in an `Arc` itself.
#[derive(Clone)]
pub struct ChainClient {
    rpc: RpcClient,
}

fn hex_to_u64(s: &str) -> Option<u64> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() {
        return Some(0);
    }
    u64::from_str_radix(s, 16).ok()
}

fn eth_call_request(to: &str, data: &str) -> serde_json::Value {
    serde_json::json!({ "to": to, "data": data })
}

impl ChainClient {
    pub fn new(rpc_url: &str) -> Result<Self, ChainClientError> {
        let url: Url = rpc_url
            .parse()
            .map_err(|_| ChainClientError::InvalidUrl(rpc_url.to_string()))?;
        let rpc = ClientBuilder::default().http(url);
        Ok(Self { rpc })
    }

    fn new_batch(&self) -> BatchRequest<'_> {
        self.rpc.new_batch()
    }

    /// `eth_blockNumber` → current chain head.
    pub async fn get_block_number(&self) -> Result<u64, ChainClientError> {
        let hex: String = self
            .rpc
            .request("eth_blockNumber", ())
            .await
            .map_err(|e| ChainClientError::Transport(e.to_string()))?;
        hex_to_u64(&hex).ok_or_else(|| ChainClientError::Transport("malformed blockNumber".into()))
    }

    /// For each integer in `[from, to]`, `eth_getBlockByNumber(n, false)` in
    /// one batch; returns the header's `number`/`timestamp` pair for each.
    pub async fn get_block_headers(
        &self,
        from: u64,
        to: u64,
    ) -> Result<Vec<BlockTimestamp>, ChainClientError> {
        let mut batch = self.new_batch();
        let mut waiters = Vec::with_capacity((to - from + 1) as usize);
        for n in from..=to {
            let tag = format!("0x{:x}", n);
            let waiter = batch
                .add_call::<_, serde_json::Value>("eth_getBlockByNumber", &(tag, false))
                .map_err(|e| ChainClientError::Transport(e.to_string()))?;
            waiters.push((n, waiter));
        }
        batch
            .send()
            .await
            .map_err(|e| ChainClientError::Transport(e.to_string()))?;

        let mut out = Vec::with_capacity(waiters.len());
        for (n, waiter) in waiters {
            let header = waiter
                .await
                .map_err(|e| ChainClientError::BatchElement(e.to_string()))?;
            let number = header
                .get("number")
                .and_then(|v| v.as_str())
                .and_then(hex_to_u64)
                .unwrap_or(n);
            let timestamp = header
                .get("timestamp")
                .and_then(|v| v.as_str())
                .and_then(hex_to_u64)
                .unwrap_or(0);
            out.push(BlockTimestamp {
                block: number,
                timestamp,
            });
        }
        Ok(out)
    }

    /// `eth_getLogs` with a single factory address and single indexed topic.
    pub async fn filter_logs(
        &self,
        from: u64,
        to: u64,
        address: &str,
        topic0: &str,
    ) -> Result<Vec<RawLog>, ChainClientError> {
        let filter = serde_json::json!({
            "fromBlock": format!("0x{:x}", from),
            "toBlock": format!("0x{:x}", to),
            "address": address,
            "topics": [topic0],
        });
        self.rpc
            .request("eth_getLogs", (filter,))
            .await
            .map_err(|e| ChainClientError::Transport(e.to_string()))
    }

    /// `ots_getContractCreator`. Unsupported nodes reply with a method-not-
    /// found error; that's treated as "no creator known", not a hard error.
    pub async fn contract_creator(
        &self,
        address: &str,
    ) -> Result<Option<ContractCreator>, ChainClientError> {
        match self
            .rpc
            .request::<_, Option<ContractCreator>>("ots_getContractCreator", (address,))
            .await
        {
            Ok(c) => Ok(c),
            Err(_) => Ok(None),
        }
    }

    /// Stage-1 token metadata: one 4-element batch of `name()`, `symbol()`,
    /// `decimals()`, and `ots_getContractCreator`, per spec.md §4.2.2.
    pub async fn token_metadata_batch(
        &self,
        token_address: &str,
    ) -> Result<TokenMetadataRaw, ChainClientError> {
        let mut batch = self.new_batch();
        let name_w = batch
            .add_call::<_, Option<String>>(
                "eth_call",
                &(eth_call_request(token_address, "0x06fdde03"), "latest"),
            )
            .map_err(|e| ChainClientError::Transport(e.to_string()))?;
        let symbol_w = batch
            .add_call::<_, Option<String>>(
                "eth_call",
                &(eth_call_request(token_address, "0x95d89b41"), "latest"),
            )
            .map_err(|e| ChainClientError::Transport(e.to_string()))?;
        let decimals_w = batch
            .add_call::<_, Option<String>>(
                "eth_call",
                &(eth_call_request(token_address, "0x313ce567"), "latest"),
            )
            .map_err(|e| ChainClientError::Transport(e.to_string()))?;
        let creator_w = batch
            .add_call::<_, Option<ContractCreator>>("ots_getContractCreator", &(token_address,))
            .map_err(|e| ChainClientError::Transport(e.to_string()))?;

        batch
            .send()
            .await
            .map_err(|e| ChainClientError::Transport(e.to_string()))?;

        let name_hex = name_w
            .await
            .map_err(|e| ChainClientError::BatchElement(e.to_string()))?;
        let symbol_hex = symbol_w
            .await
            .map_err(|e| ChainClientError::BatchElement(e.to_string()))?;
        let decimals_hex = decimals_w
            .await
            .map_err(|e| ChainClientError::BatchElement(e.to_string()))?;
        // Otterscan support is best-effort; its own failure downgrades to
        // "no creator known" rather than failing the whole token batch.
        let creator = creator_w.await.unwrap_or(None);

        Ok(TokenMetadataRaw {
            name_hex,
            symbol_hex,
            decimals_hex,
            creator,
        })
    }

    /// Stage-2: `eth_getTransactionByHash` for a batch of creation hashes,
    /// resolving each to its block number (hex → int; failure → 0).
    pub async fn tx_block_numbers_batch(
        &self,
        tx_hashes: &[String],
    ) -> Result<Vec<u64>, ChainClientError> {
        let mut batch = self.new_batch();
        let mut waiters = Vec::with_capacity(tx_hashes.len());
        for hash in tx_hashes {
            let waiter = batch
                .add_call::<_, Option<serde_json::Value>>(
                    "eth_getTransactionByHash",
                    &(hash.clone(),),
                )
                .map_err(|e| ChainClientError::Transport(e.to_string()))?;
            waiters.push(waiter);
        }
        batch
            .send()
            .await
            .map_err(|e| ChainClientError::Transport(e.to_string()))?;

        let mut out = Vec::with_capacity(waiters.len());
        for waiter in waiters {
            let block_number = match waiter.await {
                Ok(tx) => tx
                    .as_ref()
                    .and_then(|t| t.get("blockNumber"))
                    .and_then(|v| v.as_str())
                    .and_then(hex_to_u64)
                    .unwrap_or(0),
                Err(_) => 0,
            };
            out.push(block_number);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_u64_handles_sentinels() {
        assert_eq!(hex_to_u64("0x"), Some(0));
        assert_eq!(hex_to_u64("0x10"), Some(16));
        assert_eq!(hex_to_u64("nothex"), None);
    }
}
