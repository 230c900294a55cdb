use serde::Deserialize;

/// A decoded `eth_getLogs` entry, kept close to the wire shape (hex strings)
/// so the ingester owns the ABI-decode step.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLog {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    #[serde(rename = "blockNumber")]
    pub block_number: String,
    #[serde(rename = "transactionHash")]
    pub transaction_hash: String,
}

/// Result of `ots_getContractCreator`; `None` when the node doesn't support
/// the Otterscan extension or the address wasn't contract-created.
#[derive(Debug, Clone, Deserialize)]
pub struct ContractCreator {
    pub creator: String,
    #[serde(rename = "hash")]
    pub creation_hash: String,
}

/// Stage-1 token metadata output, still in raw hex/ASCII form before the
/// ingester's sentinel-downgrade rules apply.
#[derive(Debug, Clone, Default)]
pub struct TokenMetadataRaw {
    pub name_hex: Option<String>,
    pub symbol_hex: Option<String>,
    pub decimals_hex: Option<String>,
    pub creator: Option<ContractCreator>,
}
