use serde::Deserialize;

use indexer_common::ChainDescriptor;

/// One entry of `[[chains]]`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ChainConfig {
    #[serde(rename = "chainID")]
    pub chain_id: u64,
    pub name: String,
    #[serde(rename = "shortName")]
    pub short_name: String,
    #[serde(rename = "explorerURL")]
    pub explorer_url: String,
    #[serde(rename = "routerV2Address")]
    pub router_v2_address: String,
    #[serde(rename = "factoryV2Address")]
    pub factory_v2_address: String,
    #[serde(rename = "routerV3Address")]
    pub router_v3_address: String,
    #[serde(rename = "factoryV3Address")]
    pub factory_v3_address: String,
    #[serde(rename = "rpcURL")]
    pub rpc_url: String,
    #[serde(rename = "blockDuration")]
    pub block_duration: u64,
}

impl From<&ChainConfig> for ChainDescriptor {
    fn from(c: &ChainConfig) -> Self {
        ChainDescriptor {
            chain_id: c.chain_id,
            name: c.name.clone(),
            short_name: c.short_name.clone(),
            explorer_url: c.explorer_url.clone(),
            router_v2: c.router_v2_address.clone(),
            factory_v2: c.factory_v2_address.clone(),
            router_v3: c.router_v3_address.clone(),
            factory_v3: c.factory_v3_address.clone(),
            block_duration: c.block_duration,
            rpc_url: c.rpc_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthProviderKind {
    Sql,
    Memory,
    Noauth,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthKeyType {
    Uuid,
    Hex16,
    Hex32,
    Hex64,
    Hex128,
    Hex256,
}

impl Default for AuthKeyType {
    fn default() -> Self {
        AuthKeyType::Hex64
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitStrategyKind {
    Ip,
    Key,
    None,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_auth_provider() -> AuthProviderKind {
    AuthProviderKind::Noauth
}

fn default_auth_key_type() -> AuthKeyType {
    AuthKeyType::Hex64
}

fn default_auth_default_expirary() -> u64 {
    0
}

fn default_rate_limit_strategy() -> RateLimitStrategyKind {
    RateLimitStrategyKind::None
}

fn default_rate_limit_requests() -> u32 {
    500
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_auth_provider")]
    pub auth_provider: AuthProviderKind,
    #[serde(default = "default_auth_key_type")]
    pub auth_key_type: AuthKeyType,
    #[serde(default = "default_auth_default_expirary")]
    pub auth_default_expirary: u64,
    #[serde(default)]
    pub auth_master_key: String,
    #[serde(default = "default_rate_limit_strategy")]
    pub rate_limit_strategy: RateLimitStrategyKind,
    #[serde(default = "default_rate_limit_requests")]
    pub rate_limit_requests: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auth_provider: default_auth_provider(),
            auth_key_type: default_auth_key_type(),
            auth_default_expirary: default_auth_default_expirary(),
            auth_master_key: String::new(),
            rate_limit_strategy: default_rate_limit_strategy(),
            rate_limit_requests: default_rate_limit_requests(),
        }
    }
}

fn default_pairs_batch_concurrency() -> usize {
    2
}
fn default_pairs_batch_size() -> usize {
    100
}
fn default_pairs_block_range() -> u64 {
    200
}
fn default_tokens_batch_concurrency() -> usize {
    2
}
fn default_tokens_batch_size() -> usize {
    100
}
fn default_bt_batch_concurrency() -> usize {
    2
}
fn default_bt_batch_size() -> usize {
    100
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncPairsConfig {
    #[serde(default = "default_pairs_batch_concurrency")]
    pub batch_concurrency: usize,
    #[serde(default = "default_pairs_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_pairs_block_range")]
    pub block_range: u64,
}

impl Default for SyncPairsConfig {
    fn default() -> Self {
        Self {
            batch_concurrency: default_pairs_batch_concurrency(),
            batch_size: default_pairs_batch_size(),
            block_range: default_pairs_block_range(),
        }
    }
}

impl SyncPairsConfig {
    /// `block_range` is clamped to `200` whenever it exceeds `1000` — an
    /// implementation quirk of the original carried over as-is (spec.md
    /// §9 Open Questions).
    pub fn effective_block_range(&self) -> u64 {
        if self.block_range > 1000 {
            200
        } else {
            self.block_range
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct SyncTokensConfig {
    #[serde(default = "default_tokens_batch_concurrency")]
    pub batch_concurrency: usize,
    #[serde(default = "default_tokens_batch_size")]
    pub batch_size: usize,
}

impl Default for SyncTokensConfig {
    fn default() -> Self {
        Self {
            batch_concurrency: default_tokens_batch_concurrency(),
            batch_size: default_tokens_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct SyncBlockTimestampsConfig {
    #[serde(default = "default_bt_batch_concurrency")]
    pub batch_concurrency: usize,
    #[serde(default = "default_bt_batch_size")]
    pub batch_size: usize,
}

impl Default for SyncBlockTimestampsConfig {
    fn default() -> Self {
        Self {
            batch_concurrency: default_bt_batch_concurrency(),
            batch_size: default_bt_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    #[serde(default, rename = "pairs")]
    pub pairs: SyncPairsConfig,
    #[serde(default, rename = "tokens")]
    pub tokens: SyncTokensConfig,
    #[serde(default, rename = "blockTimestamps")]
    pub block_timestamps: SyncBlockTimestampsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PostgresConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: String,
    pub sslmode: String,
    pub name: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            host: "localhost".to_string(),
            port: "5432".to_string(),
            sslmode: "disable".to_string(),
            name: "indexer".to_string(),
        }
    }
}

impl PostgresConfig {
    /// Builds a `sqlx`-compatible connection string against `database`,
    /// keeping every other field as configured — mirrors
    /// `original_source/storage/sql.go`'s DSN assembly, just for `chain =
    /// v.ShortName` overrides of the base `[storage.postgres].name`.
    pub fn connection_url(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, database, self.sslmode
        )
    }
}

#[cfg(test)]
mod postgres_config_tests {
    use super::*;

    #[test]
    fn connection_url_overrides_only_the_database_name() {
        let cfg = PostgresConfig {
            user: "u".to_string(),
            password: "p".to_string(),
            host: "db.local".to_string(),
            port: "5432".to_string(),
            sslmode: "disable".to_string(),
            name: "indexer".to_string(),
        };
        assert_eq!(
            cfg.connection_url("eth-main"),
            "postgres://u:p@db.local:5432/eth-main?sslmode=disable"
        );
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    #[serde(default, rename = "postgres")]
    pub postgres: PostgresConfig,
}
