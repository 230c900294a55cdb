mod error;
mod template;
mod types;

pub use error::ConfigError;
pub use types::{
    ApiConfig, AuthKeyType, AuthProviderKind, ChainConfig, PostgresConfig, RateLimitStrategyKind,
    StorageConfig, SyncBlockTimestampsConfig, SyncConfig, SyncPairsConfig, SyncTokensConfig,
};

use std::path::Path;

use serde::Deserialize;

/// The root of `indexer.toml`. Mirrors the original's flat `Config` struct
/// (`config/config.go`) but groups chains under `[[chains]]` as spec.md §6
/// describes.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default, rename = "chains")]
    pub chains: Vec<ChainConfig>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Loads `path`, writing the embedded default template first if the
    /// file doesn't exist yet (matches `config.Parse` in the original:
    /// write-then-reread, not write-then-return-defaults-in-memory).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            std::fs::write(path, template::DEFAULT_CONFIG_TOML)
                .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
            tracing::warn!(path = %path.display(), "config file missing, wrote default template");
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(ConfigError::Parse)
    }
}
