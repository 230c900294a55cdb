use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("parsing config toml: {0}")]
    Parse(#[source] toml::de::Error),
}
