use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to read csv at {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("malformed csv row: {0}")]
    Csv(#[from] csv::Error),
}
