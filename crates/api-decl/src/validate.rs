use thiserror::Error;

/// A pre-dispatch validation failure, always surfaced as `-32602` with a
/// human message (spec.md §6/§7) — never logged at error level, since it's
/// the caller's fault, not the system's.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn require_chain_id(chain_id: u64) -> Result<(), ValidationError> {
    if chain_id == 0 {
        return Err(ValidationError::new("chain_id is required and must be non-zero"));
    }
    Ok(())
}
