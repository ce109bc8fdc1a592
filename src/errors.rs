use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid reference: {0}")]
    InvalidRef(String),
    #[error("Invalid month name: `{0}`")]
    InvalidMonth(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Store error: {0}")]
    Store(String),
}
