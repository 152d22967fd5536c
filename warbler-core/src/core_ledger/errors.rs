//! Error types for ledger operations

use super::types::Identity;
use thiserror::Error;

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors surfaced by ledger operations
///
/// A failed call leaves the ledger exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Zero page size, self-targeting operation, or missing caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The caller holds no operator grant from the principal
    #[error("Unauthorized: {operator} is not an operator for {principal}")]
    Unauthorized {
        principal: Identity,
        operator: Identity,
    },

    /// Query against an entity with no records
    #[error("Not found: {0}")]
    NotFound(String),

    /// Snapshot contents violate a ledger invariant
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Snapshot file I/O failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Snapshot encoding failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    /// Argument, authorization and lookup failures are terminal
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Io(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(e: std::io::Error) -> Self {
        LedgerError::Io(e.to_string())
    }
}

impl From<bincode::Error> for LedgerError {
    fn from(e: bincode::Error) -> Self {
        LedgerError::Serialization(e.to_string())
    }
}
