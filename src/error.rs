//! Error types for retail_ledger

use std::fmt;

/// Unified error type for ledger operations
#[derive(Debug)]
pub enum LedgerError {
    /// Malformed or missing required input (empty name, non-positive price, ...)
    Validation(String),
    /// A reference did not resolve to an existing record
    NotFound(String),
    /// A sale asked for more units than the product currently has
    InsufficientStock {
        product: String,
        requested: i64,
        available: i64,
    },
    /// CSV encode/decode failure
    Csv(csv::Error),
    /// File I/O failure
    Io(std::io::Error),
    /// Another process holds the data directory lock
    StoreLocked(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Validation(msg) => write!(f, "Validation error: {}", msg),
            LedgerError::NotFound(what) => write!(f, "Not found: {}", what),
            LedgerError::InsufficientStock {
                product,
                requested,
                available,
            } => write!(
                f,
                "Insufficient stock for '{}': requested {}, available {}",
                product, requested, available
            ),
            LedgerError::Csv(e) => write!(f, "CSV error: {}", e),
            LedgerError::Io(e) => write!(f, "I/O error: {}", e),
            LedgerError::StoreLocked(path) => {
                write!(f, "Data directory is locked by another process: {}", path)
            }
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::Csv(e) => Some(e),
            LedgerError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        LedgerError::Csv(err)
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err)
    }
}

/// Result alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;
