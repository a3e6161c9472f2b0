//! Error types for ledger operations.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The ledger file does not exist at the given path.
    #[error("metadata ledger not found: {0}")]
    MetadataMissing(PathBuf),

    /// No line of the ledger yielded a parseable gamma value.
    #[error("no gamma value found in metadata ledger: {0}")]
    GammaNotFound(PathBuf),

    /// A details block field could not be parsed.
    #[error("malformed ledger field {key}: {value:?}")]
    MalformedField {
        /// Field key.
        key: String,
        /// Raw field value.
        value: String,
    },

    /// I/O failure while reading or appending the ledger.
    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
