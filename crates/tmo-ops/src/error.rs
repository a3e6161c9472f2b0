//! Error types for tone-mapping operations.

use thiserror::Error;

/// Error type for tone-mapping operations.
///
/// All variants are deterministic input-validation failures: they abort
/// the current operator call, produce no partial output, and are not worth
/// retrying. Buffer-shape and ledger failures from the lower crates
/// convert in via `#[from]`.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Out-of-contract operator parameter (non-positive gamma, zero sigma,
    /// contrast scaling outside (0, 1], ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A negative sample reached a log-domain transform.
    #[error("invalid sample range: band {band} contains negative value {value}")]
    InvalidSampleRange {
        /// Index of the offending band (0-based).
        band: usize,
        /// The offending sample value.
        value: f32,
    },

    /// A band's observed max equals its min, so the normalization divisor
    /// would be zero. Failing here is the contract: never substitute a
    /// silently wrong result for a division by zero.
    #[error("degenerate range: band {band} is constant after tone mapping")]
    DegenerateRange {
        /// Index of the offending band (0-based).
        band: usize,
    },

    /// Buffer-layer failure (shape mismatch, unsupported depth, ...).
    #[error(transparent)]
    Core(#[from] tmo_core::Error),

    /// Ledger failure (missing file, no recoverable gamma, I/O).
    #[error(transparent)]
    Ledger(#[from] tmo_ledger::LedgerError),
}

/// Result type for tone-mapping operations.
pub type OpsResult<T> = Result<T, OpsError>;
