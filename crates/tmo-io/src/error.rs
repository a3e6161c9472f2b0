//! Error types for raster I/O.

use thiserror::Error;

/// Error type for raster store operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// File extension maps to no known encoder/decoder.
    #[error("unsupported raster extension: {0:?}")]
    UnsupportedExtension(String),

    /// Decoder failure (corrupt file, unreadable container).
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoder failure or an encode request the format cannot carry.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Buffer-layer failure (shape mismatch, unsupported sample depth).
    #[error(transparent)]
    Core(#[from] tmo_core::Error),

    /// Ledger failure while persisting or reading raster details.
    #[error(transparent)]
    Ledger(#[from] tmo_ledger::LedgerError),

    /// Underlying file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for raster store operations.
pub type IoResult<T> = Result<T, IoError>;
