//! Error types for tmo-core operations.
//!
//! The [`Error`] enum covers the failure modes of the buffer layer:
//! - Construction with inconsistent dimensions
//! - Mixing bands of different shapes in one stack
//! - Sample formats outside the supported depth classes
//!
//! Operator-level failures (bad parameters, degenerate ranges) live in
//! `tmo-ops`; ledger failures live in `tmo-ledger`. Both convert from this
//! type where buffer validation happens inside an operator.
//!
//! # Usage
//!
//! ```rust
//! use tmo_core::{Error, Result};
//!
//! fn check_shape(len: usize, width: usize, height: usize) -> Result<()> {
//!     if len != width * height {
//!         return Err(Error::invalid_dimensions(width, height, "buffer length mismatch"));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the buffer/data-model layer.
///
/// This enum uses [`thiserror`] for automatic [`std::error::Error`] and
/// [`std::fmt::Display`] implementations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid band dimensions.
    ///
    /// Returned when width or height is zero, or the sample buffer length
    /// doesn't match `width * height`.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Bands within one stack (or across an input pairing) disagree in shape.
    ///
    /// Raised before any pixel computation starts.
    #[error("dimension mismatch: band {index} is {got_width}x{got_height}, expected {want_width}x{want_height}")]
    DimensionMismatch {
        /// Index of the offending band (0-based)
        index: usize,
        /// Offending band width
        got_width: usize,
        /// Offending band height
        got_height: usize,
        /// Expected width (from the first band)
        want_width: usize,
        /// Expected height (from the first band)
        want_height: usize,
    },

    /// A sample format doesn't match any supported depth class.
    ///
    /// The supported classes are 8-bit unsigned, 16-bit unsigned and
    /// normalized floating point. Anything else a decoder hands us
    /// (signed integers, f64 planes, palette data) ends up here.
    #[error("unsupported sample depth: {0}")]
    UnsupportedSampleDepth(String),

    /// A stack was constructed with zero bands.
    #[error("empty band stack")]
    EmptyStack,
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: usize, height: usize, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(index: usize, got: (usize, usize), want: (usize, usize)) -> Self {
        Self::DimensionMismatch {
            index,
            got_width: got.0,
            got_height: got.1,
            want_width: want.0,
            want_height: want.1,
        }
    }

    /// Creates an [`Error::UnsupportedSampleDepth`] error.
    #[inline]
    pub fn unsupported_sample_depth(format: impl Into<String>) -> Self {
        Self::UnsupportedSampleDepth(format.into())
    }

    /// Returns `true` if this is a shape-related error.
    #[inline]
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDimensions { .. } | Self::DimensionMismatch { .. } | Self::EmptyStack
        )
    }
}
