//! # tmo-ledger
//!
//! The metadata bridge of the tone-mapping toolbox: an append-only,
//! human-readable ledger of operator usage plus a one-shot block of raster
//! facts, and the parsers that recover facts from it.
//!
//! - [`UsageRecord`] - one logged operator call/construction
//! - [`RasterDetails`] - driver, size, bands, projection, geotransform
//! - [`Ledger`] - file handle: write details once, append records
//! - [`recover_gamma`] - pull a previously logged gamma back out
//!
//! The text layout is a fixed interchange format shared with the toolbox's
//! other front-ends (see [`record`]); readers here are tolerant of extra
//! fields, missing fields and duplicate keys.
//!
//! ## Role in the pipeline
//!
//! Operators in `tmo-ops` take their parameters explicitly; the ledger is
//! an export and recovery channel, not their source of truth. The single
//! operator-facing read path is [`recover_gamma`], which the inverse gamma
//! operator uses to reconstruct the gamma of a prior forward pass, with
//! [`GammaSelection`] making the multiple-entries case an explicit caller
//! choice.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod details;
mod error;
pub mod ledger;
pub mod record;

pub use details::{RasterDetails, IDENTITY_GEOTRANSFORM, NO_PROJECTION};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{recover_gamma, GammaSelection, Ledger};
pub use record::{parse_records, RecordKind, UsageRecord};
