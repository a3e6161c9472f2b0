//! # tmo-core
//!
//! Core types for HDR tone mapping.
//!
//! This crate provides the foundational types used throughout the toolbox:
//!
//! - [`SampleDepth`], [`Sample`] - sample-depth classes and conversions
//! - [`Band`] - one 2D raster band with a compile-time depth
//! - [`DynBand`] - a band whose depth is resolved at decode time
//! - [`BandStack`] - single-or-batch operator input with preserved arity
//! - [`Error`], [`Result`] - buffer-layer errors
//!
//! ## Design Philosophy
//!
//! The originating sample depth is part of a band's type, so the
//! normalization contract each tone-mapping operator relies on (u8/255,
//! u16/65535, float pass-through) is fixed at compile time. Only the
//! raster-store boundary deals in runtime-tagged [`DynBand`]s.
//!
//! Operators never mutate their input: every transform allocates a new
//! band, which keeps before/after comparison and testing trivial.
//!
//! ## Crate Structure
//!
//! This crate is the foundation and has no internal dependencies:
//!
//! ```text
//! tmo-core (this crate)
//!    ^
//!    |
//!    +-- tmo-ledger (usage records, gamma recovery)
//!    +-- tmo-ops (gamma, inverse gamma, multi-scale operators)
//!    +-- tmo-io (raster read/write boundary)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod band;
pub mod depth;
pub mod error;
pub mod stack;

// Re-exports for convenience
pub use band::{Band, DynBand};
pub use depth::{Sample, SampleDepth};
pub use error::{Error, Result};
pub use stack::BandStack;
