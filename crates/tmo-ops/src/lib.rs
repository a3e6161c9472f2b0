//! # tmo-ops
//!
//! Tone-mapping operators for HDR->LDR conversion.
//!
//! Three interchangeable strategies over [`tmo_core::BandStack`] inputs:
//!
//! - [`GammaTmo`] - global power-law compression, narrows to 8-bit
//! - [`InverseGammaTmo`] - re-expands to 16-bit using an explicit or
//!   ledger-recovered gamma
//! - [`MantiukTmo`] - local-contrast operator: log-domain base/detail
//!   decomposition via Gaussian low-pass, independent rescaling,
//!   recomposition and per-band range stretch
//!
//! Every operator is pure apart from the optional `*_logged` variants,
//! which append one usage record to a [`tmo_ledger::Ledger`]. Inputs are
//! never mutated; arity (single band vs batch) is preserved.
//!
//! # Example
//!
//! ```rust
//! use tmo_core::{Band, BandStack};
//! use tmo_ops::{GammaTmo, InverseGammaTmo};
//!
//! let hdr = BandStack::single(Band::constant(40000u16, 8, 8).unwrap());
//! let ldr = GammaTmo::new(2.2)?.apply(&hdr)?;
//! let back = InverseGammaTmo::new(2.2)?.apply(&ldr)?;
//! assert_eq!(back.dims().unwrap(), (8, 8));
//! # Ok::<(), tmo_ops::OpsError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - map over the bands of a batch with Rayon

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod batch;
mod error;
pub mod gamma;
pub mod gamma_inverse;
pub mod gaussian;
pub mod mantiuk;

pub use batch::try_map_indexed;
pub use error::{OpsError, OpsResult};
pub use gamma::{GammaTmo, DEFAULT_GAMMA};
pub use gamma_inverse::InverseGammaTmo;
pub use mantiuk::{MantiukTmo, DEFAULT_SIGMA};
