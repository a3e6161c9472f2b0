//! # tmo-io
//!
//! Raster store boundary for the tone-mapping toolbox.
//!
//! Reads and writes the pixel containers the operators work on. Files
//! come in as ordered planar [`tmo_core::DynBand`]s at their native
//! depth plus a [`tmo_ledger::RasterDetails`] block, and go back out
//! from planar bands with the extension picking the encoder.
//!
//! # Supported Formats
//!
//! | Format | Read | Write |
//! |--------|------|-------|
//! | TIFF   | u8 / u16 / f32 | u8 / u16, LZW |
//! | PNG    | u8 / u16 | u8 / u16 |
//! | JPEG   | u8 | u8 (u16 narrowed) |
//!
//! # Example
//!
//! ```rust,no_run
//! use tmo_io::{read_raster, write_raster};
//!
//! let (bands, details) = read_raster("scene.tif".as_ref())?;
//! println!("{} bands of {:?}", details.bands, details.size);
//! write_raster("copy.png".as_ref(), &bands)?;
//! # Ok::<(), tmo_io::IoError>(())
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod read;
mod write;

pub use error::{IoError, IoResult};
pub use read::read_raster;
pub use write::write_raster;
