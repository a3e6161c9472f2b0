//! Band buffer types.
//!
//! This module provides the pixel-buffer containers:
//! - [`Band`] - one 2D raster band, owned, row-major
//! - [`DynBand`] - a band with its depth class resolved at runtime
//!
//! # Design
//!
//! [`Band`] is generic over its sample type (`T: Sample`), so the depth
//! class is part of the type: you cannot hand a 16-bit band to code that
//! promised to produce 8-bit output. Decoders, which only learn the depth
//! at read time, produce [`DynBand`] and callers match on it once at the
//! boundary.
//!
//! # Memory Layout
//!
//! Samples are stored row-major, top-to-bottom, one component per cell:
//!
//! ```text
//! Memory: [s s s s ...]  <- Row 0
//!         [s s s s ...]  <- Row 1
//! ```
//!
//! Multi-band images are ordered sequences of [`Band`]s (planar, band index
//! preserved), never interleaved.
//!
//! # Usage
//!
//! ```rust
//! use tmo_core::Band;
//!
//! let band: Band<u8> = Band::from_vec(vec![0, 64, 128, 255], 2, 2).unwrap();
//! assert_eq!(band.dims(), (2, 2));
//! assert_eq!(band.get(1, 1), 255);
//! ```

use crate::{Error, Result, Sample, SampleDepth};

/// One 2D raster band with a compile-time sample depth.
///
/// Operators consume bands read-only and allocate new bands for their
/// output; an input band is never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Band<T: Sample> {
    /// Sample data, row-major.
    data: Vec<T>,
    /// Band width in samples.
    width: usize,
    /// Band height in samples.
    height: usize,
}

impl<T: Sample> Band<T> {
    /// Creates a band from a row-major sample buffer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if width or height is zero, or the
    /// buffer length doesn't equal `width * height`.
    pub fn from_vec(data: Vec<T>, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "zero extent"));
        }
        let expected = width
            .checked_mul(height)
            .ok_or_else(|| Error::invalid_dimensions(width, height, "size overflow"))?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} samples, got {}", expected, data.len()),
            ));
        }
        Ok(Self { data, width, height })
    }

    /// Creates a band filled with one value.
    pub fn constant(value: T, width: usize, height: usize) -> Result<Self> {
        Self::from_vec(vec![value; width.saturating_mul(height)], width, height)
    }

    /// Creates a band by evaluating `f(x, y)` for every sample.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Result<Self> {
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::from_vec(data, width, height)
    }

    /// Band width in samples.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Band height in samples.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height) pair.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Originating depth class of this band.
    #[inline]
    pub fn depth(&self) -> SampleDepth {
        T::DEPTH
    }

    /// Borrows the raw row-major sample slice.
    #[inline]
    pub fn samples(&self) -> &[T] {
        &self.data
    }

    /// Sample at (x, y). Panics if out of bounds (debug-style accessor).
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }

    /// Consumes the band and returns the raw buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Widens every sample to `f32`, keeping the native range.
    pub fn to_f32_raw(&self) -> Vec<f32> {
        self.data.iter().map(|s| s.to_f32()).collect()
    }

    /// Widens every sample to `f32` and divides by the depth peak,
    /// producing values in [0, 1] for integer depths.
    pub fn to_f32_normalized(&self) -> Vec<f32> {
        let peak = T::DEPTH.peak();
        self.data.iter().map(|s| s.to_f32() / peak).collect()
    }

    /// Observed (min, max) over all samples in native range.
    ///
    /// NaN samples in float bands are ignored; an all-NaN band reports
    /// (inf, -inf), which callers treat as degenerate.
    pub fn min_max(&self) -> (f32, f32) {
        let mut lo = f32::INFINITY;
        let mut hi = f32::NEG_INFINITY;
        for s in &self.data {
            let v = s.to_f32();
            if v < lo {
                lo = v;
            }
            if v > hi {
                hi = v;
            }
        }
        (lo, hi)
    }
}

/// A band whose depth class is only known at runtime.
///
/// Produced by the raster store; pattern-match once at the boundary and
/// continue with the typed [`Band`]. Sample formats outside the three
/// depth classes never reach this type - decoders reject them with
/// [`Error::UnsupportedSampleDepth`].
#[derive(Debug, Clone, PartialEq)]
pub enum DynBand {
    /// 8-bit unsigned band.
    U8(Band<u8>),
    /// 16-bit unsigned band.
    U16(Band<u16>),
    /// Floating-point band, normalized to [0, 1].
    F32(Band<f32>),
}

impl DynBand {
    /// Depth class of the wrapped band.
    pub fn depth(&self) -> SampleDepth {
        match self {
            Self::U8(_) => SampleDepth::U8,
            Self::U16(_) => SampleDepth::U16,
            Self::F32(_) => SampleDepth::F32,
        }
    }

    /// (width, height) of the wrapped band.
    pub fn dims(&self) -> (usize, usize) {
        match self {
            Self::U8(b) => b.dims(),
            Self::U16(b) => b.dims(),
            Self::F32(b) => b.dims(),
        }
    }

    /// Unwraps an 8-bit band.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedSampleDepth`] if the band has another depth.
    pub fn into_u8(self) -> Result<Band<u8>> {
        match self {
            Self::U8(b) => Ok(b),
            other => Err(Error::unsupported_sample_depth(format!(
                "expected 8-bit band, got {}",
                other.depth()
            ))),
        }
    }

    /// Unwraps a 16-bit band.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedSampleDepth`] if the band has another depth.
    pub fn into_u16(self) -> Result<Band<u16>> {
        match self {
            Self::U16(b) => Ok(b),
            other => Err(Error::unsupported_sample_depth(format!(
                "expected 16-bit band, got {}",
                other.depth()
            ))),
        }
    }
}

impl From<Band<u8>> for DynBand {
    fn from(b: Band<u8>) -> Self {
        Self::U8(b)
    }
}

impl From<Band<u16>> for DynBand {
    fn from(b: Band<u16>) -> Self {
        Self::U16(b)
    }
}

impl From<Band<f32>> for DynBand {
    fn from(b: Band<f32>) -> Self {
        Self::F32(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_checks_len() {
        assert!(Band::from_vec(vec![0u8; 5], 2, 2).is_err());
        assert!(Band::from_vec(vec![0u8; 4], 2, 2).is_ok());
        assert!(Band::<u8>::from_vec(vec![], 0, 4).is_err());
    }

    #[test]
    fn test_get_row_major() {
        let band = Band::from_vec(vec![1u8, 2, 3, 4, 5, 6], 3, 2).unwrap();
        assert_eq!(band.get(0, 0), 1);
        assert_eq!(band.get(2, 0), 3);
        assert_eq!(band.get(0, 1), 4);
        assert_eq!(band.get(2, 1), 6);
    }

    #[test]
    fn test_normalized() {
        let band = Band::from_vec(vec![0u8, 255], 2, 1).unwrap();
        let norm = band.to_f32_normalized();
        assert_eq!(norm, vec![0.0, 1.0]);

        let band16 = Band::from_vec(vec![0u16, 65535], 2, 1).unwrap();
        assert_eq!(band16.to_f32_normalized(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_min_max() {
        let band = Band::from_vec(vec![3u8, 1, 200, 7], 2, 2).unwrap();
        assert_eq!(band.min_max(), (1.0, 200.0));
    }

    #[test]
    fn test_dyn_band_roundtrip() {
        let band = Band::constant(42u8, 4, 4).unwrap();
        let dyn_band: DynBand = band.clone().into();
        assert_eq!(dyn_band.depth(), SampleDepth::U8);
        assert_eq!(dyn_band.dims(), (4, 4));
        assert_eq!(dyn_band.into_u8().unwrap(), band);
    }

    #[test]
    fn test_dyn_band_wrong_depth() {
        let dyn_band: DynBand = Band::constant(0u16, 2, 2).unwrap().into();
        let err = dyn_band.into_u8().unwrap_err();
        assert!(matches!(err, Error::UnsupportedSampleDepth(_)));
    }
}
