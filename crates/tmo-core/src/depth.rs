//! Sample depth classes and the [`Sample`] trait.
//!
//! Every band carries an originating depth class which fixes its native
//! range convention:
//!
//! - [`SampleDepth::U8`]  - 8-bit unsigned, 0..=255
//! - [`SampleDepth::U16`] - 16-bit unsigned, 0..=65535
//! - [`SampleDepth::F32`] - floating point, normalized to [0, 1]
//!
//! Tone-mapping operators use the tag to normalize into [0, 1] before the
//! pixel transform and to re-encode afterwards. The tag travels with the
//! band so a forward/inverse pair can reconstruct a valid image.
//!
//! # Example
//!
//! ```rust
//! use tmo_core::{Sample, SampleDepth};
//!
//! assert_eq!(<u16 as Sample>::DEPTH, SampleDepth::U16);
//! assert_eq!(SampleDepth::U16.peak(), 65535.0);
//! assert_eq!(u8::encode_normalized(0.5), 127); // clamp + truncate
//! ```

use std::fmt;

/// Originating sample-depth class of a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleDepth {
    /// 8-bit unsigned samples, native range 0..=255.
    U8,
    /// 16-bit unsigned samples, native range 0..=65535.
    U16,
    /// Floating-point samples, assumed already normalized to [0, 1].
    F32,
}

impl SampleDepth {
    /// Peak value of the native range (the normalization divisor).
    #[inline]
    pub fn peak(self) -> f32 {
        match self {
            Self::U8 => 255.0,
            Self::U16 => 65535.0,
            Self::F32 => 1.0,
        }
    }

    /// Short name as used in metadata ("8-bit", "16-bit", "float").
    pub fn name(self) -> &'static str {
        match self {
            Self::U8 => "8-bit",
            Self::U16 => "16-bit",
            Self::F32 => "float",
        }
    }
}

impl fmt::Display for SampleDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for sample component types (`u8`, `u16`, `f32`).
///
/// Couples a native Rust type to its [`SampleDepth`] class and provides the
/// two conversions every operator needs: widening to `f32` working
/// precision, and encoding a normalized [0, 1] value back to the native
/// range with clamp and truncation.
pub trait Sample: Copy + Send + Sync + PartialOrd + 'static {
    /// Depth class of this sample type.
    const DEPTH: SampleDepth;

    /// Widens to `f32` working precision, keeping the native range.
    fn to_f32(self) -> f32;

    /// Encodes a normalized [0, 1] value to this type's native range.
    ///
    /// Out-of-range input is clamped first; fractional results are
    /// truncated, not rounded (the convention the ledger records assume).
    fn encode_normalized(v: f32) -> Self;
}

impl Sample for u8 {
    const DEPTH: SampleDepth = SampleDepth::U8;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn encode_normalized(v: f32) -> Self {
        (v * 255.0).clamp(0.0, 255.0) as u8
    }
}

impl Sample for u16 {
    const DEPTH: SampleDepth = SampleDepth::U16;

    #[inline]
    fn to_f32(self) -> f32 {
        self as f32
    }

    #[inline]
    fn encode_normalized(v: f32) -> Self {
        (v * 65535.0).clamp(0.0, 65535.0) as u16
    }
}

impl Sample for f32 {
    const DEPTH: SampleDepth = SampleDepth::F32;

    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn encode_normalized(v: f32) -> Self {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peaks() {
        assert_eq!(SampleDepth::U8.peak(), 255.0);
        assert_eq!(SampleDepth::U16.peak(), 65535.0);
        assert_eq!(SampleDepth::F32.peak(), 1.0);
    }

    #[test]
    fn test_encode_truncates() {
        // 0.9999 * 255 = 254.97 -> 254, truncation not rounding
        assert_eq!(u8::encode_normalized(0.9999), 254);
        assert_eq!(u8::encode_normalized(1.0), 255);
        assert_eq!(u16::encode_normalized(1.0), 65535);
    }

    #[test]
    fn test_encode_clamps() {
        assert_eq!(u8::encode_normalized(-0.5), 0);
        assert_eq!(u8::encode_normalized(2.0), 255);
        assert_eq!(u16::encode_normalized(1.5), 65535);
        assert_eq!(f32::encode_normalized(1.5), 1.0);
    }

    #[test]
    fn test_depth_names() {
        assert_eq!(SampleDepth::U8.to_string(), "8-bit");
        assert_eq!(SampleDepth::U16.to_string(), "16-bit");
        assert_eq!(SampleDepth::F32.to_string(), "float");
    }
}
