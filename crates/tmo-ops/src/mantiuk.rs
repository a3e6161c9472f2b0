//! Multi-scale (Mantiuk-style) local-contrast tone-mapping operator.
//!
//! The algorithmic core of the toolbox. Per band:
//!
//! 1. widen to f32 working precision
//! 2. log-domain luminance: `ln(1 + x)` (rejects negative input)
//! 3. base/detail decomposition: Gaussian low-pass -> base,
//!    residual -> details
//! 4. compress the base by `contrast_scaling`, amplify the details by
//!    `detail_amplification`
//! 5. recompose and invert the log mapping with `exp(x) - 1`
//! 6. stretch to [0, 255] with the band's own min/max, truncate to u8
//!
//! Step 6 is per-band on purpose: each band of a color composite is
//! stretched against its own range, so joint contrast across bands is not
//! preserved. Callers wanting joint normalization must do it themselves;
//! this operator will not silently change the published behavior.
//!
//! # Example
//!
//! ```rust
//! use tmo_core::{Band, BandStack};
//! use tmo_ops::MantiukTmo;
//!
//! let tmo = MantiukTmo::new(0.8, 1.2).unwrap().with_sigma(2.0).unwrap();
//! let ramp = Band::from_fn(16, 16, |x, _| (x * 17) as u16).unwrap();
//! let ldr = tmo.tone_map(&BandStack::single(ramp)).unwrap();
//! assert_eq!(ldr.dims().unwrap(), (16, 16));
//! ```

use crate::gaussian::gaussian_blur;
use crate::{try_map_indexed, OpsError, OpsResult};
use tmo_core::{Band, BandStack, Sample};
use tmo_ledger::{Ledger, UsageRecord};
use tracing::{debug, trace};

/// Default decomposition radius (Gaussian sigma) in grid units.
pub const DEFAULT_SIGMA: f32 = 30.0;

/// Multi-scale tone-mapping operator with base/detail separation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MantiukTmo {
    contrast_scaling: f32,
    detail_amplification: f32,
    sigma: f32,
}

impl MantiukTmo {
    /// Creates the operator.
    ///
    /// # Arguments
    ///
    /// * `contrast_scaling` - base-layer factor, must lie in (0, 1]
    /// * `detail_amplification` - detail-layer factor, must be >= 1
    ///
    /// The decomposition radius defaults to [`DEFAULT_SIGMA`]; tune it
    /// with [`with_sigma`](Self::with_sigma).
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] for factors outside those ranges.
    pub fn new(contrast_scaling: f32, detail_amplification: f32) -> OpsResult<Self> {
        if !contrast_scaling.is_finite() || contrast_scaling <= 0.0 || contrast_scaling > 1.0 {
            return Err(OpsError::InvalidParameter(format!(
                "contrast_scaling must lie in (0, 1], got {contrast_scaling}"
            )));
        }
        if !detail_amplification.is_finite() || detail_amplification < 1.0 {
            return Err(OpsError::InvalidParameter(format!(
                "detail_amplification must be >= 1, got {detail_amplification}"
            )));
        }
        Ok(Self {
            contrast_scaling,
            detail_amplification,
            sigma: DEFAULT_SIGMA,
        })
    }

    /// Sets the base/detail cutoff (Gaussian standard deviation).
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] unless sigma is finite and > 0.
    pub fn with_sigma(mut self, sigma: f32) -> OpsResult<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "sigma must be finite and > 0, got {sigma}"
            )));
        }
        self.sigma = sigma;
        Ok(self)
    }

    /// Base-layer factor.
    #[inline]
    pub fn contrast_scaling(&self) -> f32 {
        self.contrast_scaling
    }

    /// Detail-layer factor.
    #[inline]
    pub fn detail_amplification(&self) -> f32 {
        self.detail_amplification
    }

    /// Decomposition radius.
    #[inline]
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Tone-maps every band independently, producing 8-bit output.
    ///
    /// Bands are processed in parallel under the `parallel` feature; there
    /// is no ordering dependency between them and output order matches
    /// input order. Arity is preserved.
    ///
    /// # Errors
    ///
    /// - [`OpsError::Core`] - empty stack or mismatched band shapes,
    ///   raised before any pixel computation
    /// - [`OpsError::InvalidSampleRange`] - a negative sample reached the
    ///   log transform
    /// - [`OpsError::DegenerateRange`] - a band came out constant, so the
    ///   min/max stretch has a zero divisor
    pub fn tone_map<T: Sample>(&self, input: &BandStack<T>) -> OpsResult<BandStack<u8>> {
        input.ensure_uniform_dims().map_err(OpsError::from)?;
        trace!(
            contrast_scaling = self.contrast_scaling,
            detail_amplification = self.detail_amplification,
            sigma = self.sigma,
            bands = input.len(),
            "multi-scale tone map"
        );

        try_map_indexed(input, |index, band| self.tone_map_band(index, band))
    }

    /// [`tone_map`](Self::tone_map), then appends one usage record with
    /// the shapes and both scaling factors.
    pub fn tone_map_logged<T: Sample>(
        &self,
        input: &BandStack<T>,
        ledger: &Ledger,
    ) -> OpsResult<BandStack<u8>> {
        let output = self.tone_map(input)?;
        debug!(path = %ledger.path().display(), "logging multi-scale tone map");
        ledger.append(
            &UsageRecord::function("tone_map")
                .shapes("input_shapes", &input.shapes())
                .param("contrast_scaling", self.contrast_scaling)
                .param("detail_amplification", self.detail_amplification)
                .param("sigma", self.sigma)
                .shapes("output_shapes", &output.shapes()),
        )?;
        Ok(output)
    }

    fn tone_map_band<T: Sample>(&self, index: usize, band: &Band<T>) -> OpsResult<Band<u8>> {
        let (width, height) = band.dims();
        let raw = band.to_f32_raw();

        if let Some(&value) = raw.iter().find(|v| **v < 0.0) {
            return Err(OpsError::InvalidSampleRange { band: index, value });
        }

        // Log-domain luminance; ln(1 + x) keeps x = 0 regular.
        let log_luminance: Vec<f32> = raw.iter().map(|&x| x.ln_1p()).collect();

        let base = gaussian_blur(&log_luminance, width, height, self.sigma)?;

        // Recompose scaled base + amplified residual, back to linear.
        let tone_mapped: Vec<f32> = log_luminance
            .iter()
            .zip(&base)
            .map(|(&log, &b)| {
                let details = log - b;
                (b * self.contrast_scaling + details * self.detail_amplification).exp_m1()
            })
            .collect();

        let (lo, hi) = min_max(&tone_mapped);
        if !(hi > lo) {
            return Err(OpsError::DegenerateRange { band: index });
        }

        let scale = 1.0 / (hi - lo);
        let out: Vec<u8> = tone_mapped
            .into_iter()
            .map(|v| u8::encode_normalized((v - lo) * scale))
            .collect();
        Ok(Band::from_vec(out, width, height)?)
    }
}

fn min_max(values: &[f32]) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for &v in values {
        if v < lo {
            lo = v;
        }
        if v > hi {
            hi = v;
        }
    }
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmo_core::BandStack;

    fn tmo() -> MantiukTmo {
        MantiukTmo::new(0.8, 1.2).unwrap().with_sigma(2.0).unwrap()
    }

    #[test]
    fn test_parameter_validation() {
        assert!(MantiukTmo::new(0.0, 1.2).is_err());
        assert!(MantiukTmo::new(1.5, 1.2).is_err());
        assert!(MantiukTmo::new(0.8, 0.9).is_err());
        assert!(MantiukTmo::new(f32::NAN, 1.2).is_err());
        assert!(MantiukTmo::new(0.8, f32::INFINITY).is_err());
        assert!(MantiukTmo::new(1.0, 1.0).is_ok());
        assert!(MantiukTmo::new(0.8, 1.2).unwrap().with_sigma(0.0).is_err());
    }

    #[test]
    fn test_default_sigma() {
        let tmo = MantiukTmo::new(0.8, 1.2).unwrap();
        assert_eq!(tmo.sigma(), DEFAULT_SIGMA);
        assert_eq!(tmo.with_sigma(5.0).unwrap().sigma(), 5.0);
    }

    #[test]
    fn test_constant_band_is_degenerate() {
        let input = BandStack::single(Band::constant(128u8, 8, 8).unwrap());
        let err = tmo().tone_map(&input).unwrap_err();
        assert!(matches!(err, OpsError::DegenerateRange { band: 0 }));
    }

    #[test]
    fn test_negative_sample_rejected() {
        let mut data = vec![0.5f32; 16];
        data[7] = -0.25;
        let input = BandStack::single(Band::from_vec(data, 4, 4).unwrap());
        let err = tmo().tone_map(&input).unwrap_err();
        match err {
            OpsError::InvalidSampleRange { band, value } => {
                assert_eq!(band, 0);
                assert_eq!(value, -0.25);
            }
            other => panic!("expected InvalidSampleRange, got {other:?}"),
        }
    }

    #[test]
    fn test_output_spans_full_ldr_range() {
        let ramp = Band::from_fn(32, 32, |x, y| ((x + y) * 100) as u16).unwrap();
        let out = tmo().tone_map(&BandStack::single(ramp)).unwrap().into_bands();
        let (lo, hi) = out[0].min_max();
        // Per-band stretch pins the extremes to the LDR endpoints
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 255.0);
        assert!(out[0].samples().iter().all(|&v| v <= 255));
    }

    #[test]
    fn test_preserves_ordering_of_smooth_gradient() {
        // A smooth, strictly increasing gradient should stay non-decreasing
        // along a row: compression rescales, it must not reorder tones.
        let ramp = Band::from_fn(64, 1, |x, _| (20000 + x * 500) as u16).unwrap();
        let out = tmo().tone_map(&BandStack::single(ramp)).unwrap().into_bands();
        for pair in out[0].samples().windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_batch_and_mismatch() {
        let stack = BandStack::Batch(vec![
            Band::from_fn(8, 8, |x, _| x as u8 * 30).unwrap(),
            Band::from_fn(8, 9, |x, _| x as u8 * 30).unwrap(),
        ]);
        let err = tmo().tone_map(&stack).unwrap_err();
        assert!(matches!(
            err,
            OpsError::Core(tmo_core::Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_detail_amplification_boosts_local_contrast() {
        // Step edge: stronger detail amplification should not reduce the
        // local step after normalization.
        let step = Band::from_fn(16, 16, |x, _| if x < 8 { 1000u16 } else { 30000 }).unwrap();
        let flat = MantiukTmo::new(1.0, 1.0).unwrap().with_sigma(2.0).unwrap();
        let boosted = MantiukTmo::new(1.0, 3.0)
            .unwrap()
            .with_sigma(2.0)
            .unwrap();

        let a = flat.tone_map(&BandStack::single(step.clone())).unwrap().into_bands();
        let b = boosted.tone_map(&BandStack::single(step)).unwrap().into_bands();

        let edge = |band: &Band<u8>| {
            (band.get(8, 8) as i32 - band.get(7, 8) as i32).unsigned_abs()
        };
        assert!(edge(&b[0]) >= edge(&a[0]));
    }
}
