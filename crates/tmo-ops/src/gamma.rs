//! Forward gamma tone-mapping operator.
//!
//! Power-law compression `x^(1/gamma)` with bit-depth-aware normalization,
//! always narrowing to displayable 8-bit output. The narrowing is the
//! point of the operator, not an accident: 16-bit and float HDR input
//! comes out as LDR u8, and the matching inverse operator re-expands to
//! 16-bit using the gamma this operator logs.
//!
//! # Example
//!
//! ```rust
//! use tmo_core::{Band, BandStack};
//! use tmo_ops::GammaTmo;
//!
//! let tmo = GammaTmo::new(2.2).unwrap();
//! let input = BandStack::single(Band::constant(32768u16, 8, 8).unwrap());
//! let output = tmo.apply(&input).unwrap();
//! assert_eq!(output.dims().unwrap(), (8, 8));
//! ```

use crate::{try_map_indexed, OpsError, OpsResult};
use tmo_core::{Band, BandStack, Sample};
use tmo_ledger::{Ledger, UsageRecord};
use tracing::{debug, trace};

/// Conventional display gamma.
pub const DEFAULT_GAMMA: f32 = 2.2;

/// Forward gamma tone-mapping operator.
///
/// Stateless across calls: each [`apply`](Self::apply) is a pure function
/// of the input stack and the captured gamma.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaTmo {
    gamma: f32,
}

impl GammaTmo {
    /// Creates the operator with the given gamma.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] unless gamma is finite and > 0.
    pub fn new(gamma: f32) -> OpsResult<Self> {
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(OpsError::InvalidParameter(format!(
                "gamma must be finite and > 0, got {gamma}"
            )));
        }
        Ok(Self { gamma })
    }

    /// The captured gamma value.
    #[inline]
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Applies gamma compression to every band, narrowing to 8-bit.
    ///
    /// Per band: normalize by the depth tag's peak (u8/255, u16/65535,
    /// float pass-through), compute `x^(1/gamma)`, rescale to [0, 255],
    /// clamp and truncate. A single-band input yields a single-band
    /// output; a batch yields a batch in the same order.
    ///
    /// # Errors
    ///
    /// [`OpsError::Core`] if the stack is empty or its bands disagree in
    /// shape (checked before any pixel work).
    pub fn apply<T: Sample>(&self, input: &BandStack<T>) -> OpsResult<BandStack<u8>> {
        input.ensure_uniform_dims().map_err(OpsError::from)?;
        trace!(gamma = self.gamma, bands = input.len(), "gamma forward");

        let exponent = 1.0 / self.gamma;
        try_map_indexed(input, |_, band| {
            let out: Vec<u8> = band
                .to_f32_normalized()
                .into_iter()
                .map(|x| u8::encode_normalized(compress(x, exponent)))
                .collect();
            Ok(Band::from_vec(out, band.width(), band.height())?)
        })
    }

    /// [`apply`](Self::apply), then appends one usage record (operator
    /// name, gamma, input and output shapes) to the ledger.
    pub fn apply_logged<T: Sample>(
        &self,
        input: &BandStack<T>,
        ledger: &Ledger,
    ) -> OpsResult<BandStack<u8>> {
        let output = self.apply(input)?;
        debug!(gamma = self.gamma, path = %ledger.path().display(), "logging gamma forward");
        ledger.append(
            &UsageRecord::function("apply_gamma")
                .shapes("input_shapes", &input.shapes())
                .param("gamma", self.gamma)
                .shapes("output_shapes", &output.shapes()),
        )?;
        Ok(output)
    }
}

impl Default for GammaTmo {
    fn default() -> Self {
        Self { gamma: DEFAULT_GAMMA }
    }
}

/// `x^exponent` on a normalized sample; non-positive input maps to 0 so a
/// float band with stray negative noise can't produce NaN.
#[inline]
fn compress(x: f32, exponent: f32) -> f32 {
    if x <= 0.0 {
        0.0
    } else {
        x.powf(exponent)
    }
}
