//! Inverse gamma operator.
//!
//! Recovers the pre-gamma signal with `x^gamma` and re-expands to 16-bit
//! output - the algebraic inverse of the forward operator's `x^(1/gamma)`
//! plus 8-bit narrowing. The information the forward pass quantized away
//! stays lost; the round trip is identity within ±1/255 in normalized
//! terms, not exact.
//!
//! The gamma can be supplied directly ([`InverseGammaTmo::new`]) or
//! recovered from the metadata ledger written by a prior forward pass
//! ([`InverseGammaTmo::from_ledger`]).

use crate::{try_map_indexed, OpsError, OpsResult};
use std::path::Path;
use tmo_core::{Band, BandStack, Sample};
use tmo_ledger::{GammaSelection, Ledger, UsageRecord};
use tracing::{debug, trace};

/// Inverse gamma tone-mapping operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseGammaTmo {
    gamma: f32,
}

impl InverseGammaTmo {
    /// Creates the operator with an explicit gamma.
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

    /// Creates the operator from a gamma recovered out of the ledger.
    ///
    /// `selection` decides which entry wins when several forward passes
    /// were logged; [`GammaSelection::First`] reproduces the legacy
    /// top-to-bottom scan.
    ///
    /// # Errors
    ///
    /// [`OpsError::Ledger`] wrapping `MetadataMissing` if the file is
    /// absent or `GammaNotFound` if no line parses to a value, and
    /// [`OpsError::InvalidParameter`] if the recovered value is not a
    /// usable gamma.
    pub fn from_ledger(path: &Path, selection: GammaSelection) -> OpsResult<Self> {
        let gamma = tmo_ledger::recover_gamma(path, selection)?;
        debug!(gamma, path = %path.display(), "recovered gamma from ledger");
        Self::new(gamma)
    }

    /// The gamma this operator will apply.
    #[inline]
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Applies the inverse correction to every band, widening to 16-bit.
    ///
    /// Normalization is heuristic, not tag-based: a band whose max exceeds
    /// 1 is treated as 8-bit-scaled and divided by 255, anything else is
    /// taken as already normalized. This mirrors what the forward pass
    /// produces (u8 output) but is weaker than the forward tag policy -
    /// a 16-bit band fed here is also divided by 255.
    ///
    /// # Errors
    ///
    /// [`OpsError::Core`] if the stack is empty or its bands disagree in
    /// shape.
    pub fn apply<T: Sample>(&self, input: &BandStack<T>) -> OpsResult<BandStack<u16>> {
        input.ensure_uniform_dims().map_err(OpsError::from)?;
        trace!(gamma = self.gamma, bands = input.len(), "gamma inverse");

        let gamma = self.gamma;
        try_map_indexed(input, |_, band| {
            let raw = band.to_f32_raw();
            Ok(Band::from_vec(
                expand_plane(&raw, gamma),
                band.width(),
                band.height(),
            )?)
        })
    }

    /// [`apply`](Self::apply), then appends a usage record noting the
    /// gamma that was used.
    pub fn apply_logged<T: Sample>(
        &self,
        input: &BandStack<T>,
        ledger: &Ledger,
    ) -> OpsResult<BandStack<u16>> {
        let output = self.apply(input)?;
        ledger.append(
            &UsageRecord::function("apply_inverse_gamma")
                .shapes("input_shapes", &input.shapes())
                .param("gamma", self.gamma)
                .shapes("output_shapes", &output.shapes()),
        )?;
        Ok(output)
    }

    /// Applies the inverse correction to one interleaved height x width x
    /// channels buffer and splits the result into per-channel 2D bands.
    ///
    /// The normalization heuristic runs over the whole buffer jointly, the
    /// way a single 3D array would be treated, then each channel plane
    /// becomes its own output band, in channel order.
    ///
    /// # Errors
    ///
    /// [`OpsError::Core`] if `data.len() != width * height * channels`,
    /// [`OpsError::InvalidParameter`] for zero channels.
    pub fn apply_interleaved(
        &self,
        data: &[f32],
        width: usize,
        height: usize,
        channels: usize,
    ) -> OpsResult<Vec<Band<u16>>> {
        if channels == 0 {
            return Err(OpsError::InvalidParameter("channels must be > 0".into()));
        }
        let expected = width * height * channels;
        if data.len() != expected {
            return Err(tmo_core::Error::invalid_dimensions(
                width,
                height,
                format!(
                    "expected {} samples for {} channels, got {}",
                    expected,
                    channels,
                    data.len()
                ),
            )
            .into());
        }

        let expanded = expand_plane(data, self.gamma);
        let mut bands = Vec::with_capacity(channels);
        for c in 0..channels {
            let plane: Vec<u16> = (0..width * height)
                .map(|i| expanded[i * channels + c])
                .collect();
            bands.push(Band::from_vec(plane, width, height)?);
        }
        Ok(bands)
    }
}

/// Normalizes (divide by 255 iff max > 1), expands with `x^gamma`, and
/// encodes to the 16-bit range with clamp and truncation.
fn expand_plane(raw: &[f32], gamma: f32) -> Vec<u16> {
    let max = raw.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let divisor = if max > 1.0 { 255.0 } else { 1.0 };
    raw.iter()
        .map(|&x| {
            let x = (x / divisor).max(0.0);
            u16::encode_normalized(x.powf(gamma))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tmo_core::BandStack;
    use tmo_ledger::RasterDetails;

    #[test]
    fn test_rejects_bad_gamma() {
        assert!(InverseGammaTmo::new(0.0).is_err());
        assert!(InverseGammaTmo::new(f32::NAN).is_err());
        assert!(InverseGammaTmo::new(2.2).is_ok());
    }

    #[test]
    fn test_from_ledger_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = InverseGammaTmo::from_ledger(
            &dir.path().join("metadata.txt"),
            GammaSelection::First,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            OpsError::Ledger(tmo_ledger::LedgerError::MetadataMissing(_))
        ));
    }

    #[test]
    fn test_from_ledger_without_gamma() {
        let dir = TempDir::new().unwrap();
        let ledger = Ledger::new(dir.path().join("metadata.txt"));
        ledger
            .write_details(&RasterDetails::unreferenced("GeoTIFF", (8, 8), 1, ".tif"))
            .unwrap();
        let err =
            InverseGammaTmo::from_ledger(ledger.path(), GammaSelection::First).unwrap_err();
        assert!(matches!(
            err,
            OpsError::Ledger(tmo_ledger::LedgerError::GammaNotFound(_))
        ));
    }

    #[test]
    fn test_expands_to_u16_range() {
        let tmo = InverseGammaTmo::new(2.2).unwrap();
        let input = BandStack::single(Band::constant(255u8, 4, 4).unwrap());
        let out = tmo.apply(&input).unwrap().into_bands();
        assert_eq!(out[0].samples(), &[65535u16; 16][..]);
    }

    #[test]
    fn test_normalization_heuristic() {
        let tmo = InverseGammaTmo::new(1.0).unwrap();

        // max > 1: treated as 8-bit-scaled
        let scaled = BandStack::single(Band::from_vec(vec![0.0f32, 127.5, 255.0, 255.0], 2, 2).unwrap());
        let out = tmo.apply(&scaled).unwrap().into_bands();
        assert_eq!(out[0].get(0, 0), 0);
        assert_eq!(out[0].get(0, 1), 65535);

        // max <= 1: taken as already normalized
        let normed = BandStack::single(Band::from_vec(vec![0.0f32, 0.5, 1.0, 1.0], 2, 2).unwrap());
        let out = tmo.apply(&normed).unwrap().into_bands();
        assert_eq!(out[0].get(1, 0), 32767);
    }

    #[test]
    fn test_interleaved_splits_channels() {
        let tmo = InverseGammaTmo::new(1.0).unwrap();
        // 2x1 RGB: pixels (10, 20, 30) and (40, 50, 60) in 8-bit scale
        let data = vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0];
        let bands = tmo.apply_interleaved(&data, 2, 1, 3).unwrap();
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0].dims(), (2, 1));
        // channel 0 holds 10 and 40 (8-bit scale -> 16-bit)
        assert_eq!(bands[0].get(0, 0), (10.0 / 255.0 * 65535.0) as u16);
        assert_eq!(bands[0].get(1, 0), (40.0 / 255.0 * 65535.0) as u16);
        assert_eq!(bands[2].get(1, 0), (60.0 / 255.0 * 65535.0) as u16);
    }

    #[test]
    fn test_interleaved_len_check() {
        let tmo = InverseGammaTmo::new(2.2).unwrap();
        assert!(tmo.apply_interleaved(&[0.0; 5], 2, 1, 3).is_err());
        assert!(tmo.apply_interleaved(&[0.0; 6], 2, 1, 0).is_err());
    }
}
