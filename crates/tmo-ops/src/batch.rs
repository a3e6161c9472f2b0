//! Per-band mapping over stacks, parallel where it helps.
//!
//! Bands within one stack are independent: no shared mutable state, no
//! ordering dependency. With the `parallel` feature (default) batches map
//! over bands with Rayon; a single band runs inline either way. Output
//! band order always matches input band order.

use crate::OpsResult;
use tmo_core::{Band, BandStack, Sample};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Maps a fallible transform over every band, carrying the band index for
/// error attribution, and preserving the stack's arity and order.
pub fn try_map_indexed<T, U>(
    stack: &BandStack<T>,
    f: impl Fn(usize, &Band<T>) -> OpsResult<Band<U>> + Sync,
) -> OpsResult<BandStack<U>>
where
    T: Sample,
    U: Sample,
{
    match stack {
        BandStack::Single(band) => Ok(BandStack::Single(f(0, band)?)),
        BandStack::Batch(bands) => {
            #[cfg(feature = "parallel")]
            let mapped: OpsResult<Vec<Band<U>>> = bands
                .par_iter()
                .enumerate()
                .map(|(i, band)| f(i, band))
                .collect();

            #[cfg(not(feature = "parallel"))]
            let mapped: OpsResult<Vec<Band<U>>> = bands
                .iter()
                .enumerate()
                .map(|(i, band)| f(i, band))
                .collect();

            Ok(BandStack::Batch(mapped?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpsError;
    use tmo_core::Band;

    #[test]
    fn test_order_preserved() {
        let bands: Vec<Band<u8>> = (0..4)
            .map(|i| Band::constant(i as u8, 2, 2).unwrap())
            .collect();
        let stack = BandStack::batch(bands).unwrap();

        let out = try_map_indexed(&stack, |_, band| {
            let doubled = band.samples().iter().map(|s| s * 2).collect();
            Ok(Band::<u8>::from_vec(doubled, 2, 2)?)
        })
        .unwrap();

        let out = out.into_bands();
        for (i, band) in out.iter().enumerate() {
            assert_eq!(band.get(0, 0), (i * 2) as u8);
        }
    }

    #[test]
    fn test_error_carries_band_index() {
        let stack = BandStack::batch(vec![
            Band::constant(0u8, 2, 2).unwrap(),
            Band::constant(1u8, 2, 2).unwrap(),
        ])
        .unwrap();

        let err = try_map_indexed::<u8, u8>(&stack, |i, _| {
            if i == 1 {
                Err(OpsError::DegenerateRange { band: i })
            } else {
                Ok(Band::constant(0u8, 2, 2)?)
            }
        })
        .unwrap_err();
        assert!(matches!(err, OpsError::DegenerateRange { band: 1 }));
    }
}
