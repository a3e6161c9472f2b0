//! Band stacks: the single-or-batch input shape of every operator.
//!
//! The toolbox's operators accept either one band or an ordered sequence of
//! bands and mirror that shape on return. Rather than detecting which at
//! runtime, [`BandStack`] makes the two cases an explicit tagged union, and
//! [`BandStack::try_map`] preserves the variant structurally.
//!
//! # Example
//!
//! ```rust
//! use tmo_core::{Band, BandStack};
//!
//! let single = BandStack::single(Band::constant(10u8, 4, 4).unwrap());
//! let doubled = single.try_map(|band| {
//!     Band::from_vec(band.samples().iter().map(|s| s * 2).collect(), 4, 4)
//! }).unwrap();
//! assert!(matches!(doubled, BandStack::Single(_)));
//! ```

use crate::{Band, Error, Result, Sample};

/// One band or an ordered batch of bands sharing identical dimensions.
///
/// Band order in a batch is the external band index order (1-based in
/// raster I/O, 0-based here) and is preserved by every operation.
#[derive(Debug, Clone, PartialEq)]
pub enum BandStack<T: Sample> {
    /// A single band; operators return a single band for it.
    Single(Band<T>),
    /// An ordered batch of bands; operators return a batch of equal length.
    Batch(Vec<Band<T>>),
}

impl<T: Sample> BandStack<T> {
    /// Wraps one band.
    pub fn single(band: Band<T>) -> Self {
        Self::Single(band)
    }

    /// Wraps an ordered batch of bands.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyStack`] for an empty batch,
    /// [`Error::DimensionMismatch`] if the bands disagree in shape.
    pub fn batch(bands: Vec<Band<T>>) -> Result<Self> {
        let stack = Self::Batch(bands);
        stack.ensure_uniform_dims()?;
        Ok(stack)
    }

    /// Number of bands.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(bands) => bands.len(),
        }
    }

    /// `true` if the stack holds no bands (only possible for a batch built
    /// by other means than [`BandStack::batch`]).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates bands in order.
    pub fn bands(&self) -> impl Iterator<Item = &Band<T>> {
        match self {
            Self::Single(band) => std::slice::from_ref(band).iter(),
            Self::Batch(bands) => bands.iter(),
        }
    }

    /// Shared (width, height) of the stack's bands.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyStack`] if there is no band to take dimensions from.
    pub fn dims(&self) -> Result<(usize, usize)> {
        self.bands().next().map(Band::dims).ok_or(Error::EmptyStack)
    }

    /// (width, height) pairs of all bands, in order.
    ///
    /// This is what usage records log as "shapes".
    pub fn shapes(&self) -> Vec<(usize, usize)> {
        self.bands().map(Band::dims).collect()
    }

    /// Verifies the stack is non-empty and all bands share one shape.
    ///
    /// Operators call this before touching any pixel, so shape errors
    /// never surface halfway through a transform.
    pub fn ensure_uniform_dims(&self) -> Result<()> {
        let mut bands = self.bands().enumerate();
        let (_, first) = bands.next().ok_or(Error::EmptyStack)?;
        let want = first.dims();
        for (index, band) in bands {
            if band.dims() != want {
                return Err(Error::dimension_mismatch(index, band.dims(), want));
            }
        }
        Ok(())
    }

    /// Maps a fallible per-band transform over the stack, preserving arity:
    /// a `Single` input yields a `Single` output, a `Batch` a `Batch` of
    /// the same length and order.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(&Band<T>) -> std::result::Result<Band<U>, E>,
    ) -> std::result::Result<BandStack<U>, E>
    where
        U: Sample,
    {
        match self {
            Self::Single(band) => Ok(BandStack::Single(f(band)?)),
            Self::Batch(bands) => Ok(BandStack::Batch(
                bands.iter().map(|b| f(b)).collect::<std::result::Result<_, E>>()?,
            )),
        }
    }

    /// Consumes the stack into an ordered band vector.
    pub fn into_bands(self) -> Vec<Band<T>> {
        match self {
            Self::Single(band) => vec![band],
            Self::Batch(bands) => bands,
        }
    }
}
