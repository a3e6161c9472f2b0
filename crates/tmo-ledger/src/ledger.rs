//! The ledger file handle and gamma recovery.
//!
//! A [`Ledger`] wraps the path of one line-oriented UTF-8 metadata file.
//! The raster-details block is written once when the file is created;
//! usage records are appended after it, one per operator call. The file is
//! the toolbox's export/recovery format - operators themselves carry their
//! parameters explicitly and only write here when asked.
//!
//! [`recover_gamma`] is the one read path an operator depends on: the
//! inverse gamma operator reconstructs the gamma used by a prior forward
//! pass from the ledger text.

use crate::record::{parse_records, UsageRecord};
use crate::{LedgerError, LedgerResult, RasterDetails};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Policy for picking a gamma value when the ledger holds several.
///
/// A ledger that saw more than one forward gamma pass carries multiple
/// `gamma:` lines, and "the" logged gamma is ambiguous. The caller picks a
/// policy instead of the library guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GammaSelection {
    /// First parseable value, scanning top to bottom (legacy behavior).
    #[default]
    First,
    /// Last parseable value (most recent append).
    Last,
    /// The n-th parseable value, 0-based.
    Index(usize),
}

/// Handle to one metadata ledger file.
///
/// Cheap to construct; every write opens, appends and closes the file, so
/// one process-wide writer per ledger path is the caller's only
/// serialization duty under concurrency.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    /// Wraps a ledger path. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The ledger file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the one-shot raster-details block, creating or truncating
    /// the file. Call once, at raster-open time, before any usage record.
    pub fn write_details(&self, details: &RasterDetails) -> LedgerResult<()> {
        debug!(path = %self.path.display(), "writing raster details block");
        let mut file = File::create(&self.path)?;
        file.write_all(details.to_text().as_bytes())?;
        Ok(())
    }

    /// Reads the raster-details block back.
    ///
    /// # Errors
    ///
    /// [`LedgerError::MetadataMissing`] if the file is absent.
    pub fn read_details(&self) -> LedgerResult<RasterDetails> {
        RasterDetails::parse(&self.read_text()?)
    }

    /// Appends one usage record.
    pub fn append(&self, record: &UsageRecord) -> LedgerResult<()> {
        trace!(path = %self.path.display(), name = %record.name, "appending usage record");
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(record.to_text().as_bytes())?;
        Ok(())
    }

    /// Parses every usage record currently in the ledger.
    pub fn records(&self) -> LedgerResult<Vec<UsageRecord>> {
        Ok(parse_records(&self.read_text()?))
    }

    /// Recovers a logged gamma value; see [`recover_gamma`].
    pub fn recover_gamma(&self, selection: GammaSelection) -> LedgerResult<f32> {
        recover_gamma(&self.path, selection)
    }

    fn read_text(&self) -> LedgerResult<String> {
        if !self.path.exists() {
            return Err(LedgerError::MetadataMissing(self.path.clone()));
        }
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Recovers a gamma value from a ledger file.
///
/// Scans the file for lines containing the token `gamma`, takes the text
/// after the first colon and keeps every candidate that parses as a finite
/// number; `selection` picks among them. This is deliberately looser than
/// the record parser so hand-edited or partially corrupt ledgers still
/// yield their gamma.
///
/// # Errors
///
/// - [`LedgerError::MetadataMissing`] - the file does not exist
/// - [`LedgerError::GammaNotFound`] - no line yields a parseable value, or
///   the selection index is out of range
///
/// # Example
///
/// ```rust,no_run
/// use tmo_ledger::{recover_gamma, GammaSelection};
///
/// let gamma = recover_gamma("metadata.txt".as_ref(), GammaSelection::First)?;
/// assert!(gamma > 0.0);
/// # Ok::<(), tmo_ledger::LedgerError>(())
/// ```
pub fn recover_gamma(path: &Path, selection: GammaSelection) -> LedgerResult<f32> {
    if !path.exists() {
        return Err(LedgerError::MetadataMissing(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;

    let candidates: Vec<f32> = text
        .lines()
        .filter(|line| line.contains("gamma"))
        .filter_map(|line| line.split_once(':'))
        .filter_map(|(_, value)| value.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .collect();

    trace!(path = %path.display(), count = candidates.len(), "gamma candidates in ledger");

    let picked = match selection {
        GammaSelection::First => candidates.first(),
        GammaSelection::Last => candidates.last(),
        GammaSelection::Index(i) => candidates.get(i),
    };
    picked
        .copied()
        .ok_or_else(|| LedgerError::GammaNotFound(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordKind;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn ledger_in(dir: &TempDir) -> Ledger {
        Ledger::new(dir.path().join("metadata.txt"))
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ledger_in(&dir).recover_gamma(GammaSelection::First).unwrap_err();
        assert!(matches!(err, LedgerError::MetadataMissing(_)));
    }

    #[test]
    fn test_gamma_not_found() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        ledger
            .append(&UsageRecord::function("tone_map").param("contrast_scaling", 0.8))
            .unwrap();
        let err = ledger.recover_gamma(GammaSelection::First).unwrap_err();
        assert!(matches!(err, LedgerError::GammaNotFound(_)));
    }

    #[test]
    fn test_recover_first_and_last() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        ledger
            .append(&UsageRecord::class("GammaTmo").param("gamma", 2.2))
            .unwrap();
        ledger
            .append(&UsageRecord::class("GammaTmo").param("gamma", 1.8))
            .unwrap();

        assert_relative_eq!(ledger.recover_gamma(GammaSelection::First).unwrap(), 2.2);
        assert_relative_eq!(ledger.recover_gamma(GammaSelection::Last).unwrap(), 1.8);
        assert_relative_eq!(ledger.recover_gamma(GammaSelection::Index(1)).unwrap(), 1.8);
        assert!(matches!(
            ledger.recover_gamma(GammaSelection::Index(2)).unwrap_err(),
            LedgerError::GammaNotFound(_)
        ));
    }

    #[test]
    fn test_recover_skips_unparseable_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.txt");
        std::fs::write(&path, "note: gamma was chosen by eye\n  gamma: 2.4\n").unwrap();
        let gamma = recover_gamma(&path, GammaSelection::First).unwrap();
        assert_relative_eq!(gamma, 2.4);
    }

    #[test]
    fn test_details_then_records() {
        let dir = TempDir::new().unwrap();
        let ledger = ledger_in(&dir);
        let details = RasterDetails::unreferenced("GeoTIFF", (8, 8), 1, ".tif");
        ledger.write_details(&details).unwrap();
        ledger
            .append(&UsageRecord::function("apply_correction").param("gamma", 2.2))
            .unwrap();

        assert_eq!(ledger.read_details().unwrap(), details);
        let records = ledger.records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, RecordKind::Function);
        assert_relative_eq!(ledger.recover_gamma(GammaSelection::First).unwrap(), 2.2);
    }
}
