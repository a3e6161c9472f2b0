//! The one-shot raster-details block.
//!
//! When a raster is opened, its format facts (driver, size, band count,
//! projection, geotransform, pixel size, extension) are written once to the
//! ledger. The save path reads them back so a derived image keeps the
//! source's georeferencing and container format even though the pixel data
//! went through a tone-mapping operator in between.
//!
//! Block layout:
//!
//! ```text
//! Details :
//! driver: GeoTIFF
//! size: (768, 512)
//! bands: 3
//! projection: Non défini
//! geotransform: (0, 1, 0, 0, 0, 1)
//! pixel_size: (1, 1)
//! extension: .tif
//! ```

use crate::{LedgerError, LedgerResult};
use std::fmt::Write as _;

/// Section marker line for the details block.
pub const DETAILS_HEADER: &str = "Details :";

/// Placeholder value for an absent projection.
pub const NO_PROJECTION: &str = "Non défini";

/// Identity geotransform: origin (0, 0), unit pixels, no rotation.
pub const IDENTITY_GEOTRANSFORM: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Raster facts captured at open time and replayed at save time.
///
/// The geotransform follows the usual 6-float convention:
/// origin-x, pixel-width, row-rotation, origin-y, column-rotation,
/// pixel-height.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterDetails {
    /// Long driver/format name ("GeoTIFF", "Portable Network Graphics", ...).
    pub driver: String,
    /// Raster size as (width, height).
    pub size: (usize, usize),
    /// Band count.
    pub bands: usize,
    /// Projection WKT, or [`NO_PROJECTION`] when absent.
    pub projection: String,
    /// 6-float geotransform.
    pub geotransform: [f64; 6],
    /// (pixel-width, pixel-height), redundant with the geotransform.
    pub pixel_size: (f64, f64),
    /// Source file extension, dot included (".tif").
    pub extension: String,
}

impl RasterDetails {
    /// Details for an unreferenced raster of the given shape.
    pub fn unreferenced(
        driver: impl Into<String>,
        size: (usize, usize),
        bands: usize,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            driver: driver.into(),
            size,
            bands,
            projection: NO_PROJECTION.to_string(),
            geotransform: IDENTITY_GEOTRANSFORM,
            pixel_size: (IDENTITY_GEOTRANSFORM[1], IDENTITY_GEOTRANSFORM[5]),
            extension: normalize_extension(extension.into()),
        }
    }

    /// Renders the details block, trailing blank line included.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{DETAILS_HEADER}");
        let _ = writeln!(out, "driver: {}", self.driver);
        let _ = writeln!(out, "size: ({}, {})", self.size.0, self.size.1);
        let _ = writeln!(out, "bands: {}", self.bands);
        let _ = writeln!(out, "projection: {}", self.projection);
        let gt = self.geotransform;
        let _ = writeln!(
            out,
            "geotransform: ({}, {}, {}, {}, {}, {})",
            gt[0], gt[1], gt[2], gt[3], gt[4], gt[5]
        );
        let _ = writeln!(out, "pixel_size: ({}, {})", self.pixel_size.0, self.pixel_size.1);
        let _ = writeln!(out, "extension: {}", self.extension);
        out.push('\n');
        out
    }

    /// Parses a details block out of ledger text.
    ///
    /// Reads `key: value` lines following the `Details :` marker until a
    /// blank line. Missing keys fall back to unreferenced defaults; only a
    /// present-but-unparseable numeric field is an error.
    pub fn parse(text: &str) -> LedgerResult<Self> {
        let mut details = Self::unreferenced("", (0, 0), 0, "");
        let mut in_block = false;
        for line in text.lines() {
            let line = line.trim_end();
            if line.trim() == DETAILS_HEADER {
                in_block = true;
                continue;
            }
            if !in_block {
                continue;
            }
            if line.trim().is_empty() {
                break;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "driver" => details.driver = value.to_string(),
                "size" => details.size = parse_pair_usize(key, value)?,
                "bands" => {
                    details.bands = value
                        .parse()
                        .map_err(|_| malformed(key, value))?;
                }
                "projection" => details.projection = value.to_string(),
                "geotransform" => details.geotransform = parse_geotransform(value)?,
                "pixel_size" => details.pixel_size = parse_pair_f64(key, value)?,
                "extension" => details.extension = normalize_extension(value.to_string()),
                _ => {} // readers tolerate extra fields
            }
        }
        Ok(details)
    }
}

fn malformed(key: &str, value: &str) -> LedgerError {
    LedgerError::MalformedField {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn normalize_extension(ext: String) -> String {
    if ext.is_empty() || ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

fn split_tuple(value: &str) -> impl Iterator<Item = &str> {
    value
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .map(str::trim)
}

fn parse_pair_usize(key: &str, value: &str) -> LedgerResult<(usize, usize)> {
    let mut parts = split_tuple(value);
    let a = parts.next().and_then(|p| p.parse().ok());
    let b = parts.next().and_then(|p| p.parse().ok());
    match (a, b) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(malformed(key, value)),
    }
}

fn parse_pair_f64(key: &str, value: &str) -> LedgerResult<(f64, f64)> {
    let mut parts = split_tuple(value);
    let a = parts.next().and_then(|p| p.parse().ok());
    let b = parts.next().and_then(|p| p.parse().ok());
    match (a, b) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(malformed(key, value)),
    }
}

fn parse_geotransform(value: &str) -> LedgerResult<[f64; 6]> {
    let mut gt = [0.0f64; 6];
    let mut count = 0;
    for (slot, part) in gt.iter_mut().zip(split_tuple(value)) {
        *slot = part
            .parse()
            .map_err(|_| malformed("geotransform", value))?;
        count += 1;
    }
    if count != 6 {
        return Err(malformed("geotransform", value));
    }
    Ok(gt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RasterDetails {
        RasterDetails {
            driver: "GeoTIFF".into(),
            size: (768, 512),
            bands: 3,
            projection: NO_PROJECTION.into(),
            geotransform: [310000.0, 0.5, 0.0, 4250000.0, 0.0, -0.5],
            pixel_size: (0.5, -0.5),
            extension: ".tif".into(),
        }
    }

    #[test]
    fn test_roundtrip() {
        let details = sample();
        let parsed = RasterDetails::parse(&details.to_text()).unwrap();
        assert_eq!(parsed, details);
    }

    #[test]
    fn test_parse_ignores_surrounding_records() {
        let text = format!(
            "Fonction appelée : apply_correction\nParamètres :\n  gamma: 2.2\n{}\n{}",
            "----------------------------------------",
            sample().to_text()
        );
        let parsed = RasterDetails::parse(&text).unwrap();
        assert_eq!(parsed.bands, 3);
        assert_eq!(parsed.size, (768, 512));
    }

    #[test]
    fn test_parse_malformed_geotransform() {
        let text = "Details :\ngeotransform: (1, 2, 3)\n";
        let err = RasterDetails::parse(text).unwrap_err();
        assert!(matches!(err, LedgerError::MalformedField { .. }));
    }

    #[test]
    fn test_extension_normalized() {
        let text = "Details :\nextension: tif\n";
        let parsed = RasterDetails::parse(text).unwrap();
        assert_eq!(parsed.extension, ".tif");
    }

    #[test]
    fn test_unreferenced_defaults() {
        let d = RasterDetails::unreferenced("GeoTIFF", (8, 8), 1, ".tif");
        assert_eq!(d.projection, NO_PROJECTION);
        assert_eq!(d.geotransform, IDENTITY_GEOTRANSFORM);
    }
}
