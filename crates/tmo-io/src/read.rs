//! Raster decoding: file -> planar bands + details.
//!
//! Every decoder produces ordered planar [`DynBand`]s (band index order
//! preserved, interleaved pixel formats split into one band per channel)
//! plus a [`RasterDetails`] block ready to be written to the ledger.
//! Sample formats outside the three depth classes (u8, u16, normalized
//! f32) are rejected with `UnsupportedSampleDepth` instead of being
//! silently converted.

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tmo_core::{Band, DynBand, Error as CoreError, Sample};
use tmo_ledger::RasterDetails;
use tracing::debug;

/// Reads a raster file into planar bands and its details block.
///
/// Supported by extension: `.tif`/`.tiff`, `.png`, `.jpg`/`.jpeg`
/// (case-insensitive). Projection and geotransform default to the
/// unreferenced placeholders; georeferencing round-trips through the
/// ledger's details text, not through the pixel container.
///
/// # Example
///
/// ```rust,no_run
/// use tmo_io::read_raster;
///
/// let (bands, details) = read_raster("scene.tif".as_ref())?;
/// assert_eq!(bands.len(), details.bands);
/// # Ok::<(), tmo_io::IoError>(())
/// ```
pub fn read_raster(path: &Path) -> IoResult<(Vec<DynBand>, RasterDetails)> {
    let extension = extension_of(path)?;
    debug!(path = %path.display(), extension, "reading raster");
    match extension.as_str() {
        ".tif" | ".tiff" => read_tiff(path, &extension),
        ".png" => read_png(path, &extension),
        ".jpg" | ".jpeg" => read_jpeg(path, &extension),
        other => Err(IoError::UnsupportedExtension(other.to_string())),
    }
}

/// Lower-cased extension of a path, dot included.
pub(crate) fn extension_of(path: &Path) -> IoResult<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .ok_or_else(|| IoError::UnsupportedExtension(path.display().to_string()))
}

/// Splits an interleaved buffer into planar bands, channel order kept.
fn deinterleave<T: Sample>(
    data: &[T],
    width: usize,
    height: usize,
    channels: usize,
) -> IoResult<Vec<Band<T>>> {
    let expected = width * height * channels;
    if data.len() != expected {
        return Err(CoreError::invalid_dimensions(
            width,
            height,
            format!("decoder returned {} samples, expected {}", data.len(), expected),
        )
        .into());
    }
    let mut bands = Vec::with_capacity(channels);
    for c in 0..channels {
        let plane: Vec<T> = (0..width * height).map(|i| data[i * channels + c]).collect();
        bands.push(Band::from_vec(plane, width, height)?);
    }
    Ok(bands)
}

fn details_for(
    driver: &str,
    width: usize,
    height: usize,
    bands: usize,
    extension: &str,
) -> RasterDetails {
    RasterDetails::unreferenced(driver, (width, height), bands, extension)
}

fn read_tiff(path: &Path, extension: &str) -> IoResult<(Vec<DynBand>, RasterDetails)> {
    use tiff::decoder::{Decoder, DecodingResult};
    use tiff::ColorType;

    let file = File::open(path)?;
    let mut decoder =
        Decoder::new(BufReader::new(file)).map_err(|e| IoError::DecodeError(e.to_string()))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let (width, height) = (width as usize, height as usize);
    let color_type = decoder
        .colortype()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let result = decoder
        .read_image()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let bands: Vec<DynBand> = match (color_type, result) {
        (ColorType::Gray(8), DecodingResult::U8(buf)) => deinterleave(&buf, width, height, 1)?
            .into_iter()
            .map(DynBand::from)
            .collect(),
        (ColorType::RGB(8), DecodingResult::U8(buf)) => deinterleave(&buf, width, height, 3)?
            .into_iter()
            .map(DynBand::from)
            .collect(),
        (ColorType::RGBA(8), DecodingResult::U8(buf)) => deinterleave(&buf, width, height, 4)?
            .into_iter()
            .map(DynBand::from)
            .collect(),
        (ColorType::Gray(16), DecodingResult::U16(buf)) => deinterleave(&buf, width, height, 1)?
            .into_iter()
            .map(DynBand::from)
            .collect(),
        (ColorType::RGB(16), DecodingResult::U16(buf)) => deinterleave(&buf, width, height, 3)?
            .into_iter()
            .map(DynBand::from)
            .collect(),
        (ColorType::RGBA(16), DecodingResult::U16(buf)) => deinterleave(&buf, width, height, 4)?
            .into_iter()
            .map(DynBand::from)
            .collect(),
        (ColorType::Gray(32), DecodingResult::F32(buf)) => deinterleave(&buf, width, height, 1)?
            .into_iter()
            .map(DynBand::from)
            .collect(),
        (ColorType::RGB(32), DecodingResult::F32(buf)) => deinterleave(&buf, width, height, 3)?
            .into_iter()
            .map(DynBand::from)
            .collect(),
        (ct, _) => {
            return Err(CoreError::unsupported_sample_depth(format!("TIFF {ct:?}")).into());
        }
    };

    let details = details_for("GeoTIFF", width, height, bands.len(), extension);
    Ok((bands, details))
}

fn read_png(path: &Path, extension: &str) -> IoResult<(Vec<DynBand>, RasterDetails)> {
    let file = File::open(path)?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(e.to_string()))?;

    let (width, height) = (info.width as usize, info.height as usize);
    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(CoreError::unsupported_sample_depth(format!("PNG {other:?}")).into());
        }
    };
    let bytes = &buf[..info.buffer_size()];

    let bands: Vec<DynBand> = match info.bit_depth {
        png::BitDepth::Eight => deinterleave(bytes, width, height, channels)?
            .into_iter()
            .map(DynBand::from)
            .collect(),
        png::BitDepth::Sixteen => {
            let u16_data = bytes_to_u16(bytes);
            deinterleave(&u16_data, width, height, channels)?
                .into_iter()
                .map(DynBand::from)
                .collect()
        }
        other => {
            return Err(CoreError::unsupported_sample_depth(format!("PNG {other:?}")).into());
        }
    };

    let details = details_for("Portable Network Graphics", width, height, bands.len(), extension);
    Ok((bands, details))
}

fn read_jpeg(path: &Path, extension: &str) -> IoResult<(Vec<DynBand>, RasterDetails)> {
    let file = File::open(path)?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("missing JPEG header info".into()))?;

    let (width, height) = (info.width as usize, info.height as usize);
    let channels = match info.pixel_format {
        jpeg_decoder::PixelFormat::L8 => 1,
        jpeg_decoder::PixelFormat::RGB24 => 3,
        other => {
            return Err(CoreError::unsupported_sample_depth(format!("JPEG {other:?}")).into());
        }
    };

    let bands: Vec<DynBand> = deinterleave(&pixels, width, height, channels)?
        .into_iter()
        .map(DynBand::from)
        .collect();
    let details = details_for("JPEG", width, height, bands.len(), extension);
    Ok((bands, details))
}

/// Converts a big-endian byte slice to u16 samples. A trailing odd byte
/// is dropped; the caller's length check then reports the shortfall.
pub(crate) fn bytes_to_u16(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
        .collect()
}
