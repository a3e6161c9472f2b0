//! Raster encoding: planar bands -> file.
//!
//! The extension picks the encoder. Bands are validated for uniform
//! shape and depth, interleaved, and handed to the format encoder.
//! Integer depths only: operators emit u8 or u16, and float planes are
//! an in-memory working representation, not an export format.

use crate::read::extension_of;
use crate::{IoError, IoResult};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tmo_core::{Band, DynBand, Error as CoreError, Sample, SampleDepth};
use tracing::debug;

/// JPEG quality used for every JPEG export.
const JPEG_QUALITY: u8 = 90;

/// Writes planar bands to a raster file, format chosen by extension.
///
/// Bands are stored as channels in index order (band 0 becomes channel
/// 0). All bands must share one shape and one depth.
///
/// Format constraints:
/// - TIFF: 1, 3 or 4 bands, 8 or 16 bit, LZW compression
/// - PNG: 1, 2, 3 or 4 bands, 8 or 16 bit
/// - JPEG: 1 or 3 bands written as-is, 4 bands written with alpha
///   stripped; always 8-bit, 16-bit input is narrowed
///
/// # Errors
///
/// `UnsupportedExtension` for unknown formats, `EncodeError` for band
/// counts a format cannot carry, `UnsupportedSampleDepth` for float
/// bands, `DimensionMismatch` for ragged shapes.
pub fn write_raster(path: &Path, bands: &[DynBand]) -> IoResult<()> {
    let extension = extension_of(path)?;
    let (width, height, depth) = validate_bands(bands)?;
    debug!(
        path = %path.display(),
        extension,
        bands = bands.len(),
        %depth,
        "writing raster"
    );
    match extension.as_str() {
        ".tif" | ".tiff" => write_tiff(path, bands, width, height, depth),
        ".png" => write_png(path, bands, width, height, depth),
        ".jpg" | ".jpeg" => write_jpeg(path, bands, width, height, depth),
        other => Err(IoError::UnsupportedExtension(other.to_string())),
    }
}

/// Checks shape and depth uniformity; returns the common layout.
fn validate_bands(bands: &[DynBand]) -> IoResult<(usize, usize, SampleDepth)> {
    let first = bands
        .first()
        .ok_or_else(|| IoError::EncodeError("no bands to write".into()))?;
    let (width, height) = first.dims();
    let depth = first.depth();
    for (index, band) in bands.iter().enumerate().skip(1) {
        if band.dims() != (width, height) {
            return Err(
                CoreError::dimension_mismatch(index, band.dims(), (width, height)).into(),
            );
        }
        if band.depth() != depth {
            return Err(IoError::EncodeError(format!(
                "band {} has depth {}, expected {}",
                index,
                band.depth(),
                depth
            )));
        }
    }
    if depth == SampleDepth::F32 {
        return Err(CoreError::unsupported_sample_depth(
            "float bands are not writable, narrow to u8 or u16 first",
        )
        .into());
    }
    Ok((width, height, depth))
}

/// Interleaves planar bands into a channel-packed buffer.
fn interleave<T: Sample>(bands: &[&Band<T>], width: usize, height: usize) -> Vec<T> {
    let channels = bands.len();
    let mut out = Vec::with_capacity(width * height * channels);
    for i in 0..width * height {
        for band in bands {
            out.push(band.samples()[i]);
        }
    }
    out
}

fn u8_planes(bands: &[DynBand]) -> IoResult<Vec<&Band<u8>>> {
    bands
        .iter()
        .map(|b| match b {
            DynBand::U8(band) => Ok(band),
            other => Err(CoreError::unsupported_sample_depth(format!(
                "expected 8-bit band, got {}",
                other.depth()
            ))
            .into()),
        })
        .collect()
}

fn u16_planes(bands: &[DynBand]) -> IoResult<Vec<&Band<u16>>> {
    bands
        .iter()
        .map(|b| match b {
            DynBand::U16(band) => Ok(band),
            other => Err(CoreError::unsupported_sample_depth(format!(
                "expected 16-bit band, got {}",
                other.depth()
            ))
            .into()),
        })
        .collect()
}

fn write_tiff(
    path: &Path,
    bands: &[DynBand],
    width: usize,
    height: usize,
    depth: SampleDepth,
) -> IoResult<()> {
    use tiff::encoder::{colortype, compression, TiffEncoder};

    let file = File::create(path)?;
    let mut encoder =
        TiffEncoder::new(file).map_err(|e: tiff::TiffError| IoError::EncodeError(e.to_string()))?;
    let (w, h) = (width as u32, height as u32);

    match depth {
        SampleDepth::U8 => {
            let data = interleave(&u8_planes(bands)?, width, height);
            match bands.len() {
                1 => encoder
                    .write_image_with_compression::<colortype::Gray8, compression::Lzw>(
                        w,
                        h,
                        compression::Lzw,
                        &data,
                    )
                    .map_err(|e: tiff::TiffError| IoError::EncodeError(e.to_string()))?,
                3 => encoder
                    .write_image_with_compression::<colortype::RGB8, compression::Lzw>(
                        w,
                        h,
                        compression::Lzw,
                        &data,
                    )
                    .map_err(|e: tiff::TiffError| IoError::EncodeError(e.to_string()))?,
                4 => encoder
                    .write_image_with_compression::<colortype::RGBA8, compression::Lzw>(
                        w,
                        h,
                        compression::Lzw,
                        &data,
                    )
                    .map_err(|e: tiff::TiffError| IoError::EncodeError(e.to_string()))?,
                n => {
                    return Err(IoError::EncodeError(format!(
                        "TIFF cannot carry {n} bands"
                    )));
                }
            }
        }
        SampleDepth::U16 => {
            let data = interleave(&u16_planes(bands)?, width, height);
            match bands.len() {
                1 => encoder
                    .write_image_with_compression::<colortype::Gray16, compression::Lzw>(
                        w,
                        h,
                        compression::Lzw,
                        &data,
                    )
                    .map_err(|e: tiff::TiffError| IoError::EncodeError(e.to_string()))?,
                3 => encoder
                    .write_image_with_compression::<colortype::RGB16, compression::Lzw>(
                        w,
                        h,
                        compression::Lzw,
                        &data,
                    )
                    .map_err(|e: tiff::TiffError| IoError::EncodeError(e.to_string()))?,
                4 => encoder
                    .write_image_with_compression::<colortype::RGBA16, compression::Lzw>(
                        w,
                        h,
                        compression::Lzw,
                        &data,
                    )
                    .map_err(|e: tiff::TiffError| IoError::EncodeError(e.to_string()))?,
                n => {
                    return Err(IoError::EncodeError(format!(
                        "TIFF cannot carry {n} bands"
                    )));
                }
            }
        }
        SampleDepth::F32 => unreachable!("rejected by validate_bands"),
    }
    Ok(())
}

fn write_png(
    path: &Path,
    bands: &[DynBand],
    width: usize,
    height: usize,
    depth: SampleDepth,
) -> IoResult<()> {
    let color_type = match bands.len() {
        1 => png::ColorType::Grayscale,
        2 => png::ColorType::GrayscaleAlpha,
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        n => return Err(IoError::EncodeError(format!("PNG cannot carry {n} bands"))),
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, width as u32, height as u32);
    encoder.set_color(color_type);
    encoder.set_compression(png::Compression::default());

    let bytes = match depth {
        SampleDepth::U8 => {
            encoder.set_depth(png::BitDepth::Eight);
            interleave(&u8_planes(bands)?, width, height)
        }
        SampleDepth::U16 => {
            encoder.set_depth(png::BitDepth::Sixteen);
            u16_to_bytes(&interleave(&u16_planes(bands)?, width, height))
        }
        SampleDepth::F32 => unreachable!("rejected by validate_bands"),
    };

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(&bytes)
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}

fn write_jpeg(
    path: &Path,
    bands: &[DynBand],
    width: usize,
    height: usize,
    depth: SampleDepth,
) -> IoResult<()> {
    use jpeg_encoder::{ColorType, Encoder};

    // The JPEG container addresses dimensions with 16 bits
    if width > u16::MAX as usize || height > u16::MAX as usize {
        return Err(IoError::EncodeError(format!(
            "JPEG cannot carry a {width}x{height} raster, both sides must be <= {}",
            u16::MAX
        )));
    }

    // JPEG is 8-bit only; 16-bit input is rescaled into the 8-bit range
    let data: Vec<u8> = match depth {
        SampleDepth::U8 => interleave(&u8_planes(bands)?, width, height),
        SampleDepth::U16 => interleave(&u16_planes(bands)?, width, height)
            .into_iter()
            .map(|s| (s as u32 * 255 / 65535) as u8)
            .collect(),
        SampleDepth::F32 => unreachable!("rejected by validate_bands"),
    };

    let (color_type, pixel_data) = match bands.len() {
        1 => (ColorType::Luma, data),
        3 => (ColorType::Rgb, data),
        4 => {
            let rgb = data
                .chunks(4)
                .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
                .collect();
            (ColorType::Rgb, rgb)
        }
        n => return Err(IoError::EncodeError(format!("JPEG cannot carry {n} bands"))),
    };

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, JPEG_QUALITY);
    encoder
        .encode(&pixel_data, width as u16, height as u16, color_type)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::EncodeError(e.to_string()))?;
    std::fs::write(path, buffer)?;
    Ok(())
}

/// Converts u16 samples to a big-endian byte buffer.
fn u16_to_bytes(samples: &[u16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for &s in samples {
        bytes.extend_from_slice(&s.to_be_bytes());
    }
    bytes
}
