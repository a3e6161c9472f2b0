//! File round-trip tests across the three container formats.

use tempfile::TempDir;
use tmo_core::{Band, DynBand, SampleDepth};
use tmo_io::{read_raster, write_raster};

fn gradient_u16(width: usize, height: usize, channel: usize) -> Band<u16> {
    Band::from_fn(width, height, |x, y| {
        ((x * 997 + y * 131 + channel * 4099) % 65536) as u16
    })
    .unwrap()
}

fn gradient_u8(width: usize, height: usize, channel: usize) -> Band<u8> {
    Band::from_fn(width, height, |x, y| ((x * 7 + y * 13 + channel * 41) % 256) as u8).unwrap()
}

#[test]
fn tiff_u16_rgb_round_trips_exactly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scene.tif");

    let source: Vec<DynBand> = (0..3).map(|c| gradient_u16(20, 14, c).into()).collect();
    write_raster(&path, &source).unwrap();

    let (restored, details) = read_raster(&path).unwrap();
    assert_eq!(details.driver, "GeoTIFF");
    assert_eq!(details.size, (20, 14));
    assert_eq!(details.bands, 3);
    assert_eq!(details.extension, ".tif");
    assert_eq!(restored, source);
}

#[test]
fn tiff_u8_gray_round_trips_exactly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mask.tiff");

    let source = vec![DynBand::from(gradient_u8(9, 9, 0))];
    write_raster(&path, &source).unwrap();

    let (restored, details) = read_raster(&path).unwrap();
    assert_eq!(details.bands, 1);
    assert_eq!(restored, source);
}

#[test]
fn png_u8_rgba_round_trips_exactly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.png");

    let source: Vec<DynBand> = (0..4).map(|c| gradient_u8(16, 11, c).into()).collect();
    write_raster(&path, &source).unwrap();

    let (restored, details) = read_raster(&path).unwrap();
    assert_eq!(details.driver, "Portable Network Graphics");
    assert_eq!(details.extension, ".png");
    assert_eq!(restored, source);
}

#[test]
fn png_u16_gray_round_trips_exactly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("depth.png");

    let source = vec![DynBand::from(gradient_u16(8, 8, 0))];
    write_raster(&path, &source).unwrap();

    let (restored, _) = read_raster(&path).unwrap();
    assert_eq!(restored[0].depth(), SampleDepth::U16);
    assert_eq!(restored, source);
}

#[test]
fn jpeg_preserves_shape_and_approximate_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("photo.jpg");

    // Smooth content, so lossy compression stays close
    let source: Vec<DynBand> = (0..3)
        .map(|c| {
            Band::from_fn(24, 24, |x, y| (60 + c * 40 + x + y) as u8)
                .unwrap()
                .into()
        })
        .collect();
    write_raster(&path, &source).unwrap();

    let (restored, details) = read_raster(&path).unwrap();
    assert_eq!(details.driver, "JPEG");
    assert_eq!(restored.len(), 3);
    assert_eq!(restored[0].dims(), (24, 24));
    for (got, want) in restored.iter().zip(&source) {
        let got = got.clone().into_u8().unwrap();
        let want = want.clone().into_u8().unwrap();
        for (&g, &w) in got.samples().iter().zip(want.samples()) {
            assert!(
                (g as i16 - w as i16).abs() <= 16,
                "lossy drift too large: {g} vs {w}"
            );
        }
    }
}

#[test]
fn jpeg_narrows_u16_input() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("narrowed.jpg");

    let source = vec![DynBand::from(Band::constant(0x8080u16, 10, 10).unwrap())];
    write_raster(&path, &source).unwrap();

    let (restored, _) = read_raster(&path).unwrap();
    assert_eq!(restored[0].depth(), SampleDepth::U8);
    let band = restored[0].clone().into_u8().unwrap();
    // Constant plane survives lossy coding, top byte kept
    for &s in band.samples() {
        assert!((s as i16 - 0x80).abs() <= 2);
    }
}

#[test]
fn jpeg_strips_alpha() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flattened.jpeg");

    let source: Vec<DynBand> = (0..4).map(|c| gradient_u8(12, 12, c).into()).collect();
    write_raster(&path, &source).unwrap();

    let (restored, details) = read_raster(&path).unwrap();
    assert_eq!(restored.len(), 3);
    assert_eq!(details.bands, 3);
}
