//! Separable Gaussian low-pass filtering.
//!
//! The multi-scale operator decomposes log-luminance into a base layer
//! (this filter's output) and a detail layer (the residual). The kernel is
//! isotropic, so the 2D filter runs as two 1-D passes; borders clamp to
//! the edge sample.
//!
//! # Example
//!
//! ```rust
//! use tmo_ops::gaussian::gaussian_blur;
//!
//! let src = vec![0.5f32; 16 * 16];
//! let blurred = gaussian_blur(&src, 16, 16, 2.0).unwrap();
//! assert_eq!(blurred.len(), src.len());
//! ```

use crate::{OpsError, OpsResult};

/// Builds a normalized 1-D Gaussian kernel for the given standard
/// deviation. Radius is `ceil(3 * sigma)`, covering ~99.7% of the mass.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] if sigma is not finite and positive.
pub fn gaussian_kernel(sigma: f32) -> OpsResult<Vec<f32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(OpsError::InvalidParameter(format!(
            "gaussian sigma must be finite and > 0, got {sigma}"
        )));
    }
    let radius = (3.0 * sigma).ceil() as usize;
    let sigma2 = 2.0 * sigma * sigma;

    let mut kernel = Vec::with_capacity(2 * radius + 1);
    let mut sum = 0.0f32;
    for i in -(radius as i64)..=(radius as i64) {
        let d = (i * i) as f32;
        let w = (-d / sigma2).exp();
        kernel.push(w);
        sum += w;
    }
    for w in &mut kernel {
        *w /= sum;
    }
    Ok(kernel)
}

/// Applies an isotropic Gaussian low-pass to one plane.
///
/// # Arguments
///
/// * `src` - row-major plane data
/// * `width` - plane width
/// * `height` - plane height
/// * `sigma` - standard deviation in grid units
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] for a bad sigma,
/// [`OpsError::Core`] if `src.len() != width * height`.
pub fn gaussian_blur(src: &[f32], width: usize, height: usize, sigma: f32) -> OpsResult<Vec<f32>> {
    let expected = width * height;
    if src.len() != expected {
        return Err(tmo_core::Error::invalid_dimensions(
            width,
            height,
            format!("expected {} samples, got {}", expected, src.len()),
        )
        .into());
    }
    let kernel = gaussian_kernel(sigma)?;
    let temp = blur_horizontal(src, width, height, &kernel);
    Ok(blur_vertical(&temp, width, height, &kernel))
}

/// Horizontal pass, clamp-to-edge.
fn blur_horizontal(src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
    let radius = kernel.len() / 2;
    let mut dst = vec![0.0f32; width * height];

    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        for x in 0..width {
            let mut sum = 0.0f32;
            for (k, w) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - radius as isize)
                    .clamp(0, width as isize - 1) as usize;
                sum += row[sx] * w;
            }
            dst[y * width + x] = sum;
        }
    }
    dst
}

/// Vertical pass, clamp-to-edge.
fn blur_vertical(src: &[f32], width: usize, height: usize, kernel: &[f32]) -> Vec<f32> {
    let radius = kernel.len() / 2;
    let mut dst = vec![0.0f32; width * height];

    for x in 0..width {
        for y in 0..height {
            let mut sum = 0.0f32;
            for (k, w) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - radius as isize)
                    .clamp(0, height as isize - 1) as usize;
                sum += src[sy * width + x] * w;
            }
            dst[y * width + x] = sum;
        }
    }
    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_normalized() {
        let k = gaussian_kernel(1.5).unwrap();
        assert_eq!(k.len(), 2 * 5 + 1); // radius = ceil(4.5) = 5
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);

        // Center is the peak
        let center = k[k.len() / 2];
        assert!(center > k[0]);
    }

    #[test]
    fn test_kernel_rejects_bad_sigma() {
        assert!(gaussian_kernel(0.0).is_err());
        assert!(gaussian_kernel(-1.0).is_err());
        assert!(gaussian_kernel(f32::NAN).is_err());
    }

    #[test]
    fn test_blur_constant_plane() {
        let src = vec![0.25f32; 8 * 8];
        let out = gaussian_blur(&src, 8, 8, 2.0).unwrap();
        for v in out {
            assert!((v - 0.25).abs() < 1e-5);
        }
    }

    #[test]
    fn test_blur_smooths_impulse() {
        let mut src = vec![0.0f32; 9 * 9];
        src[4 * 9 + 4] = 1.0;
        let out = gaussian_blur(&src, 9, 9, 1.0).unwrap();

        // Mass is preserved (clamped borders keep everything inside)
        let total: f32 = out.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);

        // Peak is at the impulse and below the original height
        let peak = out[4 * 9 + 4];
        assert!(peak < 1.0 && peak > 0.0);
        assert!(out.iter().all(|&v| v <= peak + 1e-6));
    }

    #[test]
    fn test_blur_len_mismatch() {
        let err = gaussian_blur(&[0.0; 10], 4, 4, 1.0).unwrap_err();
        assert!(matches!(err, OpsError::Core(_)));
    }

    #[test]
    fn test_sigma_larger_than_plane() {
        // sigma far beyond the grid collapses the plane toward its mean
        let src: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let out = gaussian_blur(&src, 4, 4, 30.0).unwrap();
        let spread = out.iter().cloned().fold(f32::MIN, f32::max)
            - out.iter().cloned().fold(f32::MAX, f32::min);
        assert!(spread < 1.0, "spread {spread} should be well under input range");
    }
}
