//! Image scaling operations
//!
//! Provides three resampling algorithms, all working on any channel
//! layout:
//! - Sampling (nearest neighbor)
//! - Linear interpolation (for upscaling)
//! - Area mapping (for downscaling with anti-aliasing)
//!
//! Target sizes are always rounded to the nearest integer and never drop
//! below one pixel.

use crate::{TransformError, TransformResult};
use pixblend_core::Image;

/// Scaling method to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMethod {
    /// Nearest-neighbor sampling (fastest, pixelated results)
    Sampling,
    /// Bilinear interpolation (good for upscaling)
    Linear,
    /// Area mapping (best for downscaling, anti-aliased)
    #[default]
    AreaMap,
    /// Area mapping when shrinking below 0.7 in both directions,
    /// linear interpolation otherwise
    Auto,
}

fn check_factor(name: &str, factor: f32) -> TransformResult<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(TransformError::InvalidScaleFactor(format!(
            "{name} must be finite and > 0, got {factor}"
        )));
    }
    Ok(())
}

fn scaled_dim(dim: u32, factor: f64) -> u32 {
    ((f64::from(dim) * factor).round() as u32).max(1)
}

/// Scale an image by the given factors
///
/// # Arguments
/// * `image` - Input image
/// * `scale_x` - Horizontal scale factor (e.g., 2.0 = double width)
/// * `scale_y` - Vertical scale factor
/// * `method` - Scaling algorithm to use
///
/// # Errors
///
/// Returns [`TransformError::InvalidScaleFactor`] if a factor is not a
/// positive finite number.
pub fn scale(
    image: &Image,
    scale_x: f32,
    scale_y: f32,
    method: ScaleMethod,
) -> TransformResult<Image> {
    check_factor("scale_x", scale_x)?;
    check_factor("scale_y", scale_y)?;
    let width = scaled_dim(image.width(), f64::from(scale_x));
    let height = scaled_dim(image.height(), f64::from(scale_y));
    scale_to_size_with_method(image, width, height, method)
}

/// Scale an image to a specific size with [`ScaleMethod::Auto`]
///
/// # Arguments
/// * `image` - Input image
/// * `width` - Target width (0 to maintain aspect ratio)
/// * `height` - Target height (0 to maintain aspect ratio)
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if both are 0.
pub fn scale_to_size(image: &Image, width: u32, height: u32) -> TransformResult<Image> {
    let (width, height) = match (width, height) {
        (0, 0) => {
            return Err(TransformError::InvalidParameters(
                "at least one of width and height must be > 0".into(),
            ));
        }
        (0, h) => (
            scaled_dim(image.width(), f64::from(h) / f64::from(image.height())),
            h,
        ),
        (w, 0) => (
            w,
            scaled_dim(image.height(), f64::from(w) / f64::from(image.width())),
        ),
        (w, h) => (w, h),
    };
    scale_to_size_with_method(image, width, height, ScaleMethod::Auto)
}

/// Scale an image to `width`, preserving its aspect ratio.
///
/// The height becomes `round(height * width / image_width)`, at least 1.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if `width` is 0.
pub fn scale_to_width(image: &Image, width: u32, method: ScaleMethod) -> TransformResult<Image> {
    if width == 0 {
        return Err(TransformError::InvalidParameters(
            "target width must be > 0".into(),
        ));
    }
    let height = scaled_dim(
        image.height(),
        f64::from(width) / f64::from(image.width()),
    );
    scale_to_size_with_method(image, width, height, method)
}

/// Scale an image using nearest-neighbor sampling
///
/// # Arguments
/// * `image` - Input image
/// * `scale_x` - Horizontal scale factor
/// * `scale_y` - Vertical scale factor
pub fn scale_by_sampling(image: &Image, scale_x: f32, scale_y: f32) -> TransformResult<Image> {
    scale(image, scale_x, scale_y, ScaleMethod::Sampling)
}

/// Resample an image to exactly `width x height` with the given method.
///
/// An unchanged size returns a cheap clone.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if either target
/// dimension is 0.
pub fn scale_to_size_with_method(
    image: &Image,
    width: u32,
    height: u32,
    method: ScaleMethod,
) -> TransformResult<Image> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidParameters(format!(
            "target size must be non-zero, got {width}x{height}"
        )));
    }
    if width == image.width() && height == image.height() {
        return Ok(image.clone());
    }

    let method = match method {
        ScaleMethod::Auto => {
            let sx = f64::from(width) / f64::from(image.width());
            let sy = f64::from(height) / f64::from(image.height());
            if sx < 0.7 && sy < 0.7 {
                ScaleMethod::AreaMap
            } else {
                ScaleMethod::Linear
            }
        }
        m => m,
    };

    let data = match method {
        ScaleMethod::Sampling => scale_sampling(image, width, height),
        ScaleMethod::Linear => scale_linear(image, width, height),
        ScaleMethod::AreaMap | ScaleMethod::Auto => scale_area_map(image, width, height),
    };
    Ok(Image::from_vec(width, height, image.channels(), data)?)
}

/// Nearest neighbor: destination (x, y) reads source `(x * ws / wd, y * hs / hd)`.
fn scale_sampling(image: &Image, width: u32, height: u32) -> Vec<u8> {
    let spp = image.spp() as usize;
    let ws = image.width() as u64;
    let hs = image.height() as u64;
    let xmap: Vec<usize> = (0..u64::from(width))
        .map(|x| (x * ws / u64::from(width)) as usize)
        .collect();

    let mut data = Vec::with_capacity(width as usize * height as usize * spp);
    for y in 0..u64::from(height) {
        let row = image.row((y * hs / u64::from(height)) as u32);
        for &sx in &xmap {
            data.extend_from_slice(&row[sx * spp..(sx + 1) * spp]);
        }
    }
    data
}

/// Source taps `(lo, hi, frac)` for linear interpolation along one axis,
/// using pixel-center alignment.
fn linear_taps(src: u32, dst: u32) -> Vec<(usize, usize, f64)> {
    let ratio = f64::from(src) / f64::from(dst);
    let last = src as usize - 1;
    (0..dst)
        .map(|d| {
            let pos = ((f64::from(d) + 0.5) * ratio - 0.5).max(0.0);
            let lo = (pos.floor() as usize).min(last);
            let hi = (lo + 1).min(last);
            (lo, hi, pos - lo as f64)
        })
        .collect()
}

fn scale_linear(image: &Image, width: u32, height: u32) -> Vec<u8> {
    let spp = image.spp() as usize;
    let xtaps = linear_taps(image.width(), width);
    let ytaps = linear_taps(image.height(), height);

    let mut data = Vec::with_capacity(width as usize * height as usize * spp);
    for &(y0, y1, fy) in &ytaps {
        let r0 = image.row(y0 as u32);
        let r1 = image.row(y1 as u32);
        for &(x0, x1, fx) in &xtaps {
            for c in 0..spp {
                let top = lerp(r0[x0 * spp + c], r0[x1 * spp + c], fx);
                let bottom = lerp(r1[x0 * spp + c], r1[x1 * spp + c], fx);
                let v = top + (bottom - top) * fy;
                data.push(v.round().clamp(0.0, 255.0) as u8);
            }
        }
    }
    data
}

#[inline]
fn lerp(a: u8, b: u8, t: f64) -> f64 {
    let a = f64::from(a);
    a + (f64::from(b) - a) * t
}

/// Source pixels and normalized coverage weights for each destination
/// pixel along one axis.
///
/// Destination pixel `d` covers the source interval `[d * r, (d + 1) * r)`
/// with `r = src / dst`; each overlapped source pixel is weighted by the
/// length of its overlap.
fn area_taps(src: u32, dst: u32) -> Vec<Vec<(usize, f64)>> {
    let ratio = f64::from(src) / f64::from(dst);
    (0..dst)
        .map(|d| {
            let start = f64::from(d) * ratio;
            let end = (f64::from(d) + 1.0) * ratio;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src as usize);
            let mut taps: Vec<(usize, f64)> = (first..last)
                .map(|s| {
                    let lo = start.max(s as f64);
                    let hi = end.min(s as f64 + 1.0);
                    (s, (hi - lo).max(0.0))
                })
                .filter(|&(_, w)| w > 0.0)
                .collect();
            let total: f64 = taps.iter().map(|&(_, w)| w).sum();
            for tap in &mut taps {
                tap.1 /= total;
            }
            taps
        })
        .collect()
}

fn scale_area_map(image: &Image, width: u32, height: u32) -> Vec<u8> {
    let spp = image.spp() as usize;
    let xtaps = area_taps(image.width(), width);
    let ytaps = area_taps(image.height(), height);

    let mut acc = vec![0.0f64; spp];
    let mut data = Vec::with_capacity(width as usize * height as usize * spp);
    for yt in &ytaps {
        for xt in &xtaps {
            acc.fill(0.0);
            for &(sy, wy) in yt {
                let row = image.row(sy as u32);
                for &(sx, wx) in xt {
                    let w = wx * wy;
                    for (c, a) in acc.iter_mut().enumerate() {
                        *a += w * f64::from(row[sx * spp + c]);
                    }
                }
            }
            data.extend(acc.iter().map(|v| v.round().clamp(0.0, 255.0) as u8));
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixblend_core::Channels;

    fn gray(width: u32, values: &[u8]) -> Image {
        let height = values.len() as u32 / width;
        Image::from_vec(width, height, Channels::Gray, values.to_vec()).unwrap()
    }

    #[test]
    fn test_scale_to_width_preserves_aspect() {
        let bg = Image::new(100, 50, Channels::Rgb).unwrap();
        let scaled = scale_to_width(&bg, 200, ScaleMethod::AreaMap).unwrap();
        assert_eq!((scaled.width(), scaled.height()), (200, 100));
        assert_eq!(scaled.channels(), Channels::Rgb);
    }

    #[test]
    fn test_scale_to_width_rounds_height() {
        // 3 * 2 / 4 = 1.5 rounds to 2
        let image = Image::new(4, 3, Channels::Gray).unwrap();
        let scaled = scale_to_width(&image, 2, ScaleMethod::Sampling).unwrap();
        assert_eq!(scaled.height(), 2);
        assert!(scale_to_width(&image, 0, ScaleMethod::Sampling).is_err());
    }

    #[test]
    fn test_sampling_doubles_pixels() {
        let image = gray(2, &[10, 20, 30, 40]);
        let up = scale_by_sampling(&image, 2.0, 2.0).unwrap();
        assert_eq!(
            up.data(),
            &[10, 10, 20, 20, 10, 10, 20, 20, 30, 30, 40, 40, 30, 30, 40, 40]
        );
    }

    #[test]
    fn test_area_map_halves_by_averaging() {
        let image = gray(4, &[0, 100, 200, 200, 0, 100, 200, 200]);
        let down = scale_to_size_with_method(&image, 2, 1, ScaleMethod::AreaMap).unwrap();
        assert_eq!(down.data(), &[50, 200]);
    }

    #[test]
    fn test_area_map_fractional_coverage() {
        // 3 -> 2: pixel 0 covers [0, 1.5), pixel 1 covers [1.5, 3)
        let image = gray(3, &[0, 90, 180]);
        let down = scale_to_size_with_method(&image, 2, 1, ScaleMethod::AreaMap).unwrap();
        assert_eq!(down.data(), &[30, 150]);
    }

    #[test]
    fn test_linear_upscale_interpolates() {
        let image = gray(2, &[0, 100]);
        let up = scale_to_size_with_method(&image, 4, 1, ScaleMethod::Linear).unwrap();
        assert_eq!(up.data(), &[0, 25, 75, 100]);
    }

    #[test]
    fn test_constant_image_stays_constant() {
        let image = Image::new_filled(7, 5, Channels::Rgb, 123).unwrap();
        for method in [
            ScaleMethod::Sampling,
            ScaleMethod::Linear,
            ScaleMethod::AreaMap,
            ScaleMethod::Auto,
        ] {
            let scaled = scale(&image, 1.7, 0.4, method).unwrap();
            assert!(scaled.data().iter().all(|&v| v == 123), "{method:?}");
        }
    }

    #[test]
    fn test_identity_size_is_shared() {
        let image = Image::new(5, 5, Channels::Gray).unwrap();
        let same = scale(&image, 1.0, 1.0, ScaleMethod::Linear).unwrap();
        assert_eq!(image.data().as_ptr(), same.data().as_ptr());
    }

    #[test]
    fn test_invalid_factors() {
        let image = Image::new(5, 5, Channels::Gray).unwrap();
        assert!(matches!(
            scale(&image, 0.0, 1.0, ScaleMethod::Linear),
            Err(TransformError::InvalidScaleFactor(_))
        ));
        assert!(scale(&image, 1.0, f32::NAN, ScaleMethod::Linear).is_err());
        assert!(scale_to_size(&image, 0, 0).is_err());
    }

    #[test]
    fn test_scale_to_size_keeps_aspect_for_zero() {
        let image = Image::new(40, 20, Channels::Gray).unwrap();
        let scaled = scale_to_size(&image, 10, 0).unwrap();
        assert_eq!((scaled.width(), scaled.height()), (10, 5));
        let scaled = scale_to_size(&image, 0, 40).unwrap();
        assert_eq!((scaled.width(), scaled.height()), (80, 40));
    }
}
