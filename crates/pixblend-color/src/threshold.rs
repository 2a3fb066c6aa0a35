//! Binary thresholding
//!
//! Provides methods for converting single-channel images to two-level
//! images (`0` / `max_val`):
//! - Fixed (global) threshold
//! - Adaptive (local) threshold against a box or Gaussian neighbourhood mean
//!
//! All thresholders reject multi-channel input; convert with
//! [`convert_to_gray`](crate::colorspace::convert_to_gray) first.

use crate::{ColorError, ColorResult};
use pixblend_core::{Channels, Image, Mask};
use pixblend_filter::{blockconv_gray, gaussian_blur_gray};

/// How a thresholder maps the comparison to output values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdType {
    /// `max_val` where the sample passes the test, else 0
    #[default]
    Binary,
    /// 0 where the sample passes the test, else `max_val`
    BinaryInv,
}

/// Method for adaptive threshold computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdaptiveMethod {
    /// Use mean of local window
    #[default]
    Mean,
    /// Use Gaussian-weighted mean
    Gaussian,
}

/// Options for adaptive thresholding
#[derive(Debug, Clone)]
pub struct AdaptiveThresholdOptions {
    /// Output value for pixels that pass the test
    pub max_val: u8,
    /// Size of the local window (odd, >= 3)
    pub block_size: u32,
    /// Constant subtracted from the local mean
    pub c: f32,
    /// Method for computing the local mean
    pub method: AdaptiveMethod,
    /// Output polarity
    pub threshold_type: ThresholdType,
}

impl Default for AdaptiveThresholdOptions {
    fn default() -> Self {
        Self {
            max_val: 255,
            block_size: 11,
            c: 7.0,
            method: AdaptiveMethod::Mean,
            threshold_type: ThresholdType::Binary,
        }
    }
}

fn check_gray(image: &Image) -> ColorResult<()> {
    if image.channels() != Channels::Gray {
        return Err(ColorError::InvalidParameters(format!(
            "thresholding requires a single-channel image, got {} channels",
            image.spp()
        )));
    }
    Ok(())
}

fn map_samples(image: &Image, f: impl Fn(usize, u8) -> u8) -> ColorResult<Image> {
    let data = image
        .data()
        .iter()
        .enumerate()
        .map(|(i, &v)| f(i, v))
        .collect();
    Ok(Image::from_vec(
        image.width(),
        image.height(),
        Channels::Gray,
        data,
    )?)
}

/// Threshold a single-channel image with a fixed cutoff.
///
/// Samples strictly greater than `thresh` become `max_val`; all others
/// become 0.
///
/// # Errors
///
/// Returns [`ColorError::InvalidParameters`] for multi-channel input.
///
/// # Example
///
/// ```
/// use pixblend_core::{Channels, Image};
/// use pixblend_color::global_threshold;
///
/// let image = Image::from_vec(4, 1, Channels::Gray, vec![10, 200, 10, 200]).unwrap();
/// let binary = global_threshold(&image, 100, 255).unwrap();
/// assert_eq!(binary.data(), &[0, 255, 0, 255]);
/// ```
pub fn global_threshold(image: &Image, thresh: u8, max_val: u8) -> ColorResult<Image> {
    threshold_with_type(image, thresh, max_val, ThresholdType::Binary)
}

/// Threshold a single-channel image with a fixed cutoff and polarity.
///
/// # Errors
///
/// Returns [`ColorError::InvalidParameters`] for multi-channel input.
pub fn threshold_with_type(
    image: &Image,
    thresh: u8,
    max_val: u8,
    threshold_type: ThresholdType,
) -> ColorResult<Image> {
    check_gray(image)?;
    let (above, below) = match threshold_type {
        ThresholdType::Binary => (max_val, 0),
        ThresholdType::BinaryInv => (0, max_val),
    };
    map_samples(image, |_, v| if v > thresh { above } else { below })
}

/// Threshold a single-channel image into a [`Mask`].
///
/// Samples strictly greater than `thresh` are selected.
///
/// # Errors
///
/// Returns [`ColorError::InvalidParameters`] for multi-channel input.
pub fn threshold_to_mask(image: &Image, thresh: u8) -> ColorResult<Mask> {
    let binary = global_threshold(image, thresh, 255)?;
    Ok(Mask::try_from(binary)?)
}

/// Threshold a single-channel image against its local block mean.
///
/// The mean of each `block_size x block_size` neighbourhood (edge samples
/// replicated) is rounded to the nearest integer before the comparison, so
/// a pixel becomes `max_val` when `pixel > round(mean) - ceil(c)`. A pixel
/// that exceeds the exact mean by less than half a level can therefore
/// still map to 0. Any odd `block_size >= 3` is accepted, including
/// windows larger than the image.
///
/// Equivalent to [`adaptive_threshold_with_options`] with the
/// [`AdaptiveMethod::Mean`] method and [`ThresholdType::Binary`] output.
pub fn adaptive_threshold(
    image: &Image,
    max_val: u8,
    block_size: u32,
    c: f32,
) -> ColorResult<Image> {
    adaptive_threshold_with_options(
        image,
        &AdaptiveThresholdOptions {
            max_val,
            block_size,
            c,
            ..Default::default()
        },
    )
}

/// Threshold a single-channel image against a local neighbourhood mean.
///
/// For each pixel the mean `m` of its `block_size x block_size`
/// neighbourhood is computed (box or Gaussian weighted, edge samples
/// replicated at the border) and rounded to an integer. With
/// [`ThresholdType::Binary`] the pixel becomes `max_val` if
/// `pixel > m - ceil(c)`, otherwise 0. [`ThresholdType::BinaryInv`] gives
/// `max_val` if `pixel <= m - floor(c)`.
///
/// # Errors
///
/// Returns [`ColorError::InvalidParameters`] if `block_size` is even or
/// below 3, if `c` is not finite, or if the image is multi-channel.
pub fn adaptive_threshold_with_options(
    image: &Image,
    options: &AdaptiveThresholdOptions,
) -> ColorResult<Image> {
    check_gray(image)?;
    let block_size = options.block_size;
    if block_size < 3 || block_size % 2 == 0 {
        return Err(ColorError::InvalidParameters(format!(
            "block_size must be odd and >= 3, got {block_size}"
        )));
    }
    if !options.c.is_finite() {
        return Err(ColorError::InvalidParameters(format!(
            "c must be finite, got {}",
            options.c
        )));
    }

    let half = block_size / 2;
    let mean = match options.method {
        AdaptiveMethod::Mean => blockconv_gray(image, half, half)?,
        AdaptiveMethod::Gaussian => gaussian_blur_gray(image, block_size, 0.0)?,
    };
    let means = mean.data();
    let max_val = options.max_val;

    match options.threshold_type {
        ThresholdType::Binary => {
            let delta = options.c.ceil() as i32;
            map_samples(image, |i, v| {
                if i32::from(v) - i32::from(means[i]) > -delta {
                    max_val
                } else {
                    0
                }
            })
        }
        ThresholdType::BinaryInv => {
            let delta = options.c.floor() as i32;
            map_samples(image, |i, v| {
                if i32::from(v) - i32::from(means[i]) <= -delta {
                    max_val
                } else {
                    0
                }
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, values: &[u8]) -> Image {
        let height = values.len() as u32 / width;
        Image::from_vec(width, height, Channels::Gray, values.to_vec()).unwrap()
    }

    #[test]
    fn test_global_threshold_4x4() {
        let row = [10u8, 200, 10, 200];
        let image = gray(4, &row.repeat(4));
        let binary = global_threshold(&image, 100, 255).unwrap();
        assert_eq!(binary.data(), [0u8, 255, 0, 255].repeat(4).as_slice());
    }

    #[test]
    fn test_global_threshold_is_strict() {
        let image = gray(3, &[99, 100, 101]);
        let binary = global_threshold(&image, 100, 7).unwrap();
        assert_eq!(binary.data(), &[0, 0, 7]);
    }

    #[test]
    fn test_binary_inv() {
        let image = gray(3, &[99, 100, 101]);
        let binary = threshold_with_type(&image, 100, 255, ThresholdType::BinaryInv).unwrap();
        assert_eq!(binary.data(), &[255, 255, 0]);
    }

    #[test]
    fn test_threshold_to_mask() {
        let image = gray(2, &[0, 128, 127, 255]);
        let mask = threshold_to_mask(&image, 127).unwrap();
        assert_eq!(mask.data(), &[0, 255, 0, 255]);
        assert_eq!(mask.count_selected(), 2);
    }

    #[test]
    fn test_rejects_color() {
        let image = Image::new(2, 2, Channels::Rgb).unwrap();
        assert!(matches!(
            global_threshold(&image, 100, 255),
            Err(ColorError::InvalidParameters(_))
        ));
        assert!(matches!(
            adaptive_threshold(&image, 255, 3, 0.0),
            Err(ColorError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_adaptive_rejects_bad_block_size() {
        let image = gray(4, &[0; 16]);
        for bad in [0, 1, 2, 4, 10] {
            assert!(matches!(
                adaptive_threshold(&image, 255, bad, 7.0),
                Err(ColorError::InvalidParameters(_))
            ));
        }
        assert!(adaptive_threshold(&image, 255, 3, f32::NAN).is_err());
    }

    #[test]
    fn test_adaptive_flat_image() {
        // pixel == mean, so pixel > mean - c holds for c > 0 and fails for c <= 0
        let image = Image::new_filled(6, 6, Channels::Gray, 90).unwrap();
        let on = adaptive_threshold(&image, 255, 3, 2.0).unwrap();
        assert!(on.data().iter().all(|&v| v == 255));
        let off = adaptive_threshold(&image, 255, 3, 0.0).unwrap();
        assert!(off.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_adaptive_detects_dark_dot() {
        let mut values = vec![200u8; 25];
        values[12] = 100;
        let image = gray(5, &values);
        let binary = adaptive_threshold(&image, 255, 3, 7.0).unwrap();
        assert_eq!(binary.get_sample(2, 2, 0), Some(0));
        assert_eq!(binary.get_sample(0, 0, 0), Some(255));
        assert_eq!(binary.get_sample(1, 1, 0), Some(255));
    }

    #[test]
    fn test_adaptive_gaussian_and_inverse() {
        let mut values = vec![200u8; 25];
        values[12] = 100;
        let image = gray(5, &values);
        let opts = AdaptiveThresholdOptions {
            method: AdaptiveMethod::Gaussian,
            block_size: 3,
            ..Default::default()
        };
        let binary = adaptive_threshold_with_options(&image, &opts).unwrap();
        assert_eq!(binary.get_sample(2, 2, 0), Some(0));
        assert_eq!(binary.get_sample(4, 4, 0), Some(255));

        let inv = adaptive_threshold_with_options(
            &image,
            &AdaptiveThresholdOptions {
                threshold_type: ThresholdType::BinaryInv,
                ..opts
            },
        )
        .unwrap();
        for (a, b) in binary.data().iter().zip(inv.data()) {
            assert_eq!(u16::from(*a) + u16::from(*b), 255);
        }
    }

    #[test]
    fn test_adaptive_compares_rounded_mean() {
        // Centre mean is 100.67, rounded to 101, and 101 > 101 - 0 fails
        let image = gray(3, &[101, 101, 100]);
        let binary = adaptive_threshold(&image, 255, 3, 0.0).unwrap();
        assert_eq!(binary.get_sample(1, 0, 0), Some(0));
        let binary = adaptive_threshold(&image, 255, 3, 1.0).unwrap();
        assert_eq!(binary.get_sample(1, 0, 0), Some(255));
    }

    #[test]
    fn test_adaptive_block_larger_than_image() {
        let image = Image::new_filled(4, 4, Channels::Gray, 120).unwrap();
        let binary = adaptive_threshold(&image, 255, u32::MAX, 1.0).unwrap();
        assert_eq!((binary.width(), binary.height()), (4, 4));
        assert!(binary.data().iter().all(|&v| v == 255));

        let gauss = adaptive_threshold_with_options(
            &image,
            &AdaptiveThresholdOptions {
                block_size: 100_001,
                c: 1.0,
                method: AdaptiveMethod::Gaussian,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(gauss.data().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_default_options() {
        let opts = AdaptiveThresholdOptions::default();
        assert_eq!(opts.max_val, 255);
        assert_eq!(opts.block_size, 11);
        assert_eq!(opts.c, 7.0);
        assert_eq!(opts.method, AdaptiveMethod::Mean);
        assert_eq!(opts.threshold_type, ThresholdType::Binary);
    }
}
