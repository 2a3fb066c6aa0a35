//! Gaussian-weighted local mean
//!
//! Separable Gaussian smoothing of single-channel images with edge
//! replication at the border. Used as the weighted neighbourhood mean of
//! Gaussian adaptive thresholding.

use crate::block_conv::check_gray;
use crate::{FilterError, FilterResult};
use pixblend_core::{Channels, Image};

/// Sigma derived from the kernel size when none is given:
/// `0.3 * ((size - 1) * 0.5 - 1) + 0.8`
pub fn default_sigma(size: u32) -> f64 {
    0.3 * ((f64::from(size) - 1.0) * 0.5 - 1.0) + 0.8
}

/// Build a normalized 1-D Gaussian kernel of odd `size`.
///
/// A `sigma <= 0.0` selects [`default_sigma`]. The weights sum to 1.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] if `size` is even or 0, or if
/// `sigma` is not finite.
pub fn gaussian_kernel(size: u32, sigma: f64) -> FilterResult<Vec<f64>> {
    let folded = FoldedKernel::new(size, sigma, size)?;
    Ok(folded.weights)
}

/// Gaussian weights folded onto an axis of `extent` samples.
///
/// `weights` covers offsets `-r..=r` with `r = min(size / 2, extent - 1)`.
/// Any offset beyond `r` lands past the axis end for every position, so
/// under edge replication it reads the edge sample; `tail` is the total
/// weight of those offsets on one side.
struct FoldedKernel {
    weights: Vec<f64>,
    tail: f64,
}

impl FoldedKernel {
    fn new(size: u32, sigma: f64, extent: u32) -> FilterResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(FilterError::InvalidParameters(format!(
                "gaussian kernel size must be odd, got {size}"
            )));
        }
        if !sigma.is_finite() {
            return Err(FilterError::InvalidParameters(format!(
                "gaussian sigma must be finite, got {sigma}"
            )));
        }
        let sigma = if sigma <= 0.0 {
            default_sigma(size)
        } else {
            sigma
        };

        let half = i64::from(size / 2);
        let r = half.min(i64::from(extent) - 1);
        let scale = -0.5 / (sigma * sigma);
        let weight = |i: i64| (scale * (i as f64) * (i as f64)).exp();

        let mut weights: Vec<f64> = (-r..=r).map(weight).collect();
        let mut tail: f64 = (r + 1..=half).map(weight).sum();
        let total = weights.iter().sum::<f64>() + 2.0 * tail;
        for w in &mut weights {
            *w /= total;
        }
        tail /= total;
        Ok(Self { weights, tail })
    }

    /// Weighted sum around `pos` of an axis of `len` samples read through
    /// `at`, replicating the edge samples.
    fn apply(&self, pos: usize, len: usize, at: impl Fn(usize) -> f64) -> f64 {
        let r = (self.weights.len() / 2) as i64;
        let last = len as i64 - 1;
        let mut acc = self.tail * (at(0) + at(len - 1));
        for (i, &wt) in self.weights.iter().enumerate() {
            let idx = (pos as i64 + i as i64 - r).clamp(0, last) as usize;
            acc += wt * at(idx);
        }
        acc
    }
}

/// Gaussian-weighted mean of a single-channel image.
///
/// Applies a `size x size` separable Gaussian (horizontal pass then
/// vertical pass) with edge replication and rounds to the nearest integer.
/// The kernel may be larger than the image: weight falling beyond the
/// image is folded onto the edge samples, so no padded copy is built.
///
/// # Errors
///
/// Returns [`FilterError::UnsupportedChannels`] for multi-channel input,
/// or [`FilterError::InvalidParameters`] for a bad kernel size or sigma.
pub fn gaussian_blur_gray(image: &Image, size: u32, sigma: f64) -> FilterResult<Image> {
    check_gray(image)?;
    let horizontal = FoldedKernel::new(size, sigma, image.width())?;
    let vertical = FoldedKernel::new(size, sigma, image.height())?;
    if size / 2 == 0 {
        return Ok(image.deep_clone());
    }

    let w = image.width() as usize;
    let h = image.height() as usize;

    let mut horiz = vec![0.0f64; w * h];
    for y in 0..h {
        let row = image.row(y as u32);
        for x in 0..w {
            horiz[y * w + x] = horizontal.apply(x, w, |i| f64::from(row[i]));
        }
    }

    let mut data = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            let v = vertical.apply(y, h, |i| horiz[i * w + x]);
            data.push(v.round().clamp(0.0, 255.0) as u8);
        }
    }

    Ok(Image::from_vec(
        image.width(),
        image.height(),
        Channels::Gray,
        data,
    )?)
}
