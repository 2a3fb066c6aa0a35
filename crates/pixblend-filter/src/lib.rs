//! pixblend-filter - Local-mean filters
//!
//! This crate provides the neighbourhood statistics used by adaptive
//! thresholding:
//!
//! - Block (box) mean via integral images, O(1) per pixel
//! - Gaussian-weighted mean via separable convolution
//!
//! Both replicate edge samples at the image border.

pub mod block_conv;
mod error;
pub mod gauss;

pub use error::{FilterError, FilterResult};

// Re-export commonly used functions
pub use block_conv::{
    Accumulator, add_border_replicate, blockconv, blockconv_accum, blockconv_gray,
};
pub use gauss::{default_sigma, gaussian_blur_gray, gaussian_kernel};
