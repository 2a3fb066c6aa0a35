//! pixblend-transform - Geometric resampling
//!
//! This crate provides image scaling with nearest-neighbor sampling,
//! bilinear interpolation and area mapping, including the
//! aspect-preserving [`scale_to_width`] used to fit a background to a
//! foreground.

mod error;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use scale::{
    ScaleMethod, scale, scale_by_sampling, scale_to_size, scale_to_size_with_method,
    scale_to_width,
};
