//! pixblend Color - Luminance and thresholding
//!
//! This crate provides:
//!
//! - **Luminance conversion** ([`colorspace`]): RGB to single-channel gray
//! - **Thresholding** ([`threshold`]): Global and adaptive binarization

pub mod colorspace;
pub mod error;
pub mod threshold;

// Re-export core types
pub use pixblend_core;

// Re-export error types
pub use error::{ColorError, ColorResult};

pub use colorspace::{convert_to_gray, rgb_to_gray};

// Re-export threshold functions
pub use threshold::{
    // Types
    AdaptiveMethod,
    AdaptiveThresholdOptions,
    ThresholdType,
    // Functions
    adaptive_threshold,
    adaptive_threshold_with_options,
    global_threshold,
    threshold_to_mask,
    threshold_with_type,
};
