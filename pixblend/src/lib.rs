//! pixblend - Pixel-level image operations and compositing
//!
//! # Overview
//!
//! - Saturating pixel arithmetic and contrast scaling ([`Image`] methods)
//! - Bitwise AND/OR/XOR/NOT with optional masks ([`Image`], [`Mask`])
//! - Global and adaptive thresholding ([`color`])
//! - Local mean and Gaussian filters ([`filter`])
//! - Resampling ([`transform`])
//! - PNG/JPEG/PNM decoding and encoding ([`io`])
//! - Mask-based foreground/background compositing ([`composite`])
//!
//! # Example
//!
//! ```
//! use pixblend::{Channels, Image};
//!
//! let image = Image::new_filled(4, 4, Channels::Rgb, 100).unwrap();
//! let brighter = image.add_constant(50);
//! assert!(brighter.data().iter().all(|&v| v == 150));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use pixblend_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use pixblend_color as color;
pub use pixblend_composite as composite;
pub use pixblend_filter as filter;
pub use pixblend_io as io;
pub use pixblend_transform as transform;
