//! pixblend Core - Image container and pixel operations
//!
//! This crate provides the fundamental data structures and sample-wise
//! operations used throughout the pixblend library:
//!
//! - [`Image`] / [`ImageMut`] - The main image container (immutable / mutable)
//! - [`Mask`] - Single-channel binary region selector
//! - [`FImage`] - Floating-point factor matrix
//! - Saturating arithmetic ([`image::arith`])
//! - Bitwise raster operations with optional masks ([`image::rop`])
//! - Channel layout conversions ([`image::convert`])

pub mod error;
pub mod fimage;
pub mod image;
pub mod mask;

pub use error::{Error, Result};
pub use fimage::FImage;
pub use image::{Channels, Image, ImageMut, RopOp, Shape};
pub use mask::{MASK_OFF, MASK_ON, Mask};
