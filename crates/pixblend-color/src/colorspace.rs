//! Luminance conversion
//!
//! Reduces color images to a single gray channel using ITU-R BT.601
//! weights in 14-bit fixed point:
//!
//! `gray = (4899*R + 9617*G + 1868*B + 8192) >> 14`
//!
//! which is `0.299*R + 0.587*G + 0.114*B` rounded to nearest.

use crate::ColorResult;
use pixblend_core::{Channels, Image};

const SHIFT: u32 = 14;
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;

/// Convert one RGB pixel to gray using BT.601 luminance weights.
#[inline]
pub fn rgb_to_gray(r: u8, g: u8, b: u8) -> u8 {
    let sum = R_WEIGHT * u32::from(r) + G_WEIGHT * u32::from(g) + B_WEIGHT * u32::from(b);
    ((sum + (1 << (SHIFT - 1))) >> SHIFT) as u8
}

/// Convert an image to single-channel gray.
///
/// - Gray: returned as a cheap clone
/// - GrayAlpha: alpha is dropped
/// - Rgb / Rgba: luminance of R, G and B; alpha is ignored
pub fn convert_to_gray(image: &Image) -> ColorResult<Image> {
    let spp = image.spp() as usize;
    let data: Vec<u8> = match image.channels() {
        Channels::Gray => return Ok(image.clone()),
        Channels::GrayAlpha => return Ok(image.remove_alpha()),
        Channels::Rgb | Channels::Rgba => image
            .data()
            .chunks_exact(spp)
            .map(|px| rgb_to_gray(px[0], px[1], px[2]))
            .collect(),
    };
    Ok(Image::from_vec(
        image.width(),
        image.height(),
        Channels::Gray,
        data,
    )?)
}
