//! Synthetic test images
//!
//! No binary test data ships with the workspace, so regression tests build
//! their inputs here. Every generator is deterministic.

use pixblend_core::{Channels, Image};

/// Background color of the [`logo`] fixture (dark blue, luminance < 127)
pub const LOGO_BACKGROUND: [u8; 3] = [30, 40, 120];
/// Lettering color of the [`logo`] fixture
pub const LOGO_LETTERING: [u8; 3] = [255, 255, 255];

fn build(width: u32, height: u32, channels: Channels, f: impl Fn(u32, u32) -> Vec<u8>) -> Image {
    let mut data = Vec::with_capacity((width * height * channels.count()) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend(f(x, y));
        }
    }
    Image::from_vec(width, height, channels, data).expect("fixture dimensions are valid")
}

fn ramp(pos: u32, len: u32) -> u8 {
    if len <= 1 {
        0
    } else {
        (pos * 255 / (len - 1)) as u8
    }
}

/// Horizontal gray ramp from 0 at the left edge to 255 at the right edge.
pub fn gradient(width: u32, height: u32) -> Image {
    build(width, height, Channels::Gray, |x, _| vec![ramp(x, width)])
}

/// RGB gradient: red follows x, green follows y, blue is constant 128.
pub fn rgb_gradient(width: u32, height: u32) -> Image {
    build(width, height, Channels::Rgb, |x, y| {
        vec![ramp(x, width), ramp(y, height), 128]
    })
}

/// Vertical gray stripes alternating `lo` and `hi` every `period` columns.
pub fn stripes(width: u32, height: u32, period: u32, lo: u8, hi: u8) -> Image {
    build(width, height, Channels::Gray, |x, _| {
        vec![if (x / period) % 2 == 0 { lo } else { hi }]
    })
}

/// Gray checkerboard of `cell x cell` squares, `lo` at the origin.
pub fn checkerboard(width: u32, height: u32, cell: u32, lo: u8, hi: u8) -> Image {
    build(width, height, Channels::Gray, |x, y| {
        vec![if (x / cell + y / cell) % 2 == 0 { lo } else { hi }]
    })
}

/// Whether (x, y) lies on the lettering of a `width x height` [`logo`].
///
/// The lettering is three vertical bars and a crossbar, loosely an "H"
/// followed by an "I".
pub fn is_logo_lettering(x: u32, y: u32, width: u32, height: u32) -> bool {
    let top = height / 4;
    let bottom = height - height / 4;
    if y < top || y >= bottom {
        return false;
    }
    let unit = (width / 8).max(1);
    let bar = |start: u32| x >= start * unit && x < (start + 1) * unit;
    let crossbar = x >= unit && x < 4 * unit && y >= height / 2 - 1 && y <= height / 2;
    bar(1) || bar(3) || bar(6) || crossbar
}

/// RGB logo: white lettering on a dark background.
pub fn logo(width: u32, height: u32) -> Image {
    build(width, height, Channels::Rgb, |x, y| {
        if is_logo_lettering(x, y, width, height) {
            LOGO_LETTERING.to_vec()
        } else {
            LOGO_BACKGROUND.to_vec()
        }
    })
}

/// Noisy-looking but deterministic gray "scan": a slow illumination ramp
/// with dark ink strokes every `period` pixels.
///
/// Useful for adaptive thresholding, where a single global cutoff fails.
pub fn uneven_scan(width: u32, height: u32, period: u32) -> Image {
    build(width, height, Channels::Gray, |x, y| {
        let paper = 90 + (x * 150 / width.max(1)) as u8;
        let ink = x % period == 0 || y % period == 0;
        vec![if ink { paper.saturating_sub(60) } else { paper }]
    })
}
