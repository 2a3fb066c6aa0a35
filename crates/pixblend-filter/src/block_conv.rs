//! Block convolution using integral images (summed area tables)
//!
//! Fast block average filter that runs in O(1) per pixel regardless of
//! kernel size, by precomputing an integral image (accumulator) of the
//! source. Pixels near the border average over a full window in which
//! out-of-range samples repeat the nearest edge sample; the repeated
//! samples are counted by weighting the edge rows and columns, so no
//! padded copy is built and the window may be arbitrarily large.

use crate::{FilterError, FilterResult};
use pixblend_core::{Channels, Image};

/// Validate that the input image is single-channel.
pub(crate) fn check_gray(image: &Image) -> FilterResult<()> {
    if image.channels() != Channels::Gray {
        return Err(FilterError::UnsupportedChannels {
            expected: "1 channel",
            actual: image.spp(),
        });
    }
    Ok(())
}

/// Integral image of a single-channel image.
///
/// Holds `(width + 1) x (height + 1)` sums with a leading row and column
/// of zeros, so `sum(x, y)` is the total of all samples strictly above and
/// to the left of (x, y).
#[derive(Debug, Clone)]
pub struct Accumulator {
    width: u32,
    height: u32,
    sums: Vec<u64>,
}

impl Accumulator {
    /// Width of the accumulated image.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the accumulated image.
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn sum(&self, x: u32, y: u32) -> u64 {
        self.sums[y as usize * (self.width as usize + 1) + x as usize]
    }

    /// Sum of the samples in the half-open rectangle `[x0, x1) x [y0, y1)`.
    ///
    /// # Panics
    ///
    /// Panics if the rectangle extends past the accumulated image.
    #[inline]
    pub fn rect_sum(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> u64 {
        self.sum(x1, y1) + self.sum(x0, y0) - self.sum(x1, y0) - self.sum(x0, y1)
    }
}

/// Build an integral image (summed area table) from a single-channel image.
///
/// The recursion is: `a(x+1, y+1) = v(x, y) + a(x, y+1) + a(x+1, y) - a(x, y)`
pub fn blockconv_accum(image: &Image) -> FilterResult<Accumulator> {
    check_gray(image)?;

    let w = image.width() as usize;
    let h = image.height() as usize;
    let stride = w + 1;
    let mut sums = vec![0u64; stride * (h + 1)];

    for y in 0..h {
        let row = image.row(y as u32);
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += u64::from(row[x]);
            sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row_sum;
        }
    }

    Ok(Accumulator {
        width: image.width(),
        height: image.height(),
        sums,
    })
}

/// Add a border of `bx` columns and `by` rows on every side, replicating
/// the nearest edge sample.
///
/// Works for any channel layout. The border may be wider than the image.
pub fn add_border_replicate(image: &Image, bx: u32, by: u32) -> FilterResult<Image> {
    if bx == 0 && by == 0 {
        return Ok(image.clone());
    }
    let w = image.width();
    let h = image.height();
    let spp = image.spp() as usize;
    let padded = |len: u32, border: u32| {
        border
            .checked_mul(2)
            .and_then(|b| b.checked_add(len))
            .ok_or_else(|| {
                FilterError::InvalidParameters(format!(
                    "border {border} too large for dimension {len}"
                ))
            })
    };
    let out_w = padded(w, bx)?;
    let out_h = padded(h, by)?;
    let len = (out_w as usize)
        .checked_mul(out_h as usize)
        .and_then(|n| n.checked_mul(spp))
        .ok_or_else(|| {
            FilterError::InvalidParameters(format!("padded size {out_w}x{out_h} overflows"))
        })?;

    let mut data = Vec::with_capacity(len);
    for oy in 0..out_h {
        let sy = oy.saturating_sub(by).min(h - 1);
        let row = image.row(sy);
        for ox in 0..out_w {
            let sx = ox.saturating_sub(bx).min(w - 1) as usize;
            data.extend_from_slice(&row[sx * spp..(sx + 1) * spp]);
        }
    }

    Ok(Image::from_vec(out_w, out_h, image.channels(), data)?)
}

/// Clipped extent of a window along one axis.
///
/// `first..=last` is the in-image part; `before` and `after` count the
/// window positions that fall off each end and therefore repeat the edge
/// sample at index 0 or `len - 1`.
struct WindowSpan {
    first: u32,
    last: u32,
    before: u64,
    after: u64,
}

impl WindowSpan {
    fn new(pos: u32, half: u32, len: u32) -> Self {
        let lo = i64::from(pos) - i64::from(half);
        let hi = i64::from(pos) + i64::from(half);
        let end = i64::from(len) - 1;
        Self {
            first: lo.max(0) as u32,
            last: hi.min(end) as u32,
            before: (-lo).max(0) as u64,
            after: (hi - end).max(0) as u64,
        }
    }

    /// `(start, end_exclusive, weight)` pieces whose weighted sums add up
    /// to the replicated sum along this axis.
    fn pieces(&self, len: u32) -> [(u32, u32, u64); 3] {
        [
            (self.first, self.last + 1, 1),
            (0, 1, self.before),
            (len - 1, len, self.after),
        ]
    }
}

/// Sum of an edge-replicated window computed from the unpadded image's
/// accumulator.
fn replicated_window_sum(acc: &Accumulator, cols: &WindowSpan, rows: &WindowSpan) -> u128 {
    let mut sum = 0u128;
    for (x0, x1, wx) in cols.pieces(acc.width) {
        if wx == 0 {
            continue;
        }
        for (y0, y1, wy) in rows.pieces(acc.height) {
            if wy == 0 {
                continue;
            }
            let rect = u128::from(acc.rect_sum(x0, y0, x1, y1));
            sum += u128::from(wx) * u128::from(wy) * rect;
        }
    }
    sum
}

/// Fast block mean of a single-channel image.
///
/// `wc` and `hc` are the half-width and half-height of the window. The full
/// window is `(2*wc + 1) x (2*hc + 1)`, centered on each pixel, and the
/// border is handled by edge replication. Means are rounded to the nearest
/// integer.
///
/// If both `wc` and `hc` are 0, returns a copy of the input.
pub fn blockconv_gray(image: &Image, wc: u32, hc: u32) -> FilterResult<Image> {
    check_gray(image)?;
    if wc == 0 && hc == 0 {
        return Ok(image.deep_clone());
    }

    let acc = blockconv_accum(image)?;
    let w = image.width();
    let h = image.height();
    let area = u128::from(2 * u64::from(wc) + 1) * u128::from(2 * u64::from(hc) + 1);

    let mut data = Vec::with_capacity(w as usize * h as usize);
    for y in 0..h {
        let rows = WindowSpan::new(y, hc, h);
        for x in 0..w {
            let cols = WindowSpan::new(x, wc, w);
            let sum = replicated_window_sum(&acc, &cols, &rows);
            data.push(((2 * sum + area) / (2 * area)) as u8);
        }
    }

    Ok(Image::from_vec(w, h, Channels::Gray, data)?)
}

/// Fast block mean of an image with any channel layout.
///
/// Single-channel images go straight to [`blockconv_gray`]; otherwise each
/// channel is filtered independently and the planes are recombined.
pub fn blockconv(image: &Image, wc: u32, hc: u32) -> FilterResult<Image> {
    if image.channels() == Channels::Gray {
        return blockconv_gray(image, wc, hc);
    }
    let planes = (0..image.spp())
        .map(|c| blockconv_gray(&image.extract_channel(c)?, wc, hc))
        .collect::<FilterResult<Vec<_>>>()?;
    Ok(Image::merge_channels(&planes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, values: &[u8]) -> Image {
        let height = values.len() as u32 / width;
        Image::from_vec(width, height, Channels::Gray, values.to_vec()).unwrap()
    }

    #[test]
    fn test_accumulator_sums() {
        let image = gray(3, &[1, 2, 3, 4, 5, 6]);
        let acc = blockconv_accum(&image).unwrap();
        assert_eq!(acc.rect_sum(0, 0, 3, 2), 21);
        assert_eq!(acc.rect_sum(1, 0, 3, 1), 5);
        assert_eq!(acc.rect_sum(1, 1, 2, 2), 5);
        assert_eq!(acc.rect_sum(0, 1, 3, 2), 15);
    }

    #[test]
    fn test_accumulator_rejects_color() {
        let image = Image::new(2, 2, Channels::Rgb).unwrap();
        assert!(matches!(
            blockconv_accum(&image),
            Err(FilterError::UnsupportedChannels { actual: 3, .. })
        ));
    }

    #[test]
    fn test_border_replicate() {
        let image = gray(2, &[1, 2, 3, 4]);
        let padded = add_border_replicate(&image, 1, 1).unwrap();
        assert_eq!(padded.width(), 4);
        assert_eq!(padded.height(), 4);
        assert_eq!(
            padded.data(),
            &[1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]
        );
    }

    #[test]
    fn test_border_wider_than_image() {
        let image = gray(1, &[9]);
        let padded = add_border_replicate(&image, 3, 2).unwrap();
        assert_eq!(padded.width(), 7);
        assert_eq!(padded.height(), 5);
        assert!(padded.data().iter().all(|&v| v == 9));
    }

    #[test]
    fn test_blockconv_constant_image() {
        let image = Image::new_filled(7, 5, Channels::Gray, 42).unwrap();
        let mean = blockconv_gray(&image, 2, 2).unwrap();
        assert!(mean.data().iter().all(|&v| v == 42));
    }

    #[test]
    fn test_blockconv_replicated_edge() {
        // 3x1 window over [0, 30, 60]: left edge averages (0, 0, 30)
        let image = gray(3, &[0, 30, 60]);
        let mean = blockconv_gray(&image, 1, 0).unwrap();
        assert_eq!(mean.data(), &[10, 30, 50]);
    }

    #[test]
    fn test_blockconv_rounding() {
        // 3x1 window over [0, 1, 1] -> 2/3 rounds to 1
        let image = gray(3, &[0, 1, 1]);
        let mean = blockconv_gray(&image, 1, 0).unwrap();
        assert_eq!(mean.get_sample(1, 0, 0), Some(1));
    }

    #[test]
    fn test_blockconv_zero_window_is_copy() {
        let image = gray(2, &[5, 6, 7, 8]);
        assert_eq!(blockconv_gray(&image, 0, 0).unwrap(), image);
    }

    #[test]
    fn test_blockconv_rgb_per_channel() {
        let image = Image::from_vec(
            3,
            1,
            Channels::Rgb,
            vec![0, 90, 255, 30, 90, 255, 60, 90, 255],
        )
        .unwrap();
        let mean = blockconv(&image, 1, 0).unwrap();
        assert_eq!(mean.channels(), Channels::Rgb);
        assert_eq!(mean.get_pixel(0, 0), Some(&[10u8, 90, 255][..]));
        assert_eq!(mean.get_pixel(2, 0), Some(&[50u8, 90, 255][..]));
    }

    #[test]
    fn test_blockconv_matches_padded_reference() {
        // Window much wider than the image
        let image = gray(3, &[10, 80, 200, 0, 255, 40]);
        let (wc, hc) = (5, 4);
        let padded = add_border_replicate(&image, wc, hc).unwrap();
        let area = u64::from((2 * wc + 1) * (2 * hc + 1));
        let mean = blockconv_gray(&image, wc, hc).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                let mut sum = 0u64;
                for dy in 0..=2 * hc {
                    for dx in 0..=2 * wc {
                        sum += u64::from(padded.get_sample(x + dx, y + dy, 0).unwrap());
                    }
                }
                let expected = ((2 * sum + area) / (2 * area)) as u8;
                assert_eq!(mean.get_sample(x, y, 0), Some(expected));
            }
        }
    }

    #[test]
    fn test_blockconv_huge_window() {
        let half = u32::MAX / 2;
        let image = gray(2, &[0, 255]);
        let mean = blockconv_gray(&image, half, half).unwrap();
        assert_eq!(mean.data(), &[127, 128]);

        let flat = Image::new_filled(4, 4, Channels::Gray, 33).unwrap();
        let mean = blockconv_gray(&flat, u32::MAX, u32::MAX).unwrap();
        assert!(mean.data().iter().all(|&v| v == 33));
    }

    #[test]
    fn test_border_overflow_is_an_error() {
        let image = gray(2, &[1, 2, 3, 4]);
        assert!(matches!(
            add_border_replicate(&image, u32::MAX / 2, 1),
            Err(FilterError::InvalidParameters(_))
        ));
    }
}
