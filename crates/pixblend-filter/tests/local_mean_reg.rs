//! Regression test for block and Gaussian local means
//!
//! Checks the integral-image block mean against a direct windowed sum with
//! clamped (replicated) coordinates, and the Gaussian mean against its
//! basic invariants.

use pixblend_core::{Channels, Image};
use pixblend_filter::{add_border_replicate, blockconv, blockconv_gray, gaussian_blur_gray};
use pixblend_test::{RegParams, fixtures};

/// Reference box mean computed directly, clamping coordinates at the edge.
fn naive_block_mean(image: &Image, half: u32) -> Image {
    let w = image.width() as i64;
    let h = image.height() as i64;
    let r = half as i64;
    let area = ((2 * r + 1) * (2 * r + 1)) as u64;
    let mut out = image.create_template().to_mut();
    for y in 0..h {
        for x in 0..w {
            let mut sum = 0u64;
            for dy in -r..=r {
                for dx in -r..=r {
                    let sx = (x + dx).clamp(0, w - 1) as u32;
                    let sy = (y + dy).clamp(0, h - 1) as u32;
                    sum += u64::from(image.get_sample(sx, sy, 0).unwrap());
                }
            }
            let mean = ((2 * sum + area) / (2 * area)) as u8;
            out.set_sample(x as u32, y as u32, 0, mean).unwrap();
        }
    }
    out.into()
}

#[test]
fn local_mean_reg() {
    let mut rp = RegParams::new("local_mean");

    // Integral-image mean equals the direct sum for several block sizes,
    // including one wider than the image height
    let scan = fixtures::uneven_scan(40, 9, 7);
    for half in [1, 2, 5, 6] {
        let fast = blockconv_gray(&scan, half, half).unwrap();
        let slow = naive_block_mean(&scan, half);
        rp.compare_images(&fast, &slow);
    }
    rp.write_image(&blockconv_gray(&scan, 5, 5).unwrap()).unwrap();

    // Replicated border: corners copy the corner sample
    let board = fixtures::checkerboard(6, 6, 2, 10, 200);
    let padded = add_border_replicate(&board, 3, 3).unwrap();
    rp.compare_values(12.0, padded.width() as f64, 0.0);
    rp.compare_values(10.0, padded.get_sample(0, 0, 0).unwrap() as f64, 0.0);
    rp.compare_values(10.0, padded.get_sample(11, 11, 0).unwrap() as f64, 0.0);

    // Color image: each channel filtered on its own
    let rgb = fixtures::rgb_gradient(16, 8);
    let rgb_mean = blockconv(&rgb, 2, 2).unwrap();
    let green_mean = blockconv_gray(&rgb.extract_channel(1).unwrap(), 2, 2).unwrap();
    rp.compare_images(&rgb_mean.extract_channel(1).unwrap(), &green_mean);
    rp.compare_values(
        128.0,
        rgb_mean.get_sample(7, 3, 2).unwrap() as f64,
        0.0,
    );

    // Gaussian mean preserves flat regions and stays within the input range
    let flat = Image::new_filled(12, 12, Channels::Gray, 180).unwrap();
    rp.compare_images(&gaussian_blur_gray(&flat, 11, 0.0).unwrap(), &flat);
    let stripes = fixtures::stripes(30, 4, 3, 20, 220);
    let smooth = gaussian_blur_gray(&stripes, 7, 0.0).unwrap();
    let (lo, hi) = smooth
        .data()
        .iter()
        .fold((255u8, 0u8), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    rp.compare_values(1.0, (lo >= 20 && hi <= 220 && hi - lo < 200) as i32 as f64, 0.0);
    rp.write_image(&smooth).unwrap();

    assert!(rp.cleanup(), "local_mean regression test failed");
}
