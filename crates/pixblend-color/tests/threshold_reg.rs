//! Thresholding regression test
//!
//! Global thresholds at 50 and 130 on a gray ramp, monotonicity of the
//! selected count, and adaptive (mean and Gaussian) thresholding of an
//! unevenly lit scan where a single global cutoff fails.

use pixblend_color::{
    AdaptiveMethod, AdaptiveThresholdOptions, adaptive_threshold,
    adaptive_threshold_with_options, convert_to_gray, global_threshold, threshold_to_mask,
};
use pixblend_core::{Channels, Image};
use pixblend_test::{RegParams, fixtures};

fn count_on(image: &Image) -> usize {
    image.data().iter().filter(|&&v| v != 0).count()
}

/// Ink pixels of `fixtures::uneven_scan` with the given period
fn is_ink(x: u32, y: u32, period: u32) -> bool {
    x % period == 0 || y % period == 0
}

#[test]
fn threshold_reg() {
    let mut rp = RegParams::new("threshold");

    // --- Global threshold on a 0..255 ramp ---
    let ramp = fixtures::gradient(256, 4);
    let t50 = global_threshold(&ramp, 50, 255).unwrap();
    let t130 = global_threshold(&ramp, 130, 255).unwrap();
    rp.compare_values(205.0 * 4.0, count_on(&t50) as f64, 0.0);
    rp.compare_values(125.0 * 4.0, count_on(&t130) as f64, 0.0);
    rp.write_image(&t50).unwrap();
    rp.write_image(&t130).unwrap();

    // Monotone: a higher cutoff never selects more
    let mut previous = usize::MAX;
    let mut monotone = true;
    for thresh in (0..=255u8).step_by(5) {
        let on = threshold_to_mask(&ramp, thresh).unwrap().count_selected();
        monotone &= on <= previous;
        previous = on;
    }
    rp.compare_values(1.0, monotone as i32 as f64, 0.0);

    // --- 4x4 stripes threshold at 100 ---
    let src = Image::from_vec(4, 4, Channels::Gray, [10u8, 200, 10, 200].repeat(4)).unwrap();
    let expected = Image::from_vec(4, 4, Channels::Gray, [0u8, 255, 0, 255].repeat(4)).unwrap();
    rp.compare_images(&global_threshold(&src, 100, 255).unwrap(), &expected);

    // --- Adaptive threshold on an unevenly lit scan ---
    let period = 8;
    let scan = fixtures::uneven_scan(64, 32, period);
    rp.write_image(&scan).unwrap();

    let adaptive = adaptive_threshold(&scan, 255, 11, 7.0).unwrap();
    let gauss = adaptive_threshold_with_options(
        &scan,
        &AdaptiveThresholdOptions {
            method: AdaptiveMethod::Gaussian,
            ..Default::default()
        },
    )
    .unwrap();
    let global = global_threshold(&scan, 130, 255).unwrap();

    let mut adaptive_errors = 0;
    let mut gauss_errors = 0;
    let mut global_errors = 0;
    for y in 5..27 {
        for x in 5..59 {
            let want = if is_ink(x, y, period) { 0 } else { 255 };
            adaptive_errors += (adaptive.get_sample(x, y, 0) != Some(want)) as usize;
            gauss_errors += (gauss.get_sample(x, y, 0) != Some(want)) as usize;
            global_errors += (global.get_sample(x, y, 0) != Some(want)) as usize;
        }
    }
    rp.compare_values(0.0, adaptive_errors as f64, 0.0);
    rp.compare_values(0.0, gauss_errors as f64, 0.0);
    rp.compare_values(1.0, (global_errors > 0) as i32 as f64, 0.0);
    rp.write_image(&adaptive).unwrap();
    rp.write_image(&gauss).unwrap();

    // A block far larger than the scan still thresholds every pixel
    let wide = adaptive_threshold(&scan, 255, 1_000_001, 7.0).unwrap();
    rp.compare_values(scan.width() as f64, wide.width() as f64, 0.0);
    rp.compare_values(scan.height() as f64, wide.height() as f64, 0.0);

    // --- Color input must be converted first ---
    let logo = fixtures::logo(32, 16);
    rp.compare_values(1.0, global_threshold(&logo, 127, 255).is_err() as i32 as f64, 0.0);
    let gray = convert_to_gray(&logo).unwrap();
    let mask = threshold_to_mask(&gray, 127).unwrap();
    let lettering = (0..16)
        .flat_map(|y| (0..32).map(move |x| (x, y)))
        .filter(|&(x, y)| fixtures::is_logo_lettering(x, y, 32, 16))
        .count();
    rp.compare_values(lettering as f64, mask.count_selected() as f64, 0.0);

    assert!(rp.cleanup(), "threshold regression test failed");
}
