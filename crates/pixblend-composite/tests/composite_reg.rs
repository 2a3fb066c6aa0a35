//! Compositing regression test
//!
//! Runs the pipeline on a synthetic logo over a gradient background and
//! checks the partition law of the masked merge, the intermediates, the
//! file-based entry point, and stage attribution of failures.

use pixblend_composite::{
    CompositeOptions, Stage, composite, composite_files, derive_mask, extract_regions, merge,
    normalize_background, write_result,
};
use pixblend_core::{Channels, Image};
use pixblend_io::{ImageFormat, read_image, write_image};
use pixblend_test::{RegParams, fixtures, regout_dir};
use pixblend_transform::ScaleMethod;
use std::fs;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn composite_reg() {
    init_logger();
    let mut rp = RegParams::new("composite");

    let (w, h) = (64, 32);
    let foreground = fixtures::logo(w, h);
    let background = fixtures::rgb_gradient(w / 2, h / 2);
    let options = CompositeOptions::default();

    let out = composite(&foreground, &background, &options).unwrap();
    rp.write_image(&out.background_resized).unwrap();
    rp.write_image(out.mask.as_image()).unwrap();
    rp.write_image(&out.result).unwrap();

    // --- Intermediates ---
    rp.compare_values(w as f64, out.background_resized.width() as f64, 0.0);
    rp.compare_values(h as f64, out.background_resized.height() as f64, 0.0);
    let lettering = (0..h)
        .flat_map(|y| (0..w).map(move |x| (x, y)))
        .filter(|&(x, y)| fixtures::is_logo_lettering(x, y, w, h))
        .count();
    rp.compare_values(lettering as f64, out.mask.count_selected() as f64, 0.0);
    rp.compare_values(
        (w * h) as f64,
        (out.mask.count_selected() + out.mask_inverse.count_selected()) as f64,
        0.0,
    );

    // --- Partition law ---
    // Every pixel comes from exactly one source
    let mut from_background = 0;
    let mut from_foreground = 0;
    let mut mismatches = 0;
    for y in 0..h {
        for x in 0..w {
            let result = out.result.get_pixel(x, y);
            if out.mask.is_selected(x, y) == Some(true) {
                from_background += 1;
                mismatches += (result != out.background_resized.get_pixel(x, y)) as usize;
                mismatches += (out.foreground_part.get_pixel(x, y) != Some(&[0u8, 0, 0][..]))
                    as usize;
            } else {
                from_foreground += 1;
                mismatches += (result != foreground.get_pixel(x, y)) as usize;
                mismatches += (out.background_part.get_pixel(x, y) != Some(&[0u8, 0, 0][..]))
                    as usize;
            }
        }
    }
    rp.compare_values(0.0, mismatches as f64, 0.0);
    rp.compare_values(lettering as f64, from_background as f64, 0.0);
    rp.compare_values((w * h) as f64 - lettering as f64, from_foreground as f64, 0.0);

    // Stage functions chained by hand give the same result
    let bg = normalize_background(&foreground, &background, ScaleMethod::AreaMap).unwrap();
    let mask = derive_mask(&foreground, 127).unwrap();
    let inverse = mask.invert();
    let (bg_part, fg_part) = extract_regions(&foreground, &bg, &mask, &inverse).unwrap();
    rp.compare_images(&merge(&bg_part, &fg_part).unwrap(), &out.result);

    // A threshold above every sample selects nothing: result is the foreground
    let none = composite(
        &foreground,
        &background,
        &CompositeOptions {
            threshold: 255,
            scale_method: ScaleMethod::Sampling,
        },
    )
    .unwrap();
    rp.compare_values(0.0, none.mask.count_selected() as f64, 0.0);
    rp.compare_images(&none.result, &foreground);

    // --- Failures carry their stage ---
    let tall = Image::new(w / 2, h, Channels::Rgb).unwrap();
    let err = composite(&foreground, &tall, &options).unwrap_err();
    rp.compare_values(
        1.0,
        (err.stage() == Some(Stage::RegionExtraction)) as i32 as f64,
        0.0,
    );

    // --- File round trip ---
    let outdir = regout_dir();
    fs::create_dir_all(&outdir).expect("Failed to create output directory");
    let fg_path = format!("{}/composite_fg.png", outdir);
    let bg_path = format!("{}/composite_bg.ppm", outdir);
    let result_path = format!("{}/composite_result.png", outdir);
    write_image(&foreground, &fg_path, ImageFormat::Png).unwrap();
    write_image(&background, &bg_path, ImageFormat::Pnm).unwrap();

    let from_files = composite_files(&fg_path, &bg_path, &options).unwrap();
    rp.compare_images(&from_files.result, &out.result);
    write_result(&from_files, &result_path, ImageFormat::Png).unwrap();
    rp.compare_images(&read_image(&result_path).unwrap(), &out.result);

    let missing = composite_files(format!("{}/composite_missing.png", outdir), &bg_path, &options);
    rp.compare_values(
        1.0,
        matches!(missing, Err(ref e) if e.stage() == Some(Stage::Load)) as i32 as f64,
        0.0,
    );

    assert!(rp.cleanup(), "composite regression test failed");
}
