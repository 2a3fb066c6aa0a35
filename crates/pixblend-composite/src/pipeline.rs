//! Foreground/background compositing
//!
//! Bright regions of the foreground (its lettering or logo) are replaced
//! by the background, which is first resized to the foreground width.
//! The run is a fixed sequence of stages:
//!
//! 1. [`Stage::Load`]: normalize both images to RGB and fit the background
//! 2. [`Stage::MaskDerivation`]: luminance threshold of the foreground
//! 3. [`Stage::MaskInversion`]: complement of the mask
//! 4. [`Stage::RegionExtraction`]: background under the mask, foreground
//!    under the inverse
//! 5. [`Stage::Merge`]: saturating sum of the two regions
//!
//! Every stage takes its inputs explicitly and returns new values. The
//! first failure aborts the run and is reported with its stage.

use crate::{CompositeError, CompositeResult, Stage};
use log::debug;
use pixblend_color::{convert_to_gray, threshold_to_mask};
use pixblend_core::{Image, Mask};
use pixblend_io::{ImageFormat, read_image, write_image};
use pixblend_transform::{ScaleMethod, scale_to_width};
use std::path::Path;

/// Parameters of a compositing run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeOptions {
    /// Foreground luminance above which the background shows through
    pub threshold: u8,
    /// Interpolation used when fitting the background
    pub scale_method: ScaleMethod,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            threshold: 127,
            scale_method: ScaleMethod::AreaMap,
        }
    }
}

/// Every intermediate of a compositing run
#[derive(Debug, Clone)]
pub struct CompositeOutput {
    /// Background converted to RGB and fitted to the foreground width
    pub background_resized: Image,
    /// Foreground pixels brighter than the threshold
    pub mask: Mask,
    /// Complement of `mask`
    pub mask_inverse: Mask,
    /// Background restricted to `mask`
    pub background_part: Image,
    /// Foreground restricted to `mask_inverse`
    pub foreground_part: Image,
    /// Merged image
    pub result: Image,
}

/// Convert `background` to RGB and scale it to the width of `foreground`,
/// keeping its aspect ratio.
pub fn normalize_background(
    foreground: &Image,
    background: &Image,
    method: ScaleMethod,
) -> CompositeResult<Image> {
    debug!(
        "{}: fitting background {} to width {}",
        Stage::Load,
        background.shape(),
        foreground.width()
    );
    let resized = scale_to_width(&background.to_rgb(), foreground.width(), method)
        .map_err(CompositeError::at(Stage::Load))?;
    debug!("{}: background resized to {}", Stage::Load, resized.shape());
    Ok(resized)
}

/// Select the foreground pixels whose luminance exceeds `threshold`.
pub fn derive_mask(foreground: &Image, threshold: u8) -> CompositeResult<Mask> {
    debug!(
        "{}: threshold {} on {}",
        Stage::MaskDerivation,
        threshold,
        foreground.shape()
    );
    let gray = convert_to_gray(foreground).map_err(CompositeError::at(Stage::MaskDerivation))?;
    let mask =
        threshold_to_mask(&gray, threshold).map_err(CompositeError::at(Stage::MaskDerivation))?;
    debug!(
        "{}: {} of {} pixels selected",
        Stage::MaskDerivation,
        mask.count_selected(),
        gray.shape().sample_count()
    );
    Ok(mask)
}

/// Keep `background` where `mask` is set and `foreground` where
/// `mask_inverse` is set, zeroing everything else.
///
/// Returns `(background_part, foreground_part)`.
pub fn extract_regions(
    foreground: &Image,
    background: &Image,
    mask: &Mask,
    mask_inverse: &Mask,
) -> CompositeResult<(Image, Image)> {
    debug!(
        "{}: background {}, foreground {}, mask {}",
        Stage::RegionExtraction,
        background.shape(),
        foreground.shape(),
        mask.shape()
    );
    let background_part = background
        .and(background, Some(mask))
        .map_err(CompositeError::at(Stage::RegionExtraction))?;
    let foreground_part = foreground
        .and(foreground, Some(mask_inverse))
        .map_err(CompositeError::at(Stage::RegionExtraction))?;
    Ok((background_part, foreground_part))
}

/// Sum the two extracted regions.
pub fn merge(background_part: &Image, foreground_part: &Image) -> CompositeResult<Image> {
    let result = background_part
        .add(foreground_part)
        .map_err(CompositeError::at(Stage::Merge))?;
    debug!("{}: result {}", Stage::Merge, result.shape());
    Ok(result)
}

/// Composite `foreground` over `background`.
///
/// Both images are normalized to RGB. The background is resized to the
/// foreground width; if the resulting height differs from the foreground
/// height the run fails at [`Stage::RegionExtraction`].
///
/// # Example
///
/// ```
/// use pixblend_core::{Channels, Image};
/// use pixblend_composite::{CompositeOptions, composite};
///
/// let foreground = Image::new_filled(4, 2, Channels::Rgb, 255).unwrap();
/// let background = Image::new_filled(2, 1, Channels::Rgb, 40).unwrap();
/// let output = composite(&foreground, &background, &CompositeOptions::default()).unwrap();
/// assert!(output.result.data().iter().all(|&v| v == 40));
/// ```
pub fn composite(
    foreground: &Image,
    background: &Image,
    options: &CompositeOptions,
) -> CompositeResult<CompositeOutput> {
    let foreground = foreground.to_rgb();
    let background_resized = normalize_background(&foreground, background, options.scale_method)?;

    let mask = derive_mask(&foreground, options.threshold)?;

    debug!("{}: inverting {}", Stage::MaskInversion, mask.shape());
    let mask_inverse = mask.invert();

    let (background_part, foreground_part) =
        extract_regions(&foreground, &background_resized, &mask, &mask_inverse)?;
    let result = merge(&background_part, &foreground_part)?;

    Ok(CompositeOutput {
        background_resized,
        mask,
        mask_inverse,
        background_part,
        foreground_part,
        result,
    })
}

/// Decode both images from files and composite them.
///
/// Decode failures are reported at [`Stage::Load`].
pub fn composite_files<P: AsRef<Path>, Q: AsRef<Path>>(
    foreground_path: P,
    background_path: Q,
    options: &CompositeOptions,
) -> CompositeResult<CompositeOutput> {
    let foreground = read_image(foreground_path).map_err(CompositeError::at(Stage::Load))?;
    let background = read_image(background_path).map_err(CompositeError::at(Stage::Load))?;
    composite(&foreground, &background, options)
}

/// Encode the merged image of `output` to `path`.
pub fn write_result<P: AsRef<Path>>(
    output: &CompositeOutput,
    path: P,
    format: ImageFormat,
) -> CompositeResult<()> {
    write_image(&output.result, path, format)?;
    Ok(())
}
