//! Binary masks
//!
//! A [`Mask`] is a single-channel [`Image`] whose samples are restricted to
//! `{0, 255}`. A sample of 255 selects the pixel at that position; 0
//! leaves it unselected. Masks gate the bitwise operations in
//! [`crate::image::rop`].

use crate::error::{Error, Result};
use crate::image::{Channels, Image, Shape};

/// Sample value of a selected mask position
pub const MASK_ON: u8 = 255;
/// Sample value of an unselected mask position
pub const MASK_OFF: u8 = 0;

/// Single-channel binary mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    image: Image,
}

impl Mask {
    /// Create a mask with every position selected (`on`) or unselected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new_filled(width: u32, height: u32, on: bool) -> Result<Self> {
        let value = if on { MASK_ON } else { MASK_OFF };
        Ok(Mask {
            image: Image::new_filled(width, height, Channels::Gray, value)?,
        })
    }

    /// Build a mask selecting every non-zero sample of a single-channel image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChannels`] if `image` is not single-channel.
    pub fn from_nonzero(image: &Image) -> Result<Self> {
        check_single_channel(image)?;
        let data = image
            .data()
            .iter()
            .map(|&v| if v != 0 { MASK_ON } else { MASK_OFF })
            .collect();
        Ok(Mask {
            image: Image::from_parts(image.width(), image.height(), Channels::Gray, data),
        })
    }

    /// Get the mask width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Get the mask height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Get the mask shape (always one channel).
    #[inline]
    pub fn shape(&self) -> Shape {
        self.image.shape()
    }

    /// Get the raw mask samples (each 0 or 255).
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.image.data()
    }

    /// Check whether the position (x, y) is selected.
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn is_selected(&self, x: u32, y: u32) -> Option<bool> {
        self.image.get_sample(x, y, 0).map(|v| v == MASK_ON)
    }

    /// Count the selected positions.
    pub fn count_selected(&self) -> usize {
        self.data().iter().filter(|&&v| v == MASK_ON).count()
    }

    /// Return the complementary mask (bitwise NOT).
    ///
    /// Every position selected here is unselected in the result and vice
    /// versa, so a mask and its inverse partition the image.
    pub fn invert(&self) -> Mask {
        Mask {
            image: self.image.not(),
        }
    }

    /// Borrow the mask as a plain single-channel image.
    #[inline]
    pub fn as_image(&self) -> &Image {
        &self.image
    }

    /// Unwrap into the underlying single-channel image.
    pub fn into_image(self) -> Image {
        self.image
    }

    /// Fail with [`Error::IncompatibleShape`] unless the mask covers exactly
    /// `width x height`.
    pub(crate) fn check_size(&self, width: u32, height: u32) -> Result<()> {
        if self.width() == width && self.height() == height {
            Ok(())
        } else {
            Err(Error::IncompatibleShape {
                expected: Shape {
                    width,
                    height,
                    channels: 1,
                },
                actual: self.shape(),
            })
        }
    }
}

impl TryFrom<Image> for Mask {
    type Error = Error;

    /// Validate that `image` is single-channel and binary-valued.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChannels`] for multi-channel input and
    /// [`Error::InvalidParameter`] if any sample is neither 0 nor 255.
    fn try_from(image: Image) -> Result<Self> {
        check_single_channel(&image)?;
        if let Some(v) = image
            .data()
            .iter()
            .find(|&&v| v != MASK_ON && v != MASK_OFF)
        {
            return Err(Error::InvalidParameter(format!(
                "mask samples must be 0 or 255, found {v}"
            )));
        }
        Ok(Mask { image })
    }
}

impl From<Mask> for Image {
    fn from(mask: Mask) -> Self {
        mask.image
    }
}

fn check_single_channel(image: &Image) -> Result<()> {
    if image.channels() != Channels::Gray {
        return Err(Error::UnsupportedChannels {
            expected: "1 channel",
            actual: image.spp(),
        });
    }
    Ok(())
}
