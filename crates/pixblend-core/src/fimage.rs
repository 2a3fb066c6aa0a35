//! FImage - Floating-point sample matrix
//!
//! `FImage` holds one `f32` per sample with the same row-major,
//! channel-last layout as [`Image`]. It is the matrix operand for
//! [`Image::multiply`], where each sample of the image is scaled by the
//! corresponding factor.

use crate::error::{Error, Result};
use crate::image::{Channels, Image, Shape};

/// Floating-point image
#[derive(Debug, Clone, PartialEq)]
pub struct FImage {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<f32>,
}

impl FImage {
    /// Create a new FImage with all samples set to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, channels: Channels) -> Result<Self> {
        Self::new_filled(width, height, channels, 0.0)
    }

    /// Create a new FImage with all samples set to `value`.
    ///
    /// This is the "constant matrix" operand, e.g. a contrast factor
    /// broadcast over every sample.
    pub fn new_filled(width: u32, height: u32, channels: Channels, value: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = width as usize * height as usize * channels.count() as usize;
        Ok(FImage {
            width,
            height,
            channels,
            data: vec![value; len],
        })
    }

    /// Create an FImage filled with `value` matching the shape of `image`.
    pub fn filled_like(image: &Image, value: f32) -> Self {
        FImage {
            width: image.width(),
            height: image.height(),
            channels: image.channels(),
            data: vec![value; image.data().len()],
        }
    }

    /// Wrap an existing buffer of factors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSize`] if the buffer length does not match
    /// `width * height * channels`.
    pub fn from_vec(width: u32, height: u32, channels: Channels, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize * channels.count() as usize;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(FImage {
            width,
            height,
            channels,
            data,
        })
    }

    /// Widen every sample of an 8-bit image to `f32`.
    pub fn from_image(image: &Image) -> Self {
        FImage {
            width: image.width(),
            height: image.height(),
            channels: image.channels(),
            data: image.data().iter().map(|&v| f32::from(v)).collect(),
        }
    }

    /// Get the width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the channel layout.
    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Get the shape (width, height, channel count).
    #[inline]
    pub fn shape(&self) -> Shape {
        Shape {
            width: self.width,
            height: self.height,
            channels: self.channels.count(),
        }
    }

    /// Get raw access to the samples.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get mutable access to the samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Get one sample, or `None` if out of bounds.
    pub fn get(&self, x: u32, y: u32, channel: u32) -> Option<f32> {
        if x >= self.width || y >= self.height || channel >= self.channels.count() {
            return None;
        }
        let spp = self.channels.count() as usize;
        let idx = (y as usize * self.width as usize + x as usize) * spp + channel as usize;
        Some(self.data[idx])
    }

    /// Set one sample.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if any index is out of range.
    pub fn set(&mut self, x: u32, y: u32, channel: u32, val: f32) -> Result<()> {
        if x >= self.width || y >= self.height || channel >= self.channels.count() {
            return Err(Error::IndexOutOfBounds {
                index: (y as usize * self.width as usize + x as usize),
                len: self.width as usize * self.height as usize,
            });
        }
        let spp = self.channels.count() as usize;
        let idx = (y as usize * self.width as usize + x as usize) * spp + channel as usize;
        self.data[idx] = val;
        Ok(())
    }

    /// Convert back to 8 bits, saturating to [0, 255] and truncating.
    ///
    /// Non-finite samples map to 0 (NaN) or the nearest bound (infinity).
    pub fn to_image_clamped(&self) -> Image {
        let data = self.data.iter().map(|&v| saturate_f32(v)).collect();
        Image::from_parts(self.width, self.height, self.channels, data)
    }
}

/// Clamp to [0, 255] then truncate toward zero.
#[inline]
pub(crate) fn saturate_f32(v: f32) -> u8 {
    // `as` saturates out-of-range floats and maps NaN to 0
    v.clamp(0.0, 255.0) as u8
}
