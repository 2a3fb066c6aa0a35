//! Image - The main image container
//!
//! The `Image` structure is the value type every pixblend operation
//! consumes and produces: a dense array of 8-bit samples with an explicit
//! width, height, and channel layout.
//!
//! # Sample layout
//!
//! - Samples are stored row-major in a flat `Vec<u8>`
//! - Channels are interleaved (channel-last): `R G B R G B ...`
//! - Rows are tightly packed, there is no padding between rows
//!
//! # Ownership model
//!
//! `Image` uses `Arc` for efficient cloning (shared ownership).
//! To modify sample data, convert to `ImageMut` via [`Image::try_into_mut`]
//! or [`Image::to_mut`], then convert back with `Into<Image>`.

mod access;
pub mod arith;
pub mod convert;
pub mod rop;

pub use rop::RopOp;

use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;

/// Channel layout of an image
///
/// Determines the number of interleaved samples stored per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Channels {
    /// Single-channel grayscale
    Gray = 1,
    /// Grayscale with alpha
    GrayAlpha = 2,
    /// Red, green, blue
    Rgb = 3,
    /// Red, green, blue, alpha
    Rgba = 4,
}

impl Channels {
    /// Create `Channels` from a raw sample count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChannels`] if `count` is not 1, 2, 3, or 4.
    pub fn from_count(count: u32) -> Result<Self> {
        match count {
            1 => Ok(Channels::Gray),
            2 => Ok(Channels::GrayAlpha),
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            _ => Err(Error::InvalidChannels(count)),
        }
    }

    /// Get the number of samples per pixel.
    #[inline]
    pub fn count(self) -> u32 {
        self as u32
    }

    /// Check whether the layout carries an alpha channel.
    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(self, Channels::GrayAlpha | Channels::Rgba)
    }

    /// Check whether the layout carries color (RGB) samples.
    #[inline]
    pub fn is_color(self) -> bool {
        matches!(self, Channels::Rgb | Channels::Rgba)
    }
}

/// Height, width, and channel count of an image.
///
/// Two images are shape-compatible when their shapes are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl Shape {
    /// Total number of samples described by this shape.
    #[inline]
    pub fn sample_count(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.channels)
    }
}

/// Internal image data
#[derive(Debug, Clone)]
struct ImageData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Interleaved channel layout
    channels: Channels,
    /// The samples, row-major and channel-last
    data: Vec<u8>,
}

impl ImageData {
    #[inline]
    fn stride(&self) -> usize {
        self.width as usize * self.channels.count() as usize
    }
}

/// Image - Main image container
///
/// `Image` is the fundamental value type in pixblend. It uses reference
/// counting via `Arc` for efficient cloning; operations never modify an
/// `Image` in place, they return a new one.
///
/// # Examples
///
/// ```
/// use pixblend_core::{Channels, Image};
///
/// // Create a new RGB image
/// let image = Image::new(640, 480, Channels::Rgb).unwrap();
/// assert_eq!(image.width(), 640);
/// assert_eq!(image.height(), 480);
/// assert_eq!(image.spp(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Image {
    inner: Arc<ImageData>,
}

impl Image {
    /// Create a new image with the specified dimensions and channel layout.
    ///
    /// The sample data is initialized to zero.
    ///
    /// # Arguments
    ///
    /// * `width` - Width in pixels (must be > 0)
    /// * `height` - Height in pixels (must be > 0)
    /// * `channels` - Channel layout
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, channels: Channels) -> Result<Self> {
        Self::new_filled(width, height, channels, 0)
    }

    /// Create a new image with every sample set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new_filled(width: u32, height: u32, channels: Channels, value: u8) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let len = width as usize * height as usize * channels.count() as usize;
        Ok(Self::from_parts(width, height, channels, vec![value; len]))
    }

    /// Wrap an existing sample buffer.
    ///
    /// `data` must hold exactly `width * height * channels` samples laid out
    /// row-major and channel-last.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] for a zero dimension, or
    /// [`Error::BufferSize`] if the buffer length does not match.
    pub fn from_vec(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Result<Self> {
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
        Ok(Self::from_parts(width, height, channels, data))
    }

    /// Build an image from parts already known to be consistent.
    pub(crate) fn from_parts(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * channels.count() as usize
        );
        Image {
            inner: Arc::new(ImageData {
                width,
                height,
                channels,
                data,
            }),
        }
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the channel layout.
    #[inline]
    pub fn channels(&self) -> Channels {
        self.inner.channels
    }

    /// Get the samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.channels.count()
    }

    /// Get the shape (width, height, channel count).
    #[inline]
    pub fn shape(&self) -> Shape {
        Shape {
            width: self.inner.width,
            height: self.inner.height,
            channels: self.spp(),
        }
    }

    /// Get the number of samples in one row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.stride()
    }

    /// Get raw access to the sample data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the samples of a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.inner.data[start..start + stride]
    }

    /// Get the number of strong references to this image.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check whether two images share height, width, and channel count.
    #[inline]
    pub fn is_shape_compatible(&self, other: &Image) -> bool {
        self.shape() == other.shape()
    }

    /// Check whether two images have the same spatial dimensions.
    #[inline]
    pub fn sizes_equal(&self, other: &Image) -> bool {
        self.width() == other.width() && self.height() == other.height()
    }

    /// Fail with [`Error::IncompatibleShape`] unless `other` has our shape.
    pub(crate) fn check_same_shape(&self, other: &Image) -> Result<()> {
        if self.is_shape_compatible(other) {
            Ok(())
        } else {
            Err(Error::IncompatibleShape {
                expected: self.shape(),
                actual: other.shape(),
            })
        }
    }

    /// Create a new zeroed image with the same shape as this one.
    pub fn create_template(&self) -> Self {
        Self::from_parts(
            self.width(),
            self.height(),
            self.channels(),
            vec![0; self.data().len()],
        )
    }

    /// Create a deep copy of this image.
    ///
    /// Unlike `clone()` which shares data via Arc, this creates
    /// a completely independent copy.
    pub fn deep_clone(&self) -> Self {
        Image {
            inner: Arc::new(self.inner.as_ref().clone()),
        }
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    /// If successful, returns an [`ImageMut`] that allows modification.
    pub fn try_into_mut(self) -> std::result::Result<ImageMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(ImageMut { inner: data }),
            Err(arc) => Err(Image { inner: arc }),
        }
    }

    /// Create a mutable copy of this image.
    ///
    /// Always creates a new copy that can be modified.
    pub fn to_mut(&self) -> ImageMut {
        ImageMut {
            inner: self.inner.as_ref().clone(),
        }
    }

    /// Convert into a mutable image, copying only when the data is shared.
    pub fn into_mut(self) -> ImageMut {
        match self.try_into_mut() {
            Ok(image_mut) => image_mut,
            Err(shared) => shared.to_mut(),
        }
    }

    /// Consume the image and return its sample buffer.
    pub fn into_vec(self) -> Vec<u8> {
        self.into_mut().inner.data
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.data() == other.data()
    }
}

impl Eq for Image {}

/// Mutable image
///
/// Allows modification of sample data. Convert back to an immutable
/// [`Image`] using `Into<Image>`.
#[derive(Debug)]
pub struct ImageMut {
    inner: ImageData,
}

impl ImageMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the channel layout.
    #[inline]
    pub fn channels(&self) -> Channels {
        self.inner.channels
    }

    /// Get samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.channels.count()
    }

    /// Get the shape (width, height, channel count).
    #[inline]
    pub fn shape(&self) -> Shape {
        Shape {
            width: self.inner.width,
            height: self.inner.height,
            channels: self.spp(),
        }
    }

    /// Get the number of samples in one row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.stride()
    }

    /// Get raw access to the sample data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get mutable access to the sample data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Get mutable access to a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &mut self.inner.data[start..start + stride]
    }

    /// Fail with [`Error::IncompatibleShape`] unless `other` has our shape.
    pub(crate) fn check_same_shape(&self, other: &Image) -> Result<()> {
        if self.shape() == other.shape() {
            Ok(())
        } else {
            Err(Error::IncompatibleShape {
                expected: self.shape(),
                actual: other.shape(),
            })
        }
    }

    /// Set every sample to `value`.
    pub fn fill(&mut self, value: u8) {
        self.inner.data.fill(value);
    }

    /// Set every sample to zero.
    pub fn clear(&mut self) {
        self.fill(0);
    }
}

impl From<ImageMut> for Image {
    fn from(image_mut: ImageMut) -> Self {
        Image {
            inner: Arc::new(image_mut.inner),
        }
    }
}
