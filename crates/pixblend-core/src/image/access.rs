//! Sample access functions
//!
//! Low-level functions for getting and setting individual samples and
//! pixels. A pixel is the run of `spp` interleaved samples at `(x, y)`.

use super::{Image, ImageMut};
use crate::error::{Error, Result};

impl Image {
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride() + x as usize * self.spp() as usize
    }

    /// Get the samples of the pixel at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let start = self.offset(x, y);
        Some(&self.data()[start..start + self.spp() as usize])
    }

    /// Get one sample of the pixel at (x, y).
    ///
    /// Returns `None` if coordinates or channel are out of bounds.
    pub fn get_sample(&self, x: u32, y: u32, channel: u32) -> Option<u8> {
        if channel >= self.spp() {
            return None;
        }
        self.get_pixel(x, y).map(|px| px[channel as usize])
    }

    /// Get a sample without coordinate validation.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset lies outside the buffer.
    #[inline]
    pub fn get_sample_unchecked(&self, x: u32, y: u32, channel: u32) -> u8 {
        self.data()[self.offset(x, y) + channel as usize]
    }
}

impl ImageMut {
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride() + x as usize * self.spp() as usize
    }

    /// Get the samples of the pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let start = self.offset(x, y);
        Some(&self.data()[start..start + self.spp() as usize])
    }

    /// Get one sample of the pixel at (x, y).
    pub fn get_sample(&self, x: u32, y: u32, channel: u32) -> Option<u8> {
        if channel >= self.spp() {
            return None;
        }
        self.get_pixel(x, y).map(|px| px[channel as usize])
    }

    /// Set all samples of the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds,
    /// or [`Error::BufferSize`] if `samples.len()` is not the channel count.
    pub fn set_pixel(&mut self, x: u32, y: u32, samples: &[u8]) -> Result<()> {
        self.check_coords(x, y)?;
        let spp = self.spp() as usize;
        if samples.len() != spp {
            return Err(Error::BufferSize {
                expected: spp,
                actual: samples.len(),
            });
        }
        let start = self.offset(x, y);
        self.data_mut()[start..start + spp].copy_from_slice(samples);
        Ok(())
    }

    /// Set one sample of the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates or channel are
    /// out of bounds.
    pub fn set_sample(&mut self, x: u32, y: u32, channel: u32, val: u8) -> Result<()> {
        self.check_coords(x, y)?;
        if channel >= self.spp() {
            return Err(Error::IndexOutOfBounds {
                index: channel as usize,
                len: self.spp() as usize,
            });
        }
        let idx = self.offset(x, y) + channel as usize;
        self.data_mut()[idx] = val;
        Ok(())
    }

    /// Set a sample without coordinate validation.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset lies outside the buffer.
    #[inline]
    pub fn set_sample_unchecked(&mut self, x: u32, y: u32, channel: u32, val: u8) {
        let idx = self.offset(x, y) + channel as usize;
        self.data_mut()[idx] = val;
    }

    fn check_coords(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width() {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.width() as usize,
            });
        }
        if y >= self.height() {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height() as usize,
            });
        }
        Ok(())
    }
}
