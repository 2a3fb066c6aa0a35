//! Channel layout conversion functions
//!
//! Functions for converting between channel layouts without changing
//! sample values. Luminance (color to gray) lives in `pixblend-color`.

use super::{Channels, Image};
use crate::error::{Error, Result};

impl Image {
    /// Convert to a 3-channel RGB image.
    ///
    /// - Gray / GrayAlpha: the gray sample is replicated into R, G and B
    /// - Rgba: alpha is dropped
    /// - Rgb: returned as a cheap clone
    pub fn to_rgb(&self) -> Image {
        let spp = self.spp() as usize;
        let data = match self.channels() {
            Channels::Rgb => return self.clone(),
            Channels::Gray | Channels::GrayAlpha => self
                .data()
                .chunks_exact(spp)
                .flat_map(|px| [px[0]; 3])
                .collect(),
            Channels::Rgba => self
                .data()
                .chunks_exact(spp)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
        };
        Image::from_parts(self.width(), self.height(), Channels::Rgb, data)
    }

    /// Drop the alpha channel, if any.
    ///
    /// GrayAlpha becomes Gray and Rgba becomes Rgb. Images without alpha
    /// are returned as a cheap clone.
    pub fn remove_alpha(&self) -> Image {
        let target = match self.channels() {
            Channels::GrayAlpha => Channels::Gray,
            Channels::Rgba => Channels::Rgb,
            Channels::Gray | Channels::Rgb => return self.clone(),
        };
        let spp = self.spp() as usize;
        let keep = target.count() as usize;
        let data = self
            .data()
            .chunks_exact(spp)
            .flat_map(|px| px[..keep].iter().copied())
            .collect();
        Image::from_parts(self.width(), self.height(), target, data)
    }

    /// Swap the first and third color samples of every pixel.
    ///
    /// Converts BGR(A) data to RGB(A) and back. Alpha is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedChannels`] for gray images.
    pub fn swap_rb(&self) -> Result<Image> {
        if !self.channels().is_color() {
            return Err(Error::UnsupportedChannels {
                expected: "3 or 4 channels",
                actual: self.spp(),
            });
        }
        let spp = self.spp() as usize;
        let mut result_mut = self.to_mut();
        for px in result_mut.data_mut().chunks_exact_mut(spp) {
            px.swap(0, 2);
        }
        Ok(result_mut.into())
    }

    /// Extract one channel as a single-channel image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `channel >= spp`.
    pub fn extract_channel(&self, channel: u32) -> Result<Image> {
        if channel >= self.spp() {
            return Err(Error::IndexOutOfBounds {
                index: channel as usize,
                len: self.spp() as usize,
            });
        }
        let data = self
            .data()
            .iter()
            .skip(channel as usize)
            .step_by(self.spp() as usize)
            .copied()
            .collect();
        Ok(Image::from_parts(
            self.width(),
            self.height(),
            Channels::Gray,
            data,
        ))
    }

    /// Interleave single-channel planes into one image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChannels`] for an unsupported plane count,
    /// [`Error::UnsupportedChannels`] if a plane is not single-channel, or
    /// [`Error::IncompatibleShape`] if plane sizes differ.
    pub fn merge_channels(planes: &[Image]) -> Result<Image> {
        let channels = Channels::from_count(planes.len() as u32)?;
        let first = &planes[0];
        for plane in planes {
            if plane.channels() != Channels::Gray {
                return Err(Error::UnsupportedChannels {
                    expected: "1 channel",
                    actual: plane.spp(),
                });
            }
            first.check_same_shape(plane)?;
        }
        let pixels = first.data().len();
        let mut data = Vec::with_capacity(pixels * planes.len());
        for i in 0..pixels {
            data.extend(planes.iter().map(|p| p.data()[i]));
        }
        Ok(Image::from_parts(
            first.width(),
            first.height(),
            channels,
            data,
        ))
    }
}
