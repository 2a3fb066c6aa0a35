//! Raster operations (ROP)
//!
//! This module provides sample-wise bitwise operations on images:
//!
//! - AND, OR, XOR (binary operations on two images)
//! - NOT (unary operation)
//! - General ROP with a named operation
//!
//! # Masked operations
//!
//! Every binary operation accepts an optional [`Mask`]. Where the mask is
//! selected (255) the output holds the bitwise result; where it is
//! unselected (0) every channel of the output pixel is 0. The mask is
//! never a pass-through, so `a.and(&a, Some(&m))` keeps exactly the
//! region of `a` under `m` and blacks out the rest.

use super::{Image, ImageMut};
use crate::error::Result;
use crate::mask::{MASK_ON, Mask};

/// Raster operation type
///
/// Named bitwise operations combining a destination sample `d` with a
/// source sample `s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RopOp {
    /// `d & s`
    And,
    /// `d | s`
    Or,
    /// `d ^ s`
    Xor,
}

impl RopOp {
    #[inline]
    fn apply(self, d: u8, s: u8) -> u8 {
        match self {
            RopOp::And => d & s,
            RopOp::Or => d | s,
            RopOp::Xor => d ^ s,
        }
    }
}

impl Image {
    /// Bitwise AND of two images.
    ///
    /// # Arguments
    ///
    /// * `other` - Shape-compatible second operand
    /// * `mask` - Optional region selector; output is 0 outside it
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleShape`](crate::Error::IncompatibleShape)
    /// if the images differ in shape or the mask differs in size.
    ///
    /// # Example
    ///
    /// ```
    /// use pixblend_core::{Channels, Image};
    ///
    /// let a = Image::new_filled(2, 2, Channels::Gray, 0b1100).unwrap();
    /// let b = Image::new_filled(2, 2, Channels::Gray, 0b1010).unwrap();
    /// let c = a.and(&b, None).unwrap();
    /// assert_eq!(c.get_sample(0, 0, 0), Some(0b1000));
    /// ```
    pub fn and(&self, other: &Image, mask: Option<&Mask>) -> Result<Image> {
        self.rop(other, RopOp::And, mask)
    }

    /// Bitwise OR of two images.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleShape`](crate::Error::IncompatibleShape)
    /// if the images differ in shape or the mask differs in size.
    pub fn or(&self, other: &Image, mask: Option<&Mask>) -> Result<Image> {
        self.rop(other, RopOp::Or, mask)
    }

    /// Bitwise XOR of two images.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleShape`](crate::Error::IncompatibleShape)
    /// if the images differ in shape or the mask differs in size.
    pub fn xor(&self, other: &Image, mask: Option<&Mask>) -> Result<Image> {
        self.rop(other, RopOp::Xor, mask)
    }

    /// Bitwise NOT of every sample (`255 - v`).
    ///
    /// All channels are inverted, alpha included.
    pub fn not(&self) -> Image {
        let mut result_mut = self.to_mut();
        result_mut.invert_inplace();
        result_mut.into()
    }

    /// Keep the pixels selected by `mask` and zero the rest.
    ///
    /// Equivalent to `self.and(self, Some(mask))`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleShape`](crate::Error::IncompatibleShape)
    /// if the mask size differs from the image size.
    pub fn apply_mask(&self, mask: &Mask) -> Result<Image> {
        self.and(self, Some(mask))
    }

    /// Apply a general raster operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleShape`](crate::Error::IncompatibleShape)
    /// if the images differ in shape or the mask differs in size.
    pub fn rop(&self, other: &Image, op: RopOp, mask: Option<&Mask>) -> Result<Image> {
        let mut result_mut = self.to_mut();
        result_mut.rop_inplace(other, op, mask)?;
        Ok(result_mut.into())
    }
}

impl ImageMut {
    /// Apply a general raster operation in place: `self = self op other`.
    ///
    /// With a mask, pixels outside the mask are set to 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleShape`](crate::Error::IncompatibleShape)
    /// if the images differ in shape or the mask differs in size. On error
    /// `self` is left unchanged.
    pub fn rop_inplace(&mut self, other: &Image, op: RopOp, mask: Option<&Mask>) -> Result<()> {
        self.check_same_shape(other)?;
        if let Some(mask) = mask {
            mask.check_size(self.width(), self.height())?;
        }

        let spp = self.spp() as usize;
        let dst = self.data_mut();
        match mask {
            None => {
                for (d, &s) in dst.iter_mut().zip(other.data()) {
                    *d = op.apply(*d, s);
                }
            }
            Some(mask) => {
                let pixels = dst
                    .chunks_exact_mut(spp)
                    .zip(other.data().chunks_exact(spp))
                    .zip(mask.data());
                for ((dp, sp), &m) in pixels {
                    if m == MASK_ON {
                        for (d, &s) in dp.iter_mut().zip(sp) {
                            *d = op.apply(*d, s);
                        }
                    } else {
                        dp.fill(0);
                    }
                }
            }
        }
        Ok(())
    }

    /// Bitwise AND with another image, in place.
    ///
    /// # Errors
    ///
    /// See [`ImageMut::rop_inplace`].
    pub fn and_inplace(&mut self, other: &Image, mask: Option<&Mask>) -> Result<()> {
        self.rop_inplace(other, RopOp::And, mask)
    }

    /// Bitwise OR with another image, in place.
    ///
    /// # Errors
    ///
    /// See [`ImageMut::rop_inplace`].
    pub fn or_inplace(&mut self, other: &Image, mask: Option<&Mask>) -> Result<()> {
        self.rop_inplace(other, RopOp::Or, mask)
    }

    /// Bitwise XOR with another image, in place.
    ///
    /// # Errors
    ///
    /// See [`ImageMut::rop_inplace`].
    pub fn xor_inplace(&mut self, other: &Image, mask: Option<&Mask>) -> Result<()> {
        self.rop_inplace(other, RopOp::Xor, mask)
    }

    /// Invert every sample in place.
    pub fn invert_inplace(&mut self) {
        for v in self.data_mut() {
            *v = !*v;
        }
    }
}
