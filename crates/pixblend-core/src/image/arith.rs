//! Image arithmetic operations
//!
//! This module provides functions for sample-wise arithmetic operations:
//!
//! - Addition (`add`, `add_constant`)
//! - Subtraction (`subtract`, `subtract_constant`)
//! - Multiplication (`multiply`, `multiply_constant`)
//! - In-place operations
//!
//! Every operation is computed in a wider type (`i32` for addition and
//! subtraction, `f32` for multiplication) and saturated to [0, 255].
//! Results never wrap around.

use super::{Image, ImageMut};
use crate::error::{Error, Result};
use crate::fimage::{FImage, saturate_f32};

impl Image {
    /// Add a constant value to all samples.
    ///
    /// Creates a new image where each sample value is increased by the
    /// constant. Values are clipped to [0, 255].
    ///
    /// # Arguments
    ///
    /// * `val` - Value to add (can be negative for subtraction)
    ///
    /// # Example
    ///
    /// ```
    /// use pixblend_core::{Channels, Image};
    ///
    /// let image = Image::new_filled(10, 10, Channels::Rgb, 220).unwrap();
    /// let brighter = image.add_constant(50);
    /// assert!(brighter.data().iter().all(|&v| v == 255));
    /// ```
    pub fn add_constant(&self, val: i32) -> Image {
        let mut result_mut = self.to_mut();
        result_mut.add_constant_inplace(val);
        result_mut.into()
    }

    /// Subtract a constant value from all samples.
    ///
    /// Values are clipped to 0.
    pub fn subtract_constant(&self, val: i32) -> Image {
        self.add_constant(val.saturating_neg())
    }

    /// Multiply all samples by a constant factor.
    ///
    /// Creates a new image where each sample value is multiplied by the
    /// factor. A factor below 1.0 lowers contrast, above 1.0 raises it.
    /// Products are clamped to [0, 255] and truncated.
    ///
    /// # Arguments
    ///
    /// * `factor` - Multiplication factor (must be finite and >= 0.0)
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if factor is negative or not finite.
    ///
    /// # Example
    ///
    /// ```
    /// use pixblend_core::{Channels, Image};
    ///
    /// let image = Image::new_filled(10, 10, Channels::Gray, 100).unwrap();
    /// let darker = image.multiply_constant(0.8).unwrap();
    /// assert_eq!(darker.get_sample(0, 0, 0), Some(80));
    /// ```
    pub fn multiply_constant(&self, factor: f32) -> Result<Image> {
        let mut result_mut = self.to_mut();
        result_mut.multiply_constant_inplace(factor)?;
        Ok(result_mut.into())
    }

    /// Multiply each sample by the matching factor of a float matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleShape`] if `factors` does not have this
    /// image's shape, or [`Error::InvalidParameter`] if any factor is
    /// negative or not finite.
    pub fn multiply(&self, factors: &FImage) -> Result<Image> {
        if factors.shape() != self.shape() {
            return Err(Error::IncompatibleShape {
                expected: self.shape(),
                actual: factors.shape(),
            });
        }
        if let Some(bad) = factors.data().iter().find(|f| !is_valid_factor(**f)) {
            return Err(Error::InvalidParameter(format!(
                "factor must be finite and >= 0.0, got {bad}"
            )));
        }

        let data = self
            .data()
            .iter()
            .zip(factors.data())
            .map(|(&v, &f)| saturate_f32(f32::from(v) * f))
            .collect();
        Ok(Image::from_parts(
            self.width(),
            self.height(),
            self.channels(),
            data,
        ))
    }

    /// Add another image to this one: self + other
    ///
    /// Creates a new image where each sample is the sum of corresponding
    /// samples in self and other. Values are clipped to 255.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleShape`] if the images are not
    /// shape-compatible.
    ///
    /// # Example
    ///
    /// ```
    /// use pixblend_core::{Channels, Image};
    ///
    /// let a = Image::new_filled(4, 4, Channels::Rgb, 200).unwrap();
    /// let b = Image::new_filled(4, 4, Channels::Rgb, 100).unwrap();
    /// let sum = a.add(&b).unwrap();
    /// assert_eq!(sum.get_sample(0, 0, 0), Some(255));
    /// ```
    pub fn add(&self, other: &Image) -> Result<Image> {
        self.arith_binary_op(other, ArithBinaryOp::Add)
    }

    /// Subtract another image from this one: self - other
    ///
    /// Values are clipped to 0 (no negative values).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleShape`] if the images are not
    /// shape-compatible.
    pub fn subtract(&self, other: &Image) -> Result<Image> {
        self.arith_binary_op(other, ArithBinaryOp::Subtract)
    }

    /// Internal helper for binary arithmetic operations
    fn arith_binary_op(&self, other: &Image, op: ArithBinaryOp) -> Result<Image> {
        self.check_same_shape(other)?;
        let data = self
            .data()
            .iter()
            .zip(other.data())
            .map(|(&a, &b)| op.apply(a, b))
            .collect();
        Ok(Image::from_parts(
            self.width(),
            self.height(),
            self.channels(),
            data,
        ))
    }
}

impl ImageMut {
    /// Add a constant value to all samples in place.
    ///
    /// Values are clipped to [0, 255].
    pub fn add_constant_inplace(&mut self, val: i32) {
        for v in self.data_mut() {
            *v = saturate_i32(i32::from(*v).saturating_add(val));
        }
    }

    /// Multiply all samples by a constant factor in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if factor is negative or not finite.
    pub fn multiply_constant_inplace(&mut self, factor: f32) -> Result<()> {
        if !is_valid_factor(factor) {
            return Err(Error::InvalidParameter(format!(
                "factor must be finite and >= 0.0, got {factor}"
            )));
        }
        for v in self.data_mut() {
            *v = saturate_f32(f32::from(*v) * factor);
        }
        Ok(())
    }

    /// Add another image in place: self += other
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleShape`] if the images are not
    /// shape-compatible.
    pub fn add_inplace(&mut self, other: &Image) -> Result<()> {
        self.arith_binary_op_inplace(other, ArithBinaryOp::Add)
    }

    /// Subtract another image in place: self -= other
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleShape`] if the images are not
    /// shape-compatible.
    pub fn subtract_inplace(&mut self, other: &Image) -> Result<()> {
        self.arith_binary_op_inplace(other, ArithBinaryOp::Subtract)
    }

    fn arith_binary_op_inplace(&mut self, other: &Image, op: ArithBinaryOp) -> Result<()> {
        self.check_same_shape(other)?;
        for (a, &b) in self.data_mut().iter_mut().zip(other.data()) {
            *a = op.apply(*a, b);
        }
        Ok(())
    }
}

/// Binary arithmetic operations (internal use)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArithBinaryOp {
    Add,
    Subtract,
}

impl ArithBinaryOp {
    #[inline]
    fn apply(self, a: u8, b: u8) -> u8 {
        let (a, b) = (i32::from(a), i32::from(b));
        match self {
            ArithBinaryOp::Add => saturate_i32(a + b),
            ArithBinaryOp::Subtract => saturate_i32(a - b),
        }
    }
}

#[inline]
fn saturate_i32(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

#[inline]
fn is_valid_factor(factor: f32) -> bool {
    factor.is_finite() && factor >= 0.0
}
