use std::ops::{Mul, MulAssign};

use serde::{Deserialize, Serialize};

use crate::num::{approx_eq, is_negative, is_positive, is_zero};

/// A non-negative 2D extent.
///
/// A size with either dimension within epsilon of zero collapses to
/// `(0, 0)`, so an "empty" size is always exactly zero in both axes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        debug_assert!(!is_negative(width), "invalid width");
        debug_assert!(!is_negative(height), "invalid height");

        let mut size = Self { width, height };
        size.check_empty();
        size
    }

    fn check_empty(&mut self) {
        if is_zero(self.width) || is_zero(self.height) {
            self.width = 0.0;
            self.height = 0.0;
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn set_width(&mut self, width: f32) {
        debug_assert!(!is_negative(width), "invalid width");

        self.width = width;
        self.check_empty();
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_height(&mut self, height: f32) {
        debug_assert!(!is_negative(height), "invalid height");

        self.height = height;
        self.check_empty();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0.0
    }

    pub fn scale(&mut self, factor: f32) {
        debug_assert!(is_positive(factor), "invalid scale factor");

        if !self.is_empty() {
            self.width *= factor;
            self.height *= factor;
        }
    }

    pub fn scaled(&self, factor: f32) -> Self {
        let mut scaled = *self;
        scaled.scale(factor);
        scaled
    }
}

impl PartialEq for Size {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.width, other.width) && approx_eq(self.height, other.height)
    }
}

impl Mul<f32> for Size {
    type Output = Size;

    fn mul(self, factor: f32) -> Size {
        self.scaled(factor)
    }
}

impl MulAssign<f32> for Size {
    fn mul_assign(&mut self, factor: f32) {
        self.scale(factor);
    }
}
