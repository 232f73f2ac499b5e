use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Mul, MulAssign};

use serde::{Deserialize, Serialize};

use crate::num::{is_positive, is_positive_zero};
use crate::point::Point;
use crate::size::Size;
use crate::transform::Transform;

/// An axis-aligned rectangle: top-left position plus size.
///
/// The empty rect (zero size) is the identity for [`Rect::join`] and
/// absorbing for [`Rect::intersect`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    position: Point,
    size: Size,
}

fn min_max(value: f32, min: &mut f32, max: &mut f32) {
    if value < *min {
        *min = value;
    } else if value > *max {
        *max = value;
    }
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_position_size(position: Point, size: Size) -> Self {
        Self { position, size }
    }

    /// Axis-aligned hull of an arbitrary set of points. The first point
    /// seeds the bounds; the rest extend them.
    pub fn hull(first: Point, rest: &[Point]) -> Self {
        let mut min_x = first.x;
        let mut max_x = min_x;
        let mut min_y = first.y;
        let mut max_y = min_y;

        for point in rest {
            min_max(point.x, &mut min_x, &mut max_x);
            min_max(point.y, &mut min_y, &mut max_y);
        }

        Self {
            position: Point::new(min_x, min_y),
            size: Size::new(max_x - min_x, max_y - min_y),
        }
    }

    pub fn from_points(a: Point, b: Point) -> Self {
        Self::hull(a, &[b])
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.position.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.width()
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.height()
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn top_right(&self) -> Point {
        Point::new(self.x() + self.width(), self.y())
    }

    #[inline]
    pub fn bottom_left(&self) -> Point {
        Point::new(self.x(), self.y() + self.height())
    }

    #[inline]
    pub fn bottom_right(&self) -> Point {
        Point::new(self.x() + self.width(), self.y() + self.height())
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            self.x() + self.width() * 0.5,
            self.y() + self.height() * 0.5,
        )
    }

    pub fn set_center(&mut self, center: Point) {
        self.position = Point::new(
            center.x - self.width() * 0.5,
            center.y - self.height() * 0.5,
        );
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        if self.is_empty() {
            return false;
        }

        let x = self.x().max(other.x());
        let width = (self.x() + self.width()).min(other.x() + other.width()) - x;
        if !is_positive(width) {
            return false;
        }

        let y = self.y().max(other.y());
        let height = (self.y() + self.height()).min(other.y() + other.height()) - y;
        is_positive(height)
    }

    /// Scale about the center.
    pub fn scale(&mut self, factor: f32) {
        debug_assert!(is_positive(factor), "invalid scale factor");

        let old_size = self.size;
        self.size.scale(factor);

        let width_delta = self.size.width() - old_size.width();
        let height_delta = self.size.height() - old_size.height();
        self.position = Point::new(
            self.x() - width_delta * 0.5,
            self.y() - height_delta * 0.5,
        );
    }

    pub fn scaled(&self, factor: f32) -> Self {
        let mut scaled = *self;
        scaled.scale(factor);
        scaled
    }

    /// Union. The empty rect is the identity.
    pub fn join(&mut self, other: &Rect) {
        if self.is_empty() {
            *self = *other;
        } else {
            let x = self.x().min(other.x());
            let y = self.y().min(other.y());
            let width = (self.x() + self.width()).max(other.x() + other.width()) - x;
            let height = (self.y() + self.height()).max(other.y() + other.height()) - y;
            self.position = Point::new(x, y);
            self.size = Size::new(width, height);
        }
    }

    pub fn joined(&self, other: &Rect) -> Self {
        let mut joined = *self;
        joined.join(other);
        joined
    }

    pub fn intersect(&mut self, other: &Rect) {
        if self.is_empty() {
            return;
        }

        let x = self.x().max(other.x());
        let width = (self.x() + self.width()).min(other.x() + other.width()) - x;
        let y = self.y().max(other.y());
        let height = (self.y() + self.height()).min(other.y() + other.height()) - y;
        if is_positive(width) && is_positive(height) {
            self.position = Point::new(x, y);
            self.size = Size::new(width, height);
        } else {
            *self = Rect::default();
        }
    }

    pub fn intersected(&self, other: &Rect) -> Self {
        let mut intersected = *self;
        intersected.intersect(other);
        intersected
    }

    /// Axis-aligned bound of the four transformed corners. This is not a
    /// rotated rect: rotating and bounding loses the exact shape.
    pub fn transformed(&self, transform: &Transform) -> Self {
        Rect::hull(
            self.top_left().transformed(transform),
            &[
                self.top_right().transformed(transform),
                self.bottom_left().transformed(transform),
                self.bottom_right().transformed(transform),
            ],
        )
    }

    /// Grow uniformly on every side. A non-positive amount is a no-op.
    pub fn inflated(&self, amount: f32) -> Self {
        if is_positive_zero(amount) {
            return *self;
        }

        Rect::new(
            self.x() - amount,
            self.y() - amount,
            self.width() + amount * 2.0,
            self.height() + amount * 2.0,
        )
    }
}

impl Mul<f32> for Rect {
    type Output = Rect;

    fn mul(self, factor: f32) -> Rect {
        self.scaled(factor)
    }
}

impl MulAssign<f32> for Rect {
    fn mul_assign(&mut self, factor: f32) {
        self.scale(factor);
    }
}

impl BitOr for Rect {
    type Output = Rect;

    fn bitor(self, other: Rect) -> Rect {
        self.joined(&other)
    }
}

impl BitOrAssign for Rect {
    fn bitor_assign(&mut self, other: Rect) {
        self.join(&other);
    }
}

impl BitAnd for Rect {
    type Output = Rect;

    fn bitand(self, other: Rect) -> Rect {
        self.intersected(&other)
    }
}

impl BitAndAssign for Rect {
    fn bitand_assign(&mut self, other: Rect) {
        self.intersect(&other);
    }
}
