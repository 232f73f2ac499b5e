use serde::{Deserialize, Serialize};

use crate::num::is_zero;
use crate::point::Point;

/// A 2D affine transform in column-major 3x2 form `[a b c d tx ty]`.
///
/// A point maps as `x' = x*a + y*c + tx`, `y' = x*b + y*d + ty`, so
/// `multiply` composes "self then other" and `premultiply` the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform(pub [f32; 6]);

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub fn translate(tx: f32, ty: f32) -> Self {
        Transform([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Transform([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    /// Rotation by `angle` radians, clockwise with y pointing down.
    pub fn rotate(angle: f32) -> Self {
        let (sn, cs) = angle.sin_cos();
        Transform([cs, sn, -sn, cs, 0.0, 0.0])
    }

    pub fn skew_x(angle: f32) -> Self {
        Transform([1.0, 0.0, angle.tan(), 1.0, 0.0, 0.0])
    }

    pub fn skew_y(angle: f32) -> Self {
        Transform([1.0, angle.tan(), 0.0, 1.0, 0.0, 0.0])
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// `self = self * other` (self applied first).
    pub fn multiply(&mut self, other: &Transform) {
        let t = self.0;
        let s = other.0;
        self.0 = [
            t[0] * s[0] + t[1] * s[2],
            t[0] * s[1] + t[1] * s[3],
            t[2] * s[0] + t[3] * s[2],
            t[2] * s[1] + t[3] * s[3],
            t[4] * s[0] + t[5] * s[2] + s[4],
            t[4] * s[1] + t[5] * s[3] + s[5],
        ];
    }

    /// `self = other * self` (other applied first).
    pub fn premultiply(&mut self, other: &Transform) {
        let mut result = *other;
        result.multiply(self);
        *self = result;
    }

    pub fn multiplied(&self, other: &Transform) -> Self {
        let mut result = *self;
        result.multiply(other);
        result
    }

    pub fn inverse(&self) -> Option<Transform> {
        let t = &self.0;
        let det = t[0] * t[3] - t[2] * t[1];
        if is_zero(det) {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Transform([
            t[3] * inv_det,
            -t[1] * inv_det,
            -t[2] * inv_det,
            t[0] * inv_det,
            (t[2] * t[5] - t[3] * t[4]) * inv_det,
            (t[1] * t[4] - t[0] * t[5]) * inv_det,
        ]))
    }

    pub fn apply(&self, point: Point) -> Point {
        let t = &self.0;
        Point::new(
            point.x * t[0] + point.y * t[2] + t[4],
            point.x * t[1] + point.y * t[3] + t[5],
        )
    }
}
