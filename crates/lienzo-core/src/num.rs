//! Epsilon-tolerant float comparisons.
//!
//! A value is "positive" when it is at least [`EPSILON`] and "zero" when its
//! magnitude stays below it. Every equality check in the workspace goes
//! through these helpers so geometry comparisons stay stable under float
//! rounding.

use std::f32::consts::PI;

/// Tolerance shared by all float comparisons.
pub const EPSILON: f32 = 1e-6;

/// `value < EPSILON`: zero or negative.
#[inline]
pub fn is_positive_zero(value: f32) -> bool {
    value < EPSILON
}

/// `-value < EPSILON`: zero or positive.
#[inline]
pub fn is_negative_zero(value: f32) -> bool {
    -value < EPSILON
}

/// Magnitude below [`EPSILON`].
#[inline]
pub fn is_zero(value: f32) -> bool {
    is_positive_zero(value) && is_negative_zero(value)
}

/// `value >= EPSILON`.
#[inline]
pub fn is_positive(value: f32) -> bool {
    value >= EPSILON
}

/// `value <= -EPSILON`.
#[inline]
pub fn is_negative(value: f32) -> bool {
    value <= -EPSILON
}

/// Epsilon-tolerant equality.
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    is_zero(b - a)
}

/// Radians to degrees.
#[inline]
pub fn to_degrees(radians: f32) -> f32 {
    (radians * 180.0) / PI
}

/// Degrees to radians.
#[inline]
pub fn to_radians(degrees: f32) -> f32 {
    (degrees * PI) / 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_band() {
        assert!(is_zero(0.0));
        assert!(is_zero(EPSILON / 2.0));
        assert!(is_zero(-EPSILON / 2.0));
        assert!(!is_zero(EPSILON));
        assert!(!is_zero(-EPSILON));
    }

    #[test]
    fn signs() {
        assert!(is_positive(1.0));
        assert!(!is_positive(EPSILON / 2.0));
        assert!(is_negative(-1.0));
        assert!(!is_negative(-EPSILON / 2.0));
        assert!(is_positive_zero(0.0));
        assert!(is_positive_zero(-3.0));
        assert!(!is_positive_zero(1.0));
    }

    #[test]
    fn approx() {
        assert!(approx_eq(1.0, 1.0 + EPSILON / 4.0));
        assert!(!approx_eq(1.0, 1.0 + EPSILON * 2.0));
    }

    #[test]
    fn angle_conversion_round_trips() {
        let angle = 1.25_f32;
        assert!(approx_eq(to_radians(to_degrees(angle)), angle));
    }
}
