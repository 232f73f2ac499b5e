use serde::{Deserialize, Serialize};

use crate::num::{approx_eq, is_positive};

/// An RGBA color with each channel in `[0, 1]`.
///
/// Channel values are validated in debug builds on construction and
/// mutation. Equality is epsilon-tolerant per channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Color {
    red: f32,
    green: f32,
    blue: f32,
    alpha: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

fn check_channel(value: f32, name: &str) {
    debug_assert!((0.0..=1.0).contains(&value), "invalid {name} channel");
    let _ = (value, name);
}

fn hue_channel(mut h: f32, m1: f32, m2: f32) -> f32 {
    if h < 0.0 {
        h += 1.0;
    }
    if h > 1.0 {
        h -= 1.0;
    }
    if h < 1.0 / 6.0 {
        m1 + (m2 - m1) * h * 6.0
    } else if h < 3.0 / 6.0 {
        m2
    } else if h < 4.0 / 6.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - h) * 6.0
    } else {
        m1
    }
}

impl Color {
    pub const WHITE: Color = Color {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
        alpha: 1.0,
    };
    pub const BLACK: Color = Color {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        alpha: 0.0,
    };

    pub fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        check_channel(red, "red");
        check_channel(green, "green");
        check_channel(blue, "blue");
        check_channel(alpha, "alpha");
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(red, green, blue, 1.0)
    }

    pub fn from_u8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self::new(
            f32::from(red) / 255.0,
            f32::from(green) / 255.0,
            f32::from(blue) / 255.0,
            f32::from(alpha) / 255.0,
        )
    }

    /// HSL to RGB, with hue, saturation and lightness all in `[0, 1]`.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self::from_hsla(hue, saturation, lightness, 1.0)
    }

    pub fn from_hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        check_channel(hue, "hue");
        check_channel(saturation, "saturation");
        check_channel(lightness, "lightness");

        let h = hue.rem_euclid(1.0);
        let m2 = if lightness <= 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let m1 = 2.0 * lightness - m2;

        Self::new(
            hue_channel(h + 1.0 / 3.0, m1, m2).clamp(0.0, 1.0),
            hue_channel(h, m1, m2).clamp(0.0, 1.0),
            hue_channel(h - 1.0 / 3.0, m1, m2).clamp(0.0, 1.0),
            alpha,
        )
    }

    #[inline]
    pub fn red(&self) -> f32 {
        self.red
    }

    #[inline]
    pub fn green(&self) -> f32 {
        self.green
    }

    #[inline]
    pub fn blue(&self) -> f32 {
        self.blue
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn set_red(&mut self, red: f32) {
        check_channel(red, "red");
        self.red = red;
    }

    pub fn set_green(&mut self, green: f32) {
        check_channel(green, "green");
        self.green = green;
    }

    pub fn set_blue(&mut self, blue: f32) {
        check_channel(blue, "blue");
        self.blue = blue;
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        check_channel(alpha, "alpha");
        self.alpha = alpha;
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.set_alpha(alpha);
        self
    }

    /// A color is visible when its alpha is strictly above the epsilon
    /// band. Invisible blend colors hide a node with a nonzero blend
    /// factor outright.
    #[inline]
    pub fn is_visible(&self) -> bool {
        is_positive(self.alpha)
    }

    /// Linear interpolation towards `other` by `factor` across all four
    /// channels. Factor 0 keeps `self`, factor 1 yields `other`.
    pub fn blended(&self, other: &Color, factor: f32) -> Self {
        check_channel(factor, "blend factor");

        let inverse = 1.0 - factor;
        Self {
            red: self.red * inverse + other.red * factor,
            green: self.green * inverse + other.green * factor,
            blue: self.blue * inverse + other.blue * factor,
            alpha: self.alpha * inverse + other.alpha * factor,
        }
    }

    /// Fold a blend-color stack into this color, outermost first.
    pub fn blended_with_stack(&self, stack: &[BlendColor]) -> Self {
        stack
            .iter()
            .fold(*self, |color, blend| color.blended(&blend.color, blend.factor))
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.red, other.red)
            && approx_eq(self.green, other.green)
            && approx_eq(self.blue, other.blue)
            && approx_eq(self.alpha, other.alpha)
    }
}

/// One entry of the ancestor blend stack: a tint color plus how strongly
/// it applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendColor {
    pub color: Color,
    pub factor: f32,
}

impl BlendColor {
    pub fn new(color: Color, factor: f32) -> Self {
        check_channel(factor, "blend factor");
        Self { color, factor }
    }

    /// Collapse a stack into a single equivalent color and factor pair.
    /// The first entry seeds the result and the rest blend into its
    /// color, with the first entry's factor preserved.
    pub fn fold(stack: &[BlendColor]) -> BlendColor {
        match stack.split_first() {
            None => BlendColor::new(Color::WHITE, 0.0),
            Some((first, rest)) => {
                let color = rest
                    .iter()
                    .fold(first.color, |color, blend| {
                        color.blended(&blend.color, blend.factor)
                    });
                BlendColor {
                    color,
                    factor: first.factor,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8_scales_channels() {
        let color = Color::from_u8(255, 0, 128, 255);
        assert!(approx_eq(color.red(), 1.0));
        assert!(approx_eq(color.green(), 0.0));
        assert!((color.blue() - 0.5).abs() < 0.01);
    }

    #[test]
    fn hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 1.0, 0.5), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(
            Color::from_hsl(1.0 / 3.0, 1.0, 0.5),
            Color::rgb(0.0, 1.0, 0.0)
        );
        assert_eq!(
            Color::from_hsl(2.0 / 3.0, 1.0, 0.5),
            Color::rgb(0.0, 0.0, 1.0)
        );
        assert_eq!(Color::from_hsl(0.5, 0.0, 1.0), Color::WHITE);
    }

    #[test]
    fn blend_endpoints() {
        let a = Color::rgb(1.0, 0.0, 0.0);
        let b = Color::rgb(0.0, 0.0, 1.0);
        assert_eq!(a.blended(&b, 0.0), a);
        assert_eq!(a.blended(&b, 1.0), b);
        assert_eq!(a.blended(&b, 0.5), Color::rgb(0.5, 0.0, 0.5));
    }

    #[test]
    fn visibility_tracks_alpha() {
        assert!(Color::WHITE.is_visible());
        assert!(!Color::TRANSPARENT.is_visible());
        assert!(!Color::WHITE.with_alpha(0.0).is_visible());
    }

    #[test]
    fn empty_stack_folds_to_no_tint() {
        let folded = BlendColor::fold(&[]);
        assert!(approx_eq(folded.factor, 0.0));
    }

    #[test]
    fn fold_keeps_first_factor_and_blends_colors() {
        let stack = [
            BlendColor::new(Color::rgb(1.0, 0.0, 0.0), 0.75),
            BlendColor::new(Color::rgb(0.0, 0.0, 1.0), 0.5),
        ];
        let folded = BlendColor::fold(&stack);
        assert!(approx_eq(folded.factor, 0.75));
        assert_eq!(folded.color, Color::rgb(0.5, 0.0, 0.5));
    }

    #[test]
    fn stack_fold_applies_in_order() {
        let base = Color::rgb(0.0, 0.0, 0.0);
        let stack = [
            BlendColor::new(Color::WHITE, 1.0),
            BlendColor::new(Color::rgb(1.0, 0.0, 0.0), 0.5),
        ];
        assert_eq!(
            base.blended_with_stack(&stack),
            Color::rgb(1.0, 0.5, 0.5)
        );
    }
}
