//! Pens: how a shape group is painted.

use lienzo_core::{is_negative, is_positive, BlendColor, Color, Point, Rect};

use crate::canvas::{LineCap, LineJoin, Paint};
use crate::image::Image;

/// The paint description of a pen.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PenKind {
    /// Draws nothing. A group with this pen is skipped by rendering and
    /// bounding-box computation alike.
    #[default]
    None,
    Color {
        color: Color,
    },
    LinearGradient {
        start: Point,
        end: Point,
        inner: Color,
        outer: Color,
    },
    BoxGradient {
        rect: Rect,
        corner_radius: f32,
        corner_blur: f32,
        inner: Color,
        outer: Color,
    },
    RadialGradient {
        center: Point,
        inner_radius: f32,
        outer_radius: f32,
        inner: Color,
        outer: Color,
    },
    /// Holds a shared handle to the backend image resource.
    ImagePattern {
        rect: Rect,
        angle: f32,
        image: Image,
        opacity: f32,
    },
}

/// A paint plus stroke styling. Pens fill by default; `stroked` turns
/// the same paint into a stroke of the given width.
#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    kind: PenKind,
    stroke: bool,
    stroke_width: f32,
    line_cap: LineCap,
    line_join: LineJoin,
}

impl Default for Pen {
    fn default() -> Self {
        Self::new(PenKind::None)
    }
}

impl Pen {
    pub fn new(kind: PenKind) -> Self {
        Self::validate(&kind);

        Self {
            kind,
            stroke: false,
            stroke_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
        }
    }

    pub fn color(color: Color) -> Self {
        Self::new(PenKind::Color { color })
    }

    pub fn stroked(kind: PenKind, stroke_width: f32) -> Self {
        debug_assert!(!is_negative(stroke_width), "invalid stroke width");

        let mut pen = Self::new(kind);
        pen.stroke = true;
        pen.stroke_width = stroke_width;
        pen
    }

    fn validate(kind: &PenKind) {
        match kind {
            PenKind::BoxGradient {
                rect,
                corner_radius,
                corner_blur,
                ..
            } => {
                debug_assert!(!rect.is_empty(), "box gradient rect is empty");
                debug_assert!(is_positive(*corner_radius), "invalid corner radius");
                debug_assert!(!is_negative(*corner_blur), "invalid corner blur");
            }
            PenKind::RadialGradient {
                inner_radius,
                outer_radius,
                ..
            } => {
                debug_assert!(is_positive(*inner_radius), "invalid inner radius");
                debug_assert!(is_positive(*outer_radius), "invalid outer radius");
            }
            PenKind::ImagePattern { opacity, .. } => {
                debug_assert!((0.0..=1.0).contains(opacity), "invalid pattern opacity");
            }
            _ => {}
        }
    }

    pub fn kind(&self) -> &PenKind {
        &self.kind
    }

    pub fn set_kind(&mut self, kind: PenKind) {
        Self::validate(&kind);
        self.kind = kind;
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self.kind, PenKind::None)
    }

    #[inline]
    pub fn is_stroke(&self) -> bool {
        self.stroke
    }

    pub fn set_stroke(&mut self, stroke: bool) {
        self.stroke = stroke;
    }

    #[inline]
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, stroke_width: f32) {
        debug_assert!(!is_negative(stroke_width), "invalid stroke width");
        self.stroke_width = stroke_width;
    }

    #[inline]
    pub fn line_cap(&self) -> LineCap {
        self.line_cap
    }

    pub fn set_line_cap(&mut self, line_cap: LineCap) {
        self.line_cap = line_cap;
    }

    #[inline]
    pub fn line_join(&self) -> LineJoin {
        self.line_join
    }

    pub fn set_line_join(&mut self, line_join: LineJoin) {
        self.line_join = line_join;
    }

    /// Resolve into a backend paint, folding every color through the
    /// active blend-color stack. `None` for the empty pen.
    pub fn resolve(&self, blend_colors: &[BlendColor]) -> Option<Paint> {
        match &self.kind {
            PenKind::None => None,
            PenKind::Color { color } => {
                Some(Paint::Color(color.blended_with_stack(blend_colors)))
            }
            PenKind::LinearGradient {
                start,
                end,
                inner,
                outer,
            } => Some(Paint::LinearGradient {
                start: *start,
                end: *end,
                inner: inner.blended_with_stack(blend_colors),
                outer: outer.blended_with_stack(blend_colors),
            }),
            PenKind::BoxGradient {
                rect,
                corner_radius,
                corner_blur,
                inner,
                outer,
            } => Some(Paint::BoxGradient {
                rect: *rect,
                corner_radius: *corner_radius,
                corner_blur: *corner_blur,
                inner: inner.blended_with_stack(blend_colors),
                outer: outer.blended_with_stack(blend_colors),
            }),
            PenKind::RadialGradient {
                center,
                inner_radius,
                outer_radius,
                inner,
                outer,
            } => Some(Paint::RadialGradient {
                center: *center,
                inner_radius: *inner_radius,
                outer_radius: *outer_radius,
                inner: inner.blended_with_stack(blend_colors),
                outer: outer.blended_with_stack(blend_colors),
            }),
            PenKind::ImagePattern {
                rect,
                angle,
                image,
                opacity,
            } => Some(Paint::ImagePattern {
                rect: *rect,
                angle: *angle,
                image: image.handle(),
                opacity: *opacity,
            }),
        }
    }

    /// Mirror the gradient geometry about the vertical axis. Solid
    /// color has no spatial component, and the image-pattern rect is
    /// flipped by the node, not the pen.
    pub fn horizontal_flip(&mut self) {
        match &mut self.kind {
            PenKind::LinearGradient { start, end, .. } => {
                start.x = -start.x;
                end.x = -end.x;
            }
            PenKind::BoxGradient { rect, .. } => {
                let center = rect.center();
                rect.set_center(Point::new(-center.x, center.y));
            }
            PenKind::RadialGradient { center, .. } => {
                center.x = -center.x;
            }
            _ => {}
        }
    }

    /// Mirror the gradient geometry about the horizontal axis.
    pub fn vertical_flip(&mut self) {
        match &mut self.kind {
            PenKind::LinearGradient { start, end, .. } => {
                start.y = -start.y;
                end.y = -end.y;
            }
            PenKind::BoxGradient { rect, .. } => {
                let center = rect.center();
                rect.set_center(Point::new(center.x, -center.y));
            }
            PenKind::RadialGradient { center, .. } => {
                center.y = -center.y;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lienzo_core::BlendColor;

    #[test]
    fn empty_pen_resolves_to_nothing() {
        assert!(Pen::default().resolve(&[]).is_none());
        assert!(!Pen::default().is_valid());
    }

    #[test]
    fn solid_pen_folds_blend_stack() {
        let pen = Pen::color(Color::rgb(1.0, 0.0, 0.0));
        let stack = [BlendColor::new(Color::rgb(0.0, 0.0, 1.0), 0.5)];
        let Some(Paint::Color(color)) = pen.resolve(&stack) else {
            panic!("expected solid paint");
        };
        assert_eq!(color, Color::rgb(0.5, 0.0, 0.5));
    }

    #[test]
    fn gradient_colors_fold_too() {
        let pen = Pen::new(PenKind::LinearGradient {
            start: Point::new(0.0, -10.0),
            end: Point::new(0.0, 10.0),
            inner: Color::WHITE,
            outer: Color::BLACK,
        });
        let stack = [BlendColor::new(Color::BLACK, 1.0)];
        let Some(Paint::LinearGradient { inner, outer, .. }) = pen.resolve(&stack) else {
            panic!("expected linear gradient paint");
        };
        assert_eq!(inner, Color::BLACK);
        assert_eq!(outer, Color::BLACK);
    }

    #[test]
    fn horizontal_flip_mirrors_linear_gradient() {
        let mut pen = Pen::new(PenKind::LinearGradient {
            start: Point::new(-5.0, 1.0),
            end: Point::new(5.0, 2.0),
            inner: Color::WHITE,
            outer: Color::BLACK,
        });
        pen.horizontal_flip();
        let PenKind::LinearGradient { start, end, .. } = pen.kind() else {
            unreachable!();
        };
        assert_eq!(*start, Point::new(5.0, 1.0));
        assert_eq!(*end, Point::new(-5.0, 2.0));
    }

    #[test]
    fn solid_pen_flip_is_a_no_op() {
        let mut pen = Pen::color(Color::WHITE);
        let before = pen.clone();
        pen.horizontal_flip();
        pen.vertical_flip();
        assert_eq!(pen, before);
    }
}
