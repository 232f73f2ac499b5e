//! Shape geometry primitives.
//!
//! Path-drawing variants are stateful relative to the previous point,
//! like a pen on paper: bounding-box computation replays shapes in
//! order, threading a "last point" cursor through them.

use std::f32::consts::PI;

use lienzo_core::{is_negative, is_positive, is_positive_zero, Point, Rect};

use crate::canvas::Canvas;

const TWO_PI: f32 = 2.0 * PI;

/// One geometry primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Arc {
        position: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        clockwise: bool,
    },
    Triangle {
        first: Point,
        second: Point,
        third: Point,
    },
    Rect {
        rect: Rect,
        corner_radius: f32,
    },
    Ellipse {
        position: Point,
        horizontal_radius: f32,
        vertical_radius: f32,
    },
    MoveTo {
        position: Point,
    },
    LineTo {
        position: Point,
    },
    BezierTo {
        control1: Point,
        control2: Point,
        position: Point,
    },
    QuadTo {
        control: Point,
        position: Point,
    },
    ClosePath,
}

/// A geometry primitive plus a hole flag. Hole shapes subtract from the
/// surrounding fill instead of adding to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    hole: bool,
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Self {
        match &kind {
            ShapeKind::Arc {
                radius,
                start_angle,
                end_angle,
                ..
            } => {
                debug_assert!(is_positive(*radius), "invalid radius");
                debug_assert!(
                    (0.0..TWO_PI).contains(start_angle),
                    "invalid start angle"
                );
                debug_assert!((0.0..TWO_PI).contains(end_angle), "invalid end angle");
            }
            ShapeKind::Triangle {
                first,
                second,
                third,
            } => {
                debug_assert!(first != second, "first two vertices are equal");
                debug_assert!(second != third, "last two vertices are equal");
            }
            ShapeKind::Rect {
                rect,
                corner_radius,
            } => {
                debug_assert!(!rect.is_empty(), "rect is empty");
                debug_assert!(!is_negative(*corner_radius), "invalid corner radius");
            }
            ShapeKind::Ellipse {
                horizontal_radius,
                vertical_radius,
                ..
            } => {
                debug_assert!(is_positive(*horizontal_radius), "invalid horizontal radius");
                debug_assert!(is_positive(*vertical_radius), "invalid vertical radius");
            }
            _ => {}
        }

        Self { kind, hole: false }
    }

    pub fn arc(
        position: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        clockwise: bool,
    ) -> Self {
        Self::new(ShapeKind::Arc {
            position,
            radius,
            start_angle,
            end_angle,
            clockwise,
        })
    }

    pub fn circle(position: Point, radius: f32) -> Self {
        Self::ellipse(position, radius, radius)
    }

    pub fn triangle(first: Point, second: Point, third: Point) -> Self {
        Self::new(ShapeKind::Triangle {
            first,
            second,
            third,
        })
    }

    pub fn rect(rect: Rect) -> Self {
        Self::new(ShapeKind::Rect {
            rect,
            corner_radius: 0.0,
        })
    }

    pub fn rounded_rect(rect: Rect, corner_radius: f32) -> Self {
        Self::new(ShapeKind::Rect {
            rect,
            corner_radius,
        })
    }

    pub fn ellipse(position: Point, horizontal_radius: f32, vertical_radius: f32) -> Self {
        Self::new(ShapeKind::Ellipse {
            position,
            horizontal_radius,
            vertical_radius,
        })
    }

    pub fn move_to(position: Point) -> Self {
        Self::new(ShapeKind::MoveTo { position })
    }

    pub fn line_to(position: Point) -> Self {
        Self::new(ShapeKind::LineTo { position })
    }

    pub fn bezier_to(control1: Point, control2: Point, position: Point) -> Self {
        Self::new(ShapeKind::BezierTo {
            control1,
            control2,
            position,
        })
    }

    pub fn quad_to(control: Point, position: Point) -> Self {
        Self::new(ShapeKind::QuadTo { control, position })
    }

    pub fn close_path() -> Self {
        Self::new(ShapeKind::ClosePath)
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    #[inline]
    pub fn is_hole(&self) -> bool {
        self.hole
    }

    pub fn set_hole(&mut self, hole: bool) {
        self.hole = hole;
    }

    /// Accumulate this shape into `bounding_box`, reading and updating
    /// the path cursor.
    pub fn join_bounding_box(&self, bounding_box: &mut Rect, last_point: &mut Point) {
        match &self.kind {
            ShapeKind::Arc {
                position, radius, ..
            } => {
                bounding_box.join(&Rect::new(
                    position.x - radius,
                    position.y - radius,
                    radius * 2.0,
                    radius * 2.0,
                ));
                *last_point = *position;
            }
            ShapeKind::Triangle {
                first,
                second,
                third,
            } => {
                bounding_box.join(&Rect::hull(*first, &[*second, *third]));
                *last_point = *third;
            }
            ShapeKind::Rect {
                rect,
                corner_radius,
            } => {
                bounding_box.join(rect);
                *last_point = if is_positive(*corner_radius) {
                    rect.bottom_left()
                } else {
                    rect.top_right()
                };
            }
            ShapeKind::Ellipse {
                position,
                horizontal_radius,
                vertical_radius,
            } => {
                let shape_box = Rect::new(
                    position.x - horizontal_radius,
                    position.y - vertical_radius,
                    horizontal_radius * 2.0,
                    vertical_radius * 2.0,
                );
                bounding_box.join(&shape_box);
                *last_point = shape_box.top_left();
            }
            ShapeKind::MoveTo { position } => {
                *last_point = *position;
            }
            ShapeKind::LineTo { position } => {
                bounding_box.join(&Rect::from_points(*last_point, *position));
                *last_point = *position;
            }
            ShapeKind::BezierTo {
                control1,
                control2,
                position,
            } => {
                bounding_box.join(&Rect::hull(*last_point, &[*control1, *control2, *position]));
                *last_point = *position;
            }
            ShapeKind::QuadTo { control, position } => {
                // Degree elevation: the quadratic's hull as an exact
                // equivalent cubic.
                let p0 = *last_point;
                let control1 = Point::new(
                    p0.x + 2.0 / 3.0 * (control.x - p0.x),
                    p0.y + 2.0 / 3.0 * (control.y - p0.y),
                );
                let control2 = Point::new(
                    position.x + 2.0 / 3.0 * (control.x - position.x),
                    position.y + 2.0 / 3.0 * (control.y - position.y),
                );
                bounding_box.join(&Rect::hull(p0, &[control1, control2, *position]));
                *last_point = *position;
            }
            ShapeKind::ClosePath => {}
        }
    }

    /// Issue this shape's path commands.
    pub fn emit(&self, canvas: &mut dyn Canvas) {
        match &self.kind {
            ShapeKind::Arc {
                position,
                radius,
                start_angle,
                end_angle,
                clockwise,
            } => {
                canvas.arc(*position, *radius, *start_angle, *end_angle, *clockwise);
            }
            ShapeKind::Triangle {
                first,
                second,
                third,
            } => {
                canvas.move_to(*first);
                canvas.line_to(*second);
                canvas.line_to(*third);
                canvas.close_path();
            }
            ShapeKind::Rect {
                rect,
                corner_radius,
            } => {
                if is_positive(*corner_radius) {
                    canvas.rounded_rect(rect, *corner_radius);
                } else {
                    canvas.rect(rect);
                }
            }
            ShapeKind::Ellipse {
                position,
                horizontal_radius,
                vertical_radius,
            } => {
                canvas.ellipse(*position, *horizontal_radius, *vertical_radius);
            }
            ShapeKind::MoveTo { position } => canvas.move_to(*position),
            ShapeKind::LineTo { position } => canvas.line_to(*position),
            ShapeKind::BezierTo {
                control1,
                control2,
                position,
            } => canvas.bezier_to(*control1, *control2, *position),
            ShapeKind::QuadTo { control, position } => canvas.quad_to(*control, *position),
            ShapeKind::ClosePath => canvas.close_path(),
        }

        if self.hole {
            canvas.hole_winding();
        }
    }

    /// Mirror about the vertical axis. Arcs mirror their angles and
    /// swing direction so the same sweep appears reflected.
    pub fn horizontal_flip(&mut self) {
        match &mut self.kind {
            ShapeKind::Arc {
                position,
                start_angle,
                end_angle,
                clockwise,
                ..
            } => {
                position.x = -position.x;
                *clockwise = !*clockwise;
                *start_angle = mirror_angle_horizontal(*start_angle);
                *end_angle = mirror_angle_horizontal(*end_angle);
            }
            ShapeKind::Triangle {
                first,
                second,
                third,
            } => {
                first.x = -first.x;
                second.x = -second.x;
                third.x = -third.x;
            }
            ShapeKind::Rect { rect, .. } => {
                let center = rect.center();
                rect.set_center(Point::new(-center.x, center.y));
            }
            ShapeKind::Ellipse { position, .. } => {
                position.x = -position.x;
            }
            ShapeKind::MoveTo { position } | ShapeKind::LineTo { position } => {
                position.x = -position.x;
            }
            ShapeKind::BezierTo {
                control1,
                control2,
                position,
            } => {
                control1.x = -control1.x;
                control2.x = -control2.x;
                position.x = -position.x;
            }
            ShapeKind::QuadTo { control, position } => {
                control.x = -control.x;
                position.x = -position.x;
            }
            ShapeKind::ClosePath => {}
        }
    }

    /// Mirror about the horizontal axis.
    pub fn vertical_flip(&mut self) {
        match &mut self.kind {
            ShapeKind::Arc {
                position,
                start_angle,
                end_angle,
                clockwise,
                ..
            } => {
                position.y = -position.y;
                *clockwise = !*clockwise;
                if !is_positive_zero(*start_angle) {
                    *start_angle = TWO_PI - *start_angle;
                }
                if !is_positive_zero(*end_angle) {
                    *end_angle = TWO_PI - *end_angle;
                }
            }
            ShapeKind::Triangle {
                first,
                second,
                third,
            } => {
                first.y = -first.y;
                second.y = -second.y;
                third.y = -third.y;
            }
            ShapeKind::Rect { rect, .. } => {
                let center = rect.center();
                rect.set_center(Point::new(center.x, -center.y));
            }
            ShapeKind::Ellipse { position, .. } => {
                position.y = -position.y;
            }
            ShapeKind::MoveTo { position } | ShapeKind::LineTo { position } => {
                position.y = -position.y;
            }
            ShapeKind::BezierTo {
                control1,
                control2,
                position,
            } => {
                control1.y = -control1.y;
                control2.y = -control2.y;
                position.y = -position.y;
            }
            ShapeKind::QuadTo { control, position } => {
                control.y = -control.y;
                position.y = -position.y;
            }
            ShapeKind::ClosePath => {}
        }
    }
}

fn mirror_angle_horizontal(angle: f32) -> f32 {
    if angle > PI {
        TWO_PI - (angle - PI)
    } else {
        PI - angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ellipse_bounding_box_and_cursor() {
        let shape = Shape::ellipse(Point::ORIGIN, 10.0, 5.0);
        let mut bbox = Rect::default();
        let mut cursor = Point::ORIGIN;
        shape.join_bounding_box(&mut bbox, &mut cursor);
        assert_eq!(bbox, Rect::new(-10.0, -5.0, 20.0, 10.0));
        assert_eq!(cursor, Point::new(-10.0, -5.0));
    }

    #[test]
    fn path_replay_threads_the_cursor() {
        let mut bbox = Rect::default();
        let mut cursor = Point::ORIGIN;
        Shape::move_to(Point::new(5.0, 5.0)).join_bounding_box(&mut bbox, &mut cursor);
        assert!(bbox.is_empty());
        Shape::line_to(Point::new(10.0, 8.0)).join_bounding_box(&mut bbox, &mut cursor);
        assert_eq!(bbox, Rect::new(5.0, 5.0, 5.0, 3.0));
        assert_eq!(cursor, Point::new(10.0, 8.0));
    }

    #[test]
    fn quad_bounds_via_cubic_hull() {
        let mut bbox = Rect::default();
        let mut cursor = Point::ORIGIN;
        Shape::quad_to(Point::new(3.0, 6.0), Point::new(6.0, 0.0))
            .join_bounding_box(&mut bbox, &mut cursor);
        // The elevated cubic controls sit at 2/3 of the quadratic one.
        assert_eq!(bbox, Rect::new(0.0, 0.0, 6.0, 4.0));
        assert_eq!(cursor, Point::new(6.0, 0.0));
    }

    #[test]
    fn rect_cursor_depends_on_rounding() {
        let rect = Rect::new(0.0, 0.0, 4.0, 2.0);
        let mut bbox = Rect::default();
        let mut cursor = Point::ORIGIN;
        Shape::rect(rect).join_bounding_box(&mut bbox, &mut cursor);
        assert_eq!(cursor, Point::new(4.0, 0.0));
        Shape::rounded_rect(rect, 1.0).join_bounding_box(&mut bbox, &mut cursor);
        assert_eq!(cursor, Point::new(0.0, 2.0));
    }

    #[test]
    fn horizontal_flip_mirrors_arc_angles() {
        let mut shape = Shape::arc(Point::new(2.0, 0.0), 1.0, 0.5, PI + 1.0, true);
        shape.horizontal_flip();
        let ShapeKind::Arc {
            position,
            start_angle,
            end_angle,
            clockwise,
            ..
        } = shape.kind()
        else {
            unreachable!();
        };
        assert_eq!(*position, Point::new(-2.0, 0.0));
        assert!(!*clockwise);
        assert!((start_angle - (PI - 0.5)).abs() < 1e-6);
        assert!((end_angle - (TWO_PI - 1.0)).abs() < 1e-6);
    }

    #[test]
    fn vertical_flip_keeps_zero_angles() {
        let mut shape = Shape::arc(Point::ORIGIN, 1.0, 0.0, 1.0, false);
        shape.vertical_flip();
        let ShapeKind::Arc {
            start_angle,
            end_angle,
            clockwise,
            ..
        } = shape.kind()
        else {
            unreachable!();
        };
        assert!((start_angle - 0.0).abs() < 1e-6);
        assert!((end_angle - (TWO_PI - 1.0)).abs() < 1e-6);
        assert!(*clockwise);
    }
}
