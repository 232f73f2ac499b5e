//! Shape groups: an ordered list of shapes painted with one pen.

use lienzo_core::{Point, Rect};

use crate::canvas::LineCap;
use crate::pen::Pen;
use crate::render::RenderContext;
use crate::shape::Shape;

/// The atomic paintable unit. Owns a memoized bounding box that is
/// invalidated by any shape or pen mutation.
#[derive(Debug, Clone, Default)]
pub struct ShapeGroup {
    shapes: Vec<Shape>,
    pen: Pen,
    bounding_box: Rect,
    invalidate_bounding_box: bool,
}

impl ShapeGroup {
    pub fn new(pen: Pen) -> Self {
        Self {
            shapes: Vec::new(),
            pen,
            bounding_box: Rect::default(),
            invalidate_bounding_box: true,
        }
    }

    pub fn with_shape(shape: Shape, pen: Pen) -> Self {
        let mut group = Self::new(pen);
        group.add_shape(shape);
        group
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
        self.invalidate_bounding_box();
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
        self.invalidate_bounding_box();
    }

    /// Add a shape that punches a hole in the surrounding fill.
    pub fn add_hole_shape(&mut self, mut shape: Shape) {
        shape.set_hole(true);
        self.add_shape(shape);
    }

    pub fn insert_shape(&mut self, index: usize, shape: Shape) {
        debug_assert!(index <= self.shapes.len(), "invalid shape index");

        self.shapes.insert(index, shape);
        self.invalidate_bounding_box();
    }

    pub fn set_shape(&mut self, index: usize, shape: Shape) {
        debug_assert!(index < self.shapes.len(), "invalid shape index");

        self.shapes[index] = shape;
        self.invalidate_bounding_box();
    }

    pub fn remove_shape(&mut self, index: usize) {
        debug_assert!(index < self.shapes.len(), "invalid shape index");

        self.shapes.remove(index);
        self.invalidate_bounding_box();
    }

    pub fn release_shape(&mut self, index: usize) -> Shape {
        debug_assert!(index < self.shapes.len(), "invalid shape index");

        let shape = self.shapes.remove(index);
        self.invalidate_bounding_box();
        shape
    }

    pub fn release_shapes(&mut self) -> Vec<Shape> {
        self.invalidate_bounding_box();
        std::mem::take(&mut self.shapes)
    }

    pub fn clear_shapes(&mut self) {
        self.shapes.clear();
        self.invalidate_bounding_box();
    }

    fn invalidate_bounding_box(&mut self) {
        self.invalidate_bounding_box = true;
    }

    /// The group's bounding box, recomputed on demand. Stroke pens
    /// inflate the box by the stroke width; square caps overshoot
    /// corners, so they inflate by 1.5 times the width.
    pub fn bounding_box(&mut self) -> Rect {
        if self.invalidate_bounding_box {
            self.bounding_box = Rect::default();
            self.invalidate_bounding_box = false;

            if self.pen.is_valid() && !self.shapes.is_empty() {
                let mut last_point = Point::ORIGIN;
                for shape in &self.shapes {
                    shape.join_bounding_box(&mut self.bounding_box, &mut last_point);
                }

                if self.pen.is_stroke() && !self.bounding_box.is_empty() {
                    let stroke_width = self.pen.stroke_width();
                    let per_side = if self.pen.line_cap() == LineCap::Square {
                        stroke_width * 0.75
                    } else {
                        stroke_width * 0.5
                    };
                    self.bounding_box = self.bounding_box.inflated(per_side);
                }
            }
        }

        self.bounding_box
    }

    pub(crate) fn render(&self, context: &mut RenderContext<'_>) {
        if !self.pen.is_valid() || self.shapes.is_empty() {
            return;
        }

        let Some(paint) = self.pen.resolve(context.blend_colors()) else {
            return;
        };

        let stroke = self.pen.is_stroke();
        let stroke_width = self.pen.stroke_width();
        let cap = self.pen.line_cap();
        let join = self.pen.line_join();

        let canvas = context.canvas();
        canvas.begin_path();
        for shape in &self.shapes {
            shape.emit(canvas);
        }

        if stroke {
            canvas.stroke(&paint, stroke_width, cap, join);
        } else {
            canvas.fill(&paint);
        }
    }

    pub fn horizontal_flip(&mut self) {
        for shape in &mut self.shapes {
            shape.horizontal_flip();
        }
        self.pen.horizontal_flip();
        self.invalidate_bounding_box();
    }

    pub fn vertical_flip(&mut self) {
        for shape in &mut self.shapes {
            shape.vertical_flip();
        }
        self.pen.vertical_flip();
        self.invalidate_bounding_box();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::LineJoin;
    use lienzo_core::Color;

    fn fill_pen() -> Pen {
        Pen::color(Color::WHITE)
    }

    #[test]
    fn bounding_box_is_memoized_until_mutation() {
        let mut group =
            ShapeGroup::with_shape(Shape::ellipse(Point::ORIGIN, 10.0, 10.0), fill_pen());
        let first = group.bounding_box();
        assert_eq!(first, group.bounding_box());
        assert_eq!(first, Rect::new(-10.0, -10.0, 20.0, 20.0));

        group.add_shape(Shape::rect(Rect::new(0.0, 0.0, 30.0, 5.0)));
        assert_eq!(group.bounding_box(), Rect::new(-10.0, -10.0, 40.0, 20.0));
    }

    #[test]
    fn empty_pen_yields_empty_box() {
        let mut group = ShapeGroup::default();
        group.add_shape(Shape::ellipse(Point::ORIGIN, 10.0, 10.0));
        assert!(group.bounding_box().is_empty());
    }

    #[test]
    fn round_cap_stroke_inflates_by_half_width_per_side() {
        let mut pen = Pen::stroked(
            crate::pen::PenKind::Color {
                color: Color::WHITE,
            },
            4.0,
        );
        pen.set_line_join(LineJoin::Round);

        let mut group = ShapeGroup::with_shape(Shape::ellipse(Point::ORIGIN, 10.0, 10.0), pen);
        assert_eq!(group.bounding_box(), Rect::new(-12.0, -12.0, 24.0, 24.0));
    }

    #[test]
    fn square_cap_stroke_inflates_more() {
        let mut pen = Pen::stroked(
            crate::pen::PenKind::Color {
                color: Color::WHITE,
            },
            4.0,
        );
        pen.set_line_cap(LineCap::Square);

        let mut group = ShapeGroup::with_shape(Shape::ellipse(Point::ORIGIN, 10.0, 10.0), pen);
        assert_eq!(group.bounding_box(), Rect::new(-13.0, -13.0, 26.0, 26.0));
    }

    #[test]
    fn flips_invalidate_the_box() {
        let mut group = ShapeGroup::with_shape(
            Shape::rect(Rect::new(0.0, 0.0, 10.0, 4.0)),
            fill_pen(),
        );
        assert_eq!(group.bounding_box(), Rect::new(0.0, 0.0, 10.0, 4.0));
        group.horizontal_flip();
        assert_eq!(group.bounding_box(), Rect::new(-10.0, 0.0, 10.0, 4.0));
    }
}
