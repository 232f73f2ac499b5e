//! A headless [`Canvas`] backend that logs and counts draw calls.
//!
//! Useful for exercising the scene graph without a GPU: it keeps a real
//! transform stack so culling and final bounding boxes behave the same
//! as on a rendering backend.

use lienzo_core::{Color, Point, Rect, Transform};
use lienzo_scene::{
    Canvas, ImageHandle, LineCap, LineJoin, Paint, Result, Text, TextMeasure, TextStyle,
};
use lienzo_scene::image::ImageData;

#[derive(Debug, Default)]
pub struct FrameStats {
    pub fills: u32,
    pub strokes: u32,
    pub texts: u32,
}

#[derive(Debug)]
pub struct TraceCanvas {
    transform_stack: Vec<Transform>,
    next_image: u32,
    pub stats: FrameStats,
}

impl TraceCanvas {
    pub fn new() -> Self {
        Self {
            transform_stack: vec![Transform::IDENTITY],
            next_image: 0,
            stats: FrameStats::default(),
        }
    }

    fn current_mut(&mut self) -> &mut Transform {
        self.transform_stack
            .last_mut()
            .unwrap_or_else(|| unreachable!("unbalanced restore"))
    }
}

impl TextMeasure for TraceCanvas {
    fn text_bounds(&self, style: &TextStyle, text: &Text) -> Rect {
        // Monospace estimate, good enough for layout in a trace run.
        let width = text.string().chars().count() as f32 * style.size * 0.5;
        let position = text.position();
        Rect::new(position.x, position.y - style.size, width, style.size)
    }
}

impl Canvas for TraceCanvas {
    fn begin_frame(&mut self, window_width: f32, window_height: f32, _background: Color) {
        self.stats = FrameStats::default();
        log::trace!("begin frame {window_width}x{window_height}");
    }

    fn end_frame(&mut self) {
        log::trace!(
            "end frame: {} fills, {} strokes, {} texts",
            self.stats.fills,
            self.stats.strokes,
            self.stats.texts
        );
    }

    fn save(&mut self) {
        let top = *self.current_mut();
        self.transform_stack.push(top);
    }

    fn restore(&mut self) {
        self.transform_stack.pop();
        debug_assert!(!self.transform_stack.is_empty(), "unbalanced restore");
    }

    fn transform(&mut self, transform: &Transform) {
        let current = self.current_mut();
        *current = transform.multiplied(current);
    }

    fn reset_transform(&mut self) {
        *self.current_mut() = Transform::IDENTITY;
    }

    fn current_transform(&self) -> Transform {
        *self.transform_stack.last().unwrap_or(&Transform::IDENTITY)
    }

    fn intersect_scissor(&mut self, _rect: &Rect) {}

    fn global_alpha(&mut self, _alpha: f32) {}

    fn begin_path(&mut self) {}
    fn move_to(&mut self, _position: Point) {}
    fn line_to(&mut self, _position: Point) {}
    fn bezier_to(&mut self, _control1: Point, _control2: Point, _position: Point) {}
    fn quad_to(&mut self, _control: Point, _position: Point) {}

    fn arc(
        &mut self,
        _center: Point,
        _radius: f32,
        _start_angle: f32,
        _end_angle: f32,
        _clockwise: bool,
    ) {
    }

    fn rect(&mut self, _rect: &Rect) {}
    fn rounded_rect(&mut self, _rect: &Rect, _corner_radius: f32) {}
    fn ellipse(&mut self, _center: Point, _horizontal_radius: f32, _vertical_radius: f32) {}
    fn close_path(&mut self) {}
    fn hole_winding(&mut self) {}

    fn fill(&mut self, _paint: &Paint) {
        self.stats.fills += 1;
    }

    fn stroke(&mut self, _paint: &Paint, _width: f32, _cap: LineCap, _join: LineJoin) {
        self.stats.strokes += 1;
    }

    fn draw_text(&mut self, _style: &TextStyle, text: &Text, _color: Color) {
        self.stats.texts += 1;
        log::trace!("text: {:?}", text.string());
    }

    fn create_image(&mut self, data: &ImageData) -> Result<ImageHandle> {
        let handle = ImageHandle(self.next_image);
        self.next_image += 1;
        log::debug!(
            "created image {handle:?} ({}x{})",
            data.width(),
            data.height()
        );
        Ok(handle)
    }

    fn delete_image(&mut self, handle: ImageHandle) {
        log::debug!("deleted image {handle:?}");
    }
}
