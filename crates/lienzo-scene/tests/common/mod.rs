#![allow(dead_code)]

//! A recording [`Canvas`] test double. Keeps a real transform stack so
//! final bounding boxes and culling behave like a rendering backend,
//! and logs every draw call for assertions.

use lienzo_core::{Color, Point, Rect, Transform};
use lienzo_scene::image::ImageData;
use lienzo_scene::{
    CacheId, Canvas, ImageHandle, LineCap, LineJoin, Paint, Result, Text, TextMeasure, TextStyle,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    BeginFrame { width: f32, height: f32 },
    EndFrame,
    IntersectScissor(Rect),
    GlobalAlpha(f32),
    Fill(Paint),
    Stroke(Paint),
    Text(String),
    BeginCache(CacheId),
    EndCache,
    ReplayCache(CacheId),
    DropCache(CacheId),
    CreateImage(ImageHandle),
    DeleteImage(ImageHandle),
}

#[derive(Debug)]
pub struct RecordingCanvas {
    pub events: Vec<Event>,
    transform_stack: Vec<Transform>,
    supports_cache: bool,
    next_image: u32,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            transform_stack: vec![Transform::IDENTITY],
            supports_cache: false,
            next_image: 0,
        }
    }

    pub fn with_cache() -> Self {
        Self {
            supports_cache: true,
            ..Self::new()
        }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }

    pub fn fills(&self) -> usize {
        self.count(|event| matches!(event, Event::Fill(_)))
    }

    pub fn strokes(&self) -> usize {
        self.count(|event| matches!(event, Event::Stroke(_)))
    }

    pub fn cache_recordings(&self) -> usize {
        self.count(|event| matches!(event, Event::BeginCache(_)))
    }

    pub fn cache_replays(&self) -> usize {
        self.count(|event| matches!(event, Event::ReplayCache(_)))
    }

    pub fn frames(&self) -> usize {
        self.count(|event| matches!(event, Event::BeginFrame { .. }))
    }

    fn current_mut(&mut self) -> &mut Transform {
        self.transform_stack
            .last_mut()
            .unwrap_or_else(|| unreachable!("unbalanced restore"))
    }
}

impl TextMeasure for RecordingCanvas {
    fn text_bounds(&self, style: &TextStyle, text: &Text) -> Rect {
        let width = text.string().chars().count() as f32 * style.size * 0.5;
        let position = text.position();
        Rect::new(position.x, position.y - style.size, width, style.size)
    }
}

impl Canvas for RecordingCanvas {
    fn begin_frame(&mut self, window_width: f32, window_height: f32, _background: Color) {
        self.events.push(Event::BeginFrame {
            width: window_width,
            height: window_height,
        });
    }

    fn end_frame(&mut self) {
        self.events.push(Event::EndFrame);
    }

    fn save(&mut self) {
        let top = *self.current_mut();
        self.transform_stack.push(top);
    }

    fn restore(&mut self) {
        self.transform_stack.pop();
        assert!(!self.transform_stack.is_empty(), "unbalanced restore");
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

    fn intersect_scissor(&mut self, rect: &Rect) {
        self.events.push(Event::IntersectScissor(*rect));
    }

    fn global_alpha(&mut self, alpha: f32) {
        self.events.push(Event::GlobalAlpha(alpha));
    }

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

    fn fill(&mut self, paint: &Paint) {
        self.events.push(Event::Fill(paint.clone()));
    }

    fn stroke(&mut self, paint: &Paint, _width: f32, _cap: LineCap, _join: LineJoin) {
        self.events.push(Event::Stroke(paint.clone()));
    }

    fn draw_text(&mut self, _style: &TextStyle, text: &Text, _color: Color) {
        self.events.push(Event::Text(text.string().to_owned()));
    }

    fn create_image(&mut self, _data: &ImageData) -> Result<ImageHandle> {
        let handle = ImageHandle(self.next_image);
        self.next_image += 1;
        self.events.push(Event::CreateImage(handle));
        Ok(handle)
    }

    fn delete_image(&mut self, handle: ImageHandle) {
        self.events.push(Event::DeleteImage(handle));
    }

    fn supports_cache(&self) -> bool {
        self.supports_cache
    }

    fn begin_cache(&mut self, id: CacheId) {
        self.events.push(Event::BeginCache(id));
    }

    fn end_cache(&mut self) {
        self.events.push(Event::EndCache);
    }

    fn replay_cache(&mut self, id: CacheId) {
        self.events.push(Event::ReplayCache(id));
    }

    fn drop_cache(&mut self, id: CacheId) {
        self.events.push(Event::DropCache(id));
    }
}
