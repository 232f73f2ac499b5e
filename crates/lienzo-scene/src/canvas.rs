//! The drawing backend contract.
//!
//! The scene graph never rasterizes anything itself. It drives an
//! immediate-mode vector backend through [`Canvas`]: path building,
//! fill/stroke with a resolved [`Paint`], scissoring, text, image
//! resources and an optional display-list record/replay capability.

use lienzo_core::{Color, Point, Rect, Transform};

use crate::error::{Result, SceneError};
use crate::image::ImageData;
use crate::text::{Text, TextStyle};

/// Opaque backend image resource handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

/// Opaque backend font resource handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

/// Identifier of a pooled display-list slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheId(pub u32);

/// Stroke end-cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Stroke corner style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
}

/// A fully resolved paint: every color has already been folded through
/// the active blend-color stack by the pen.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Color(Color),
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
    ImagePattern {
        rect: Rect,
        angle: f32,
        image: ImageHandle,
        opacity: f32,
    },
}

/// Text measurement, split from [`Canvas`] so bounding-box queries can
/// take a read-only collaborator. Treated as a pure function of the
/// style and text.
pub trait TextMeasure {
    fn text_bounds(&self, style: &TextStyle, text: &Text) -> Rect;
}

/// The immediate-mode drawing backend driven by the render traversal.
///
/// Transform semantics follow the usual vector-backend convention:
/// `transform(t)` composes `t` under the current matrix (points map
/// through `current ∘ t`), `save`/`restore` stack the full drawing
/// state, and `current_transform` reads the accumulated matrix.
pub trait Canvas: TextMeasure {
    fn begin_frame(&mut self, window_width: f32, window_height: f32, background: Color);
    fn end_frame(&mut self);

    fn save(&mut self);
    fn restore(&mut self);

    fn transform(&mut self, transform: &Transform);
    fn reset_transform(&mut self);
    fn current_transform(&self) -> Transform;

    /// Intersect the scissor region with `rect`, expressed in the
    /// current coordinate space.
    fn intersect_scissor(&mut self, rect: &Rect);

    fn global_alpha(&mut self, alpha: f32);

    fn begin_path(&mut self);
    fn move_to(&mut self, position: Point);
    fn line_to(&mut self, position: Point);
    fn bezier_to(&mut self, control1: Point, control2: Point, position: Point);
    fn quad_to(&mut self, control: Point, position: Point);
    fn arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32, clockwise: bool);
    fn rect(&mut self, rect: &Rect);
    fn rounded_rect(&mut self, rect: &Rect, corner_radius: f32);
    fn ellipse(&mut self, center: Point, horizontal_radius: f32, vertical_radius: f32);
    fn close_path(&mut self);

    /// Mark the current sub-path as a hole in the surrounding fill.
    fn hole_winding(&mut self);

    fn fill(&mut self, paint: &Paint);
    fn stroke(&mut self, paint: &Paint, width: f32, cap: LineCap, join: LineJoin);

    fn draw_text(&mut self, style: &TextStyle, text: &Text, color: Color);

    fn create_image(&mut self, data: &ImageData) -> Result<ImageHandle>;
    fn delete_image(&mut self, handle: ImageHandle);

    /// Whether the backend can record and replay display lists. When
    /// false the cache paths in the node render pipeline are skipped.
    fn supports_cache(&self) -> bool {
        false
    }

    /// Start recording into the given slot, discarding its previous
    /// content. Draw calls go to the slot until [`Canvas::end_cache`].
    fn begin_cache(&mut self, _id: CacheId) {}

    fn end_cache(&mut self) {}

    /// Replay a previously recorded slot under the current transform,
    /// global alpha and scissor.
    fn replay_cache(&mut self, _id: CacheId) {}

    /// Free the backend resources behind a pooled slot.
    fn drop_cache(&mut self, _id: CacheId) {}

    /// Redirect drawing into an off-screen frame buffer of the given
    /// pixel size.
    fn begin_frame_buffer(&mut self, _width: u32, _height: u32) -> Result<()> {
        Err(SceneError::FrameBufferBuild(
            "backend has no frame buffer support".into(),
        ))
    }

    /// Finish off-screen drawing and read the pixels back.
    fn end_frame_buffer(&mut self) -> Result<ImageData> {
        Err(SceneError::FrameBufferBuild(
            "backend has no frame buffer support".into(),
        ))
    }
}
