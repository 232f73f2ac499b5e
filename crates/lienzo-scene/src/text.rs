//! Text content: font styling plus a list of positioned strings.

use lienzo_core::{approx_eq, is_positive, Color, Point, Rect};

use crate::canvas::{FontHandle, TextMeasure};
use crate::render::RenderContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    Top,
    Middle,
    Bottom,
    #[default]
    Baseline,
}

/// Font parameters shared by every string of a text node.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: FontHandle,
    pub size: f32,
    pub blur: f32,
    pub letter_spacing: f32,
    pub line_height: f32,
    pub horizontal_align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
}

impl TextStyle {
    pub fn new(font: FontHandle) -> Self {
        Self {
            font,
            size: 18.0,
            blur: 0.0,
            letter_spacing: 0.0,
            line_height: 1.0,
            horizontal_align: HorizontalAlign::default(),
            vertical_align: VerticalAlign::default(),
        }
    }
}

/// One positioned string. A box width makes the backend wrap lines
/// inside it; without one the string renders as a single line.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    string: String,
    position: Point,
    box_width: Option<f32>,
}

impl Text {
    pub fn new(string: impl Into<String>, position: Point) -> Self {
        Self {
            string: string.into(),
            position,
            box_width: None,
        }
    }

    pub fn boxed(string: impl Into<String>, position: Point, box_width: f32) -> Self {
        debug_assert!(is_positive(box_width), "invalid box width");

        Self {
            string: string.into(),
            position,
            box_width: Some(box_width),
        }
    }

    pub fn string(&self) -> &str {
        &self.string
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn box_width(&self) -> Option<f32> {
        self.box_width
    }
}

/// The text payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub struct TextContent {
    style: TextStyle,
    color: Color,
    texts: Vec<Text>,
}

impl TextContent {
    pub fn new(font: FontHandle) -> Self {
        Self {
            style: TextStyle::new(font),
            color: Color::WHITE,
            texts: Vec::new(),
        }
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut TextStyle {
        &mut self.style
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn texts(&self) -> &[Text] {
        &self.texts
    }

    pub fn add_text(&mut self, text: Text) {
        self.texts.push(text);
    }

    pub fn insert_text(&mut self, index: usize, text: Text) {
        debug_assert!(index <= self.texts.len(), "invalid text index");
        self.texts.insert(index, text);
    }

    pub fn set_text(&mut self, index: usize, text: Text) {
        debug_assert!(index < self.texts.len(), "invalid text index");
        self.texts[index] = text;
    }

    pub fn remove_text(&mut self, index: usize) {
        debug_assert!(index < self.texts.len(), "invalid text index");
        self.texts.remove(index);
    }

    pub fn clear_texts(&mut self) {
        self.texts.clear();
    }

    /// Join the measured bounds of every string into `bounding_box`.
    /// Skipped entirely for an invisible font color.
    pub(crate) fn join_bounding_box(&self, bounding_box: &mut Rect, measure: &dyn TextMeasure) {
        if !self.color.is_visible() {
            return;
        }

        for text in &self.texts {
            bounding_box.join(&measure.text_bounds(&self.style, text));
        }
    }

    pub(crate) fn render(&self, context: &mut RenderContext<'_>) {
        let color = self.color.blended_with_stack(context.blend_colors());
        let canvas = context.canvas();
        for text in &self.texts {
            canvas.draw_text(&self.style, text, color);
        }
    }

    /// Cached text would replay at a different alpha than it was shaded
    /// with, so text only caches at full opacity.
    pub(crate) fn render_cache_available(&self, opacity: f32) -> bool {
        approx_eq(opacity, 1.0)
    }
}
