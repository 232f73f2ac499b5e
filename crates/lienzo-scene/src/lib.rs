//! Retained-mode 2D scene graph over an immediate-mode vector backend.
//!
//! The scene is a tree of [`Node`]s. Each node carries a transform
//! (position, rotation, skew, scale, flips), visual state (opacity,
//! blend color, visibility, scissor), vector content ([`ShapeGroup`]s,
//! or an image/text payload) and time-based [`Action`]s. A frame is one
//! `update` of the tree followed by one `render` traversal against a
//! [`Canvas`] backend, with viewport culling and an optional
//! display-list render cache keyed by the accumulated scale.
//!
//! [`App`] ties the pieces together into a fixed-rate frame driver.

pub mod action;
pub mod app;
pub mod canvas;
pub mod config;
pub mod error;
pub mod image;
pub mod node;
pub mod pen;
pub mod render;
pub mod shape;
pub mod shape_group;
pub mod text;

pub use action::Action;
pub use app::App;
pub use canvas::{
    CacheId, Canvas, FontHandle, ImageHandle, LineCap, LineJoin, Paint, TextMeasure,
};
pub use config::AppConfig;
pub use error::{Result, SceneError};
pub use image::{Image, ImageContent, ImageData, ImageRegistry};
pub use node::{Node, NodeKind};
pub use pen::{Pen, PenKind};
pub use render::{CachePool, RenderContext};
pub use shape::{Shape, ShapeKind};
pub use shape_group::ShapeGroup;
pub use text::{HorizontalAlign, Text, TextContent, TextStyle, VerticalAlign};
