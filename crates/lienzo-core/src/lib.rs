//! Geometry and color value types for the lienzo scene graph.
//!
//! Everything in this crate is a plain value type: points, sizes, rects,
//! 2D affine transforms and RGBA colors, together with the epsilon-tolerant
//! float comparisons the rest of the workspace builds on.

pub mod color;
pub mod num;
pub mod point;
pub mod rect;
pub mod size;
pub mod transform;

pub use color::{BlendColor, Color};
pub use num::{EPSILON, approx_eq, is_negative, is_positive, is_positive_zero, is_zero};
pub use point::Point;
pub use rect::Rect;
pub use size::Size;
pub use transform::Transform;
