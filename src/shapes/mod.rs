//! The shape capability and the built-in shape kinds.
//!
//! Every drawable kind implements [`Shape`]. A shape starts empty (as produced
//! by its registry factory), is fed `update(start, end)` calls while the user
//! drags, is optionally [`Shape::complete`]d, and becomes immutable once it is
//! committed to a [`DrawingHistory`](crate::history::DrawingHistory).
//!
//! | Kind | Update semantics |
//! |------|------------------|
//! | [`Line`] | replace both endpoints |
//! | [`Rectangle`], [`Ellipse`] | replace the normalized drag box |
//! | [`PointChain`] (`Polyline`/`Polygon`) | append points until completed |

mod bounded;
mod chain;
mod line;

pub use bounded::{Ellipse, Rectangle};
pub use chain::PointChain;
pub use line::Line;

use crate::codec::RecordFields;
use crate::draw::{Color, Rect, Renderer, Stroke};
use crate::draw::{BLACK, Point, TRANSPARENT};
use crate::error::ShapeError;
use std::any::Any;
use std::fmt;

/// Registered name of the built-in line kind.
pub const LINE: &str = "Line";
/// Registered name of the built-in rectangle kind.
pub const RECTANGLE: &str = "Rectangle";
/// Registered name of the built-in ellipse kind.
pub const ELLIPSE: &str = "Ellipse";
/// Registered name of the built-in open chain kind.
pub const POLYLINE: &str = "Polyline";
/// Registered name of the built-in closed chain kind.
pub const POLYGON: &str = "Polygon";

/// Stroke and fill shared by every shape kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeStyle {
    pub stroke_color: Color,
    /// Never below 1; enforced by the constructor and setter
    stroke_thickness: u32,
    /// [`TRANSPARENT`] means "do not fill"
    pub fill_color: Color,
}

impl ShapeStyle {
    pub fn new(stroke_color: Color, stroke_thickness: u32, fill_color: Color) -> Self {
        Self {
            stroke_color,
            stroke_thickness: stroke_thickness.max(1),
            fill_color,
        }
    }

    pub fn stroke_thickness(&self) -> u32 {
        self.stroke_thickness
    }

    /// Sets the outline width, clamping to at least 1 pixel.
    pub fn set_stroke_thickness(&mut self, thickness: u32) {
        self.stroke_thickness = thickness.max(1);
    }

    pub fn stroke(&self) -> Stroke {
        Stroke {
            color: self.stroke_color,
            thickness: self.stroke_thickness,
        }
    }

    /// Fill color, or `None` when the fill is transparent.
    pub fn fill(&self) -> Option<Color> {
        if self.fill_color.is_transparent() {
            None
        } else {
            Some(self.fill_color)
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::new(BLACK, 1, TRANSPARENT)
    }
}

/// A drawable, serializable shape kind.
///
/// Implementations live in this crate (the five built-ins) or in plugins.
/// The record layout written by [`encode_fields`](Shape::encode_fields) must be
/// accepted unchanged by [`decode_fields`](Shape::decode_fields) on a fresh
/// instance from the same factory.
pub trait Shape: Send + Sync + fmt::Debug {
    /// Registered kind name, written as the first field of every record.
    fn kind(&self) -> &str;

    fn style(&self) -> &ShapeStyle;

    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Feeds one pointer step into the shape.
    ///
    /// Single-shot kinds rebuild their geometry from the two points; incremental
    /// kinds append to what they already hold.
    fn update(&mut self, start: Point, end: Point);

    /// Whether [`update`](Shape::update) appends rather than replaces.
    ///
    /// Interactive hosts use this to switch from press-drag-release to
    /// click-per-point input.
    fn is_incremental(&self) -> bool {
        false
    }

    /// Finishes an incremental shape. Single-shot kinds ignore it.
    fn complete(&mut self) {}

    fn draw(&self, renderer: &mut dyn Renderer);

    /// Fields following the kind tag, in record order.
    fn encode_fields(&self) -> Vec<String>;

    /// Overwrites this (freshly created) shape from a record's fields.
    fn decode_fields(&mut self, fields: &RecordFields<'_>) -> Result<(), ShapeError>;

    /// Area covered including the stroke, if the shape has any geometry yet.
    fn bounding_box(&self) -> Option<Rect> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}
