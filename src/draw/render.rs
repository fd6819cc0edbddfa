//! The drawing-surface capability shapes render through.

use super::color::Color;
use super::geometry::{Point, Rect};

/// Outline parameters shared by every draw call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stroke {
    pub color: Color,
    /// Line width in pixels, always at least 1
    pub thickness: u32,
}

/// A drawing surface.
///
/// Shapes call into this once per primitive. `fill` is `None` whenever the
/// shape's fill color is the transparent sentinel, so implementations never
/// have to check for it themselves.
pub trait Renderer {
    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke);

    fn draw_rectangle(&mut self, rect: Rect, stroke: Stroke, fill: Option<Color>);

    fn draw_ellipse(&mut self, bounds: Rect, stroke: Stroke, fill: Option<Color>);

    /// Open chain through `points` in order.
    fn draw_polyline(&mut self, points: &[Point], stroke: Stroke);

    /// Closed outline through `points`, filled first when `fill` is set.
    fn draw_polygon(&mut self, points: &[Point], stroke: Stroke, fill: Option<Color>);
}

/// One primitive captured by [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCall {
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Rectangle {
        rect: Rect,
        stroke: Stroke,
        fill: Option<Color>,
    },
    Ellipse {
        bounds: Rect,
        stroke: Stroke,
        fill: Option<Color>,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<Point>,
        stroke: Stroke,
        fill: Option<Color>,
    },
}

/// Renderer that records calls instead of rasterizing.
///
/// Used by headless hosts and tests to observe draw order.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for RecordingRenderer {
    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.calls.push(DrawCall::Line { from, to, stroke });
    }

    fn draw_rectangle(&mut self, rect: Rect, stroke: Stroke, fill: Option<Color>) {
        self.calls.push(DrawCall::Rectangle { rect, stroke, fill });
    }

    fn draw_ellipse(&mut self, bounds: Rect, stroke: Stroke, fill: Option<Color>) {
        self.calls.push(DrawCall::Ellipse {
            bounds,
            stroke,
            fill,
        });
    }

    fn draw_polyline(&mut self, points: &[Point], stroke: Stroke) {
        self.calls.push(DrawCall::Polyline {
            points: points.to_vec(),
            stroke,
        });
    }

    fn draw_polygon(&mut self, points: &[Point], stroke: Stroke, fill: Option<Color>) {
        self.calls.push(DrawCall::Polygon {
            points: points.to_vec(),
            stroke,
            fill,
        });
    }
}
