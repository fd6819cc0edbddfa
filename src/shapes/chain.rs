use super::{POLYGON, POLYLINE, Shape, ShapeStyle};
use crate::codec::{self, RecordFields};
use crate::draw::geometry::bounding_box_for_points;
use crate::draw::{Point, Rect, Renderer};
use crate::error::ShapeError;
use std::any::Any;

/// Point chain built one click at a time; backs both `Polyline` and `Polygon`.
///
/// The two kinds differ only in ring closure and record layout:
///
/// ```text
/// Polyline|x1,y1;x2,y2;...|stroke|thickness|completed
/// Polygon|x1,y1;x2,y2;...|stroke|thickness|fill|completed
/// ```
///
/// Completing a polygon with more than two points appends the first point again
/// to close the ring. Once completed, further updates are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointChain {
    closed: bool,
    points: Vec<Point>,
    completed: bool,
    pub style: ShapeStyle,
}

impl PointChain {
    /// Empty open chain (`Polyline`).
    pub fn polyline() -> Self {
        Self::empty(false)
    }

    /// Empty closed chain (`Polygon`).
    pub fn polygon() -> Self {
        Self::empty(true)
    }

    fn empty(closed: bool) -> Self {
        Self {
            closed,
            points: Vec::new(),
            completed: false,
            style: ShapeStyle::default(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Whether completion closes the ring.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Shape for PointChain {
    fn kind(&self) -> &str {
        if self.closed { POLYGON } else { POLYLINE }
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn update(&mut self, start: Point, end: Point) {
        if self.completed {
            return;
        }
        if self.points.is_empty() {
            self.points.push(start);
        }
        self.points.push(end);
    }

    fn is_incremental(&self) -> bool {
        true
    }

    fn complete(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        if self.closed && self.points.len() > 2 {
            self.points.push(self.points[0]);
        }
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        if self.points.len() < 2 {
            return;
        }
        if self.closed {
            renderer.draw_polygon(&self.points, self.style.stroke(), self.style.fill());
        } else {
            renderer.draw_polyline(&self.points, self.style.stroke());
        }
    }

    fn encode_fields(&self) -> Vec<String> {
        let mut fields = vec![
            codec::format_points(&self.points),
            codec::format_color(self.style.stroke_color),
            self.style.stroke_thickness().to_string(),
        ];
        if self.closed {
            fields.push(codec::format_color(self.style.fill_color));
        }
        fields.push(codec::format_flag(self.completed));
        fields
    }

    fn decode_fields(&mut self, fields: &RecordFields<'_>) -> Result<(), ShapeError> {
        if self.closed {
            fields.expect_len(5)?;
            self.points = fields.points(0, None)?;
            self.style = ShapeStyle::new(fields.color(1)?, fields.thickness(2)?, fields.color(3)?);
            self.completed = fields.flag(4)?;
        } else {
            fields.expect_len(4)?;
            self.points = fields.points(0, None)?;
            self.style = ShapeStyle::new(
                fields.color(1)?,
                fields.thickness(2)?,
                ShapeStyle::default().fill_color,
            );
            self.completed = fields.flag(3)?;
        }
        Ok(())
    }

    fn bounding_box(&self) -> Option<Rect> {
        bounding_box_for_points(&self.points, self.style.stroke_thickness())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
