use super::{LINE, Shape, ShapeStyle};
use crate::codec::{self, RecordFields};
use crate::draw::geometry::bounding_box_for_points;
use crate::draw::{Point, Rect, Renderer};
use crate::error::ShapeError;
use std::any::Any;

/// Straight segment between two points.
///
/// Record: `Line|x1,y1|x2,y2|stroke|thickness|fill`. The fill is carried for
/// file compatibility but never painted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
    pub style: ShapeStyle,
}

impl Line {
    pub fn new(start: Point, end: Point, style: ShapeStyle) -> Self {
        Self { start, end, style }
    }
}

impl Shape for Line {
    fn kind(&self) -> &str {
        LINE
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn update(&mut self, start: Point, end: Point) {
        self.start = start;
        self.end = end;
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.draw_line(self.start, self.end, self.style.stroke());
    }

    fn encode_fields(&self) -> Vec<String> {
        vec![
            codec::format_point(self.start),
            codec::format_point(self.end),
            codec::format_color(self.style.stroke_color),
            self.style.stroke_thickness().to_string(),
            codec::format_color(self.style.fill_color),
        ]
    }

    fn decode_fields(&mut self, fields: &RecordFields<'_>) -> Result<(), ShapeError> {
        fields.expect_len(5)?;
        self.start = fields.point(0)?;
        self.end = fields.point(1)?;
        self.style = ShapeStyle::new(fields.color(2)?, fields.thickness(3)?, fields.color(4)?);
        Ok(())
    }

    fn bounding_box(&self) -> Option<Rect> {
        bounding_box_for_points(&[self.start, self.end], self.style.stroke_thickness())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{DrawCall, RED, RecordingRenderer, TRANSPARENT};

    #[test]
    fn update_replaces_both_endpoints() {
        let mut line = Line::default();
        line.update(Point::new(1, 2), Point::new(3, 4));
        line.update(Point::new(10, 20), Point::new(30, 40));
        assert_eq!(line.start, Point::new(10, 20));
        assert_eq!(line.end, Point::new(30, 40));
    }

    #[test]
    fn draws_a_single_segment() {
        let line = Line::new(
            Point::new(0, 0),
            Point::new(5, 5),
            ShapeStyle::new(RED, 3, TRANSPARENT),
        );
        let mut renderer = RecordingRenderer::new();
        line.draw(&mut renderer);
        assert_eq!(
            renderer.calls,
            vec![DrawCall::Line {
                from: Point::new(0, 0),
                to: Point::new(5, 5),
                stroke: line.style.stroke(),
            }]
        );
    }

    #[test]
    fn encodes_fields_in_record_order() {
        let line = Line::new(
            Point::new(1, 2),
            Point::new(3, 4),
            ShapeStyle::new(RED, 2, TRANSPARENT),
        );
        assert_eq!(
            line.encode_fields(),
            vec!["1,2", "3,4", "-65536", "2", "16777215"]
        );
    }
}
