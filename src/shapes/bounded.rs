//! Shapes defined by a normalized drag box.

use super::{ELLIPSE, RECTANGLE, Shape, ShapeStyle};
use crate::codec::{self, RecordFields};
use crate::draw::geometry::bounding_box_for_rect;
use crate::draw::{Point, Rect, Renderer};
use crate::error::ShapeError;
use std::any::Any;

// Both kinds share the layout `Kind|x,y,w,h|stroke|thickness|fill`.

fn encode_box(bounds: Rect, style: &ShapeStyle) -> Vec<String> {
    vec![
        codec::format_rect(bounds),
        codec::format_color(style.stroke_color),
        style.stroke_thickness().to_string(),
        codec::format_color(style.fill_color),
    ]
}

fn decode_box(fields: &RecordFields<'_>) -> Result<(Rect, ShapeStyle), ShapeError> {
    fields.expect_len(4)?;
    let bounds = fields.rect(0)?;
    let style = ShapeStyle::new(fields.color(1)?, fields.thickness(2)?, fields.color(3)?);
    Ok((bounds, style))
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rectangle {
    pub bounds: Rect,
    pub style: ShapeStyle,
}

impl Rectangle {
    pub fn new(bounds: Rect, style: ShapeStyle) -> Self {
        Self { bounds, style }
    }
}

impl Shape for Rectangle {
    fn kind(&self) -> &str {
        RECTANGLE
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn update(&mut self, start: Point, end: Point) {
        self.bounds = Rect::from_corners(start, end);
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.draw_rectangle(self.bounds, self.style.stroke(), self.style.fill());
    }

    fn encode_fields(&self) -> Vec<String> {
        encode_box(self.bounds, &self.style)
    }

    fn decode_fields(&mut self, fields: &RecordFields<'_>) -> Result<(), ShapeError> {
        (self.bounds, self.style) = decode_box(fields)?;
        Ok(())
    }

    fn bounding_box(&self) -> Option<Rect> {
        bounding_box_for_rect(self.bounds, self.style.stroke_thickness())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Ellipse inscribed in its bounding rectangle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ellipse {
    pub bounds: Rect,
    pub style: ShapeStyle,
}

impl Ellipse {
    pub fn new(bounds: Rect, style: ShapeStyle) -> Self {
        Self { bounds, style }
    }
}

impl Shape for Ellipse {
    fn kind(&self) -> &str {
        ELLIPSE
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn update(&mut self, start: Point, end: Point) {
        self.bounds = Rect::from_corners(start, end);
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.draw_ellipse(self.bounds, self.style.stroke(), self.style.fill());
    }

    fn encode_fields(&self) -> Vec<String> {
        encode_box(self.bounds, &self.style)
    }

    fn decode_fields(&mut self, fields: &RecordFields<'_>) -> Result<(), ShapeError> {
        (self.bounds, self.style) = decode_box(fields)?;
        Ok(())
    }

    fn bounding_box(&self) -> Option<Rect> {
        bounding_box_for_rect(self.bounds, self.style.stroke_thickness())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLUE, DrawCall, RecordingRenderer, TRANSPARENT, YELLOW};

    #[test]
    fn rectangle_normalizes_reverse_drags() {
        let mut rect = Rectangle::default();
        rect.update(Point::new(50, 80), Point::new(10, 20));
        assert_eq!(rect.bounds, Rect::new(10, 20, 40, 60).unwrap());
    }

    #[test]
    fn ellipse_update_is_single_shot() {
        let mut ellipse = Ellipse::default();
        ellipse.update(Point::new(0, 0), Point::new(100, 100));
        ellipse.update(Point::new(0, 0), Point::new(10, 5));
        assert_eq!(ellipse.bounds, Rect::new(0, 0, 10, 5).unwrap());
    }

    #[test]
    fn fill_is_passed_only_when_opaque() {
        let filled = Rectangle::new(
            Rect::new(0, 0, 4, 4).unwrap(),
            ShapeStyle::new(BLUE, 1, YELLOW),
        );
        let hollow = Ellipse::new(
            Rect::new(0, 0, 4, 4).unwrap(),
            ShapeStyle::new(BLUE, 1, TRANSPARENT),
        );

        let mut renderer = RecordingRenderer::new();
        filled.draw(&mut renderer);
        hollow.draw(&mut renderer);

        assert!(matches!(
            renderer.calls[0],
            DrawCall::Rectangle {
                fill: Some(YELLOW),
                ..
            }
        ));
        assert!(matches!(renderer.calls[1], DrawCall::Ellipse { fill: None, .. }));
    }
}
