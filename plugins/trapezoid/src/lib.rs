//! Trapezoid shape plugin.
//!
//! Build as a `cdylib` and pass the library to the host with `--plugin`. The
//! kind registers as `Trapezoid` and writes records as
//!
//! ```text
//! Trapezoid|x1,y1;x2,y2;x3,y3;x4,y4|stroke|thickness|fill
//! ```
//!
//! Records in the older four-field layout (`Trapezoid|x,y|x,y|x,y|x,y|stroke|thickness|fill`)
//! are still accepted.

use log::debug;
use shapeboard::codec::{self, RecordFields};
use shapeboard::draw::geometry::bounding_box_for_points;
use shapeboard::draw::{Point, Rect, Renderer};
use shapeboard::plugin::{PluginRegistrar, factory_of};
use shapeboard::shapes::{Shape, ShapeStyle};
use shapeboard::ShapeError;
use std::any::Any;

pub const TRAPEZOID: &str = "Trapezoid";

/// Isosceles trapezoid spanned by a drag.
///
/// The edge on the press row is inset by a third of the drag width from both
/// ends; the edge on the release row spans the full width. Dragging leftward
/// mirrors the corner order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trapezoid {
    points: [Point; 4],
    pub style: ShapeStyle,
}

impl Trapezoid {
    pub fn points(&self) -> &[Point; 4] {
        &self.points
    }
}

impl Shape for Trapezoid {
    fn kind(&self) -> &str {
        TRAPEZOID
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn update(&mut self, start: Point, end: Point) {
        // Division truncates toward zero, so a leftward drag mirrors the inset.
        let dx = i64::from(end.x) - i64::from(start.x);
        let inset = dx / 3;
        // Both inset corners lie between start.x and end.x.
        let along = |x: i32, offset: i64| (i64::from(x) + offset) as i32;
        self.points = [
            Point::new(along(start.x, inset), start.y),
            Point::new(along(end.x, -inset), start.y),
            Point::new(end.x, end.y),
            Point::new(start.x, end.y),
        ];
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.draw_polygon(&self.points, self.style.stroke(), self.style.fill());
    }

    fn encode_fields(&self) -> Vec<String> {
        vec![
            codec::format_points(&self.points),
            codec::format_color(self.style.stroke_color),
            self.style.stroke_thickness().to_string(),
            codec::format_color(self.style.fill_color),
        ]
    }

    fn decode_fields(&mut self, fields: &RecordFields<'_>) -> Result<(), ShapeError> {
        let (points, style_at) = if fields.len() == 7 {
            debug!("Decoding legacy trapezoid record");
            let mut points = [Point::default(); 4];
            for (index, point) in points.iter_mut().enumerate() {
                *point = fields.point(index)?;
            }
            (points, 4)
        } else {
            fields.expect_len(4)?;
            let list = fields.points(0, Some(4))?;
            ([list[0], list[1], list[2], list[3]], 1)
        };

        self.points = points;
        self.style = ShapeStyle::new(
            fields.color(style_at)?,
            fields.thickness(style_at + 1)?,
            fields.color(style_at + 2)?,
        );
        Ok(())
    }

    fn bounding_box(&self) -> Option<Rect> {
        bounding_box_for_points(&self.points, self.style.stroke_thickness())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Declares the kinds this plugin provides.
pub fn register(registrar: &mut dyn PluginRegistrar) {
    registrar.register_shape(TRAPEZOID, factory_of::<Trapezoid>());
}

shapeboard::declare_plugin!(register);

#[cfg(test)]
mod tests {
    use super::*;
    use shapeboard::draw::{BLUE, DrawCall, RecordingRenderer, TRANSPARENT, YELLOW};
    use shapeboard::plugin::PluginLoader;
    use shapeboard::{DrawingHistory, ShapeRegistry};
    use std::path::Path;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn registry_with_plugin() -> ShapeRegistry {
        let mut registry = ShapeRegistry::with_builtins();
        let report = PluginLoader::load_declaration(
            Path::new("trapezoid"),
            &shapeboard_plugin_declaration,
            &mut registry,
        )
        .unwrap();
        assert_eq!(report.registered, vec![TRAPEZOID.to_string()]);
        assert!(report.rejected.is_empty());
        registry
    }

    #[test]
    fn rightward_drag_insets_the_top_edge() {
        let mut trapezoid = Trapezoid::default();
        trapezoid.update(p(0, 0), p(30, 10));
        assert_eq!(trapezoid.points(), &[p(10, 0), p(20, 0), p(30, 10), p(0, 10)]);
    }

    #[test]
    fn leftward_drag_mirrors_the_corners() {
        let mut trapezoid = Trapezoid::default();
        trapezoid.update(p(30, 0), p(0, 10));
        assert_eq!(trapezoid.points(), &[p(20, 0), p(10, 0), p(0, 10), p(30, 10)]);
    }

    #[test]
    fn always_has_four_points() {
        let mut trapezoid = Trapezoid::default();
        assert_eq!(trapezoid.points().len(), 4);
        trapezoid.update(p(5, 5), p(5, 5));
        assert_eq!(trapezoid.points(), &[p(5, 5); 4]);
        trapezoid.update(p(0, 0), p(2, 9));
        assert_eq!(trapezoid.points(), &[p(0, 0), p(2, 0), p(2, 9), p(0, 9)]);
    }

    #[test]
    fn full_width_drags_stay_in_range() {
        let mut trapezoid = Trapezoid::default();
        trapezoid.update(p(i32::MIN, 0), p(i32::MAX, 9));
        let inset = ((i64::from(i32::MAX) - i64::from(i32::MIN)) / 3) as i32;
        assert_eq!(
            trapezoid.points(),
            &[
                p(i32::MIN + inset, 0),
                p(i32::MAX - inset, 0),
                p(i32::MAX, 9),
                p(i32::MIN, 9)
            ]
        );

        trapezoid.update(p(i32::MAX, 0), p(i32::MIN, 9));
        assert_eq!(trapezoid.points()[0], p(i32::MAX - inset, 0));
        assert!(trapezoid.bounding_box().is_some());
    }

    #[test]
    fn draws_as_a_filled_polygon() {
        let mut trapezoid = Trapezoid {
            style: ShapeStyle::new(BLUE, 2, YELLOW),
            ..Trapezoid::default()
        };
        trapezoid.update(p(0, 0), p(30, 10));

        let mut renderer = RecordingRenderer::new();
        trapezoid.draw(&mut renderer);
        assert_eq!(
            renderer.calls,
            vec![DrawCall::Polygon {
                points: trapezoid.points().to_vec(),
                stroke: trapezoid.style.stroke(),
                fill: Some(YELLOW),
            }]
        );
    }

    #[test]
    fn plugin_kind_round_trips_through_the_host_codec() {
        let registry = registry_with_plugin();
        let mut shape = registry.create(TRAPEZOID).unwrap();
        *shape.style_mut() = ShapeStyle::new(BLUE, 3, TRANSPARENT);
        shape.update(p(0, 0), p(30, 10));

        let line = codec::encode(shape.as_ref());
        assert_eq!(line, "Trapezoid|10,0;20,0;30,10;0,10|-16776961|3|16777215");

        let decoded = codec::decode(&registry, &line).unwrap();
        let decoded = decoded.as_any().downcast_ref::<Trapezoid>().unwrap();
        assert_eq!(decoded.points(), &[p(10, 0), p(20, 0), p(30, 10), p(0, 10)]);
        assert_eq!(decoded.style, ShapeStyle::new(BLUE, 3, TRANSPARENT));
    }

    #[test]
    fn legacy_records_are_accepted() {
        let registry = registry_with_plugin();
        let shape = codec::decode(
            &registry,
            "Trapezoid|10,0|20,0|30,10|0,10|-16777216|2|16777215",
        )
        .unwrap();
        let trapezoid = shape.as_any().downcast_ref::<Trapezoid>().unwrap();
        assert_eq!(trapezoid.points()[2], p(30, 10));
        assert_eq!(trapezoid.style.stroke_thickness(), 2);
    }

    #[test]
    fn wrong_point_count_is_malformed() {
        let registry = registry_with_plugin();
        for record in [
            "Trapezoid|0,0;1,1;2,2|-16777216|1|16777215",
            "Trapezoid|0,0;1,1;2,2;3,3;4,4|-16777216|1|16777215",
            "Trapezoid|0,0;1,1;2,2;3,3|-16777216|1",
        ] {
            assert!(matches!(
                codec::decode(&registry, record),
                Err(ShapeError::MalformedRecord { .. })
            ));
        }
    }

    #[test]
    fn scene_with_plugin_shapes_loads_after_registration() {
        let text = "Line|0,0|5,5|-16777216|1|16777215\n\
                    Trapezoid|10,0;20,0;30,10;0,10|-16777216|1|16777215\n";

        let mut history = DrawingHistory::new();
        let err = history
            .load_from_text(&ShapeRegistry::with_builtins(), text)
            .unwrap_err();
        assert_eq!(err.source, ShapeError::UnknownShapeKind(TRAPEZOID.into()));

        assert_eq!(history.load_from_text(&registry_with_plugin(), text).unwrap(), 2);
    }
}
