//! Line-oriented text codec for shapes.
//!
//! A record is one line of `|`-separated fields whose first field is the
//! registered kind name:
//!
//! ```text
//! Line|10,20|110,20|-16777216|2|16777215
//! Polygon|0,0;10,0;10,10;0,0|-65536|1|16777215|True
//! ```
//!
//! Points are `x,y`, point lists join points with `;`, colors are packed ARGB
//! written as a signed decimal, and flags are `True`/`False`. The layout after
//! the kind tag belongs to each shape; [`RecordFields`] gives shapes
//! count-checked, typed access to it.

use crate::draw::color::argb_from_decimal;
use crate::draw::{Color, Point, Rect};
use crate::error::ShapeError;
use crate::registry::ShapeRegistry;
use crate::shapes::Shape;
use log::warn;

/// Separates the fields of a record.
pub const FIELD_SEPARATOR: char = '|';
/// Separates points inside a point-list field.
pub const POINT_SEPARATOR: char = ';';
/// Separates the coordinates of a point (and the parts of a rect).
pub const COORD_SEPARATOR: char = ',';

/// The fields of one record after its kind tag.
#[derive(Debug, Clone)]
pub struct RecordFields<'a> {
    kind: &'a str,
    fields: Vec<&'a str>,
}

impl<'a> RecordFields<'a> {
    pub fn new(kind: &'a str, fields: Vec<&'a str>) -> Self {
        Self { kind, fields }
    }

    pub fn kind(&self) -> &'a str {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn malformed(&self, reason: impl Into<String>) -> ShapeError {
        ShapeError::malformed(self.kind, reason)
    }

    /// Fails unless exactly `expected` fields follow the kind tag.
    pub fn expect_len(&self, expected: usize) -> Result<(), ShapeError> {
        if self.fields.len() == expected {
            Ok(())
        } else {
            Err(self.malformed(format!(
                "expected {expected} fields, found {}",
                self.fields.len()
            )))
        }
    }

    /// Trimmed text of field `index`.
    pub fn raw(&self, index: usize) -> Result<&'a str, ShapeError> {
        self.fields
            .get(index)
            .map(|field| field.trim())
            .ok_or_else(|| self.malformed(format!("missing field {}", index + 1)))
    }

    pub fn integer(&self, index: usize) -> Result<i32, ShapeError> {
        let raw = self.raw(index)?;
        raw.parse::<i32>().map_err(|_| {
            self.malformed(format!("field {}: invalid integer '{raw}'", index + 1))
        })
    }

    /// A single `x,y` field.
    pub fn point(&self, index: usize) -> Result<Point, ShapeError> {
        let raw = self.raw(index)?;
        self.parse_point(index, raw)
    }

    /// A `;`-separated point list. An empty field is an empty list.
    ///
    /// With `expected` set, any other number of points is rejected.
    pub fn points(&self, index: usize, expected: Option<usize>) -> Result<Vec<Point>, ShapeError> {
        let raw = self.raw(index)?;
        let points = if raw.is_empty() {
            Vec::new()
        } else {
            raw.split(POINT_SEPARATOR)
                .map(|item| self.parse_point(index, item.trim()))
                .collect::<Result<Vec<_>, _>>()?
        };

        match expected {
            Some(count) if points.len() != count => Err(self.malformed(format!(
                "field {}: expected {count} points, found {}",
                index + 1,
                points.len()
            ))),
            _ => Ok(points),
        }
    }

    /// An `x,y,w,h` field with non-negative size.
    pub fn rect(&self, index: usize) -> Result<Rect, ShapeError> {
        let raw = self.raw(index)?;
        let parts = self.coordinates(index, raw, 4)?;
        Rect::new(parts[0], parts[1], parts[2], parts[3]).ok_or_else(|| {
            self.malformed(format!("field {}: negative size in '{raw}'", index + 1))
        })
    }

    /// A packed ARGB color in either signed or unsigned decimal form.
    pub fn color(&self, index: usize) -> Result<Color, ShapeError> {
        let raw = self.raw(index)?;
        raw.parse::<i64>()
            .ok()
            .and_then(argb_from_decimal)
            .map(Color::from_argb)
            .ok_or_else(|| self.malformed(format!("field {}: invalid color '{raw}'", index + 1)))
    }

    /// A stroke thickness, which must be a positive integer.
    pub fn thickness(&self, index: usize) -> Result<u32, ShapeError> {
        let raw = self.raw(index)?;
        match raw.parse::<u32>() {
            Ok(value) if value >= 1 => Ok(value),
            _ => Err(self.malformed(format!(
                "field {}: invalid thickness '{raw}'",
                index + 1
            ))),
        }
    }

    /// A `True`/`False` flag, matched case-insensitively.
    pub fn flag(&self, index: usize) -> Result<bool, ShapeError> {
        let raw = self.raw(index)?;
        if raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(self.malformed(format!("field {}: invalid flag '{raw}'", index + 1)))
        }
    }

    fn parse_point(&self, index: usize, raw: &str) -> Result<Point, ShapeError> {
        let parts = self.coordinates(index, raw, 2)?;
        Ok(Point::new(parts[0], parts[1]))
    }

    fn coordinates(&self, index: usize, raw: &str, count: usize) -> Result<Vec<i32>, ShapeError> {
        let parts: Vec<&str> = raw.split(COORD_SEPARATOR).collect();
        if parts.len() != count {
            return Err(self.malformed(format!(
                "field {}: expected {count} comma-separated values in '{raw}'",
                index + 1
            )));
        }
        parts
            .iter()
            .map(|part| {
                part.trim().parse::<i32>().map_err(|_| {
                    self.malformed(format!("field {}: invalid integer '{part}'", index + 1))
                })
            })
            .collect()
    }
}

pub fn format_point(point: Point) -> String {
    format!("{}{COORD_SEPARATOR}{}", point.x, point.y)
}

pub fn format_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|point| format_point(*point))
        .collect::<Vec<_>>()
        .join(&POINT_SEPARATOR.to_string())
}

pub fn format_rect(rect: Rect) -> String {
    format!("{},{},{},{}", rect.x, rect.y, rect.width, rect.height)
}

/// Packed ARGB as a signed 32-bit decimal.
pub fn format_color(color: Color) -> String {
    (color.to_argb() as i32).to_string()
}

pub fn format_flag(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

/// Encodes a shape as a single record line (without the trailing newline).
///
/// Line breaks inside a field would split the record, so any that a plugin
/// shape produces are replaced with spaces.
pub fn encode(shape: &dyn Shape) -> String {
    let mut line = shape.kind().to_string();
    for field in shape.encode_fields() {
        line.push(FIELD_SEPARATOR);
        line.push_str(&field);
    }

    if line.contains(['\n', '\r']) {
        warn!(
            "{} record contained a line break; replacing it with a space",
            shape.kind()
        );
        line = line.replace(['\n', '\r'], " ");
    }
    line
}

/// Decodes one record line, dispatching on its kind tag.
pub fn decode(registry: &ShapeRegistry, line: &str) -> Result<Box<dyn Shape>, ShapeError> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.contains(['\n', '\r']) {
        return Err(ShapeError::malformed("record", "embedded line break"));
    }

    let mut parts = line.split(FIELD_SEPARATOR);
    let kind = parts.next().unwrap_or_default().trim();
    if kind.is_empty() {
        return Err(ShapeError::malformed("record", "missing kind tag"));
    }

    let mut shape = registry.create(kind)?;
    shape.decode_fields(&RecordFields::new(kind, parts.collect()))?;
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{BLUE, GREEN, ORANGE, RED, TRANSPARENT, WHITE, YELLOW};
    use crate::shapes::{Ellipse, Line, PointChain, Rectangle, ShapeStyle};

    fn round_trip<S: Shape + Clone + PartialEq + 'static>(shape: &S) {
        let registry = ShapeRegistry::with_builtins();
        let line = encode(shape);
        let decoded = decode(&registry, &line).unwrap();
        assert_eq!(decoded.kind(), shape.kind());
        let decoded = decoded.as_any().downcast_ref::<S>().unwrap();
        assert_eq!(decoded, shape, "record: {line}");
    }

    #[test]
    fn line_record_matches_the_documented_layout() {
        let line = Line::new(
            Point::new(10, 20),
            Point::new(110, 20),
            ShapeStyle::new(crate::draw::BLACK, 2, TRANSPARENT),
        );
        assert_eq!(encode(&line), "Line|10,20|110,20|-16777216|2|16777215");
        round_trip(&line);
    }

    #[test]
    fn rectangle_and_ellipse_round_trip() {
        let bounds = Rect::new(-5, 7, 40, 0).unwrap();
        round_trip(&Rectangle::new(bounds, ShapeStyle::new(RED, 4, YELLOW)));
        round_trip(&Ellipse::new(bounds, ShapeStyle::new(GREEN, 1, WHITE)));
    }

    #[test]
    fn chains_round_trip_with_completion_flag() {
        let mut polyline = PointChain::polyline();
        polyline.style = ShapeStyle::new(BLUE, 3, TRANSPARENT);
        polyline.update(Point::new(0, 0), Point::new(5, 5));
        polyline.update(Point::new(5, 5), Point::new(9, -2));
        round_trip(&polyline);

        let mut polygon = PointChain::polygon();
        polygon.style = ShapeStyle::new(ORANGE, 2, RED);
        polygon.update(Point::new(0, 0), Point::new(10, 0));
        polygon.update(Point::new(10, 0), Point::new(10, 10));
        polygon.complete();
        assert_eq!(
            encode(&polygon),
            "Polygon|0,0;10,0;10,10;0,0|-23296|2|-65536|True"
        );
        round_trip(&polygon);
    }

    #[test]
    fn unsigned_colors_and_padding_are_accepted() {
        let registry = ShapeRegistry::with_builtins();
        let shape = decode(
            &registry,
            "Rectangle| 1, 2, 3, 4 |4278190080| 2 |16777215\r\n",
        )
        .unwrap();
        let rect = shape.as_any().downcast_ref::<Rectangle>().unwrap();
        assert_eq!(rect.bounds, Rect::new(1, 2, 3, 4).unwrap());
        assert_eq!(rect.style.stroke_color, crate::draw::BLACK);
    }

    #[test]
    fn flags_are_case_insensitive() {
        let registry = ShapeRegistry::with_builtins();
        let shape = decode(&registry, "Polyline|1,1;2,2|-16777216|1|true").unwrap();
        let chain = shape.as_any().downcast_ref::<PointChain>().unwrap();
        assert!(chain.is_completed());
    }

    #[test]
    fn empty_point_list_decodes_to_no_points() {
        let registry = ShapeRegistry::with_builtins();
        let shape = decode(&registry, "Polygon||-16777216|1|16777215|False").unwrap();
        let chain = shape.as_any().downcast_ref::<PointChain>().unwrap();
        assert!(chain.points().is_empty());
    }

    #[test]
    fn unknown_kind_is_reported_by_name() {
        let registry = ShapeRegistry::with_builtins();
        let err = decode(&registry, "Hexagon|1,2").unwrap_err();
        assert_eq!(err, ShapeError::UnknownShapeKind("Hexagon".to_string()));
    }

    #[test]
    fn malformed_records_are_rejected() {
        let registry = ShapeRegistry::with_builtins();
        let cases = [
            "",
            "|1,2|3,4",
            "Line|1,2|3,4|-16777216|2",
            "Line|1,2|3,4|-16777216|2|16777215|extra",
            "Line|1,x|3,4|-16777216|2|16777215",
            "Line|1,2,3|3,4|-16777216|2|16777215",
            "Line|1,2|3,4|red|2|16777215",
            "Line|1,2|3,4|-16777216|0|16777215",
            "Line|1,2|3,4|-16777216|-3|16777215",
            "Line|1,2|3,4|99999999999|2|16777215",
            "Rectangle|0,0,-1,5|-16777216|1|16777215",
            "Rectangle|0,0,1|-16777216|1|16777215",
            "Polyline|1,1;;2,2|-16777216|1|False",
            "Polyline|1,1;2,2|-16777216|1|yes",
        ];
        for case in cases {
            let err = decode(&registry, case).unwrap_err();
            assert!(
                matches!(err, ShapeError::MalformedRecord { .. }),
                "{case:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn expected_point_count_is_enforced() {
        let fields = RecordFields::new("Trapezoid", vec!["0,0;1,1;2,2"]);
        assert!(fields.points(0, Some(4)).is_err());
        assert_eq!(fields.points(0, Some(3)).unwrap().len(), 3);
        assert!(fields.points(1, None).is_err());
    }
}
