//! Points, rectangles and bounding-box helpers.

use serde::Serialize;
use std::fmt;

/// Integer canvas coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Axis-aligned rectangle with non-negative width and height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a rectangle, rejecting negative dimensions.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width < 0 || height < 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Normalizes a drag from `a` to `b` so the result never has negative
    /// dimensions, whichever direction the pointer moved.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: b.x.abs_diff(a.x).min(i32::MAX as u32) as i32,
            height: b.y.abs_diff(a.y).min(i32::MAX as u32) as i32,
        }
    }

    /// Builds a rectangle from min/max bounds (inclusive min, exclusive max).
    ///
    /// Spans wider than `i32::MAX` are clamped.
    pub fn from_min_max(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Option<Self> {
        Self::new(
            min_x,
            min_y,
            max_x.saturating_sub(min_x),
            max_y.saturating_sub(min_y),
        )
    }

    /// Right edge, saturating at `i32::MAX`.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge, saturating at `i32::MAX`.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Smallest rectangle covering both inputs.
    pub fn union(self, other: Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        Rect {
            x: min_x,
            y: min_y,
            width: self.right().max(other.right()).saturating_sub(min_x),
            height: self.bottom().max(other.bottom()).saturating_sub(min_y),
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

// ============================================================================
// Bounding boxes (expanded to cover the stroke)
// ============================================================================

fn stroke_padding(thickness: u32) -> i32 {
    i32::try_from(thickness.div_ceil(2)).unwrap_or(i32::MAX).max(1)
}

/// Bounding box of a point sequence, padded by half the stroke width.
///
/// Returns `None` for an empty sequence.
pub fn bounding_box_for_points(points: &[Point], thickness: u32) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);

    for point in rest {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }

    let padding = stroke_padding(thickness);
    Rect::from_min_max(
        min_x.saturating_sub(padding),
        min_y.saturating_sub(padding),
        max_x.saturating_add(padding),
        max_y.saturating_add(padding),
    )
}

/// Bounding box of a rectangle outline, padded by half the stroke width.
pub fn bounding_box_for_rect(rect: Rect, thickness: u32) -> Option<Rect> {
    let padding = stroke_padding(thickness);
    Rect::from_min_max(
        rect.x.saturating_sub(padding),
        rect.y.saturating_sub(padding),
        rect.right().saturating_add(padding),
        rect.bottom().saturating_add(padding),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_normalizes_any_drag_direction() {
        let expected = Rect {
            x: 10,
            y: 20,
            width: 30,
            height: 40,
        };
        assert_eq!(
            Rect::from_corners(Point::new(10, 20), Point::new(40, 60)),
            expected
        );
        assert_eq!(
            Rect::from_corners(Point::new(40, 60), Point::new(10, 20)),
            expected
        );
        assert_eq!(
            Rect::from_corners(Point::new(40, 20), Point::new(10, 60)),
            expected
        );
    }

    #[test]
    fn new_rejects_negative_sizes() {
        assert!(Rect::new(0, 0, -1, 5).is_none());
        assert!(Rect::new(0, 0, 0, 0).is_some());
    }

    #[test]
    fn points_bounding_box_expands_with_thickness() {
        let rect = bounding_box_for_points(&[Point::new(10, 20), Point::new(30, 40)], 6)
            .expect("points should have bounds");
        assert_eq!(rect, Rect::new(7, 17, 26, 26).unwrap());
        assert!(bounding_box_for_points(&[], 3).is_none());
    }

    #[test]
    fn rect_bounding_box_covers_stroke() {
        let rect = bounding_box_for_rect(Rect::new(50, 40, 20, 50).unwrap(), 4).unwrap();
        assert_eq!(rect, Rect::new(48, 38, 24, 54).unwrap());
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::new(0, 0, 10, 10).unwrap();
        let b = Rect::new(5, -5, 20, 5).unwrap();
        assert_eq!(a.union(b), Rect::new(0, -5, 25, 15).unwrap());
    }

    #[test]
    fn extreme_coordinates_saturate() {
        let wide = Rect::from_corners(Point::new(i32::MIN, 0), Point::new(i32::MAX, 3));
        assert_eq!((wide.x, wide.width, wide.height), (i32::MIN, i32::MAX, 3));

        let edge = Rect::new(2_147_483_000, 0, 2000, 5).unwrap();
        assert_eq!(edge.right(), i32::MAX);

        let rect =
            bounding_box_for_points(&[Point::new(i32::MAX, 0), Point::new(0, 0)], 2).unwrap();
        assert_eq!(rect, Rect::new(-1, -1, i32::MAX, 2).unwrap());

        let padded = bounding_box_for_rect(edge, u32::MAX).unwrap();
        assert_eq!(padded.x, 2_147_483_000 - i32::MAX);
        assert_eq!(padded.right(), i32::MAX);

        let far = Rect::new(i32::MIN, i32::MIN, 1, 1).unwrap();
        assert_eq!(far.union(edge).width, i32::MAX);
    }
}
