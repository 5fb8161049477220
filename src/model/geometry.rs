//! Selection geometry in image-pixel space.

use serde::{Deserialize, Serialize};

/// A position in image-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Both coordinates are neither NaN nor infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned box defined by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectangleRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectangleRegion {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a normalized box from two opposite corners, dragged in any direction.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Half-open containment test: left/top edges are inside, right/bottom are not.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Ordered freehand outline. Closed once the first point is repeated at the end.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path {
    points: Vec<Point>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the last point repeats the first.
    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }

    /// Close the outline by appending the first point. Already-closed paths are left alone.
    pub fn close(&mut self) {
        if let Some(&first) = self.points.first()
            && !self.is_closed()
        {
            self.points.push(first);
        }
    }

    /// Smallest box containing every point.
    pub fn bounds(&self) -> Option<RectangleRegion> {
        let first = self.points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(RectangleRegion::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Point-in-polygon test using the even-odd ray casting rule.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let vertices = &self.points;
        if vertices.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = vertices.len() - 1;
        for i in 0..vertices.len() {
            let (pi, pj) = (vertices[i], vertices[j]);
            if ((pi.y > y) != (pj.y > y)) && (x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_corners_normalizes() {
        let rect = RectangleRegion::from_corners(Point::new(12.0, 3.0), Point::new(2.0, 9.0));
        assert_eq!(rect, RectangleRegion::new(2.0, 3.0, 10.0, 6.0));
        assert_eq!(rect.right(), 12.0);
        assert_eq!(rect.bottom(), 9.0);
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = RectangleRegion::new(2.0, 2.0, 10.0, 10.0);
        assert!(rect.contains(2.0, 2.0));
        assert!(rect.contains(11.9, 11.9));
        assert!(!rect.contains(12.0, 5.0));
        assert!(!rect.contains(5.0, 12.0));
    }

    #[test]
    fn test_path_close() {
        let mut path = Path::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
        ]);
        assert!(!path.is_closed());
        path.close();
        assert!(path.is_closed());
        assert_eq!(path.len(), 4);

        path.close();
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_path_contains_square() {
        let path = Path::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ]);
        assert!(path.contains(5.0, 5.0));
        assert!(!path.contains(15.0, 5.0));
        assert!(!path.contains(-1.0, 5.0));
    }

    #[test]
    fn test_path_bounds() {
        let path = Path::from_points(vec![
            Point::new(3.0, 7.0),
            Point::new(9.0, 1.0),
            Point::new(5.0, 4.0),
        ]);
        assert_eq!(path.bounds(), Some(RectangleRegion::new(3.0, 1.0, 6.0, 6.0)));
        assert_eq!(Path::new().bounds(), None);
    }
}
