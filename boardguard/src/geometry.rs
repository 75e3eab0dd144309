//! Geometry Primitives
//!
//! Plain 2D math shared by the object model and the DRC engine.
//! All coordinates are millimeters; angles are degrees unless a
//! function says otherwise.

use serde::{Deserialize, Serialize};

/// Number of segments used when a circle is approximated by a polygon
pub const CIRCLE_SEGMENTS: usize = 16;

const EPSILON: f64 = 1e-12;

/// A 2D point in board coordinates (mm)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Rotate this point around `center` by `degrees` (counter-clockwise)
    pub fn rotate_around(&self, center: &Point, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Self {
            x: center.x + dx * cos - dy * sin,
            y: center.y + dx * sin + dy * cos,
        }
    }

    pub fn midpoint(&self, other: &Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` with the given full width and height
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self {
            min: Point::new(center.x - hw, center.y - hh),
            max: Point::new(center.x + hw, center.y + hh),
        }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self::new(*first, *first);
        for p in &points[1..] {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    /// Grow the box by `margin` on every side
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        self.min.midpoint(&self.max)
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn union(&self, other: &BoundingBox) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Corners in counter-clockwise order starting at the minimum corner
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }
}

/// Closest point on segment `a`-`b` to `p`
pub fn closest_point_on_segment(p: &Point, a: &Point, b: &Point) -> Point {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len2 = abx * abx + aby * aby;

    if len2 < EPSILON {
        // Degenerate segment
        return *a;
    }

    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0);
    Point::new(a.x + t * abx, a.y + t * aby)
}

/// Minimum distance from `p` to segment `a`-`b`
pub fn point_segment_distance(p: &Point, a: &Point, b: &Point) -> f64 {
    p.distance_to(&closest_point_on_segment(p, a, b))
}

/// Even-odd ray casting test. Points exactly on an edge may land on
/// either side.
pub fn point_in_polygon(p: &Point, polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let pi = &polygon[i];
        let pj = &polygon[j];
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pj.x + (p.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Vertex average of a point list
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Regular polygon approximating a circle
pub fn circle_polygon(center: &Point, radius: f64, segments: usize) -> Vec<Point> {
    (0..segments)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / segments as f64;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// Quadrilateral covering segment `a`-`b` offset by `half_width` on
/// both sides, perpendicular to the segment. The ends are not extended.
pub fn segment_outline(a: &Point, b: &Point, half_width: f64) -> Vec<Point> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    let (nx, ny) = if len < EPSILON {
        (0.0, half_width)
    } else {
        (-dy / len * half_width, dx / len * half_width)
    };

    vec![
        Point::new(a.x + nx, a.y + ny),
        Point::new(b.x + nx, b.y + ny),
        Point::new(b.x - nx, b.y - ny),
        Point::new(a.x - nx, a.y - ny),
    ]
}

/// Normalize an angle in degrees into `[0, 360)`
pub fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees % 360.0;
    if d < 0.0 {
        d + 360.0
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        assert!((point_segment_distance(&Point::new(1.0, 1.0), &a, &b) - 1.0).abs() < 1e-9);
        // Beyond the end the distance is to the endpoint
        assert!((point_segment_distance(&Point::new(5.0, 4.0), &a, &b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_segment_distance() {
        let a = Point::new(1.0, 1.0);
        let d = point_segment_distance(&Point::new(4.0, 5.0), &a, &a);
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_in_polygon() {
        let square = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(&Point::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(&Point::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(&Point::new(5.0, -0.1), &square));
    }

    #[test]
    fn test_point_in_concave_polygon() {
        // U shape, the notch is outside
        let u = vec![
            Point::new(0.0, 0.0),
            Point::new(9.0, 0.0),
            Point::new(9.0, 9.0),
            Point::new(6.0, 9.0),
            Point::new(6.0, 3.0),
            Point::new(3.0, 3.0),
            Point::new(3.0, 9.0),
            Point::new(0.0, 9.0),
        ];
        assert!(point_in_polygon(&Point::new(1.5, 6.0), &u));
        assert!(!point_in_polygon(&Point::new(4.5, 6.0), &u));
    }

    #[test]
    fn test_too_few_points_is_never_inside() {
        let line = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert!(!point_in_polygon(&Point::new(0.5, 0.5), &line));
    }

    #[test]
    fn test_circle_polygon() {
        let center = Point::new(1.0, 2.0);
        let pts = circle_polygon(&center, 3.0, CIRCLE_SEGMENTS);
        assert_eq!(pts.len(), 16);
        for p in &pts {
            assert!((p.distance_to(&center) - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_segment_outline_is_offset_perpendicular() {
        let outline = segment_outline(&Point::new(0.0, 0.0), &Point::new(4.0, 0.0), 0.5);
        assert_eq!(outline.len(), 4);
        assert!((outline[0].y - 0.5).abs() < 1e-9);
        assert!((outline[2].y + 0.5).abs() < 1e-9);
        assert!((outline[1].x - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_from_points() {
        let bbox = BoundingBox::from_points(&[
            Point::new(1.0, 5.0),
            Point::new(-2.0, 3.0),
            Point::new(4.0, -1.0),
        ])
        .unwrap();
        assert_eq!(bbox.min, Point::new(-2.0, -1.0));
        assert_eq!(bbox.max, Point::new(4.0, 5.0));
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn test_rotate_around() {
        let p = Point::new(1.0, 0.0).rotate_around(&Point::new(0.0, 0.0), 90.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(0.0), 0.0);
    }
}
