//! Copper trace segment

use serde::{Deserialize, Serialize};

use crate::geometry::{closest_point_on_segment, point_segment_distance, BoundingBox, Point};
use crate::model::limits::ObjectLimits;

/// Shortest trace that still counts as a real segment (mm)
pub const MIN_TRACE_LENGTH: f64 = 0.01;

/// Straight copper segment with a fixed width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    start: Point,
    end: Point,
    width: f64,
    #[serde(skip)]
    limits: ObjectLimits,
}

impl Trace {
    pub fn new(start: Point, end: Point, width: f64) -> Self {
        Self::with_limits(start, end, width, ObjectLimits::default())
    }

    pub fn with_limits(start: Point, end: Point, width: f64, limits: ObjectLimits) -> Self {
        Self {
            start,
            end,
            width: limits.clamp_trace_width(width),
            limits,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn limits(&self) -> &ObjectLimits {
        &self.limits
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Direction of travel from start to end, in degrees
    pub fn angle(&self) -> f64 {
        (self.end.y - self.start.y)
            .atan2(self.end.x - self.start.x)
            .to_degrees()
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(&self.end)
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = self.limits.clamp_trace_width(width);
    }

    pub fn set_endpoints(&mut self, start: Point, end: Point) {
        self.start = start;
        self.end = end;
    }

    /// Rebuild against new limits, re-clamping the width
    pub(crate) fn apply_limits(&mut self, limits: ObjectLimits) {
        self.limits = limits;
        self.width = limits.clamp_trace_width(self.width);
    }

    pub(crate) fn translate(&mut self, dx: f64, dy: f64) {
        self.start = self.start.translate(dx, dy);
        self.end = self.end.translate(dx, dy);
    }

    pub(crate) fn rotate(&mut self, degrees: f64) {
        let center = self.midpoint();
        self.start = self.start.rotate_around(&center, degrees);
        self.end = self.end.rotate_around(&center, degrees);
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        point_segment_distance(p, &self.start, &self.end) <= self.width / 2.0
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(
            Point::new(self.start.x.min(self.end.x), self.start.y.min(self.end.y)),
            Point::new(self.start.x.max(self.end.x), self.start.y.max(self.end.y)),
        )
        .expand(self.width / 2.0)
    }

    /// Two halves meeting at the projection of `point` onto the segment
    pub fn split(&self, point: &Point) -> (Trace, Trace) {
        let at = closest_point_on_segment(point, &self.start, &self.end);
        let mut first = self.clone();
        first.end = at;
        let mut second = self.clone();
        second.start = at;
        (first, second)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.width <= 0.0 {
            problems.push(format!("Trace width {:.3}mm must be positive", self.width));
        }
        if self.width < self.limits.min_trace_width || self.width > self.limits.max_trace_width {
            problems.push(format!(
                "Trace width {:.3}mm is outside the allowed range {:.3}-{:.3}mm",
                self.width, self.limits.min_trace_width, self.limits.max_trace_width
            ));
        }
        if self.length() < MIN_TRACE_LENGTH {
            problems.push(format!(
                "Trace length {:.4}mm is shorter than {:.2}mm",
                self.length(),
                MIN_TRACE_LENGTH
            ));
        }
        problems
    }
}
