//! Placed component (footprint body plus its pads)

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Point};
use crate::model::pad::Pad;

/// Component body. Pads are stored with centers relative to the
/// component position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    position: Point,
    width: f64,
    height: f64,
    #[serde(default)]
    reference: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    footprint: String,
    #[serde(default)]
    pads: Vec<Pad>,
}

impl Component {
    pub fn new(reference: impl Into<String>, position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
            reference: reference.into(),
            value: String::new(),
            footprint: String::new(),
            pads: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_footprint(mut self, footprint: impl Into<String>) -> Self {
        self.footprint = footprint.into();
        self
    }

    /// Builder: add a pad whose center is an offset from the component position
    pub fn with_pad(mut self, pad: Pad) -> Self {
        self.pads.push(pad);
        self
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn footprint(&self) -> &str {
        &self.footprint
    }

    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    /// Board-space center of a pad (rotation not applied)
    pub fn pad_position(&self, pad: &Pad) -> Point {
        let offset = pad.center();
        self.position.translate(offset.x, offset.y)
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn add_pad(&mut self, pad: Pad) {
        self.pads.push(pad);
    }

    pub fn remove_pad(&mut self, number: &str) -> Option<Pad> {
        let index = self.pads.iter().position(|p| p.number() == Some(number))?;
        Some(self.pads.remove(index))
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Unrotated body rectangle. Rotation is presentation-only.
    pub fn body(&self) -> BoundingBox {
        BoundingBox::centered(self.position, self.width, self.height)
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        self.body().contains_point(p)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.body()
    }

    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.width <= 0.0 || self.height <= 0.0 {
            problems.push(format!(
                "Component {} body {:.3}x{:.3}mm must be positive",
                self.reference, self.width, self.height
            ));
        }
        for pad in &self.pads {
            for problem in pad.validate() {
                problems.push(format!(
                    "Component {} pad {}: {}",
                    self.reference,
                    pad.number().unwrap_or("?"),
                    problem
                ));
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_centered_on_position() {
        let comp = Component::new("U1", Point::new(10.0, 10.0), 4.0, 2.0);
        assert!(comp.contains_point(&Point::new(11.9, 10.9)));
        assert!(!comp.contains_point(&Point::new(12.1, 10.0)));
    }

    #[test]
    fn test_pad_positions_are_relative() {
        let comp = Component::new("R1", Point::new(5.0, 5.0), 2.0, 1.0)
            .with_pad(Pad::rect(Point::new(-0.5, 0.0), 0.6, 0.8).with_number("1"))
            .with_pad(Pad::rect(Point::new(0.5, 0.0), 0.6, 0.8).with_number("2"));
        let positions: Vec<_> = comp.pads().iter().map(|p| comp.pad_position(p)).collect();
        assert_eq!(positions, vec![Point::new(4.5, 5.0), Point::new(5.5, 5.0)]);
    }

    #[test]
    fn test_remove_pad_by_number() {
        let mut comp = Component::new("C1", Point::default(), 2.0, 1.0)
            .with_pad(Pad::circle(Point::new(-0.5, 0.0), 0.5).with_number("1"));
        assert!(comp.remove_pad("2").is_none());
        assert!(comp.remove_pad("1").is_some());
        assert!(comp.pads().is_empty());
    }

    #[test]
    fn test_validate_reports_pad_problems() {
        let comp = Component::new("J1", Point::default(), 3.0, 3.0)
            .with_pad(Pad::circle(Point::default(), 1.0).with_drill(1.2).with_number("1"));
        let problems = comp.validate();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("Component J1 pad 1:"));
    }
}
