//! Component pad (SMD or through-hole)

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PadShape {
    Circle,
    Square,
    Rect,
    Oval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadType {
    Smd,
    ThroughHole,
}

/// Pad size: one dimension for round/square pads, or a width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PadSize {
    Uniform(f64),
    Rect { width: f64, height: f64 },
}

impl PadSize {
    pub fn width(&self) -> f64 {
        match self {
            PadSize::Uniform(size) => *size,
            PadSize::Rect { width, .. } => *width,
        }
    }

    pub fn height(&self) -> f64 {
        match self {
            PadSize::Uniform(size) => *size,
            PadSize::Rect { height, .. } => *height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pad {
    center: Point,
    shape: PadShape,
    size: PadSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    drill_diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    number: Option<String>,
}

impl Pad {
    pub fn new(center: Point, shape: PadShape, size: PadSize) -> Self {
        Self {
            center,
            shape,
            size,
            drill_diameter: None,
            number: None,
        }
    }

    pub fn circle(center: Point, diameter: f64) -> Self {
        Self::new(center, PadShape::Circle, PadSize::Uniform(diameter))
    }

    pub fn rect(center: Point, width: f64, height: f64) -> Self {
        Self::new(center, PadShape::Rect, PadSize::Rect { width, height })
    }

    /// Builder: drill the pad, making it through-hole
    pub fn with_drill(mut self, diameter: f64) -> Self {
        self.set_drill_diameter(Some(diameter));
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn shape(&self) -> PadShape {
        self.shape
    }

    pub fn size(&self) -> PadSize {
        self.size
    }

    pub fn width(&self) -> f64 {
        self.size.width()
    }

    pub fn height(&self) -> f64 {
        self.size.height()
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    /// Drill diameter, only when the pad is actually drilled
    pub fn drill_diameter(&self) -> Option<f64> {
        self.drill_diameter.filter(|d| *d > 0.0)
    }

    pub fn pad_type(&self) -> PadType {
        if self.drill_diameter().is_some() {
            PadType::ThroughHole
        } else {
            PadType::Smd
        }
    }

    pub fn is_drilled(&self) -> bool {
        self.pad_type() == PadType::ThroughHole
    }

    /// Radius of the smallest circle around the center covering the pad's
    /// larger dimension
    pub fn radius(&self) -> f64 {
        self.width().max(self.height()) / 2.0
    }

    /// Copper around the drill, measured against the narrower dimension
    pub fn annular_ring(&self) -> Option<f64> {
        self.drill_diameter()
            .map(|drill| (self.width().min(self.height()) - drill) / 2.0)
    }

    pub fn set_shape(&mut self, shape: PadShape) {
        self.shape = shape;
    }

    pub fn set_size(&mut self, size: PadSize) {
        self.size = size;
    }

    pub fn set_drill_diameter(&mut self, diameter: Option<f64>) {
        self.drill_diameter = diameter;
    }

    pub(crate) fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        let a = self.width() / 2.0;
        let b = self.height() / 2.0;
        match self.shape {
            PadShape::Rect | PadShape::Square => dx.abs() <= a && dy.abs() <= b,
            PadShape::Oval => {
                if a <= 0.0 || b <= 0.0 {
                    return false;
                }
                (dx * dx) / (a * a) + (dy * dy) / (b * b) <= 1.0
            }
            PadShape::Circle => (dx * dx + dy * dy).sqrt() <= self.radius(),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match self.shape {
            PadShape::Circle => {
                let d = self.radius() * 2.0;
                BoundingBox::centered(self.center, d, d)
            }
            _ => BoundingBox::centered(self.center, self.width(), self.height()),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.width() <= 0.0 || self.height() <= 0.0 {
            problems.push(format!(
                "Pad size {:.3}x{:.3}mm must be positive",
                self.width(),
                self.height()
            ));
        }
        if let Some(drill) = self.drill_diameter() {
            if drill >= self.width().min(self.height()) {
                problems.push(format!(
                    "Pad drill {:.3}mm does not fit inside the {:.3}x{:.3}mm pad",
                    drill,
                    self.width(),
                    self.height()
                ));
            }
        }
        problems
    }
}
