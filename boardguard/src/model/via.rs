//! Plated via between two copper layers

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Point};
use crate::model::limits::ObjectLimits;

pub const DEFAULT_START_LAYER: &str = "top";
pub const DEFAULT_END_LAYER: &str = "bottom";

/// Via classification, derived from the layers it connects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViaType {
    /// Connects both outer layers
    Through,
    /// Connects one outer layer to an inner layer
    Blind,
    /// Connects two inner layers
    Buried,
}

/// Whether a layer name refers to one of the two outer copper layers
pub fn is_outer_layer(layer: &str) -> bool {
    ["top", "bottom", "f.cu", "b.cu"]
        .iter()
        .any(|name| layer.eq_ignore_ascii_case(name))
}

fn is_top_layer(layer: &str) -> bool {
    layer.eq_ignore_ascii_case("top") || layer.eq_ignore_ascii_case("f.cu")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Via {
    center: Point,
    outer_diameter: f64,
    drill_diameter: f64,
    start_layer: String,
    end_layer: String,
    #[serde(skip)]
    limits: ObjectLimits,
}

impl Via {
    pub fn new(center: Point, outer_diameter: f64, drill_diameter: f64) -> Self {
        Self::with_limits(center, outer_diameter, drill_diameter, ObjectLimits::default())
    }

    pub fn with_limits(
        center: Point,
        outer_diameter: f64,
        drill_diameter: f64,
        limits: ObjectLimits,
    ) -> Self {
        let mut via = Self {
            center,
            outer_diameter: 0.0,
            drill_diameter: 0.0,
            start_layer: DEFAULT_START_LAYER.to_string(),
            end_layer: DEFAULT_END_LAYER.to_string(),
            limits,
        };
        via.set_outer_diameter(outer_diameter);
        via.set_drill_diameter(drill_diameter);
        via
    }

    /// Builder: connect a different pair of logical layers
    pub fn between(mut self, start_layer: impl Into<String>, end_layer: impl Into<String>) -> Self {
        self.set_layers(start_layer, end_layer);
        self
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn outer_diameter(&self) -> f64 {
        self.outer_diameter
    }

    pub fn drill_diameter(&self) -> f64 {
        self.drill_diameter
    }

    pub fn start_layer(&self) -> &str {
        &self.start_layer
    }

    pub fn end_layer(&self) -> &str {
        &self.end_layer
    }

    pub fn radius(&self) -> f64 {
        self.outer_diameter / 2.0
    }

    pub fn annular_ring(&self) -> f64 {
        (self.outer_diameter - self.drill_diameter) / 2.0
    }

    pub fn via_type(&self) -> ViaType {
        let start_outer = is_outer_layer(&self.start_layer);
        let end_outer = is_outer_layer(&self.end_layer);
        match (start_outer, end_outer) {
            (true, true) if is_top_layer(&self.start_layer) != is_top_layer(&self.end_layer) => {
                ViaType::Through
            }
            (false, false) => ViaType::Buried,
            _ => ViaType::Blind,
        }
    }

    /// Sets the outer diameter and re-caps the drill to keep the ring
    pub fn set_outer_diameter(&mut self, diameter: f64) {
        self.outer_diameter = self.limits.clamp_via_outer(diameter);
        self.drill_diameter = self
            .limits
            .clamp_via_drill(self.drill_diameter, self.outer_diameter);
    }

    pub fn set_drill_diameter(&mut self, diameter: f64) {
        self.drill_diameter = self.limits.clamp_via_drill(diameter, self.outer_diameter);
    }

    pub fn set_layers(&mut self, start_layer: impl Into<String>, end_layer: impl Into<String>) {
        self.start_layer = start_layer.into();
        self.end_layer = end_layer.into();
    }

    pub(crate) fn apply_limits(&mut self, limits: ObjectLimits) {
        self.limits = limits;
        let (outer, drill) = (self.outer_diameter, self.drill_diameter);
        self.set_outer_diameter(outer);
        self.set_drill_diameter(drill);
    }

    pub(crate) fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        self.center.distance_to(p) <= self.radius()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::centered(self.center, self.outer_diameter, self.outer_diameter)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.outer_diameter <= 0.0 {
            problems.push(format!(
                "Via outer diameter {:.3}mm must be positive",
                self.outer_diameter
            ));
        }
        if self.drill_diameter <= 0.0 {
            problems.push(format!(
                "Via drill diameter {:.3}mm must be positive",
                self.drill_diameter
            ));
        }
        if self.drill_diameter >= self.outer_diameter {
            problems.push(format!(
                "Via drill {:.3}mm leaves no copper inside outer diameter {:.3}mm",
                self.drill_diameter, self.outer_diameter
            ));
        }
        if self.start_layer == self.end_layer {
            problems.push(format!(
                "Via starts and ends on the same layer '{}'",
                self.start_layer
            ));
        }
        problems
    }
}
