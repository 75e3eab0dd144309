//! Editor-side clamp bounds applied whenever geometry is assigned.
//!
//! These are not manufacturing rules (see [`crate::rules::DesignRules`]);
//! they only keep objects geometrically sane while they are being edited.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectLimits {
    pub min_trace_width: f64,
    pub max_trace_width: f64,
    pub min_via_outer: f64,
    pub max_via_outer: f64,
    pub min_via_drill: f64,
    pub max_via_drill: f64,
    /// Copper that must always remain around a via drill while editing
    pub min_annular_ring: f64,
}

impl Default for ObjectLimits {
    fn default() -> Self {
        Self {
            min_trace_width: 0.05,
            max_trace_width: 10.0,
            min_via_outer: 0.2,
            max_via_outer: 6.0,
            min_via_drill: 0.1,
            max_via_drill: 5.0,
            min_annular_ring: 0.01,
        }
    }
}

impl ObjectLimits {
    pub fn clamp_trace_width(&self, width: f64) -> f64 {
        clamp_between(width, self.min_trace_width, self.max_trace_width)
    }

    pub fn clamp_via_outer(&self, diameter: f64) -> f64 {
        clamp_between(diameter, self.min_via_outer, self.max_via_outer)
    }

    /// Clamp a drill to its bounds, then cap it so the ring around it
    /// stays at least `min_annular_ring` wide.
    pub fn clamp_via_drill(&self, drill: f64, outer: f64) -> f64 {
        let ring = self.min_annular_ring.max(0.0);
        let cap = outer - 2.0 * ring;
        clamp_between(drill, self.min_via_drill, self.max_via_drill)
            .min(cap)
            .max(0.0)
    }
}

/// Like `f64::clamp` but tolerates inverted or NaN bounds from bad config
fn clamp_between(value: f64, min: f64, max: f64) -> f64 {
    let value = if value.is_nan() { min } else { value };
    value.max(min).min(max.max(min))
}
