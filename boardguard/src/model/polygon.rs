//! Copper pour polygon
//!
//! The filled shape is an approximation: clearance cutouts are collected
//! as separate void outlines next to the untouched boundary and no boolean
//! subtraction is performed. Consumers are expected to draw the result
//! with an even-odd fill rule. Overlapping voids, voids crossing the
//! boundary and self-intersecting boundaries are not resolved.

use serde::{Deserialize, Serialize};

use crate::geometry::{
    centroid, circle_polygon, point_in_polygon, segment_outline, BoundingBox, Point,
    CIRCLE_SEGMENTS,
};
use crate::model::{Geometry, PcbObject};

/// Spoke directions around a relieved pad, in degrees
pub const SPOKE_ANGLES: [f64; 4] = [45.0, 135.0, 225.0, 315.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PourSettings {
    /// Gap kept between the pour and foreign copper (mm)
    pub clearance: f64,
    pub thermal_relief: bool,
    pub spoke_width: f64,
}

impl Default for PourSettings {
    fn default() -> Self {
        Self {
            clearance: 0.3,
            thermal_relief: true,
            spoke_width: 0.3,
        }
    }
}

/// Derived pour geometry: the raw outline plus cutouts to render even-odd
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PourFill {
    pub main: Vec<Point>,
    pub voids: Vec<Vec<Point>>,
}

/// One thermal-relief spoke. `pad_id` refers to the pad object by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalSpoke {
    pub pad_id: String,
    pub start: Point,
    pub end: Point,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    boundary: Vec<Point>,
    #[serde(default)]
    settings: PourSettings,
    #[serde(skip)]
    fill: Option<PourFill>,
    #[serde(skip)]
    thermal_spokes: Vec<ThermalSpoke>,
}

impl Polygon {
    pub fn new(boundary: Vec<Point>) -> Self {
        Self {
            boundary,
            settings: PourSettings::default(),
            fill: None,
            thermal_spokes: Vec::new(),
        }
    }

    pub fn with_settings(mut self, settings: PourSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn boundary(&self) -> &[Point] {
        &self.boundary
    }

    pub fn settings(&self) -> &PourSettings {
        &self.settings
    }

    /// Result of the last [`PcbObject::recalculate_pour`], if any
    pub fn fill(&self) -> Option<&PourFill> {
        self.fill.as_ref()
    }

    pub fn thermal_spokes(&self) -> &[ThermalSpoke] {
        &self.thermal_spokes
    }

    pub fn is_valid(&self) -> bool {
        self.boundary.len() >= 3
    }

    pub fn center(&self) -> Point {
        centroid(&self.boundary).unwrap_or_default()
    }

    pub fn is_point_in_polygon(&self, p: &Point) -> bool {
        point_in_polygon(p, &self.boundary)
    }

    pub fn set_boundary(&mut self, boundary: Vec<Point>) {
        self.boundary = boundary;
    }

    pub fn set_settings(&mut self, settings: PourSettings) {
        self.settings = settings;
    }

    pub(crate) fn translate(&mut self, dx: f64, dy: f64) {
        for p in &mut self.boundary {
            *p = p.translate(dx, dy);
        }
    }

    pub(crate) fn rotate(&mut self, degrees: f64) {
        let center = self.center();
        for p in &mut self.boundary {
            *p = p.rotate_around(&center, degrees);
        }
    }

    pub(crate) fn store_fill(&mut self, fill: PourFill, spokes: Vec<ThermalSpoke>) {
        self.fill = Some(fill);
        self.thermal_spokes = spokes;
    }

    /// Build clearance voids and thermal spokes against `objects`.
    ///
    /// Only objects whose layer equals `layer` take part; the object with
    /// `own_id` (the pour itself) is skipped.
    pub fn compute_fill(
        &self,
        own_id: &str,
        layer: &str,
        objects: &[PcbObject],
    ) -> (PourFill, Vec<ThermalSpoke>) {
        let clearance = self.settings.clearance;
        let mut voids = Vec::new();
        let mut spokes = Vec::new();

        for obj in objects {
            if obj.id() == own_id || obj.layer() != layer {
                continue;
            }
            match obj.geometry() {
                Geometry::Trace(trace) => {
                    voids.push(segment_outline(
                        &trace.start(),
                        &trace.end(),
                        trace.width() / 2.0 + clearance,
                    ));
                }
                Geometry::Via(via) => {
                    voids.push(circle_polygon(
                        &via.center(),
                        via.radius() + clearance,
                        CIRCLE_SEGMENTS,
                    ));
                }
                Geometry::Pad(pad) => {
                    voids.push(circle_polygon(
                        &pad.center(),
                        pad.radius() + clearance,
                        CIRCLE_SEGMENTS,
                    ));
                    if self.settings.thermal_relief && self.is_point_in_polygon(&pad.center()) {
                        spokes.extend(self.spokes_for(obj.id(), &pad.center(), pad.radius()));
                    }
                }
                Geometry::Component(_) | Geometry::Polygon(_) => {}
            }
        }

        let fill = PourFill {
            main: self.boundary.clone(),
            voids,
        };
        (fill, spokes)
    }

    fn spokes_for(&self, pad_id: &str, center: &Point, radius: f64) -> Vec<ThermalSpoke> {
        let reach = 2.0 * self.settings.spoke_width;
        SPOKE_ANGLES
            .iter()
            .map(|angle| {
                let (sin, cos) = angle.to_radians().sin_cos();
                ThermalSpoke {
                    pad_id: pad_id.to_string(),
                    start: Point::new(center.x + radius * cos, center.y + radius * sin),
                    end: Point::new(
                        center.x + (radius + reach) * cos,
                        center.y + (radius + reach) * sin,
                    ),
                    width: self.settings.spoke_width,
                }
            })
            .collect()
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        self.is_point_in_polygon(p)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.boundary)
            .unwrap_or_else(|| BoundingBox::new(Point::default(), Point::default()))
    }

    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !self.is_valid() {
            problems.push(format!(
                "Polygon boundary has {} points; at least 3 are required",
                self.boundary.len()
            ));
        }
        if self.settings.clearance < 0.0 {
            problems.push(format!(
                "Polygon clearance {:.3}mm must not be negative",
                self.settings.clearance
            ));
        }
        if self.settings.thermal_relief && self.settings.spoke_width <= 0.0 {
            problems.push(format!(
                "Thermal spoke width {:.3}mm must be positive",
                self.settings.spoke_width
            ));
        }
        problems
    }
}
