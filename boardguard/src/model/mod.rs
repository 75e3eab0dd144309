//! PCB Object Model
//!
//! Every board item is a [`PcbObject`]: shared identity and bookkeeping
//! (id, layer, flags, property bag, timestamps) wrapped around one
//! [`Geometry`] variant. The variant set is closed; every dispatch site in
//! the crate matches on the same enum.
//!
//! Geometry is private. The only mutable path to it goes through
//! `PcbObject::mutate`, which refuses locked objects, invalidates the
//! cached bounding box and touches the modified timestamp, so a stale
//! bounding box can never be observed.

pub mod cache;
pub mod component;
pub mod limits;
pub mod pad;
pub mod polygon;
pub mod record;
pub mod trace;
pub mod via;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::{normalize_degrees, BoundingBox, Point};

pub use cache::Cached;
pub use component::Component;
pub use limits::ObjectLimits;
pub use pad::{Pad, PadShape, PadSize, PadType};
pub use polygon::{Polygon, PourFill, PourSettings, ThermalSpoke};
pub use record::{ObjectRecord, RecordError};
pub use trace::Trace;
pub use via::{Via, ViaType};

/// Property key holding an object's net name
pub const NET_PROPERTY: &str = "net";

/// Canonical type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Trace,
    Via,
    Pad,
    Component,
    Polygon,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 5] = [
        ObjectKind::Trace,
        ObjectKind::Via,
        ObjectKind::Pad,
        ObjectKind::Component,
        ObjectKind::Polygon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Trace => "trace",
            ObjectKind::Via => "via",
            ObjectKind::Pad => "pad",
            ObjectKind::Component => "component",
            ObjectKind::Polygon => "polygon",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific geometry
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Trace(Trace),
    Via(Via),
    Pad(Pad),
    Component(Component),
    Polygon(Polygon),
}

impl Geometry {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Geometry::Trace(_) => ObjectKind::Trace,
            Geometry::Via(_) => ObjectKind::Via,
            Geometry::Pad(_) => ObjectKind::Pad,
            Geometry::Component(_) => ObjectKind::Component,
            Geometry::Polygon(_) => ObjectKind::Polygon,
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Geometry::Trace(t) => t.midpoint(),
            Geometry::Via(v) => v.center(),
            Geometry::Pad(p) => p.center(),
            Geometry::Component(c) => c.position(),
            Geometry::Polygon(p) => p.center(),
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Geometry::Trace(t) => t.translate(dx, dy),
            Geometry::Via(v) => v.set_center(v.center().translate(dx, dy)),
            Geometry::Pad(p) => p.set_center(p.center().translate(dx, dy)),
            Geometry::Component(c) => c.set_position(c.position().translate(dx, dy)),
            Geometry::Polygon(p) => p.translate(dx, dy),
        }
    }

    /// Rotates point sets in place; round features only record the angle
    fn rotate(&mut self, degrees: f64) {
        match self {
            Geometry::Trace(t) => t.rotate(degrees),
            Geometry::Polygon(p) => p.rotate(degrees),
            Geometry::Via(_) | Geometry::Pad(_) | Geometry::Component(_) => {}
        }
    }

    fn bounding_box(&self) -> BoundingBox {
        match self {
            Geometry::Trace(t) => t.bounding_box(),
            Geometry::Via(v) => v.bounding_box(),
            Geometry::Pad(p) => p.bounding_box(),
            Geometry::Component(c) => c.bounding_box(),
            Geometry::Polygon(p) => p.bounding_box(),
        }
    }

    fn contains_point(&self, point: &Point) -> bool {
        match self {
            Geometry::Trace(t) => t.contains_point(point),
            Geometry::Via(v) => v.contains_point(point),
            Geometry::Pad(p) => p.contains_point(point),
            Geometry::Component(c) => c.contains_point(point),
            Geometry::Polygon(p) => p.contains_point(point),
        }
    }

    fn validate(&self) -> Vec<String> {
        match self {
            Geometry::Trace(t) => t.validate(),
            Geometry::Via(v) => v.validate(),
            Geometry::Pad(p) => p.validate(),
            Geometry::Component(c) => c.validate(),
            Geometry::Polygon(p) => p.validate(),
        }
    }

    fn apply_limits(&mut self, limits: ObjectLimits) {
        match self {
            Geometry::Trace(t) => t.apply_limits(limits),
            Geometry::Via(v) => v.apply_limits(limits),
            Geometry::Pad(_) | Geometry::Component(_) | Geometry::Polygon(_) => {}
        }
    }
}

impl From<Trace> for Geometry {
    fn from(trace: Trace) -> Self {
        Geometry::Trace(trace)
    }
}

impl From<Via> for Geometry {
    fn from(via: Via) -> Self {
        Geometry::Via(via)
    }
}

impl From<Pad> for Geometry {
    fn from(pad: Pad) -> Self {
        Geometry::Pad(pad)
    }
}

impl From<Component> for Geometry {
    fn from(component: Component) -> Self {
        Geometry::Component(component)
    }
}

impl From<Polygon> for Geometry {
    fn from(polygon: Polygon) -> Self {
        Geometry::Polygon(polygon)
    }
}

/// Named snap/measurement point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub name: String,
    pub point: Point,
}

impl Anchor {
    fn new(name: impl Into<String>, point: Point) -> Self {
        Self {
            name: name.into(),
            point,
        }
    }
}

/// Identity and bookkeeping shared by every object
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMeta {
    pub(crate) id: String,
    pub(crate) layer: String,
    pub(crate) rotation: f64,
    pub(crate) visible: bool,
    pub(crate) selected: bool,
    pub(crate) locked: bool,
    pub(crate) properties: BTreeMap<String, Value>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) modified_at: DateTime<Utc>,
}

impl ObjectMeta {
    fn new(layer: String) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            layer,
            rotation: 0.0,
            visible: true,
            selected: false,
            locked: false,
            properties: BTreeMap::new(),
            created_at: now,
            modified_at: now,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PcbObject {
    meta: ObjectMeta,
    geometry: Geometry,
    bounds: Cached<BoundingBox>,
}

impl PartialEq for PcbObject {
    fn eq(&self, other: &Self) -> bool {
        self.meta == other.meta && self.geometry == other.geometry
    }
}

impl PcbObject {
    pub fn new(layer: impl Into<String>, geometry: impl Into<Geometry>) -> Self {
        Self::from_parts(ObjectMeta::new(layer.into()), geometry.into())
    }

    pub(crate) fn from_parts(meta: ObjectMeta, geometry: Geometry) -> Self {
        Self {
            meta,
            geometry,
            bounds: Cached::new(),
        }
    }

    /// Builder: attach a net name
    pub fn with_net(mut self, net: impl Into<String>) -> Self {
        self.set_property(NET_PROPERTY, net.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }

    pub fn kind(&self) -> ObjectKind {
        self.geometry.kind()
    }

    pub fn layer(&self) -> &str {
        &self.meta.layer
    }

    pub fn rotation(&self) -> f64 {
        self.meta.rotation
    }

    pub fn is_visible(&self) -> bool {
        self.meta.visible
    }

    pub fn is_selected(&self) -> bool {
        self.meta.selected
    }

    pub fn is_locked(&self) -> bool {
        self.meta.locked
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.meta.created_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.meta.modified_at
    }

    pub fn meta(&self) -> &ObjectMeta {
        &self.meta
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn position(&self) -> Point {
        self.geometry.position()
    }

    pub fn as_trace(&self) -> Option<&Trace> {
        match &self.geometry {
            Geometry::Trace(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_via(&self) -> Option<&Via> {
        match &self.geometry {
            Geometry::Via(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_pad(&self) -> Option<&Pad> {
        match &self.geometry {
            Geometry::Pad(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match &self.geometry {
            Geometry::Component(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match &self.geometry {
            Geometry::Polygon(p) => Some(p),
            _ => None,
        }
    }

    /// Pads with a drill pass through the board like vias
    pub fn is_drilled_pad(&self) -> bool {
        self.as_pad().map(Pad::is_drilled).unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    fn touch(&mut self) {
        self.meta.modified_at = Utc::now();
    }

    /// The single mutable path to geometry
    fn mutate<R>(&mut self, action: &str, edit: impl FnOnce(&mut Geometry) -> R) -> Option<R> {
        if self.meta.locked {
            tracing::warn!("Ignoring {} on locked {} {}", action, self.kind(), self.meta.id);
            return None;
        }
        self.bounds.invalidate();
        self.touch();
        Some(edit(&mut self.geometry))
    }

    pub fn set_position(&mut self, position: Point) -> bool {
        let current = self.position();
        self.move_by(position.x - current.x, position.y - current.y)
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) -> bool {
        self.mutate("move", |g| g.translate(dx, dy)).is_some()
    }

    /// Rotate by `degrees` about the object's own position
    pub fn rotate(&mut self, degrees: f64) -> bool {
        if self.mutate("rotate", |g| g.rotate(degrees)).is_none() {
            return false;
        }
        self.meta.rotation = normalize_degrees(self.meta.rotation + degrees);
        true
    }

    pub fn set_layer(&mut self, layer: impl Into<String>) -> bool {
        let layer = layer.into();
        if self.mutate("layer change", |_| ()).is_none() {
            return false;
        }
        self.meta.layer = layer;
        true
    }

    /// Edit trace geometry. `None` when the object is not a trace or is locked.
    pub fn edit_trace<R>(&mut self, edit: impl FnOnce(&mut Trace) -> R) -> Option<R> {
        self.as_trace()?;
        self.mutate("trace edit", |g| match g {
            Geometry::Trace(t) => Some(edit(t)),
            _ => None,
        })
        .flatten()
    }

    pub fn edit_via<R>(&mut self, edit: impl FnOnce(&mut Via) -> R) -> Option<R> {
        self.as_via()?;
        self.mutate("via edit", |g| match g {
            Geometry::Via(v) => Some(edit(v)),
            _ => None,
        })
        .flatten()
    }

    pub fn edit_pad<R>(&mut self, edit: impl FnOnce(&mut Pad) -> R) -> Option<R> {
        self.as_pad()?;
        self.mutate("pad edit", |g| match g {
            Geometry::Pad(p) => Some(edit(p)),
            _ => None,
        })
        .flatten()
    }

    pub fn edit_component<R>(&mut self, edit: impl FnOnce(&mut Component) -> R) -> Option<R> {
        self.as_component()?;
        self.mutate("component edit", |g| match g {
            Geometry::Component(c) => Some(edit(c)),
            _ => None,
        })
        .flatten()
    }

    pub fn edit_polygon<R>(&mut self, edit: impl FnOnce(&mut Polygon) -> R) -> Option<R> {
        self.as_polygon()?;
        self.mutate("polygon edit", |g| match g {
            Geometry::Polygon(p) => Some(edit(p)),
            _ => None,
        })
        .flatten()
    }

    /// Recompute pour voids and thermal spokes against `objects`.
    ///
    /// Returns false for anything that is not a polygon. The fill is
    /// derived data, so locked pours are still recalculated and the
    /// bounding box is unaffected.
    pub fn recalculate_pour(&mut self, objects: &[PcbObject]) -> bool {
        match self.compute_pour(objects) {
            Some((fill, spokes)) => self.store_pour(fill, spokes),
            None => false,
        }
    }

    pub(crate) fn compute_pour(
        &self,
        objects: &[PcbObject],
    ) -> Option<(PourFill, Vec<ThermalSpoke>)> {
        let polygon = self.as_polygon()?;
        Some(polygon.compute_fill(&self.meta.id, &self.meta.layer, objects))
    }

    pub(crate) fn store_pour(&mut self, fill: PourFill, spokes: Vec<ThermalSpoke>) -> bool {
        match &mut self.geometry {
            Geometry::Polygon(p) => {
                p.store_fill(fill, spokes);
                true
            }
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Flags
    // ------------------------------------------------------------------

    pub fn set_visible(&mut self, visible: bool) {
        self.meta.visible = visible;
        self.touch();
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.meta.selected = selected;
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.meta.locked = locked;
        self.touch();
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.meta.properties.get(key)
    }

    pub fn property_or(&self, key: &str, default: Value) -> Value {
        self.meta.properties.get(key).cloned().unwrap_or(default)
    }

    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.meta.properties
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.meta.properties.insert(key.into(), value.into());
        self.touch();
    }

    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        let removed = self.meta.properties.remove(key);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Net name, if the object carries a non-empty one
    pub fn net(&self) -> Option<&str> {
        self.property(NET_PROPERTY)
            .and_then(Value::as_str)
            .filter(|net| !net.is_empty())
    }

    /// True when both objects carry the same non-empty net
    pub fn shares_net_with(&self, other: &PcbObject) -> bool {
        match (self.net(), other.net()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn bounding_box(&self) -> BoundingBox {
        *self
            .bounds
            .get_or_compute(|| self.geometry.bounding_box())
    }

    pub fn has_cached_bounds(&self) -> bool {
        self.bounds.is_valid()
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        self.geometry.contains_point(point)
    }

    /// Human-readable constraint problems; empty when the object is sound
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.meta.layer.trim().is_empty() {
            problems.push(format!("{} {} has no layer", self.kind(), self.meta.id));
        }
        if !self.position().is_finite() {
            problems.push(format!("{} {} has an invalid position", self.kind(), self.meta.id));
        }
        problems.extend(self.geometry.validate());
        problems
    }

    /// Named geometric anchors for snapping and measurement
    pub fn anchor_points(&self) -> Vec<Anchor> {
        match &self.geometry {
            Geometry::Trace(t) => vec![
                Anchor::new("start", t.start()),
                Anchor::new("end", t.end()),
                Anchor::new("midpoint", t.midpoint()),
            ],
            Geometry::Via(v) => vec![Anchor::new("center", v.center())],
            Geometry::Pad(p) => {
                let mut anchors = vec![Anchor::new("center", p.center())];
                if p.shape() != PadShape::Circle {
                    anchors.extend(corner_anchors(&p.bounding_box()));
                }
                anchors
            }
            Geometry::Component(c) => {
                let mut anchors = vec![Anchor::new("center", c.position())];
                anchors.extend(corner_anchors(&c.body()));
                for (i, pad) in c.pads().iter().enumerate() {
                    let name = match pad.number() {
                        Some(number) => format!("pad:{}", number),
                        None => format!("pad:#{}", i),
                    };
                    anchors.push(Anchor::new(name, c.pad_position(pad)));
                }
                anchors
            }
            Geometry::Polygon(p) => {
                let mut anchors = vec![Anchor::new("center", p.center())];
                anchors.extend(
                    p.boundary()
                        .iter()
                        .enumerate()
                        .map(|(i, pt)| Anchor::new(format!("vertex:{}", i), *pt)),
                );
                anchors
            }
        }
    }

    // ------------------------------------------------------------------
    // Derivation
    // ------------------------------------------------------------------

    /// Copy with a fresh identity and fresh timestamps
    pub fn duplicate(&self) -> PcbObject {
        self.derive(self.geometry.clone())
    }

    fn derive(&self, geometry: Geometry) -> PcbObject {
        let mut meta = ObjectMeta::new(self.meta.layer.clone());
        meta.rotation = self.meta.rotation;
        meta.visible = self.meta.visible;
        meta.locked = self.meta.locked;
        meta.properties = self.meta.properties.clone();
        PcbObject::from_parts(meta, geometry)
    }

    /// Split a trace at the projection of `point`, producing two new traces
    /// that inherit every property. `None` for non-trace objects.
    pub fn split_at(&self, point: &Point) -> Option<(PcbObject, PcbObject)> {
        let (first, second) = self.as_trace()?.split(point);
        Some((self.derive(first.into()), self.derive(second.into())))
    }

    pub(crate) fn apply_limits(&mut self, limits: ObjectLimits) {
        self.bounds.invalidate();
        self.geometry.apply_limits(limits);
    }
}

fn corner_anchors(bbox: &BoundingBox) -> Vec<Anchor> {
    let names = ["corner:bl", "corner:br", "corner:tr", "corner:tl"];
    names
        .iter()
        .zip(bbox.corners())
        .map(|(name, point)| Anchor::new(*name, point))
        .collect()
}
