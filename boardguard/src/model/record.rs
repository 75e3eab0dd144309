//! Serialized object records
//!
//! The flat record consumed by persistence and undo collaborators:
//!
//! ```json
//! {
//!   "type": "via",
//!   "id": "0b5e...",
//!   "layer": "top",
//!   "rotation": 0.0,
//!   "visible": true,
//!   "selected": false,
//!   "locked": false,
//!   "properties": { "net": "GND" },
//!   "createdAt": "2024-05-01T10:00:00Z",
//!   "modifiedAt": "2024-05-01T10:00:00Z",
//!   "geometry": { "center": {"x": 1.0, "y": 2.0}, "outerDiameter": 0.6, ... }
//! }
//! ```
//!
//! Derived data (bounding boxes, pour fills, thermal spokes) is never
//! stored; it is regenerated after loading.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{
    Component, Geometry, ObjectKind, ObjectLimits, ObjectMeta, Pad, PcbObject, Polygon, Trace,
    Via,
};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Unknown object type '{0}'")]
    UnknownType(String),
    #[error("Record is missing a type tag")]
    MissingType,
    #[error("Invalid {kind} record: {source}")]
    Invalid {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub layer: String,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub geometry: Value,
}

/// Plain data structs always serialize; `Null` only guards the signature
fn to_json<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn from_json<T: DeserializeOwned>(kind: ObjectKind, value: Value) -> Result<T, RecordError> {
    serde_json::from_value(value).map_err(|source| RecordError::Invalid {
        kind: kind.to_string(),
        source,
    })
}

impl PcbObject {
    pub fn serialize(&self) -> ObjectRecord {
        let geometry = match &self.geometry {
            Geometry::Trace(t) => to_json(t),
            Geometry::Via(v) => to_json(v),
            Geometry::Pad(p) => to_json(p),
            Geometry::Component(c) => to_json(c),
            Geometry::Polygon(p) => to_json(p),
        };
        let meta = &self.meta;
        ObjectRecord {
            kind: self.kind().as_str().to_string(),
            id: meta.id.clone(),
            layer: meta.layer.clone(),
            rotation: meta.rotation,
            visible: meta.visible,
            selected: meta.selected,
            locked: meta.locked,
            properties: meta.properties.clone(),
            created_at: meta.created_at,
            modified_at: meta.modified_at,
            geometry,
        }
    }

    /// Rebuild an object from its record, dispatching on the type tag.
    /// Geometry is re-clamped against `limits`.
    pub fn deserialize(record: ObjectRecord, limits: &ObjectLimits) -> Result<PcbObject, RecordError> {
        let kind = ObjectKind::from_tag(&record.kind)
            .ok_or_else(|| RecordError::UnknownType(record.kind.clone()))?;

        let geometry = match kind {
            ObjectKind::Trace => Geometry::Trace(from_json::<Trace>(kind, record.geometry)?),
            ObjectKind::Via => Geometry::Via(from_json::<Via>(kind, record.geometry)?),
            ObjectKind::Pad => Geometry::Pad(from_json::<Pad>(kind, record.geometry)?),
            ObjectKind::Component => {
                Geometry::Component(from_json::<Component>(kind, record.geometry)?)
            }
            ObjectKind::Polygon => Geometry::Polygon(from_json::<Polygon>(kind, record.geometry)?),
        };

        let meta = ObjectMeta {
            id: record.id,
            layer: record.layer,
            rotation: record.rotation,
            visible: record.visible,
            selected: record.selected,
            locked: record.locked,
            properties: record.properties,
            created_at: record.created_at,
            modified_at: record.modified_at,
        };

        let mut object = PcbObject::from_parts(meta, geometry);
        object.apply_limits(*limits);
        Ok(object)
    }

    /// Deserialize from an untyped JSON value
    pub fn from_json_value(value: Value, limits: &ObjectLimits) -> Result<PcbObject, RecordError> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(RecordError::MissingType)?
            .to_string();
        let kind = ObjectKind::from_tag(&tag).ok_or(RecordError::UnknownType(tag))?;
        let record: ObjectRecord = from_json(kind, value)?;
        PcbObject::deserialize(record, limits)
    }
}
