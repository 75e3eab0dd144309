//! DRC data types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    MinTraceWidth,
    MaxTraceWidth,
    ShortTrace,
    MinViaSize,
    MaxViaSize,
    MinViaDrill,
    MinAnnularRing,
    MinDrillSize,
    MaxDrillSize,
    AspectRatio,
    InvalidPolygon,
    ThermalSpokeWidth,
    ClearanceViolation,
}

impl ViolationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationType::MinTraceWidth => "MIN_TRACE_WIDTH",
            ViolationType::MaxTraceWidth => "MAX_TRACE_WIDTH",
            ViolationType::ShortTrace => "SHORT_TRACE",
            ViolationType::MinViaSize => "MIN_VIA_SIZE",
            ViolationType::MaxViaSize => "MAX_VIA_SIZE",
            ViolationType::MinViaDrill => "MIN_VIA_DRILL",
            ViolationType::MinAnnularRing => "MIN_ANNULAR_RING",
            ViolationType::MinDrillSize => "MIN_DRILL_SIZE",
            ViolationType::MaxDrillSize => "MAX_DRILL_SIZE",
            ViolationType::AspectRatio => "ASPECT_RATIO",
            ViolationType::InvalidPolygon => "INVALID_POLYGON",
            ViolationType::ThermalSpokeWidth => "THERMAL_SPOKE_WIDTH",
            ViolationType::ClearanceViolation => "CLEARANCE_VIOLATION",
        }
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single design rule violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// Derived from the type and implicated objects, stable across runs
    pub id: String,
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    pub severity: Severity,
    pub message: String,
    pub object_ids: Vec<String>,
    pub position: Point,
    pub timestamp: DateTime<Utc>,
}

impl Violation {
    pub fn new(
        violation_type: ViolationType,
        severity: Severity,
        message: String,
        object_ids: Vec<String>,
        position: Point,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let id = std::iter::once(violation_type.as_str().to_string())
            .chain(object_ids.iter().cloned())
            .collect::<Vec<_>>()
            .join(":");
        Self {
            id,
            violation_type,
            severity,
            message,
            object_ids,
            position,
            timestamp,
        }
    }

    /// Narrow the id to one part of the implicated object, e.g. a
    /// component's sub-pad
    pub fn with_subject(mut self, subject: &str) -> Self {
        self.id.push(':');
        self.id.push_str(subject);
        self
    }

    /// Equal in everything except when it was found
    pub fn same_finding(&self, other: &Violation) -> bool {
        self.id == other.id
            && self.violation_type == other.violation_type
            && self.severity == other.severity
            && self.message == other.message
            && self.object_ids == other.object_ids
            && self.position == other.position
    }

    pub fn involves(&self, object_id: &str) -> bool {
        self.object_ids.iter().any(|id| id == object_id)
    }
}

/// Violation counts for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DrcSummary {
    pub errors: usize,
    pub warnings: usize,
}

impl DrcSummary {
    pub fn from_violations(violations: &[Violation]) -> Self {
        violations
            .iter()
            .fold(Self::default(), |mut summary, v| {
                match v.severity {
                    Severity::Error => summary.errors += 1,
                    Severity::Warning => summary.warnings += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings
    }
}
