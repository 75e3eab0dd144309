//! Pairwise clearance checks
//!
//! Distances are center to center. The brute-force pass visits every
//! unordered pair; the indexed pass only visits pairs whose centers an
//! R-tree reports within the largest clearance threshold, then checks them
//! in the same order so both produce identical output.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::drc::types::{Severity, Violation, ViolationType};
use crate::model::{ObjectKind, PcbObject};
use crate::rules::DesignRules;

/// Through-board features interact across layers
fn passes_through(obj: &PcbObject) -> bool {
    obj.kind() == ObjectKind::Via || obj.is_drilled_pad()
}

pub fn is_eligible(a: &PcbObject, b: &PcbObject) -> bool {
    a.layer() == b.layer() || passes_through(a) || passes_through(b)
}

/// Clearance required between two objects: via, then pad, then generic
pub fn clearance_threshold(a: &PcbObject, b: &PcbObject, rules: &DesignRules) -> f64 {
    let either = |kind: ObjectKind| a.kind() == kind || b.kind() == kind;
    if either(ObjectKind::Via) {
        rules.min_via_clearance
    } else if either(ObjectKind::Pad) {
        rules.min_pad_clearance
    } else {
        rules.min_clearance
    }
}

fn largest_threshold(rules: &DesignRules) -> f64 {
    rules
        .min_via_clearance
        .max(rules.min_pad_clearance)
        .max(rules.min_clearance)
}

pub fn check_pair(
    a: &PcbObject,
    b: &PcbObject,
    rules: &DesignRules,
    timestamp: DateTime<Utc>,
) -> Option<Violation> {
    if !is_eligible(a, b) || a.shares_net_with(b) {
        return None;
    }

    let (pa, pb) = (a.position(), b.position());
    let distance = pa.distance_to(&pb);
    let required = clearance_threshold(a, b, rules);
    // NaN distances compare false and never report
    if !(distance < required) {
        return None;
    }

    Some(Violation::new(
        ViolationType::ClearanceViolation,
        Severity::Error,
        format!(
            "Clearance {:.3}mm between {} and {} is below minimum {:.3}mm",
            distance,
            a.kind(),
            b.kind(),
            required
        ),
        vec![a.id().to_string(), b.id().to_string()],
        pa.midpoint(&pb),
        timestamp,
    ))
}

/// Check every unordered pair. Returns false if `cancel` was raised before
/// the pass finished.
pub fn check_all_pairs(
    objects: &[PcbObject],
    rules: &DesignRules,
    timestamp: DateTime<Utc>,
    cancel: Option<&AtomicBool>,
    out: &mut Vec<Violation>,
) -> bool {
    for (i, a) in objects.iter().enumerate() {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return false;
        }
        for b in &objects[i + 1..] {
            out.extend(check_pair(a, b, rules, timestamp));
        }
    }
    true
}

/// An object center stored in the R-tree, tagged with its slice index
#[derive(Debug, Clone, Copy)]
struct IndexedCenter {
    index: usize,
    center: [f64; 2],
}

impl RTreeObject for IndexedCenter {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.center)
    }
}

impl PointDistance for IndexedCenter {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.center[0] - point[0];
        let dy = self.center[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Same result as [`check_all_pairs`], using an R-tree to skip pairs that
/// are too far apart to violate any clearance threshold.
pub fn check_pairs_indexed(
    objects: &[PcbObject],
    rules: &DesignRules,
    timestamp: DateTime<Utc>,
    out: &mut Vec<Violation>,
) {
    // Non-finite centers can never be closer than a threshold
    let centers: Vec<IndexedCenter> = objects
        .iter()
        .enumerate()
        .filter_map(|(index, obj)| {
            let p = obj.position();
            p.is_finite().then_some(IndexedCenter {
                index,
                center: [p.x, p.y],
            })
        })
        .collect();

    let radius = largest_threshold(rules);
    if !(radius > 0.0) {
        return;
    }
    // Padding keeps pairs right at the threshold inside the query
    let radius_2 = (radius * (1.0 + 1e-9)).powi(2);

    let tree = RTree::bulk_load(centers.clone());
    let mut candidates: Vec<(usize, usize)> = Vec::new();
    for c in &centers {
        for neighbor in tree.locate_within_distance(c.center, radius_2) {
            if neighbor.index > c.index {
                candidates.push((c.index, neighbor.index));
            }
        }
    }
    candidates.sort_unstable();
    candidates.dedup();

    tracing::debug!(
        "Indexed clearance pass: {} candidate pairs out of {} objects",
        candidates.len(),
        objects.len()
    );

    for (i, j) in candidates {
        out.extend(check_pair(&objects[i], &objects[j], rules, timestamp));
    }
}
