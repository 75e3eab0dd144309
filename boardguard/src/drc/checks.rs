//! Per-object structural checks
//!
//! One entry point, [`check_object`], dispatching on the object's geometry.

use chrono::{DateTime, Utc};

use crate::drc::types::{Severity, Violation, ViolationType};
use crate::geometry::Point;
use crate::model::{Geometry, Pad, PcbObject, Polygon, Trace, Via};
use crate::rules::DesignRules;

/// Collects violations for a single object
struct Findings<'a> {
    object_id: &'a str,
    /// Part of the object the findings are about, if not the whole object
    subject: Option<String>,
    timestamp: DateTime<Utc>,
    out: &'a mut Vec<Violation>,
}

impl Findings<'_> {
    fn push(&mut self, kind: ViolationType, severity: Severity, message: String, position: Point) {
        let violation = Violation::new(
            kind,
            severity,
            message,
            vec![self.object_id.to_string()],
            position,
            self.timestamp,
        );
        self.out.push(match &self.subject {
            Some(subject) => violation.with_subject(subject),
            None => violation,
        });
    }
}

pub fn check_object(
    obj: &PcbObject,
    rules: &DesignRules,
    timestamp: DateTime<Utc>,
    out: &mut Vec<Violation>,
) {
    let mut findings = Findings {
        object_id: obj.id(),
        subject: None,
        timestamp,
        out,
    };

    match obj.geometry() {
        Geometry::Trace(trace) => check_trace(trace, rules, &mut findings),
        Geometry::Via(via) => check_via(via, rules, &mut findings),
        Geometry::Pad(pad) => check_pad(pad, pad.center(), rules, &mut findings),
        Geometry::Component(component) => {
            for (index, pad) in component.pads().iter().enumerate() {
                findings.subject = Some(sub_pad_key(pad, index));
                check_pad(pad, component.pad_position(pad), rules, &mut findings);
            }
        }
        Geometry::Polygon(polygon) => check_polygon(polygon, rules, &mut findings),
    }
}

/// `pad:<number>`, or `pad:#<index>` for unnumbered pads
fn sub_pad_key(pad: &Pad, index: usize) -> String {
    match pad.number() {
        Some(number) => format!("pad:{}", number),
        None => format!("pad:#{}", index),
    }
}

fn check_trace(trace: &Trace, rules: &DesignRules, findings: &mut Findings) {
    let at = trace.midpoint();

    if trace.width() < rules.min_trace_width {
        findings.push(
            ViolationType::MinTraceWidth,
            Severity::Error,
            format!(
                "Trace width {:.3}mm is below minimum {:.3}mm",
                trace.width(),
                rules.min_trace_width
            ),
            at,
        );
    }

    if trace.width() > rules.max_trace_width {
        findings.push(
            ViolationType::MaxTraceWidth,
            Severity::Warning,
            format!(
                "Trace width {:.3}mm exceeds maximum {:.3}mm",
                trace.width(),
                rules.max_trace_width
            ),
            at,
        );
    }

    if trace.length() < rules.min_trace_length {
        findings.push(
            ViolationType::ShortTrace,
            Severity::Warning,
            format!(
                "Trace length {:.4}mm is shorter than {:.4}mm",
                trace.length(),
                rules.min_trace_length
            ),
            at,
        );
    }
}

fn check_via(via: &Via, rules: &DesignRules, findings: &mut Findings) {
    let at = via.center();

    if via.outer_diameter() < rules.min_via_size {
        findings.push(
            ViolationType::MinViaSize,
            Severity::Error,
            format!(
                "Via diameter {:.3}mm is below minimum {:.3}mm",
                via.outer_diameter(),
                rules.min_via_size
            ),
            at,
        );
    }

    if via.outer_diameter() > rules.max_via_size {
        findings.push(
            ViolationType::MaxViaSize,
            Severity::Warning,
            format!(
                "Via diameter {:.3}mm exceeds maximum {:.3}mm",
                via.outer_diameter(),
                rules.max_via_size
            ),
            at,
        );
    }

    if via.drill_diameter() < rules.min_via_drill {
        findings.push(
            ViolationType::MinViaDrill,
            Severity::Error,
            format!(
                "Via drill {:.3}mm is below minimum {:.3}mm",
                via.drill_diameter(),
                rules.min_via_drill
            ),
            at,
        );
    }

    check_annular_ring(via.annular_ring(), "Via", at, rules, findings);
    check_aspect_ratio(via.drill_diameter(), "Via", at, rules, findings);
}

fn check_pad(pad: &Pad, at: Point, rules: &DesignRules, findings: &mut Findings) {
    let Some(drill) = pad.drill_diameter() else {
        return;
    };

    if drill < rules.min_drill_size {
        findings.push(
            ViolationType::MinDrillSize,
            Severity::Error,
            format!(
                "Pad drill {:.3}mm is below minimum {:.3}mm",
                drill, rules.min_drill_size
            ),
            at,
        );
    }

    if drill > rules.max_drill_size {
        findings.push(
            ViolationType::MaxDrillSize,
            Severity::Warning,
            format!(
                "Pad drill {:.3}mm exceeds maximum {:.3}mm",
                drill, rules.max_drill_size
            ),
            at,
        );
    }

    if let Some(ring) = pad.annular_ring() {
        check_annular_ring(ring, "Pad", at, rules, findings);
    }
    check_aspect_ratio(drill, "Pad", at, rules, findings);
}

fn check_annular_ring(ring: f64, what: &str, at: Point, rules: &DesignRules, findings: &mut Findings) {
    if ring < rules.min_annular_ring {
        findings.push(
            ViolationType::MinAnnularRing,
            Severity::Error,
            format!(
                "{} annular ring {:.3}mm is below minimum {:.3}mm",
                what, ring, rules.min_annular_ring
            ),
            at,
        );
    }
}

fn check_aspect_ratio(drill: f64, what: &str, at: Point, rules: &DesignRules, findings: &mut Findings) {
    if drill <= 0.0 {
        return;
    }
    let ratio = rules.board_thickness / drill;
    if ratio > rules.max_aspect_ratio {
        findings.push(
            ViolationType::AspectRatio,
            Severity::Warning,
            format!(
                "{} drill aspect ratio {:.1}:1 exceeds maximum {:.1}:1",
                what, ratio, rules.max_aspect_ratio
            ),
            at,
        );
    }
}

fn check_polygon(polygon: &Polygon, rules: &DesignRules, findings: &mut Findings) {
    let at = polygon.center();

    if !polygon.is_valid() {
        findings.push(
            ViolationType::InvalidPolygon,
            Severity::Error,
            format!(
                "Copper pour has {} boundary points; at least 3 are required",
                polygon.boundary().len()
            ),
            at,
        );
    }

    let settings = polygon.settings();
    if settings.thermal_relief && settings.spoke_width < rules.min_thermal_spoke_width {
        findings.push(
            ViolationType::ThermalSpokeWidth,
            Severity::Warning,
            format!(
                "Thermal spoke width {:.3}mm is below minimum {:.3}mm",
                settings.spoke_width, rules.min_thermal_spoke_width
            ),
            at,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, PourSettings};

    fn run(obj: &PcbObject, rules: &DesignRules) -> Vec<Violation> {
        let mut out = Vec::new();
        check_object(obj, rules, Utc::now(), &mut out);
        out
    }

    #[test]
    fn test_clean_trace_has_no_findings() {
        let obj = PcbObject::new("top", Trace::new(Point::new(0.0, 0.0), Point::new(5.0, 0.0), 0.2));
        assert!(run(&obj, &DesignRules::default()).is_empty());
    }

    #[test]
    fn test_wide_and_short_trace_warnings() {
        let rules = DesignRules {
            max_trace_width: 1.0,
            ..Default::default()
        };
        let obj = PcbObject::new("top", Trace::new(Point::new(0.0, 0.0), Point::new(0.001, 0.0), 2.0));
        let found = run(&obj, &rules);
        let kinds: Vec<_> = found.iter().map(|v| v.violation_type).collect();
        assert_eq!(kinds, vec![ViolationType::MaxTraceWidth, ViolationType::ShortTrace]);
        assert!(found.iter().all(|v| v.severity == Severity::Warning));
    }

    #[test]
    fn test_small_via_reports_size_drill_and_ring() {
        let obj = PcbObject::new("top", Via::new(Point::default(), 0.2, 0.12));
        let found = run(&obj, &DesignRules::default());
        let kinds: Vec<_> = found.iter().map(|v| v.violation_type).collect();
        assert!(kinds.contains(&ViolationType::MinViaSize));
        assert!(kinds.contains(&ViolationType::MinViaDrill));
        assert!(kinds.contains(&ViolationType::MinAnnularRing));
        // 1.6 / 0.12 = 13.3 > 10
        assert!(kinds.contains(&ViolationType::AspectRatio));
    }

    #[test]
    fn test_smd_pad_is_not_drill_checked() {
        let obj = PcbObject::new("top", Pad::rect(Point::default(), 0.1, 0.1));
        assert!(run(&obj, &DesignRules::default()).is_empty());
    }

    #[test]
    fn test_drilled_pad_ring() {
        let obj = PcbObject::new("top", Pad::circle(Point::default(), 1.0).with_drill(0.95));
        let found = run(&obj, &DesignRules::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].violation_type, ViolationType::MinAnnularRing);
        assert!(found[0].message.starts_with("Pad annular ring"));
    }

    #[test]
    fn test_component_pads_checked_at_board_position() {
        let comp = Component::new("J1", Point::new(10.0, 10.0), 5.0, 5.0)
            .with_pad(Pad::circle(Point::new(1.0, 0.0), 1.0).with_drill(0.1));
        let obj = PcbObject::new("top", comp);
        let found = run(&obj, &DesignRules::default());
        let drill = found
            .iter()
            .find(|v| v.violation_type == ViolationType::MinDrillSize)
            .unwrap();
        assert_eq!(drill.position, Point::new(11.0, 10.0));
        assert_eq!(drill.object_ids, vec![obj.id().to_string()]);
        assert_eq!(drill.id, format!("MIN_DRILL_SIZE:{}:pad:#0", obj.id()));
    }

    #[test]
    fn test_component_sub_pad_findings_have_unique_ids() {
        let comp = Component::new("J1", Point::new(0.0, 0.0), 5.0, 5.0)
            .with_pad(Pad::circle(Point::new(-1.0, 0.0), 1.0).with_drill(0.1).with_number("1"))
            .with_pad(Pad::circle(Point::new(1.0, 0.0), 1.0).with_drill(0.1).with_number("2"));
        let obj = PcbObject::new("top", comp);
        let found = run(&obj, &DesignRules::default());
        // MIN_DRILL_SIZE and ASPECT_RATIO for each pad
        assert_eq!(found.len(), 4);

        let mut ids: Vec<_> = found.iter().map(|v| v.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), found.len(), "duplicate violation ids: {:?}", ids);
        assert!(ids.contains(&format!("MIN_DRILL_SIZE:{}:pad:2", obj.id())));
    }

    #[test]
    fn test_polygon_checks() {
        let poly = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]).with_settings(
            PourSettings {
                spoke_width: 0.1,
                ..Default::default()
            },
        );
        let obj = PcbObject::new("top", poly);
        let kinds: Vec<_> = run(&obj, &DesignRules::default())
            .iter()
            .map(|v| v.violation_type)
            .collect();
        assert_eq!(
            kinds,
            vec![ViolationType::InvalidPolygon, ViolationType::ThermalSpokeWidth]
        );
    }
}
