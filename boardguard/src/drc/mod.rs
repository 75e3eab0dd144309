//! Design Rule Check engine
//!
//! A run clears the previous findings, performs structural checks on each
//! object and then checks every eligible pair for clearance.

pub mod checks;
pub mod pairs;
pub mod types;

pub use types::{DrcSummary, Severity, Violation, ViolationType};

use std::sync::atomic::AtomicBool;

use chrono::Utc;

use crate::model::PcbObject;
use crate::rules::DesignRules;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrcState {
    Idle,
    Running,
}

/// How the pairwise pass is performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairStrategy {
    BruteForce,
    Indexed,
}

/// Result of a run that may be interrupted
#[derive(Debug, Clone, PartialEq)]
pub struct DrcOutcome {
    pub violations: Vec<Violation>,
    pub cancelled: bool,
}

#[derive(Debug, Clone)]
pub struct DrcEngine {
    rules: DesignRules,
    enabled: bool,
    state: DrcState,
    violations: Vec<Violation>,
}

impl Default for DrcEngine {
    fn default() -> Self {
        Self::new(DesignRules::default())
    }
}

impl DrcEngine {
    pub fn new(rules: DesignRules) -> Self {
        Self {
            rules,
            enabled: true,
            state: DrcState::Idle,
            violations: Vec::new(),
        }
    }

    pub fn rules(&self) -> &DesignRules {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut DesignRules {
        &mut self.rules
    }

    pub fn set_rules(&mut self, rules: DesignRules) {
        self.rules = rules;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling keeps the last findings; runs return nothing until re-enabled
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn state(&self) -> DrcState {
        self.state
    }

    /// Findings of the last completed (or cancelled) run
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn summary(&self) -> DrcSummary {
        DrcSummary::from_violations(&self.violations)
    }

    /// Run all checks with the brute-force pairwise pass
    pub fn run(&mut self, objects: &[PcbObject]) -> Vec<Violation> {
        self.execute(objects, PairStrategy::BruteForce, None).violations
    }

    /// Run all checks, locating close pairs through an R-tree.
    /// Produces the same violations as [`DrcEngine::run`].
    pub fn run_indexed(&mut self, objects: &[PcbObject]) -> Vec<Violation> {
        self.execute(objects, PairStrategy::Indexed, None).violations
    }

    /// Brute-force run that stops as soon as `cancel` is observed set.
    /// Findings gathered before the stop are kept.
    pub fn run_cancellable(&mut self, objects: &[PcbObject], cancel: &AtomicBool) -> DrcOutcome {
        self.execute(objects, PairStrategy::BruteForce, Some(cancel))
    }

    fn execute(
        &mut self,
        objects: &[PcbObject],
        strategy: PairStrategy,
        cancel: Option<&AtomicBool>,
    ) -> DrcOutcome {
        if !self.enabled {
            tracing::debug!("DRC is disabled, skipping run over {} objects", objects.len());
            return DrcOutcome {
                violations: Vec::new(),
                cancelled: false,
            };
        }

        self.state = DrcState::Running;
        self.violations.clear();
        let timestamp = Utc::now();
        let mut found = Vec::new();

        let mut completed = true;
        for obj in objects {
            if is_cancelled(cancel) {
                completed = false;
                break;
            }
            checks::check_object(obj, &self.rules, timestamp, &mut found);
        }

        if completed {
            completed = match strategy {
                PairStrategy::BruteForce => {
                    pairs::check_all_pairs(objects, &self.rules, timestamp, cancel, &mut found)
                }
                PairStrategy::Indexed => {
                    pairs::check_pairs_indexed(objects, &self.rules, timestamp, &mut found);
                    true
                }
            };
        }

        self.violations = found;
        self.state = DrcState::Idle;

        let summary = self.summary();
        if completed {
            tracing::info!(
                "DRC finished: {} objects, {} errors, {} warnings",
                objects.len(),
                summary.errors,
                summary.warnings
            );
        } else {
            tracing::warn!(
                "DRC cancelled after {} findings over {} objects",
                summary.total(),
                objects.len()
            );
        }

        DrcOutcome {
            violations: self.violations.clone(),
            cancelled: !completed,
        }
    }
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(std::sync::atomic::Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::model::{Pad, Trace, Via};

    fn close_pads(net_a: Option<&str>, net_b: Option<&str>) -> Vec<PcbObject> {
        let with = |obj: PcbObject, net: Option<&str>| match net {
            Some(net) => obj.with_net(net),
            None => obj,
        };
        vec![
            with(PcbObject::new("top", Pad::rect(Point::new(0.0, 0.0), 0.5, 0.5)), net_a),
            with(PcbObject::new("top", Pad::rect(Point::new(0.1, 0.0), 0.5, 0.5)), net_b),
        ]
    }

    fn clearance_count(violations: &[Violation]) -> usize {
        violations
            .iter()
            .filter(|v| v.violation_type == ViolationType::ClearanceViolation)
            .count()
    }

    #[test]
    fn test_shared_net_is_exempt() {
        let mut engine = DrcEngine::default();
        assert_eq!(clearance_count(&engine.run(&close_pads(Some("GND"), Some("GND")))), 0);
        assert_eq!(clearance_count(&engine.run(&close_pads(None, None))), 1);
        assert_eq!(clearance_count(&engine.run(&close_pads(Some("GND"), Some("VCC")))), 1);
        assert_eq!(clearance_count(&engine.run(&close_pads(Some(""), Some("")))), 1);
    }

    #[test]
    fn test_narrow_trace_reports_once() {
        let mut engine = DrcEngine::default();
        let objects = vec![PcbObject::new(
            "top",
            Trace::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 0.10),
        )];
        let violations = engine.run(&objects);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::MinTraceWidth);
        assert_eq!(violations[0].severity, Severity::Error);
    }

    #[test]
    fn test_thin_via_ring_reports_once() {
        let mut engine = DrcEngine::default();
        let objects = vec![PcbObject::new("top", Via::new(Point::default(), 0.30, 0.25))];
        let violations = engine.run(&objects);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::MinAnnularRing);
    }

    #[test]
    fn test_disabled_engine_keeps_stored_findings() {
        let mut engine = DrcEngine::default();
        let objects = close_pads(None, None);
        let first = engine.run(&objects);
        assert_eq!(first.len(), 1);

        engine.set_enabled(false);
        assert!(engine.run(&objects).is_empty());
        assert_eq!(engine.violations(), first.as_slice());

        engine.set_enabled(true);
        let again = engine.run(&objects);
        assert_eq!(again.len(), 1);
        assert!(again[0].same_finding(&first[0]));
    }

    #[test]
    fn test_runs_are_idempotent() {
        let mut engine = DrcEngine::default();
        let mut objects = close_pads(None, None);
        objects.push(PcbObject::new("top", Via::new(Point::new(5.0, 5.0), 0.30, 0.25)));

        let first = engine.run(&objects);
        let second = engine.run(&objects);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert!(a.same_finding(b));
        }
        assert_eq!(engine.state(), DrcState::Idle);
    }

    #[test]
    fn test_indexed_run_matches() {
        let mut engine = DrcEngine::default();
        let mut objects = close_pads(None, Some("A"));
        objects.push(PcbObject::new("bottom", Via::new(Point::new(0.05, 0.1), 0.6, 0.3)));
        objects.push(PcbObject::new(
            "top",
            Trace::new(Point::new(-1.0, 0.0), Point::new(1.0, 0.0), 0.1),
        ));

        let brute = engine.run(&objects);
        let indexed = engine.run_indexed(&objects);
        assert_eq!(brute.len(), indexed.len());
        for (a, b) in brute.iter().zip(&indexed) {
            assert!(a.same_finding(b));
        }
    }

    #[test]
    fn test_cancel_before_start() {
        let mut engine = DrcEngine::default();
        let cancel = AtomicBool::new(true);
        let outcome = engine.run_cancellable(&close_pads(None, None), &cancel);
        assert!(outcome.cancelled);
        assert!(outcome.violations.is_empty());
        assert_eq!(engine.state(), DrcState::Idle);

        let outcome = engine.run_cancellable(&close_pads(None, None), &AtomicBool::new(false));
        assert!(!outcome.cancelled);
        assert_eq!(outcome.violations.len(), 1);
    }

    #[test]
    fn test_summary_tracks_last_run() {
        let mut engine = DrcEngine::default();
        let objects = vec![PcbObject::new(
            "top",
            Trace::new(Point::new(0.0, 0.0), Point::new(0.001, 0.0), 0.10),
        )];
        engine.run(&objects);
        let summary = engine.summary();
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 1);
    }
}
