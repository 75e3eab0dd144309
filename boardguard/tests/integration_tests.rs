//! Integration tests for BoardGuard library

use boardguard::prelude::*;
use boardguard::ObjectLimits;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn types(result: &ValidationResult) -> Vec<ViolationType> {
    result.violations.iter().map(|v| v.violation_type).collect()
}

#[test]
fn test_validate_clean_board() {
    let result = BoardGuardCore::validate_board(
        &fixture_path("clean.pcb.json"),
        &ValidationOptions::default(),
    )
    .expect("Clean board should load");

    assert_eq!(result.stats.objects, 6);
    assert_eq!(
        result.total_issues(),
        0,
        "Clean board should have no violations: {:?}",
        result.violations.iter().map(|v| &v.message).collect::<Vec<_>>()
    );
}

#[test]
fn test_validate_board_with_violations() {
    let result = BoardGuardCore::validate_board(
        &fixture_path("violations.pcb.json"),
        &ValidationOptions::default(),
    )
    .unwrap();

    assert_eq!(
        types(&result),
        vec![
            ViolationType::MinTraceWidth,
            ViolationType::MinAnnularRing,
            ViolationType::ClearanceViolation,
        ]
    );
    assert!(result.has_errors());
    assert_eq!(result.stats.errors, 3);
    assert_eq!(result.stats.warnings, 0);

    let clearance = &result.violations[2];
    assert_eq!(clearance.id, "CLEARANCE_VIOLATION:pad_a:pad_b");
    assert_eq!(clearance.object_ids, vec!["pad_a", "pad_b"]);
}

#[test]
fn test_shared_net_pads_are_exempt() {
    let result = BoardGuardCore::validate_board(
        &fixture_path("same_net.pcb.json"),
        &ValidationOptions::default(),
    )
    .unwrap();
    assert_eq!(result.total_issues(), 0);
}

#[test]
fn test_warnings_do_not_count_as_errors() {
    let result = BoardGuardCore::validate_board(
        &fixture_path("warnings_only.pcb.json"),
        &ValidationOptions::default(),
    )
    .unwrap();
    assert_eq!(types(&result), vec![ViolationType::ShortTrace]);
    assert!(!result.has_errors());
    assert!(result.has_warnings_or_errors());
}

#[test]
fn test_bad_records_are_skipped() {
    let result = BoardGuardCore::validate_board(
        &fixture_path("mixed_records.pcb.json"),
        &ValidationOptions::default(),
    )
    .unwrap();
    assert_eq!(result.stats.objects, 2);
    assert_eq!(result.total_issues(), 0);
}

#[test]
fn test_rules_file_and_preset() {
    let strict = ValidationOptions {
        rules_file: Some(fixture_path("strict_rules.json")),
        ..Default::default()
    };
    let result = BoardGuardCore::validate_board(&fixture_path("clean.pcb.json"), &strict).unwrap();
    assert_eq!(types(&result), vec![ViolationType::MinTraceWidth]);
    assert_eq!(result.violations[0].object_ids, vec!["t1"]);

    let relaxed = ValidationOptions {
        preset: Some(RulePreset::Aggressive),
        ..Default::default()
    };
    let result =
        BoardGuardCore::validate_board(&fixture_path("violations.pcb.json"), &relaxed).unwrap();
    // 0.10 trace passes the 0.09 minimum, 0.15 pad spacing passes 0.1
    assert_eq!(types(&result), vec![ViolationType::MinAnnularRing]);
}

#[test]
fn test_indexed_validation_matches() {
    for name in [
        "clean.pcb.json",
        "violations.pcb.json",
        "same_net.pcb.json",
        "warnings_only.pcb.json",
        "mixed_records.pcb.json",
    ] {
        let board = Board::from_json_file(&fixture_path(name), ObjectLimits::default()).unwrap();
        let rules = DesignRules::default();
        let brute = BoardGuardCore::validate_loaded(&fixture_path(name), &board, rules.clone(), false);
        let indexed = BoardGuardCore::validate_loaded(&fixture_path(name), &board, rules, true);

        assert_eq!(brute.stats, indexed.stats, "{}", name);
        for (a, b) in brute.violations.iter().zip(&indexed.violations) {
            assert!(a.same_finding(b), "{}: {:?} vs {:?}", name, a, b);
        }
    }
}

#[test]
fn test_validate_project() {
    let results =
        BoardGuardCore::validate_project(&fixture_path("project"), &ValidationOptions::default())
            .unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].file.ends_with("main.pcb.json"));
    assert_eq!(results[0].total_issues(), 0);
    assert_eq!(results[1].stats.errors, 3);
}

#[test]
fn test_missing_file_is_error() {
    let result = BoardGuardCore::validate_board(
        &fixture_path("does_not_exist.pcb.json"),
        &ValidationOptions::default(),
    );
    assert!(matches!(result, Err(BoardGuardError::Io(_))));
}
