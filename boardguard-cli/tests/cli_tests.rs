//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the boardguard-cli binary (finds it in target/debug when run via cargo test).
fn boardguard_cli() -> Command {
    cargo_bin_cmd!("boardguard-cli")
}

/// Path to boardguard library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("boardguard")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = boardguard_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("design rule"));
}

#[test]
fn test_cli_version() {
    let mut cmd = boardguard_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_check_clean_board() {
    let mut cmd = boardguard_cli();
    let path = fixtures_dir().join("clean.pcb.json");

    cmd.arg("check").arg(path).arg("--fail-on").arg("warning");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No violations found"));
}

#[test]
fn test_cli_check_reports_violations() {
    let mut cmd = boardguard_cli();
    let path = fixtures_dir().join("violations.pcb.json");

    cmd.arg("check").arg(path);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ERRORS"))
        .stdout(predicate::str::contains("MIN_TRACE_WIDTH"))
        .stdout(predicate::str::contains("MIN_ANNULAR_RING"))
        .stdout(predicate::str::contains("CLEARANCE_VIOLATION"));
}

#[test]
fn test_cli_fail_on_levels() {
    let warnings = fixtures_dir().join("warnings_only.pcb.json");

    let mut cmd = boardguard_cli();
    cmd.arg("check").arg(&warnings).arg("--fail-on").arg("error");
    cmd.assert().code(0);

    let mut cmd = boardguard_cli();
    cmd.arg("check").arg(&warnings).arg("--fail-on").arg("warning");
    cmd.assert().code(1);

    let mut cmd = boardguard_cli();
    cmd.arg("check")
        .arg(fixtures_dir().join("violations.pcb.json"))
        .arg("--fail-on")
        .arg("error");
    cmd.assert().code(1);
}

#[test]
fn test_cli_check_json_output() {
    let mut cmd = boardguard_cli();
    let path = fixtures_dir().join("violations.pcb.json");

    let output = cmd
        .arg("check")
        .arg(path)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["errors"], 3);
    let violations = json["results"][0]["violations"].as_array().unwrap();
    assert_eq!(violations[0]["type"], "MIN_TRACE_WIDTH");
    assert_eq!(violations[2]["id"], "CLEARANCE_VIOLATION:pad_a:pad_b");
}

#[test]
fn test_cli_github_format() {
    let mut cmd = boardguard_cli();
    let path = fixtures_dir().join("violations.pcb.json");

    cmd.arg("check").arg(path).arg("--format").arg("github");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("::error file="))
        .stdout(predicate::str::contains("title=MIN_ANNULAR_RING"));
}

#[test]
fn test_cli_rules_file_and_overrides() {
    let clean = fixtures_dir().join("clean.pcb.json");

    let mut cmd = boardguard_cli();
    cmd.arg("check")
        .arg(&clean)
        .arg("--rules")
        .arg(fixtures_dir().join("strict_rules.json"))
        .arg("--fail-on")
        .arg("error");
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("MIN_TRACE_WIDTH"));

    let mut cmd = boardguard_cli();
    cmd.arg("check")
        .arg(&clean)
        .arg("--set")
        .arg("minTraceWidth=0.28")
        .arg("--fail-on")
        .arg("error");
    cmd.assert().code(1);
}

#[test]
fn test_cli_rejects_unknown_override() {
    let mut cmd = boardguard_cli();
    cmd.arg("check")
        .arg(fixtures_dir().join("clean.pcb.json"))
        .arg("--set")
        .arg("minUnicornSpacing=1");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown rule"));
}

#[test]
fn test_cli_preset_and_indexed() {
    let mut cmd = boardguard_cli();
    cmd.arg("check")
        .arg(fixtures_dir().join("violations.pcb.json"))
        .arg("--preset")
        .arg("aggressive")
        .arg("--indexed")
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("MIN_ANNULAR_RING"))
        .stdout(predicate::str::contains("CLEARANCE_VIOLATION").not());
}

#[test]
fn test_cli_check_nonexistent_file() {
    let mut cmd = boardguard_cli();

    cmd.arg("check").arg("does_not_exist.pcb.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_check_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pcb.json");
    std::fs::write(&path, "[{\"type\": ").unwrap();

    let mut cmd = boardguard_cli();
    cmd.arg("check").arg(&path);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("JSON error"));
}

#[test]
fn test_cli_skipped_records_are_logged() {
    let mut cmd = boardguard_cli();
    cmd.arg("check").arg(fixtures_dir().join("mixed_records.pcb.json"));

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("keepout"));
}

#[test]
fn test_cli_project_command() {
    let mut cmd = boardguard_cli();

    cmd.arg("project").arg(fixtures_dir().join("project"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("main.pcb.json"))
        .stdout(predicate::str::contains("power.pcb.json"));

    let mut cmd = boardguard_cli();
    cmd.arg("project")
        .arg(fixtures_dir().join("project"))
        .arg("--fail-on")
        .arg("error");
    cmd.assert().code(1);
}

#[test]
fn test_cli_project_empty_dir() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = boardguard_cli();
    cmd.arg("project").arg(dir.path()).arg("--format").arg("json");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"total_files\": 0"));
}

#[test]
fn test_cli_rules_command() {
    let mut cmd = boardguard_cli();

    cmd.arg("rules");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("minTraceWidth"))
        .stdout(predicate::str::contains("boardThickness"));
}

#[test]
fn test_cli_rules_preset_details() {
    let mut cmd = boardguard_cli();

    cmd.arg("rules").arg("--preset").arg("conservative").arg("--details");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("conservative preset"))
        .stdout(predicate::str::contains("0.6"))
        .stdout(predicate::str::contains("Copper left around"));
}

#[test]
fn test_cli_output_formats_are_different() {
    let path = fixtures_dir().join("violations.pcb.json");

    let human_output = boardguard_cli()
        .arg("check")
        .arg(&path)
        .arg("--format")
        .arg("human")
        .output()
        .unwrap();

    let json_output = boardguard_cli()
        .arg("check")
        .arg(&path)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert_ne!(human_output.stdout, json_output.stdout);
}
