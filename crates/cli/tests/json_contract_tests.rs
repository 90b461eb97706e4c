// Integration tests enforcing the --json stdout contract.
//
// These tests guarantee that stdout from --json commands is:
//   1. Valid JSON
//   2. Exactly one JSON value (no report text mixed in)
//   3. The correct shape for its command
//
// Run with: cargo test -p citedate-cli --test json_contract_tests -- --nocapture

use std::fs;
use std::path::Path;
use std::process::Command;

const MESSY: &str = include_str!("fixtures/marriages_messy.csv");

fn citedate(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_citedate"));
    cmd.current_dir(dir)
        .env_remove("CITEDATE_CONFIG")
        .env_remove("CITEDATE_LOG");
    cmd
}

/// Assert stdout is a single, parseable JSON value.
fn assert_single_json(stdout: &[u8]) -> serde_json::Value {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");

    serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!("stdout must be valid JSON.\nParse error: {}\nstdout:\n{}", e, trimmed)
    })
}

fn run_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = citedate(dir).args(args).arg("--json").output().unwrap();
    assert!(
        output.status.success(),
        "exit code: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    assert_single_json(&output.stdout)
}

#[test]
fn clean_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("MarriagePaticipantsTable_Messy.csv"), MESSY).unwrap();

    let val = run_json(dir.path(), &["clean"]);
    assert_eq!(val["meta"]["command"], "clean");
    assert_eq!(val["summary"]["total_citations"], 6);
    assert_eq!(val["summary"]["inconsistent_citations"], 3);
    assert_eq!(val["validation"]["ok"], true);
    assert_eq!(val["statistics"]["rows"], 16);
    assert_eq!(val["analysis"]["distributions"][0]["citation"], "7");

    let inconsistencies = val["inconsistencies"].as_array().unwrap();
    let cited: Vec<&str> = inconsistencies
        .iter()
        .map(|i| i["citation"].as_str().unwrap())
        .collect();
    assert_eq!(cited, ["101", "20", "103"]);
    assert_eq!(inconsistencies[1]["is_tie"], true);
}

#[test]
fn run_json_has_every_stage() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("MarriagePaticipantsTable_Messy.csv"), MESSY).unwrap();

    let val = run_json(dir.path(), &["run"]);
    assert_eq!(val["meta"]["command"], "run");
    assert!(val.get("convert").is_none());
    assert_eq!(val["changes"]["changed_rows"], 4);
    assert_eq!(val["iso"]["converted"], 11);
    assert_eq!(val["iso"]["failures"].as_array().unwrap().len(), 5);
    assert_eq!(val["iso"]["failed_values"], serde_json::json!(["31.02.1874", "unknown"]));
    assert_eq!(val["verify"]["corrected_rows"], 4);
    assert_eq!(val["written"].as_array().unwrap().len(), 2);
}

#[test]
fn config_show_json_shape() {
    let dir = tempfile::tempdir().unwrap();
    let val = run_json(dir.path(), &["config", "show"]);
    assert_eq!(val["source"], serde_json::Value::Null);
    assert_eq!(val["config"]["columns"]["iso"], "Date_ISO");
    assert_eq!(val["config"]["report"]["sample_rows"], 15);
}
