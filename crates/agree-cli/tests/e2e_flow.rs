//! End-to-end tests driving the `agree` binary on schema files.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn agree_binary() -> String {
    env!("CARGO_BIN_EXE_agree").to_string()
}

/// Runs `agree` with an isolated home so that no user config is picked up.
fn run_agree(home: &Path, args: &[&str]) -> Output {
    Command::new(agree_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run agree")
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const ANALYSIS: &str = r#"{
  "id": "analysis",
  "partitions": [
    {"id": "S", "labels": [
      {"offset": 0, "duration": 4, "kind": "pattern", "tag": "subject"},
      {"offset": 10, "duration": 4, "kind": "pattern", "tag": "answer"},
      {"offset": 20, "kind": "cadence", "tag": "PAC"}
    ]}
  ]
}"#;

const REFERENCE: &str = r#"{
  "id": "reference",
  "partitions": [
    {"id": "S", "labels": [
      {"offset": 0, "duration": 4, "kind": "pattern", "tag": "subject"},
      {"offset": 11, "duration": 4, "kind": "pattern", "tag": "subject"},
      {"offset": 20, "kind": "cadence", "tag": "PAC"}
    ]}
  ]
}"#;

fn fixtures(temp: &TempDir) -> (String, String) {
    let analysis = write_file(temp.path(), "analysis.json", ANALYSIS);
    let reference = write_file(temp.path(), "reference.json", REFERENCE);
    (
        analysis.to_string_lossy().into_owned(),
        reference.to_string_lossy().into_owned(),
    )
}

#[test]
fn test_compare_text_report() {
    let temp = TempDir::new().unwrap();
    let (analysis, reference) = fixtures(&temp);

    let output = run_agree(temp.path(), &["compare", &analysis, &reference]);
    assert!(
        output.status.success(),
        "agree compare should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("==> analysis vs reference  (start delta: 0, end delta: 0)"));
    assert!(stdout.contains(
        "    pattern  ==> TP:   1   FP:   1   FN:   1  sens:  1/  2   50.0%  prec:  1/  2   50.0%  F1: 0.500"
    ));
    assert!(stdout.contains("    cadence  ==> TP:   1   FP:   0   FN:   0"));
}

#[test]
fn test_compare_start_delta_from_flag() {
    let temp = TempDir::new().unwrap();
    let (analysis, reference) = fixtures(&temp);

    // A start tolerance alone does not absorb a shifted end.
    let output = run_agree(
        temp.path(),
        &["compare", "--start-delta", "1", &analysis, &reference],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("    pattern  ==> TP:   1   FP:   1   FN:   1"));

    let output = run_agree(
        temp.path(),
        &[
            "compare",
            "--start-delta",
            "1",
            "--end-delta",
            "1",
            &analysis,
            &reference,
        ],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(start delta: 1, end delta: 1)"));
    assert!(stdout.contains("    pattern  ==> TP:   2   FP:   0   FN:   0"));
}

#[test]
fn test_compare_nan_end_delta_is_rejected() {
    let temp = TempDir::new().unwrap();
    let (analysis, _) = fixtures(&temp);

    let output = run_agree(
        temp.path(),
        &["compare", "--end-delta", "NaN", &analysis, &analysis],
    );
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("non-negative"));
}

#[test]
fn test_negative_delta_from_env_is_rejected() {
    let temp = TempDir::new().unwrap();
    let (analysis, _) = fixtures(&temp);

    let output = Command::new(agree_binary())
        .env("HOME", temp.path())
        .env("XDG_CONFIG_HOME", temp.path().join(".config"))
        .env("AGREE_START_DELTA", "-1")
        .args(["compare", analysis.as_str(), analysis.as_str()])
        .output()
        .expect("failed to run agree");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid match tolerance"));
    assert!(stderr.contains("non-negative"));
}

#[test]
fn test_compare_file_with_itself_under_wide_tolerance() {
    let temp = TempDir::new().unwrap();
    let (analysis, _) = fixtures(&temp);

    let output = run_agree(
        temp.path(),
        &["compare", "--start-delta", "5", "--end-delta", "5", &analysis, &analysis],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("    :::::::: ==> TP:   3   FP:   0   FN:   0"));
}

#[test]
fn test_compare_check_tag_from_config_file() {
    let temp = TempDir::new().unwrap();
    let (analysis, reference) = fixtures(&temp);
    let config = write_file(
        temp.path(),
        "agree.toml",
        "start_delta = 1.0\nend_delta = 1.0\ncheck_tag = true\n",
    );

    let output = run_agree(
        temp.path(),
        &[
            "--config",
            &config.to_string_lossy(),
            "compare",
            &analysis,
            &reference,
        ],
    );
    assert!(output.status.success());

    // "answer" no longer matches "subject" once tags are checked.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("    pattern  ==> TP:   1   FP:   1   FN:   1"));
}

#[test]
fn test_compare_ignore_kind() {
    let temp = TempDir::new().unwrap();
    let (analysis, reference) = fixtures(&temp);

    let output = run_agree(
        temp.path(),
        &["compare", "--ignore-kind", "cadence", &analysis, &reference],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("cadence"));
    assert!(stdout.contains("    :::::::: ==> TP:   1   FP:   1   FN:   1"));
}

#[test]
fn test_compare_several_pairs_json() {
    let temp = TempDir::new().unwrap();
    let (analysis, reference) = fixtures(&temp);

    let output = run_agree(
        temp.path(),
        &["compare", "--json", &analysis, &reference, &analysis, &reference],
    );
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["comparisons"].as_array().unwrap().len(), 2);
    assert_eq!(json["cumulative"]["name"], "all");
    assert_eq!(json["cumulative"]["all"]["TP"], 4);
    assert_eq!(json["cumulative"]["all"]["FP"], 2);
    assert_eq!(json["cumulative"]["all"]["FN"], 2);
}

#[test]
fn test_compare_odd_file_count_fails() {
    let temp = TempDir::new().unwrap();
    let (analysis, reference) = fixtures(&temp);

    let output = run_agree(
        temp.path(),
        &["compare", &analysis, &reference, &analysis],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("in pairs"));
}

#[test]
fn test_compare_invalid_label_fails() {
    let temp = TempDir::new().unwrap();
    let (analysis, _) = fixtures(&temp);
    let bad = write_file(
        temp.path(),
        "bad.json",
        r#"{"partitions": [{"id": "S", "labels": [{"offset": 0, "duration": -2, "kind": "a"}]}]}"#,
    );

    let output = run_agree(
        temp.path(),
        &["compare", &analysis, &bad.to_string_lossy()],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.json"));
}

#[test]
fn test_segmentation_text() {
    let temp = TempDir::new().unwrap();
    let (analysis, _) = fixtures(&temp);

    let output = run_agree(temp.path(), &["segmentation", &analysis, &analysis]);
    assert!(
        output.status.success(),
        "agree segmentation should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("==> analysis vs analysis  (by tag)"));
    assert!(stdout.contains("  so: 1.000   su: 1.000"));
    assert!(stdout.contains("  matched: 3   unmatched: 0"));
}

#[test]
fn test_segmentation_json_by_kind() {
    let temp = TempDir::new().unwrap();
    let (analysis, reference) = fixtures(&temp);

    let output = run_agree(
        temp.path(),
        &[
            "segmentation",
            "--by",
            "kind",
            "--json",
            &analysis,
            &reference,
        ],
    );
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["by"], "kind");
    assert_eq!(json["matched"], 2);
    assert_eq!(json["unmatched"], 1);
    assert_eq!(json["classes1"]["pattern"], 1);
}

#[test]
fn test_no_subcommand_prints_help() {
    let temp = TempDir::new().unwrap();
    let output = run_agree(temp.path(), &[]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("compare"));
}
