//! Integration tests for the CLI application
//!
//! These tests run the compiled binary against the bundled datasets.

use std::process::{Command, Output};
use tempfile::TempDir;

/// Get the path to the compiled CLI binary
fn get_cli_binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_svm-holdout")
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(get_cli_binary_path())
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_cli_help() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("digits"));
    assert!(stdout.contains("iris"));
    assert!(stdout.contains("datasets"));
}

#[test]
fn test_cli_iris_output_format() {
    let output = run_cli(&["iris", "--seed", "42"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("yhat: ["));
    assert!(lines[1].starts_with("y:    ["));
    assert!(lines[2].starts_with("success ratio: "));

    let count = |line: &str| {
        line.split_once('[')
            .and_then(|(_, rest)| rest.strip_suffix(']'))
            .map(|labels| labels.split_whitespace().count())
    };
    assert_eq!(count(lines[0]), Some(15));
    assert_eq!(count(lines[1]), Some(15));

    let ratio: f64 = lines[2]
        .trim_start_matches("success ratio: ")
        .parse()
        .expect("ratio is a number");
    assert!((0.0..=1.0).contains(&ratio));
}

#[test]
fn test_cli_same_seed_same_output() {
    let first = run_cli(&["iris", "--seed", "17"]);
    let second = run_cli(&["iris", "--seed", "17"]);
    assert!(first.status.success() && second.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_cli_detailed_and_json_report() {
    let temp_dir = TempDir::new().expect("temp dir");
    let report_path = temp_dir.path().join("report.json");

    let output = run_cli(&[
        "iris",
        "--seed",
        "3",
        "--test-count",
        "30",
        "--detailed",
        "--output",
        report_path.to_str().expect("utf-8 path"),
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("confusion matrix"));
    assert!(stdout.contains("precision"));

    let text = std::fs::read_to_string(&report_path).expect("report written");
    let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(value["n_test"], 30);
    assert_eq!(value["seed"], 3);
    assert_eq!(value["dataset"], "iris");
}

#[test]
fn test_cli_large_cache_budget() {
    let output = run_cli(&["iris", "--seed", "1", "--cache-size", "1000000"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 3);
}

#[test]
fn test_cli_datasets_listing() {
    let output = run_cli(&["datasets"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("digits: 1797 samples, 64 features, 10 classes"));
    assert!(stdout.contains("iris: 150 samples, 4 features, 3 classes"));

    let only_iris = run_cli(&["datasets", "iris"]);
    let stdout = String::from_utf8_lossy(&only_iris.stdout);
    assert_eq!(stdout.lines().count(), 1);
}

#[test]
fn test_cli_invalid_parameters() {
    let output = run_cli(&["iris", "--gamma=-1"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid parameter"));

    let output = run_cli(&["iris", "--test-size", "1.5"]);
    assert_eq!(output.status.code(), Some(1));

    let output = run_cli(&["iris", "--test-size", "0.2", "--test-count", "5"]);
    assert!(!output.status.success());

    let max = usize::MAX.to_string();
    let output = run_cli(&["iris", "--cache-size", &max]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid parameter"));

    let output = run_cli(&["mnist"]);
    assert!(!output.status.success());
}
