//! Integration tests for the primesift CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("primesift").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prime-extrema"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("primesift").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("primesift"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let mut cmd = Command::cargo_bin("primesift").unwrap();
    cmd.arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test scanning a directory of number files
#[test]
fn test_scan_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.txt"), "7\n10\n13\n").unwrap();
    fs::write(temp_dir.path().join("b.txt"), "17\n").unwrap();

    let mut cmd = Command::cargo_bin("primesift").unwrap();
    cmd.arg("scan")
        .arg(temp_dir.path())
        .arg("--workers")
        .arg("2")
        .arg("--poll-interval")
        .arg("25")
        .arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Files: 2"))
        .stdout(predicate::str::contains("Max prime: 17"))
        .stdout(predicate::str::contains("Min prime: 7"));
}

/// Test JSON output carries the final statistics
#[test]
fn test_scan_json_format() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.txt"), "4\n9\n").unwrap();
    fs::write(temp_dir.path().join("b.txt"), "17\n").unwrap();

    let mut cmd = Command::cargo_bin("primesift").unwrap();
    let assert = cmd
        .arg("--quiet")
        .arg("scan")
        .arg(temp_dir.path())
        .arg("--workers")
        .arg("2")
        .arg("--poll-interval")
        .arg("25")
        .arg("--format")
        .arg("json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let results: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(results["statistics"]["files_completed"], 2);
    // 4 and 9 are composite, so 17 is both extrema
    assert_eq!(results["statistics"]["min_prime"], 17);
    assert_eq!(results["statistics"]["max_prime"], 17);
}

/// Test a non-numeric line fails only that line, not the run
#[test]
fn test_scan_with_parse_failures() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.txt"), "7\nnot-a-number\n13\n").unwrap();

    let mut cmd = Command::cargo_bin("primesift").unwrap();
    let assert = cmd
        .arg("--quiet")
        .arg("scan")
        .arg(temp_dir.path())
        .arg("--poll-interval")
        .arg("25")
        .arg("--format")
        .arg("json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let results: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(results["statistics"]["files_completed"], 1);
    assert_eq!(results["statistics"]["files_failed"], 0);
    assert_eq!(results["statistics"]["min_prime"], 7);
    assert_eq!(results["statistics"]["max_prime"], 13);
}

/// Test a missing directory is a hard error
#[test]
fn test_scan_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("nope");

    let mut cmd = Command::cargo_bin("primesift").unwrap();
    cmd.arg("scan")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read directory"));
}

/// Test zero desired workers processes nothing
#[test]
fn test_scan_zero_workers() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.txt"), "7\n").unwrap();

    let mut cmd = Command::cargo_bin("primesift").unwrap();
    let assert = cmd
        .arg("--quiet")
        .arg("scan")
        .arg(temp_dir.path())
        .arg("--workers")
        .arg("0")
        .arg("--poll-interval")
        .arg("25")
        .arg("--format")
        .arg("json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let results: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(results["statistics"]["files_completed"], 0);
    assert_eq!(results["statistics"]["min_prime"], serde_json::Value::Null);
}
