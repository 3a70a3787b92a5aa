//! Integration tests for the strata CLI
//!
//! These tests run the binary end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("strata").unwrap()
}

/// Temporary project with one literal per file and a stray text file
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("main.lua"),
        "x = [==[abc]=]==]\nprint(x)\n",
    )
    .unwrap();
    fs::create_dir_all(temp_dir.path().join("lib")).unwrap();
    fs::write(
        temp_dir.path().join("lib").join("util.lua"),
        "local doc = [[\nhelpers]]\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("README.txt"), "see [[main.lua]]").unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Strata scans source files for Lua-style long bracket literals",
        ))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_version_detailed() {
    cli()
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("strata {VERSION}")))
        .stdout(predicate::str::contains("Build information:"));
}

#[test]
fn test_scan_single_file_human() {
    let project = create_test_project();

    cli()
        .current_dir(project.path())
        .args(["--no-color", "scan", "main.lua"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1:5"))
        .stdout(predicate::str::contains("level 2"))
        .stdout(predicate::str::contains("\"abc]=\""))
        .stdout(predicate::str::contains("Literals found: 1"));
}

#[test]
fn test_scan_json_output() {
    let project = create_test_project();

    let output = cli()
        .current_dir(project.path())
        .args(["scan", "--format", "json", "main.lua"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let literal = &report["files"][0]["literals"][0];
    assert_eq!(literal["content"], "abc]=");
    assert_eq!(literal["level"], 2);
    assert_eq!(literal["length"], 13);
    assert_eq!(literal["start"]["column"], 5);
    assert_eq!(report["summary"]["literals"], 1);
    assert_eq!(report["summary"]["failures"], 0);
}

#[test]
fn test_scan_directory_uses_extension_filter() {
    let project = create_test_project();

    let output = cli()
        .args(["scan", "--format", "json"])
        .arg(project.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["filesScanned"], 2);
    assert_eq!(report["summary"]["literals"], 2);

    cli()
        .args(["--no-color", "scan", "--ext", "txt"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("README.txt"))
        .stdout(predicate::str::contains("\"main.lua\""));
}

#[test]
fn test_scan_missing_path() {
    cli()
        .args(["scan", "definitely/not/here.lua"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn test_check_passes_on_terminated_literals() {
    let project = create_test_project();

    cli()
        .args(["--no-color", "check"])
        .arg(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("main.lua"))
        .stdout(predicate::str::contains("Files scanned: 2"));
}

#[test]
fn test_check_fails_on_unterminated_literal() {
    let project = create_test_project();
    fs::write(project.path().join("broken.lua"), "s = [=[\nnever closed]]\n").unwrap();

    cli()
        .args(["--no-color", "check"])
        .arg(project.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("broken.lua"))
        .stdout(predicate::str::contains("line 2, column 1"))
        .stderr(predicate::str::contains("1 of 3 file(s) failed the check"));
}

#[test]
fn test_discovered_config_changes_delimiters() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("strata.toml"),
        "[rawString]\nopen = \"<\"\nmarker = \"#\"\nclose = \">\"\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("doc.lua"), "<#<a>b>#> [[ignored]]").unwrap();

    let output = cli()
        .args(["scan", "--format", "json"])
        .arg(temp_dir.path().join("doc.lua"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let literals = report["files"][0]["literals"].as_array().unwrap();
    assert_eq!(literals.len(), 1);
    assert_eq!(literals[0]["content"], "a>b");
}

#[test]
fn test_config_init_and_force() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strata.toml"));

    let written = fs::read_to_string(temp_dir.path().join("strata.toml")).unwrap();
    assert!(written.contains("maxDepth = 1024"));

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_init_json() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .current_dir(temp_dir.path())
        .args(["config", "init", "--format", "json"])
        .assert()
        .success();

    let written = fs::read_to_string(temp_dir.path().join(".stratarc.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["rawString"]["marker"], "=");
    assert_eq!(value["matching"]["eol"], "lf_crlf");
}

#[test]
fn test_config_show_explicit_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(&config_path, "[matching]\nmaxDepth = 64\n").unwrap();

    cli()
        .args(["config", "show", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"maxDepth\": 64"));
}

#[test]
fn test_invalid_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[rawString]\nmarker = \"]\"\n").unwrap();

    cli()
        .args(["config", "show", "-c"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must differ"));
}
