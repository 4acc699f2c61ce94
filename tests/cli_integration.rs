//! Integration tests for the relver CLI.
//!
//! Each test runs the binary against a throwaway project directory. Only
//! git-free subcommands are exercised here; the git state reader has its
//! own tests against real repositories.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn setup_json_project(version: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        format!(
            "{{\n  \"name\": \"cli-example\",\n  \"version\": \"{version}\",\n  \"private\": true\n}}\n"
        ),
    )
    .unwrap();
    dir
}

fn relver(project: &TempDir, args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--", "-C"])
        .arg(project.path())
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn show_prints_name_and_version() {
    let project = setup_json_project("1.4.0-SNAPSHOT");
    let output = relver(&project, &["show"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cli-example"));
    assert!(stdout.contains("1.4.0-SNAPSHOT"));
}

#[test]
fn show_json_is_machine_readable() {
    let project = setup_json_project("1.4.0");
    let output = relver(&project, &["show", "--json"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(value["name"], "cli-example");
    assert_eq!(value["version"], "1.4.0");
    assert_eq!(value["kind"], "JSON");
}

#[test]
fn release_strips_prerelease() {
    let project = setup_json_project("1.4.0-SNAPSHOT");
    let output = relver(&project, &["release"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1.4.0");
}

#[test]
fn next_defaults_to_minor_bump() {
    let project = setup_json_project("1.4.0-SNAPSHOT");
    let output = relver(&project, &["next"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1.5.0");
}

#[test]
fn next_patch_flag_bumps_patch() {
    let project = setup_json_project("1.4.0");
    let output = relver(&project, &["next", "--patch"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1.4.1");
}

#[test]
fn next_set_writes_the_descriptor() {
    let project = setup_json_project("1.4.0");
    let output = relver(&project, &["next", "--set"]);

    assert!(output.status.success());
    let descriptor = fs::read_to_string(project.path().join("package.json")).unwrap();
    assert!(descriptor.contains("\"version\": \"1.5.0\""));
    // Formatting preserved around the edit
    assert!(descriptor.contains("\"private\": true"));
}

#[test]
fn set_rewrites_only_the_version() {
    let project = setup_json_project("1.4.0");
    let before = fs::read_to_string(project.path().join("package.json")).unwrap();
    let output = relver(&project, &["set", "2.0.0"]);

    assert!(output.status.success());
    let after = fs::read_to_string(project.path().join("package.json")).unwrap();
    assert_eq!(after, before.replace("1.4.0", "2.0.0"));
}

#[test]
fn set_dry_run_writes_nothing() {
    let project = setup_json_project("1.4.0");
    let before = fs::read_to_string(project.path().join("package.json")).unwrap();
    let output = relver(&project, &["set", "2.0.0", "--dry-run"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("would set version"));
    let after = fs::read_to_string(project.path().join("package.json")).unwrap();
    assert_eq!(after, before);
}

#[test]
fn set_rejects_invalid_version() {
    let project = setup_json_project("1.4.0");
    let output = relver(&project, &["set", "not-a-version"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not-a-version"));
}

#[test]
fn patch_reattaches_descriptor_prerelease() {
    let project = setup_json_project("1.4.0-SNAPSHOT");
    let output = relver(&project, &["patch", "1.4.0"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "1.4.1-SNAPSHOT"
    );
}

#[test]
fn patch_rejects_dirty_tag() {
    let project = setup_json_project("1.4.1-SNAPSHOT");
    let output = relver(&project, &["patch", "1.4.1"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1.4.1"));
    assert!(stderr.contains("patch"));
}

#[test]
fn policy_config_file_is_honored() {
    let project = setup_json_project("1.4.0");
    fs::write(
        project.path().join(".relver.toml"),
        "[policy]\nbuild_number_prefix = \"b\"\nbuild_number_length = 5\n",
    )
    .unwrap();

    // An invalid config must fail loudly rather than derive wrong versions.
    let output = relver(&project, &["release"]);
    assert!(output.status.success());

    fs::write(project.path().join(".relver.toml"), "[policy]\ntypo = 1\n").unwrap();
    let output = relver(&project, &["release"]);
    assert!(!output.status.success());
}

#[test]
fn missing_descriptor_is_a_clear_error() {
    let dir = TempDir::new().unwrap();
    let output = relver(&dir, &["show"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no project descriptor"));
}
