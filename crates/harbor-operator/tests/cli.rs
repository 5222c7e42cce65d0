//! Binary-level tests for bootstrap and the `render` subcommand

use std::path::PathBuf;
use std::process::{Command, Output};

fn operator() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_harbor-operator"));
    cmd.env_remove("HARBOR_ASSETS_DIR")
        .env_remove("HARBOR_OPERATOR_NAME")
        .env_remove("HARBOR_LOG_FORMAT");
    cmd
}

fn sample_manifest() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples/harbor.yaml")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ==========================================================================
// Story: Missing template stops the process at bootstrap
// ==========================================================================

#[test]
fn when_template_missing_process_exits_with_critical_message() {
    let assets = tempfile::tempdir().unwrap();

    let output = operator()
        .arg("--assets-dir")
        .arg(assets.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("CRITICAL"), "stderr: {err}");
    assert!(err.contains("/assets/templates/core/app.conf"), "stderr: {err}");
    // One mention of the path keeps the message readable
    let critical = err
        .lines()
        .find(|line| line.contains("CRITICAL"))
        .unwrap();
    assert_eq!(critical.matches("/assets/templates/core/app.conf").count(), 1);
    assert!(stdout(&output).is_empty());
}

#[test]
fn when_template_missing_render_prints_nothing() {
    let assets = tempfile::tempdir().unwrap();

    let output = operator()
        .arg("--assets-dir")
        .arg(assets.path())
        .arg("render")
        .arg("-f")
        .arg(sample_manifest())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
}

// ==========================================================================
// Story: Rendering Core ConfigMaps from a manifest
// ==========================================================================

#[test]
fn when_rendering_sample_config_map_and_checksum_are_printed() {
    let output = operator()
        .arg("render")
        .arg("-f")
        .arg(sample_manifest())
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("---\n"));
    assert!(out.contains("name: example-core"), "stdout: {out}");
    assert!(out.contains("namespace: registry"), "stdout: {out}");
    assert!(out.contains("WITH_NOTARY: 'true'"), "stdout: {out}");
    assert!(out.contains("WITH_CHARTMUSEUM: 'true'"), "stdout: {out}");
    assert!(out.contains("WITH_CLAIR: 'false'"), "stdout: {out}");

    let checksum = out
        .lines()
        .find_map(|line| line.strip_prefix("# config-checksum: "))
        .expect("checksum line");
    assert_eq!(checksum.len(), 64);
    assert!(checksum
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

#[test]
fn when_scope_changes_checksum_changes() {
    let render = |scope: &str| {
        let output = operator()
            .arg("render")
            .arg("-f")
            .arg(sample_manifest())
            .arg("--fingerprint-scope")
            .arg(scope)
            .output()
            .unwrap();
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        stdout(&output)
            .lines()
            .find_map(|line| line.strip_prefix("# config-checksum: ").map(str::to_string))
            .expect("checksum line")
    };

    assert_ne!(render("tracked"), render("artifact"));
}

#[test]
fn when_manifest_missing_render_fails_with_context() {
    let output = operator()
        .arg("render")
        .arg("-f")
        .arg("/nonexistent/harbor.yaml")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to read Harbor manifest"));
}
