//! Integration tests for the `omada` CLI binary.
//!
//! Argument parsing, target management and error handling run without a
//! controller; the device listing runs against a wiremock fake controller.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTROLLER_ID: &str = "c0ffee01";
const SITE_ID: &str = "site-default";

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `omada` binary with env isolation.
///
/// Clears the `OMADA_*` variables and points the config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn omada_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("omada");
    cmd.env("HOME", "/tmp/omada-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/omada-cli-test-nonexistent")
        .env_remove("OMADA_TARGET")
        .env_remove("OMADA_CONFIG")
        .env_remove("OMADA_OUTPUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_config(dir: &Path, url: &str) -> std::path::PathBuf {
    let file = dir.join("omada.toml");
    std::fs::write(
        &file,
        format!(
            "default_target = \"lab\"\n\n\
             [targets.lab]\n\
             url = \"{url}\"\n\
             username = \"admin\"\n\
             password = \"secret\"\n\
             site = \"Default\"\n\
             verify_ssl = false\n"
        ),
    )
    .unwrap();
    file
}

fn ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "errorCode": 0,
        "msg": "Success.",
        "result": result,
    }))
}

async fn mount_controller(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/info"))
        .respond_with(ok(json!({
            "controllerVer": "5.15.8",
            "apiVer": "3",
            "configured": true,
            "omadacId": CONTROLLER_ID,
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/{CONTROLLER_ID}/api/v2/login")))
        .respond_with(ok(json!({"roleType": 0, "token": "csrf-token"})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/{CONTROLLER_ID}/api/v2/users/current")))
        .respond_with(ok(json!({
            "name": "admin",
            "privilege": {"sites": [{"name": "Default", "key": SITE_ID}]},
        })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = omada_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    omada_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Omada")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("switch-ports"))
            .and(predicate::str::contains("known-clients")),
    );
}

#[test]
fn test_version_flag() {
    omada_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("omada"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = omada_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_poe_on_and_off_conflict() {
    let output = omada_cmd()
        .args(["poe", "core", "-p", "3", "--on", "--off"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("cannot be used with"));
}

#[test]
fn test_devices_without_target_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = omada_cmd()
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .arg("devices")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(
        combined_output(&output).contains("target"),
        "Expected a hint about targets"
    );
}

#[test]
fn test_unknown_target_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "https://omada.invalid");
    omada_cmd()
        .arg("--config")
        .arg(&config)
        .args(["-t", "nope", "devices"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

// ── Targets ─────────────────────────────────────────────────────────

#[test]
fn test_targets_with_empty_config() {
    let dir = TempDir::new().unwrap();
    omada_cmd()
        .arg("--config")
        .arg(dir.path().join("omada.toml"))
        .args(["targets", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_targets_lists_default_without_password() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "https://omada.example");
    omada_cmd()
        .arg("--config")
        .arg(&config)
        .arg("targets")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("lab")
                .and(predicate::str::contains("https://omada.example"))
                .and(predicate::str::contains("secret").not()),
        );
}

#[test]
fn test_delete_target_updates_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "https://omada.example");
    omada_cmd()
        .arg("--config")
        .arg(&config)
        .args(["target", "lab", "--delete"])
        .assert()
        .success();

    let text = std::fs::read_to_string(&config).unwrap();
    assert!(!text.contains("[targets.lab]"), "target left in:\n{text}");
    assert!(!text.contains("default_target"), "default left in:\n{text}");
}

// ── Fake controller ─────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_json_against_fake_controller() {
    let server = MockServer::start().await;
    mount_controller(&server).await;
    Mock::given(method("GET"))
        .and(path(format!(
            "/{CONTROLLER_ID}/api/v2/sites/{SITE_ID}/devices"
        )))
        .respond_with(ok(json!([
            {"type": "switch", "mac": "AA-BB-CC-DD-EE-01", "name": "Core", "statusCategory": 1},
            {"type": "ap", "mac": "AA-BB-CC-DD-EE-02", "name": "Hall", "statusCategory": 1},
        ])))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), &server.uri());
    let mut cmd = omada_cmd();
    cmd.arg("--config").arg(&config).args(["devices", "-o", "json"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let devices: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = devices
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Core", "Hall"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dump_prints_controller_payload() {
    let server = MockServer::start().await;
    mount_controller(&server).await;
    let payload = json!([
        {"type": "switch", "mac": "AA-BB-CC-DD-EE-01", "name": "Core", "statusCategory": 1,
         "hwVersion": "3.0"},
    ]);
    Mock::given(method("GET"))
        .and(path(format!(
            "/{CONTROLLER_ID}/api/v2/sites/{SITE_ID}/devices"
        )))
        .respond_with(ok(payload.clone()))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), &server.uri());
    let mut cmd = omada_cmd();
    cmd.arg("--config").arg(&config).args(["devices", "--dump"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let dumped: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(dumped, payload);
    assert_eq!(dumped[0]["hwVersion"], "3.0");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_site_fails_with_not_found() {
    let server = MockServer::start().await;
    mount_controller(&server).await;

    let dir = TempDir::new().unwrap();
    let config = dir.path().join("omada.toml");
    std::fs::write(
        &config,
        format!(
            "[targets.lab]\nurl = \"{}\"\nusername = \"admin\"\npassword = \"secret\"\nsite = \"Branch\"\n",
            server.uri()
        ),
    )
    .unwrap();

    let mut cmd = omada_cmd();
    cmd.arg("--config")
        .arg(&config)
        .args(["-t", "lab", "devices"]);
    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Branch"));
}
