#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use common::{devdocs_cmd, mock_server};
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

#[tokio::test(flavor = "multi_thread")]
async fn console_lists_slug_and_full_name() {
    let server = mock_server().await;
    let dir = TempDir::new().unwrap();

    devdocs_cmd(&server, dir.path())
        .args(["docsets", "list"])
        .assert()
        .success()
        .stdout("go (Go 1.22)\njavascript (JavaScript)\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn porcelain_is_tab_separated() {
    let server = mock_server().await;
    let dir = TempDir::new().unwrap();

    devdocs_cmd(&server, dir.path())
        .args(["docsets", "list", "--porcelain"])
        .assert()
        .success()
        .stdout("Go 1.22\tgo\tGo\t1.22\nJavaScript\tjavascript\tJavaScript\t\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn json_is_an_array_and_stderr_is_quiet() {
    let server = mock_server().await;
    let dir = TempDir::new().unwrap();

    let assert = devdocs_cmd(&server, dir.path())
        .args(["--format", "json", "docsets", "list"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    let value: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(value[0]["slug"], "go");
    assert_eq!(value[1]["release"], "");
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_aggregator_exits_with_network_code() {
    let server = mock_server().await;
    let dir = TempDir::new().unwrap();

    devdocs_cmd(&server, dir.path())
        .env("DEVDOCS_URL", "http://127.0.0.1:9")
        .args(["docsets", "list"])
        .assert()
        .code(5)
        .stderr(predicate::str::starts_with("error:"));
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_config_is_a_usage_error() {
    let server = mock_server().await;
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[client\n").unwrap();

    devdocs_cmd(&server, dir.path())
        .args(["docsets", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to parse config"));
}
