// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration and surface tests for the `tq` binary.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use yare::parameterized;

fn tq(state: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("tq");
    cmd.arg("--state-dir")
        .arg(state)
        .env_remove("TRANQUIL_TOKEN")
        .env_remove("TRANQUIL_STATE_DIR")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn init_writes_config_toml() {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .args(["init", "--url", "https://api.example.com/", "--token", "abc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configured https://api.example.com"));

    let content = std::fs::read_to_string(temp.path().join("config.toml")).unwrap();
    assert!(content.contains("base_url = \"https://api.example.com\""));
    assert!(content.contains("token = \"abc\""));
}

#[test]
fn init_keeps_token_when_only_url_changes() {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .args(["init", "--url", "http://a.example", "--token", "abc"])
        .assert()
        .success();
    tq(temp.path())
        .args(["init", "--url", "http://b.example"])
        .assert()
        .success();

    let content = std::fs::read_to_string(temp.path().join("config.toml")).unwrap();
    assert!(content.contains("http://b.example"));
    assert!(content.contains("token = \"abc\""));
}

#[parameterized(
    no_scheme = { "api.example.com" },
    ftp = { "ftp://api.example.com" },
    empty_host = { "https://" },
)]
fn init_rejects_bad_url(url: &str) {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .args(["init", "--url", url])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid server url"));
    assert!(!temp.path().join("config.toml").exists());
}

#[test]
fn malformed_config_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "[server\nbase_url = ").unwrap();
    tq(temp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config error"));
}

#[test]
fn state_dir_from_environment() {
    let temp = TempDir::new().unwrap();
    let mut cmd = cargo_bin_cmd!("tq");
    cmd.env("TRANQUIL_STATE_DIR", temp.path())
        .args(["enqueue", "/a", "-d", "{}"])
        .assert()
        .success();
    assert!(temp.path().join("pending_operations.json").exists());
}

#[test]
fn version_flag_prints_version() {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tq"));
}

#[test]
fn help_lists_commands() {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("enqueue"))
        .stdout(predicate::str::contains("flush"));
}

#[parameterized(
    bash = { "bash" },
    zsh = { "zsh" },
    fish = { "fish" },
)]
fn completion_generates_script(shell: &str) {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .args(["completion", shell])
        .assert()
        .success()
        .stdout(predicate::str::contains("tq"));
}
