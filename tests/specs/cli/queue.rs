// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end queue tests driving the `tq` binary.
//!
//! Each test gets its own state directory. Tests that need a server start a
//! tiny HTTP responder on a loopback port.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::{Arc, Mutex};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tq(state: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("tq");
    cmd.arg("--state-dir")
        .arg(state)
        .env_remove("TRANQUIL_TOKEN")
        .env_remove("TRANQUIL_STATE_DIR")
        .env("NO_COLOR", "1");
    cmd
}

fn enqueue(state: &Path, endpoint: &str, data: &str) -> String {
    let output = tq(state)
        .args(["enqueue", endpoint, "-d", data])
        .output()
        .unwrap();
    assert!(output.status.success(), "enqueue failed: {output:?}");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn list_json(state: &Path) -> Vec<serde_json::Value> {
    let output = tq(state).args(["list", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

/// A port nothing listens on.
fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Answers every request with `200 {"ok":true}` and records request lines.
struct Server {
    url: String,
    seen: Arc<Mutex<Vec<String>>>,
}

impl Server {
    fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        std::thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                handle(stream, &log);
            }
        });
        Server { url, seen }
    }

    fn mutations(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|line| !line.starts_with("GET"))
            .cloned()
            .collect()
    }
}

fn handle(stream: TcpStream, log: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).is_err() || header.trim().is_empty() {
            break;
        }
        let lower = header.to_ascii_lowercase();
        if let Some(value) = lower.strip_prefix("content-length:") {
            length = value.trim().parse().unwrap_or(0);
        }
    }
    let mut body = vec![0u8; length];
    let _ = reader.read_exact(&mut body);
    log.lock().unwrap().push(request_line.trim().to_string());

    let payload = r#"{"ok":true}"#;
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        payload.len(),
        payload
    );
    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes());
}

#[test]
fn enqueue_works_without_a_server() {
    let temp = TempDir::new().unwrap();
    let id = enqueue(temp.path(), "/activities", r#"{"steps":1200}"#);
    assert!(!id.is_empty());

    let ops = list_json(temp.path());
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0]["id"], id.as_str());
    assert_eq!(ops[0]["endpoint"], "/activities");
    assert_eq!(ops[0]["payload"]["steps"], 1200);
    assert_eq!(ops[0]["retry_count"], 0);
}

#[test]
fn queue_survives_between_invocations_in_order() {
    let temp = TempDir::new().unwrap();
    let first = enqueue(temp.path(), "/a", "{}");
    let second = enqueue(temp.path(), "/b", "{}");
    let third = enqueue(temp.path(), "/c", "{}");

    let ids: Vec<_> = list_json(temp.path())
        .iter()
        .map(|op| op["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec![first, second, third]);
}

#[test]
fn list_text_reports_empty_queue() {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending operations"));
}

#[test]
fn enqueue_rejects_invalid_json() {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .args(["enqueue", "/a", "-d", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid payload"));
}

#[test]
fn enqueue_rejects_blank_endpoint() {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .args(["enqueue", "  "])
        .assert()
        .failure();
}

#[test]
fn delete_without_payload_is_queued() {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .args(["enqueue", "/items/3", "-m", "delete"])
        .assert()
        .success();

    let ops = list_json(temp.path());
    assert_eq!(ops[0]["method"], "delete");
    assert!(ops[0].get("payload").is_none());
}

#[test]
fn clear_empties_the_queue() {
    let temp = TempDir::new().unwrap();
    enqueue(temp.path(), "/a", "{}");
    enqueue(temp.path(), "/b", "{}");

    tq(temp.path())
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 2 pending operations"));
    assert!(list_json(temp.path()).is_empty());
}

#[test]
fn status_without_config_is_offline() {
    let temp = TempDir::new().unwrap();
    enqueue(temp.path(), "/a", "{}");

    let output = tq(temp.path())
        .args(["status", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["pending_count"], 1);
    assert_eq!(status["is_online"], false);
    assert_eq!(status["is_syncing"], false);
}

#[test]
fn flush_requires_configuration() {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .arg("flush")
        .assert()
        .failure()
        .stderr(predicate::str::contains("tq init"));
}

#[test]
fn flush_against_unreachable_server_keeps_queue() {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .args(["init", "--url", &dead_url()])
        .assert()
        .success();
    enqueue(temp.path(), "/a", "{}");

    tq(temp.path())
        .arg("flush")
        .assert()
        .success()
        .stdout(predicate::str::contains("server unreachable, 1 pending"));

    let ops = list_json(temp.path());
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0]["retry_count"], 0);
}

#[test]
fn flush_delivers_queue_in_order() {
    let server = Server::start();
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .args(["init", "--url", &server.url, "--token", "secret"])
        .assert()
        .success();
    enqueue(temp.path(), "/first", r#"{"n":1}"#);
    enqueue(temp.path(), "/second", r#"{"n":2}"#);

    tq(temp.path())
        .arg("flush")
        .assert()
        .success()
        .stdout(predicate::str::contains("delivered 2 of 2"));

    assert!(list_json(temp.path()).is_empty());
    assert_eq!(
        server.mutations(),
        vec!["POST /first HTTP/1.1", "POST /second HTTP/1.1"]
    );

    tq(temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("last sync: never").not());
}

#[test]
fn send_delivers_directly_when_online() {
    let server = Server::start();
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .args(["init", "--url", &server.url])
        .assert()
        .success();

    tq(temp.path())
        .args(["send", "/items/9", "-m", "replace", "-d", r#"{"n":9}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("delivered (200)"));

    assert!(list_json(temp.path()).is_empty());
    assert_eq!(server.mutations(), vec!["PUT /items/9 HTTP/1.1"]);
}

#[test]
fn send_queues_when_server_unreachable() {
    let temp = TempDir::new().unwrap();
    tq(temp.path())
        .args(["init", "--url", &dead_url()])
        .assert()
        .success();

    tq(temp.path())
        .args(["send", "/activities", "-d", "{}"])
        .assert()
        .success()
        .stdout(predicate::str::contains("queued "));

    assert_eq!(list_json(temp.path()).len(), 1);
}
