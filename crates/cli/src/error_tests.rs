// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use yare::parameterized;

#[test]
fn test_error_not_configured_display() {
    let msg = Error::NotConfigured.to_string();
    assert!(msg.contains("no server configured"));
    assert!(msg.contains("tq init"));
}

#[test]
fn test_error_invalid_url_display() {
    let msg = Error::InvalidUrl("ftp://x".to_string()).to_string();
    assert!(msg.contains("ftp://x"));
    assert!(msg.contains("hint:"));
}

#[test]
fn test_error_invalid_payload_display() {
    let msg = Error::InvalidPayload("expected value".to_string()).to_string();
    assert!(msg.contains("invalid payload: expected value"));
    assert!(msg.contains("--data"));
}

#[test]
fn test_locked_store_becomes_queue_busy() {
    let err: Error = PersistenceError::Locked(PathBuf::from("/tmp/q/queue.lock")).into();
    assert!(matches!(err, Error::QueueBusy(_)));
    assert!(err.to_string().contains("/tmp/q/queue.lock"));
}

#[test]
fn test_sync_persistence_error_is_unwrapped() {
    let err: Error = SyncError::Persistence(PersistenceError::Unavailable("disk".into())).into();
    assert!(matches!(err, Error::Persistence(_)));
}

#[test]
fn test_sync_invalid_operation_becomes_core() {
    let err: Error = SyncError::InvalidOperation(tq_core::Error::EmptyEndpoint).into();
    assert!(matches!(err, Error::Core(tq_core::Error::EmptyEndpoint)));
    assert_eq!(err.to_string(), "endpoint cannot be empty");
}

#[test]
fn test_toml_parse_error_is_config() {
    let err: Error = toml::from_str::<toml::Value>("= nope").unwrap_err().into();
    assert!(err.to_string().starts_with("config error: failed to parse config"));
}

#[parameterized(
    not_configured = { Error::NotConfigured },
    invalid_url = { Error::InvalidUrl("x".into()) },
    invalid_payload = { Error::InvalidPayload("x".into()) },
    queue_busy = { Error::QueueBusy(PathBuf::from("q")) },
)]
fn test_user_errors_carry_hint(err: Error) {
    assert!(err.to_string().contains("\n  hint: "));
}
