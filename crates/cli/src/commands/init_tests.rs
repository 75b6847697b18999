// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::error::Error;
use tempfile::TempDir;

#[test]
fn test_init_writes_config() {
    let temp = TempDir::new().unwrap();
    let state = StateDir::new(temp.path());
    let mut out = Vec::new();

    run(&state, "http://localhost:8080/".into(), Some("tok".into()), &mut out).unwrap();

    let config = Config::load(&state).unwrap();
    assert_eq!(config.base_url().unwrap(), "http://localhost:8080");
    assert_eq!(config.server.token.as_deref(), Some("tok"));
    assert!(String::from_utf8(out).unwrap().starts_with("Configured http://localhost:8080"));
}

#[test]
fn test_init_keeps_sync_settings_and_token() {
    let temp = TempDir::new().unwrap();
    let state = StateDir::new(temp.path());
    let mut existing = Config::default();
    existing.server.token = Some("keep".into());
    existing.sync.max_retries = 9;
    existing.save(&state).unwrap();

    run(&state, "https://api.example.com".into(), None, &mut Vec::new()).unwrap();

    let config = Config::load(&state).unwrap();
    assert_eq!(config.sync.max_retries, 9);
    assert_eq!(config.server.token.as_deref(), Some("keep"));
}

#[test]
fn test_init_rejects_bad_url() {
    let temp = TempDir::new().unwrap();
    let state = StateDir::new(temp.path());

    let err = run(&state, "ftp://x".into(), None, &mut Vec::new()).unwrap_err();

    assert!(matches!(err, Error::InvalidUrl(_)));
    assert!(!state.config_path().exists());
}
