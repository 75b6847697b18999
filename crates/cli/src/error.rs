// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

use crate::sync::{PersistenceError, SyncError};

/// All errors surfaced by the `tq` command line.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no server configured\n  hint: run 'tq init --url <base_url>' first")]
    NotConfigured,

    #[error("invalid server url: '{0}'\n  hint: the url must start with http:// or https://")]
    InvalidUrl(String),

    #[error("invalid payload: {0}\n  hint: --data must be a JSON document, e.g. '{{\"name\":\"x\"}}'")]
    InvalidPayload(String),

    #[error("queue is in use by another tq process ({0})\n  hint: stop 'tq watch' or wait for the other command to finish")]
    QueueBusy(PathBuf),

    #[error("{0}")]
    Core(#[from] tq_core::Error),

    #[error("{0}")]
    Sync(SyncError),

    #[error("{0}")]
    Persistence(PersistenceError),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl From<PersistenceError> for Error {
    fn from(e: PersistenceError) -> Self {
        match e {
            PersistenceError::Locked(path) => Error::QueueBusy(path),
            other => Error::Persistence(other),
        }
    }
}

impl From<SyncError> for Error {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::Persistence(inner) => inner.into(),
            SyncError::InvalidOperation(inner) => Error::Core(inner),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(format!("failed to parse config: {e}"))
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(format!("failed to serialize config: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
