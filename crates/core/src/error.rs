// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for tq-core operations.

use thiserror::Error;

/// All possible errors that can occur in tq-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid method: '{0}'\n  hint: valid methods are: create, replace, delete")]
    InvalidMethod(String),

    #[error("endpoint cannot be empty")]
    EmptyEndpoint,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for tq-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
