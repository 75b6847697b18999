// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued mutations awaiting delivery.
//!
//! A [`PendingOperation`] is one mutating request that could not reach the
//! server when it was issued. It carries everything needed to replay the
//! request later plus the bookkeeping for the retry and expiry policy.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::generate_op_id;

/// Unique identifier for a queued operation.
pub type OpId = String;

/// Delivery attempts allowed before an operation is discarded.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// The kind of mutation an operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Create a new resource (POST).
    Create,
    /// Replace an existing resource (PUT).
    Replace,
    /// Delete a resource (DELETE). Never carries a payload.
    Delete,
}

impl Method {
    /// The HTTP verb this method is delivered with.
    pub fn http_verb(self) -> &'static str {
        match self {
            Method::Create => "POST",
            Method::Replace => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Returns true if operations of this kind carry a payload.
    pub fn carries_payload(self) -> bool {
        !matches!(self, Method::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Create => "create",
            Method::Replace => "replace",
            Method::Delete => "delete",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "create" | "post" => Ok(Method::Create),
            "replace" | "put" => Ok(Method::Replace),
            "delete" => Ok(Method::Delete),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// One durably-queued mutation awaiting delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    /// Unique identifier, generated at enqueue time.
    pub id: OpId,
    /// Logical resource path the operation targets.
    pub endpoint: String,
    pub method: Method,
    /// Structured body sent with the request; always `None` for deletes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    /// Creation time, used for expiry.
    pub enqueued_at: DateTime<Utc>,
    /// Delivery attempts made so far.
    #[serde(default)]
    pub retry_count: u32,
    /// Ceiling on attempts before the operation is discarded.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl PendingOperation {
    /// Creates a fresh operation with a generated id and zero attempts.
    ///
    /// A payload passed alongside [`Method::Delete`] is discarded.
    pub fn new(
        endpoint: impl Into<String>,
        method: Method,
        payload: Option<serde_json::Value>,
        enqueued_at: DateTime<Utc>,
        max_retries: u32,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(Error::EmptyEndpoint);
        }
        let payload = if method.carries_payload() {
            payload
        } else {
            None
        };
        Ok(PendingOperation {
            id: generate_op_id(&endpoint, &enqueued_at),
            endpoint,
            method,
            payload,
            enqueued_at,
            retry_count: 0,
            max_retries,
        })
    }

    /// Returns true once the operation has used up its delivery attempts.
    pub fn is_exhausted(&self) -> bool {
        self.retry_count >= self.max_retries
    }

    /// Returns true if the operation is older than the retention window.
    pub fn is_expired(&self, now: DateTime<Utc>, retention: Duration) -> bool {
        now - self.enqueued_at > retention
    }

    /// Records one failed delivery attempt.
    ///
    /// Returns true if the operation should stay queued for another attempt.
    pub fn record_failure(&mut self) -> bool {
        self.retry_count = self.retry_count.saturating_add(1).min(self.max_retries);
        !self.is_exhausted()
    }
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
