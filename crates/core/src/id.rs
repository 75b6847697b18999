// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Process-local sequence mixed into every id so two ids minted in the same
/// nanosecond for the same endpoint still differ.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate an operation ID from endpoint and enqueue time.
/// Format: {unix_ms}-{hash} where hash is first 8 hex chars of
/// SHA256(endpoint + nanosecond timestamp + sequence)
pub fn generate_op_id(endpoint: &str, enqueued_at: &DateTime<Utc>) -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let nanos = enqueued_at
        .timestamp_nanos_opt()
        .unwrap_or_else(|| enqueued_at.timestamp_micros());
    let input = format!("{endpoint}{nanos}{sequence}{}", std::process::id());
    let hash = Sha256::digest(input.as_bytes());
    let short_hash = hex::encode(&hash[..4]);
    format!("{}-{}", enqueued_at.timestamp_millis(), short_hash)
}

/// Validate the `{unix_ms}-{8 hex}` shape of an operation ID.
pub fn is_valid_op_id(id: &str) -> bool {
    let Some((millis, suffix)) = id.split_once('-') else {
        return false;
    };
    !millis.is_empty()
        && millis.chars().all(|c| c.is_ascii_digit())
        && suffix.len() == 8
        && suffix.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
