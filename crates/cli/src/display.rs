// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Human-readable rendering of queue state.

use chrono::{DateTime, SecondsFormat, Utc};
use tq_core::PendingOperation;

use crate::colors;
use crate::sync::{Dispatch, FlushOutcome, SkipReason, SyncStatus};

fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// One line per operation: id, method, endpoint, attempts, enqueue time.
pub fn format_op_line(op: &PendingOperation) -> String {
    format!(
        "{} {:<7} {} (attempts {}/{}, queued {})",
        op.id,
        op.method.as_str(),
        op.endpoint,
        op.retry_count,
        op.max_retries,
        timestamp(&op.enqueued_at)
    )
}

pub fn format_status(status: &SyncStatus, colorize: bool) -> String {
    let online = match (status.is_online, colorize) {
        (true, true) => colors::good("online"),
        (false, true) => colors::bad("offline"),
        (true, false) => "online".to_string(),
        (false, false) => "offline".to_string(),
    };
    let last_sync = status
        .last_sync_time
        .as_ref()
        .map(timestamp)
        .unwrap_or_else(|| {
            if colorize {
                colors::context("never")
            } else {
                "never".to_string()
            }
        });

    let mut out = format!(
        "pending:   {}\nserver:    {}\nlast sync: {}",
        status.pending_count, online, last_sync
    );
    if status.is_syncing {
        out.push_str("\nsyncing:   yes");
    }
    out
}

/// Compact single-line status for the watch loop.
pub fn format_status_line(status: &SyncStatus) -> String {
    let state = match (status.is_online, status.is_syncing) {
        (_, true) => "syncing",
        (true, false) => "online",
        (false, false) => "offline",
    };
    match &status.last_sync_time {
        Some(ts) => format!(
            "[{state}] {} pending, last sync {}",
            status.pending_count,
            timestamp(ts)
        ),
        None => format!("[{state}] {} pending", status.pending_count),
    }
}

pub fn format_flush_outcome(outcome: &FlushOutcome, pending: usize) -> String {
    match outcome {
        FlushOutcome::Completed(report) => {
            let mut out = format!(
                "delivered {} of {}",
                report.delivered, report.attempted
            );
            if report.retained > 0 {
                out.push_str(&format!(", {} will be retried", report.retained));
            }
            if report.dropped > 0 {
                out.push_str(&format!(", {} dropped after final attempt", report.dropped));
            }
            out
        }
        FlushOutcome::Skipped(SkipReason::Offline) => {
            format!("server unreachable, {pending} pending")
        }
        FlushOutcome::Skipped(SkipReason::AlreadySyncing) => "a flush is already running".to_string(),
        FlushOutcome::Skipped(SkipReason::EmptyQueue) => "nothing to flush".to_string(),
    }
}

pub fn format_dispatch(dispatch: &Dispatch) -> String {
    match dispatch {
        Dispatch::Delivered(response) => format!("delivered ({})", response.status),
        Dispatch::Queued(id) => format!("queued {id}"),
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
