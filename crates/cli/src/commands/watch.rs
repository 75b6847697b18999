// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground sync loop.
//!
//! Runs the reachability probe, the connectivity observer, and the engine
//! together. Each reconnect triggers a flush after the settle delay.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::Context;
use crate::display::format_status_line;
use crate::error::Result;
use crate::sync::{spawn_transition_listener, ConnectivityObserver};

/// Sync until Ctrl-C.
pub async fn run(ctx: &Context, out: &mut impl Write) -> Result<()> {
    run_until(ctx, out, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    })
    .await
}

/// Sync until `shutdown` resolves.
///
/// The probe and the transition listener are stopped and awaited before
/// returning, including when writing output fails.
pub async fn run_until<F>(ctx: &Context, out: &mut impl Write, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    ctx.config.base_url()?;
    let engine = ctx.open_engine().await?;
    let probe = ctx.probe()?;
    writeln!(
        out,
        "Watching {} ({} pending), press Ctrl-C to stop",
        probe.url(),
        engine.pending_count()
    )?;

    let (observer, transitions) = ConnectivityObserver::new(false);
    let observer = Arc::new(observer);
    let listener = spawn_transition_listener(Arc::clone(&engine), &observer, transitions);

    let cancel = CancellationToken::new();
    let probe_task = {
        let observer = Arc::clone(&observer);
        let cancel = cancel.clone();
        tokio::spawn(async move { probe.run(&observer, cancel).await })
    };

    let mut status = engine.subscribe();
    let mut recorded = engine.last_sync_time();
    tokio::pin!(shutdown);

    let outcome: Result<()> = loop {
        tokio::select! {
            _ = &mut shutdown => break Ok(()),
            changed = status.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let current = status.borrow_and_update().clone();
                if let Err(e) = writeln!(out, "{}", format_status_line(&current)) {
                    break Err(e.into());
                }
                if current.last_sync_time != recorded {
                    if let Err(e) = ctx.record_last_sync(&engine) {
                        break Err(e);
                    }
                    recorded = current.last_sync_time;
                }
            }
        }
    };

    // background tasks stop on every exit path
    cancel.cancel();
    if let Err(e) = probe_task.await {
        tracing::warn!(error = %e, "probe task ended abnormally");
    }
    // dropping the last observer handle closes the transition stream
    drop(observer);
    if let Err(e) = listener.await {
        tracing::warn!(error = %e, "transition listener ended abnormally");
    }
    outcome?;
    ctx.record_last_sync(&engine)?;
    writeln!(out, "Stopped with {} pending", engine.pending_count())?;
    Ok(())
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
