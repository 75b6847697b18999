// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use super::Context;
use crate::display::format_flush_outcome;
use crate::error::Result;
use crate::sync::FlushOutcome;

/// Manual "sync now": probe once and, if the server answers, flush without
/// waiting for the settle delay.
pub async fn run(ctx: &Context, out: &mut impl Write) -> Result<()> {
    ctx.config.base_url()?;
    let engine = ctx.open_engine().await?;
    ctx.refresh_online(&engine).await?;

    let result = engine.flush().await;
    // a pass that ran counts as a sync even if the rewrite failed
    if matches!(result, Ok(FlushOutcome::Completed(_)) | Err(_)) {
        ctx.record_last_sync(&engine)?;
    }
    let outcome = result?;

    writeln!(
        out,
        "{}",
        format_flush_outcome(&outcome, engine.pending_count())
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "flush_tests.rs"]
mod tests;
