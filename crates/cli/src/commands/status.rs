// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use super::Context;
use crate::cli::OutputFormat;
use crate::colors;
use crate::display::format_status;
use crate::error::Result;

/// Report queue size, reachability, and last sync time.
pub async fn run(ctx: &Context, output: OutputFormat, out: &mut impl Write) -> Result<()> {
    let engine = ctx.open_engine().await?;
    ctx.refresh_online(&engine).await?;
    let status = engine.status();

    match output {
        OutputFormat::Text => {
            writeln!(out, "{}", format_status(&status, colors::should_colorize()))?;
            if !ctx.config.is_configured() {
                writeln!(out, "hint: run 'tq init --url <base_url>' to enable delivery")?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&status)?)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
