// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use super::Context;
use crate::cli::OutputFormat;
use crate::display::format_op_line;
use crate::error::Result;

pub async fn run(ctx: &Context, output: OutputFormat, out: &mut impl Write) -> Result<()> {
    let engine = ctx.open_engine().await?;
    let ops = engine.pending_operations().await;

    match output {
        OutputFormat::Text => {
            if ops.is_empty() {
                writeln!(out, "No pending operations")?;
            }
            for op in &ops {
                writeln!(out, "{}", format_op_line(op))?;
            }
        }
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&ops)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
