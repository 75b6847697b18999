// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use super::Context;
use crate::error::Result;

pub async fn run(ctx: &Context, out: &mut impl Write) -> Result<()> {
    let engine = ctx.open_engine().await?;
    let removed = engine.clear().await?;
    writeln!(
        out,
        "Cleared {removed} pending operation{}",
        if removed == 1 { "" } else { "s" }
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
