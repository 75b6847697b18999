// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use super::{parse_payload, Context};
use crate::cli::MutationArgs;
use crate::display::format_dispatch;
use crate::error::Result;

/// Deliver a mutation now if the server answers, otherwise queue it.
pub async fn run(ctx: &Context, args: MutationArgs, out: &mut impl Write) -> Result<()> {
    let payload = parse_payload(args.data.as_deref())?;
    let engine = ctx.open_engine().await?;
    ctx.refresh_online(&engine).await?;

    let dispatch = engine
        .dispatch(&args.endpoint, args.method.into(), payload)
        .await?;

    writeln!(out, "{}", format_dispatch(&dispatch))?;
    Ok(())
}

#[cfg(test)]
#[path = "send_tests.rs"]
mod tests;
