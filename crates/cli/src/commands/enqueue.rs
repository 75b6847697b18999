// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use super::{parse_payload, Context};
use crate::cli::MutationArgs;
use crate::error::Result;

/// Queue a mutation without contacting the server. Prints the operation id.
pub async fn run(ctx: &Context, args: MutationArgs, out: &mut impl Write) -> Result<()> {
    let payload = parse_payload(args.data.as_deref())?;
    let engine = ctx.open_engine().await?;

    let id = engine
        .enqueue(&args.endpoint, args.method.into(), payload)
        .await?;

    writeln!(out, "{id}")?;
    Ok(())
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
