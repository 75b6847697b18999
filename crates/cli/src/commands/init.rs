// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use crate::config::{validate_url, Config};
use crate::error::Result;
use crate::state::StateDir;

/// Point the client at a server, keeping any existing sync settings.
pub fn run(state: &StateDir, url: String, token: Option<String>, out: &mut impl Write) -> Result<()> {
    validate_url(&url)?;

    let mut config = Config::load(state).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "replacing unreadable config");
        Config::default()
    });
    config.server.base_url = Some(url.trim_end_matches('/').to_string());
    if let Some(token) = token {
        config.server.token = Some(token);
    }
    config.save(state)?;

    writeln!(
        out,
        "Configured {} in {}",
        config.base_url()?,
        state.config_path().display()
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
