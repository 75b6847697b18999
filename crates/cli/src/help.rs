// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use crate::colors;
use clap::builder::styling::{Ansi256Color, Color, Style, Styles};

fn fg(code: u8) -> Style {
    Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))))
}

/// Clap styles matching [`colors::codes`].
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    Styles::styled()
        .header(fg(colors::codes::HEADER))
        .usage(fg(colors::codes::HEADER))
        .literal(fg(colors::codes::LITERAL))
        .placeholder(fg(colors::codes::CONTEXT))
        .valid(fg(colors::codes::CONTEXT))
}

/// Main help template: commands first, then options.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{}
{{subcommands}}

{}
{{options}}{{after-help}}",
        colors::header("Commands:"),
        colors::header("Options:")
    )
}

/// Quickstart help shown after options in main help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Get started:
  tq init --url https://api.example.com    Point at a server
  tq send /items -d '{\"name\":\"x\"}'         Send now, or queue if offline
  tq status                                Show pending count and connectivity
  tq watch                                 Sync automatically on reconnect",
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
