// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal color utilities.
//!
//! Respects environment variables:
//! - `NO_COLOR=1`: Disables colors
//! - `COLOR=1`: Forces colors even without TTY

use std::io::IsTerminal;

use crate::env;

/// ANSI 256-color codes.
pub mod codes {
    /// Section headers: steel blue
    pub const HEADER: u8 = 74;
    /// Commands/literals: light grey
    pub const LITERAL: u8 = 250;
    /// Secondary detail: medium grey
    pub const CONTEXT: u8 = 245;
    /// Online / delivered
    pub const GOOD: u8 = 108;
    /// Offline / failing
    pub const BAD: u8 = 174;
}

const RESET: &str = "\x1b[0m";

fn enabled_for(is_tty: bool) -> bool {
    if env::no_color() {
        return false;
    }
    if env::force_color() {
        return true;
    }
    is_tty
}

/// Whether stdout output should be colored.
pub fn should_colorize() -> bool {
    enabled_for(std::io::stdout().is_terminal())
}

/// Whether stderr (log) output should be colored.
pub fn should_colorize_stderr() -> bool {
    enabled_for(std::io::stderr().is_terminal())
}

fn paint(code: u8, text: &str) -> String {
    format!("\x1b[38;5;{code}m{text}{RESET}")
}

pub fn header(text: &str) -> String {
    paint(codes::HEADER, text)
}

pub fn literal(text: &str) -> String {
    paint(codes::LITERAL, text)
}

pub fn context(text: &str) -> String {
    paint(codes::CONTEXT, text)
}

pub fn good(text: &str) -> String {
    paint(codes::GOOD, text)
}

pub fn bad(text: &str) -> String {
    paint(codes::BAD, text)
}

/// Colorize an examples help block.
///
/// Lines ending in `:` become headers. On other lines the command, which is
/// separated from its description by two or more spaces, becomes a literal.
pub fn examples(text: &str) -> String {
    if !should_colorize() {
        return text.to_string();
    }
    text.lines()
        .map(colorize_example_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn colorize_example_line(line: &str) -> String {
    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];

    if trimmed.ends_with(':') && !trimmed.contains("  ") {
        return format!("{indent}{}", header(trimmed));
    }
    match trimmed.find("  ") {
        Some(end) => {
            let (cmd, desc) = trimmed.split_at(end);
            format!("{indent}{}{desc}", literal(cmd))
        }
        None => line.to_string(),
    }
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
