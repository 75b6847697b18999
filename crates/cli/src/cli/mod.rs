// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use crate::colors;
use crate::help;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

pub use args::{MethodArg, MutationArgs};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "tq")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first request queue for a REST API")]
#[command(
    long_about = "Offline-first request queue for a REST API.\n\n\
    Mutations that cannot reach the server are stored durably and replayed \
    in order once connectivity returns."
)]
#[command(help_template = help::template())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
pub struct Cli {
    /// Directory holding config, queue, and lock files
    #[arg(long, global = true, value_name = "path")]
    pub state_dir: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Setup
    // ─────────────────────────────────────────────────────────────────────────
    /// Configure the server to sync with
    #[command(after_help = colors::examples("\
Examples:
  tq init --url https://api.example.com              Set the server
  tq init --url http://localhost:8080 --token abc    Set server and token"))]
    Init {
        /// Server base URL (http:// or https://)
        #[arg(long)]
        url: String,

        /// Bearer token sent with every request
        #[arg(long)]
        token: Option<String>,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Queue
    // ─────────────────────────────────────────────────────────────────────────
    /// Queue a mutation without contacting the server
    #[command(after_help = colors::examples("\
Examples:
  tq enqueue /activities -d '{\"steps\":1200}'    Queue a create
  tq enqueue /items/3 -m replace -d '{\"n\":3}'   Queue a replace
  tq enqueue /items/3 -m delete                  Queue a delete"))]
    Enqueue(MutationArgs),

    /// Send a mutation now, queuing it if the server is unreachable
    Send(MutationArgs),

    /// List pending operations in delivery order
    List {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Show queue and connectivity status
    Status {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Deliver pending operations now if the server is reachable
    Flush,

    /// Discard every pending operation
    Clear,

    /// Keep syncing in the foreground until interrupted
    Watch,

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
