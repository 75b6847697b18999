// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tranquil - an offline-first request queue for REST clients.
//!
//! This crate provides the functionality behind the `tq` CLI tool: a durable
//! queue of mutating requests that could not reach the server, and a
//! synchronization engine that replays them once connectivity returns.
//!
//! # Main Components
//!
//! - [`sync::SyncEngine`] - owns the queue and the flush policy
//! - [`sync::FileQueueStore`] - durable whole-collection queue storage
//! - [`sync::AuthenticatedClient`] - bearer-token HTTP delivery
//! - [`sync::ConnectivityObserver`] - reachability transitions
//! - [`Config`] - client configuration (`<state_dir>/config.toml`)
//! - [`Error`] - error types for all operations
//!
//! # Embedding
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tranquil::sync::{AuthenticatedClient, EngineConfig, FileQueueStore, SyncEngine, QUEUE_KEY};
//!
//! let client = AuthenticatedClient::new("https://api.example.com", Duration::from_secs(30))?;
//! let store = FileQueueStore::open(&state_dir, QUEUE_KEY)?;
//! let engine = Arc::new(SyncEngine::new(EngineConfig::default(), client, store));
//! engine.load_from_durable_store().await?;
//! engine.enqueue("/activities", Method::Create, Some(payload)).await?;
//! engine.notify_online_status(true);
//! ```

mod cli;
pub mod colors;
mod commands;
mod display;
mod env;
pub mod help;
pub mod logging;
mod state;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, MethodArg, MutationArgs, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};
pub use state::StateDir;

use clap::CommandFactory;
use clap_complete::generate;

use commands::Context;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub async fn run(cli: Cli) -> Result<()> {
    let mut out = std::io::stdout();
    let state_dir = cli.state_dir.as_deref();

    match cli.command {
        Command::Init { url, token } => {
            let state = StateDir::new(config::resolve_state_dir(state_dir));
            commands::init::run(&state, url, token, &mut out)
        }
        Command::Completion { shell } => {
            generate(shell, &mut Cli::command(), "tq", &mut out);
            Ok(())
        }
        Command::Enqueue(args) => {
            commands::enqueue::run(&Context::load(state_dir)?, args, &mut out).await
        }
        Command::Send(args) => commands::send::run(&Context::load(state_dir)?, args, &mut out).await,
        Command::List { output } => {
            commands::list::run(&Context::load(state_dir)?, output, &mut out).await
        }
        Command::Status { output } => {
            commands::status::run(&Context::load(state_dir)?, output, &mut out).await
        }
        Command::Flush => commands::flush::run(&Context::load(state_dir)?, &mut out).await,
        Command::Clear => commands::clear::run(&Context::load(state_dir)?, &mut out).await,
        Command::Watch => commands::watch::run(&Context::load(state_dir)?, &mut out).await,
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
