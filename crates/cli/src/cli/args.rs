// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` by the commands that
//! issue a mutation (`enqueue` and `send`).

use clap::{Args, ValueEnum};
use tq_core::Method;

use super::non_empty_string;

/// Mutation kind as accepted on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// POST
    #[default]
    #[value(alias = "post")]
    Create,
    /// PUT
    #[value(alias = "put")]
    Replace,
    /// DELETE (no payload)
    Delete,
}

impl From<MethodArg> for Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Create => Method::Create,
            MethodArg::Replace => Method::Replace,
            MethodArg::Delete => Method::Delete,
        }
    }
}

/// A mutating request: endpoint, method, and optional JSON payload.
#[derive(Args, Clone, Debug)]
pub struct MutationArgs {
    /// Resource path, relative to the server base URL
    #[arg(value_parser = non_empty_string)]
    pub endpoint: String,

    /// Mutation kind
    #[arg(long, short, value_enum, default_value_t = MethodArg::Create)]
    pub method: MethodArg,

    /// JSON payload (ignored for delete)
    #[arg(long, short, value_name = "json")]
    pub data: Option<String>,
}
