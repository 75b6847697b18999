// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument parsing tests for `enqueue` and `send`.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use yare::parameterized;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

fn mutation(cli: Cli) -> MutationArgs {
    match cli.command {
        Command::Enqueue(args) | Command::Send(args) => args,
        other => panic!("Expected a mutation command, got {other:?}"),
    }
}

#[test]
fn test_enqueue_defaults_to_create() {
    let args = mutation(parse(&["tq", "enqueue", "/items"]).unwrap());

    assert_eq!(args.endpoint, "/items");
    assert_eq!(args.method, MethodArg::Create);
    assert_eq!(args.data, None);
}

#[test]
fn test_enqueue_with_data() {
    let args = mutation(parse(&["tq", "enqueue", "/items", "-d", "{\"a\":1}"]).unwrap());
    assert_eq!(args.data.as_deref(), Some("{\"a\":1}"));
}

#[parameterized(
    create = { "create", MethodArg::Create },
    post_alias = { "post", MethodArg::Create },
    replace = { "replace", MethodArg::Replace },
    put_alias = { "put", MethodArg::Replace },
    delete = { "delete", MethodArg::Delete },
)]
fn test_method_values(value: &str, expected: MethodArg) {
    let args = mutation(parse(&["tq", "send", "/x", "--method", value]).unwrap());
    assert_eq!(args.method, expected);
}

#[parameterized(
    create = { MethodArg::Create, tq_core::Method::Create },
    replace = { MethodArg::Replace, tq_core::Method::Replace },
    delete = { MethodArg::Delete, tq_core::Method::Delete },
)]
fn test_method_arg_into_method(arg: MethodArg, expected: tq_core::Method) {
    assert_eq!(tq_core::Method::from(arg), expected);
}

#[test]
fn test_unknown_method_rejected() {
    assert!(parse(&["tq", "enqueue", "/x", "-m", "patch"]).is_err());
}

#[parameterized(
    empty = { "" },
    whitespace = { "   " },
)]
fn test_blank_endpoint_rejected(endpoint: &str) {
    assert!(parse(&["tq", "enqueue", endpoint]).is_err());
}

#[test]
fn test_endpoint_required() {
    assert!(parse(&["tq", "send"]).is_err());
}
