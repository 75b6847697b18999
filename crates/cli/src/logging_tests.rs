// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    quiet = { 0, "warn" },
    verbose = { 1, "info" },
    very_verbose = { 2, "debug" },
    beyond = { 5, "debug" },
)]
fn test_default_directive(verbosity: u8, expected: &str) {
    assert_eq!(default_directive(verbosity), expected);
}

#[test]
fn test_init_twice_is_harmless() {
    init(0);
    init(2);
}
