// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! tq-core: Shared library for the tranquil offline request queue
//!
//! This crate provides the queued-operation data model, id generation,
//! clock abstraction, and whole-collection blob persistence used by the
//! `tq` client and its synchronization engine.

pub mod blob;
pub mod clock;
pub mod error;
pub mod id;
pub mod op;

pub use clock::{ClockSource, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use op::{Method, OpId, PendingOperation, DEFAULT_MAX_RETRIES};
