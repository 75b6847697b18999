// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline request queue and synchronization engine.
//!
//! Lets the client keep accepting mutations while disconnected: operations
//! are recorded durably and replayed against the server once connectivity
//! returns.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐ transitions ┌──────────────┐   send    ┌──────────────┐
//! │ Connectivity │────────────►│  SyncEngine  │──────────►│   Delivery   │
//! │   Observer   │             │ (queue owner)│◄──────────│ (HTTP client)│
//! └──────────────┘             └──────────────┘           └──────────────┘
//!        ▲                            │
//!        │ report                     ▼ load / save
//! ┌──────────────┐             ┌──────────────┐
//! │ Reachability │             │  QueueStore  │  (whole-collection blob)
//! │    Probe     │             └──────────────┘
//! └──────────────┘
//! ```
//!
//! # Features
//!
//! - FIFO replay with a per-operation retry ceiling; one failure never stops
//!   the rest of the pass
//! - Durable queue rewritten in full after every mutation
//! - Expiry of operations older than the retention window at startup
//! - Settle delay after reconnecting before an automatic flush
//! - Injectable delivery and store traits for testing

mod connectivity;
mod delivery;
mod engine;
mod http;
mod store;

pub use connectivity::{
    spawn_transition_listener, ConnectivityObserver, ReachabilityProbe, Transitions,
};
pub use delivery::{Delivery, DeliveryError, DeliveryResponse, DeliveryResult};
pub use engine::{
    Dispatch, EngineConfig, FlushOutcome, FlushReport, LoadReport, SkipReason, SyncEngine,
    SyncError, SyncResult, SyncStatus,
};
pub use http::{AuthenticatedClient, SessionHook, DEFAULT_REQUEST_TIMEOUT};
pub use store::{
    FileQueueStore, MemoryQueueStore, PersistenceError, PersistenceResult, QueueStore, QUEUE_KEY,
};

#[cfg(test)]
mod test_helpers;
