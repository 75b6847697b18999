// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use super::delivery_tests::MockDelivery;
use super::engine::{EngineConfig, SyncEngine};
use super::store::MemoryQueueStore;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use tq_core::{ManualClock, Method, PendingOperation};

pub type TestEngine = SyncEngine<MockDelivery, MemoryQueueStore>;

/// Fixed reference time for deterministic tests.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// Create a CREATE operation enqueued at [`base_time`].
pub fn make_op(endpoint: &str) -> PendingOperation {
    make_op_at(endpoint, 0)
}

/// Create a CREATE operation enqueued `days_ago` days before [`base_time`].
pub fn make_op_at(endpoint: &str, days_ago: i64) -> PendingOperation {
    PendingOperation::new(
        endpoint,
        Method::Create,
        Some(json!({ "endpoint": endpoint })),
        base_time() - Duration::days(days_ago),
        3,
    )
    .unwrap()
}

pub struct Harness {
    pub engine: Arc<TestEngine>,
    pub delivery: MockDelivery,
    pub store: MemoryQueueStore,
    pub clock: Arc<ManualClock>,
}

/// Engine over a mock delivery and in-memory store, with a manual clock at
/// [`base_time`]. Starts offline.
pub fn harness() -> Harness {
    harness_with(EngineConfig::default())
}

pub fn harness_with(config: EngineConfig) -> Harness {
    let delivery = MockDelivery::new();
    let store = MemoryQueueStore::new();
    let clock = Arc::new(ManualClock::new(base_time()));
    let engine = SyncEngine::new(config, delivery.clone(), store.clone())
        .with_clock(Arc::clone(&clock) as Arc<dyn tq_core::ClockSource>);
    Harness {
        engine: Arc::new(engine),
        delivery,
        store,
        clock,
    }
}

impl Harness {
    /// Put the engine online without scheduling an automatic flush.
    pub fn online(&self) {
        self.engine.set_online(true);
    }

    pub async fn enqueue(&self, endpoint: &str) -> String {
        self.engine
            .enqueue(endpoint, Method::Create, Some(json!({ "endpoint": endpoint })))
            .await
            .unwrap()
    }
}
