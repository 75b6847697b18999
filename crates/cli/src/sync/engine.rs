// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Synchronization engine.
//!
//! The engine is the only owner of the pending queue. Every change to the
//! in-memory queue is followed by a full rewrite of the durable copy, and
//! every state change is published to subscribers as a [`SyncStatus`].

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tq_core::id::is_valid_op_id;
use tq_core::{ClockSource, Method, OpId, PendingOperation, SystemClock, DEFAULT_MAX_RETRIES};

use super::delivery::{Delivery, DeliveryResponse};
use super::store::{PersistenceError, PersistenceResult, QueueStore};

/// Error type for engine operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The durable copy could not be written.
    #[error("failed to persist queue: {0}")]
    Persistence(#[from] PersistenceError),

    /// The operation could not be constructed.
    #[error(transparent)]
    InvalidOperation(#[from] tq_core::Error),
}

/// Result type for engine operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Engine tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Delivery attempts before an operation is dropped.
    pub max_retries: u32,
    /// Pause after coming back online before the automatic flush.
    pub settle_delay: Duration,
    /// Maximum age of a queued operation.
    pub retention: chrono::Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_retries: DEFAULT_MAX_RETRIES,
            settle_delay: Duration::from_secs(2),
            retention: chrono::Duration::days(7),
        }
    }
}

/// Snapshot of the engine's observable state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub pending_count: usize,
    pub is_online: bool,
    pub is_syncing: bool,
    pub last_sync_time: Option<DateTime<Utc>>,
}

/// Tally of one flush pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    pub attempted: usize,
    pub delivered: usize,
    pub retained: usize,
    pub dropped: usize,
}

/// Why a flush returned without attempting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Offline,
    AlreadySyncing,
    EmptyQueue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    Completed(FlushReport),
    Skipped(SkipReason),
}

/// Tally of a startup load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub restored: usize,
    pub expired: usize,
    pub exhausted: usize,
    /// Records with a malformed or duplicate id.
    pub malformed: usize,
}

/// Result of an offline-first mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Delivered(DeliveryResponse),
    Queued(OpId),
}

/// Clears the syncing flag when a flush pass ends, including by cancellation.
struct SyncingFlag<'a>(&'a AtomicBool);

impl<'a> SyncingFlag<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| SyncingFlag(flag))
    }
}

impl Drop for SyncingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Owns the pending queue and its flush policy.
pub struct SyncEngine<D: Delivery, S: QueueStore> {
    config: EngineConfig,
    delivery: D,
    store: S,
    clock: Arc<dyn ClockSource>,
    queue: tokio::sync::Mutex<Vec<PendingOperation>>,
    pending: AtomicUsize,
    online: AtomicBool,
    syncing: AtomicBool,
    /// Bumped on every connectivity transition; a scheduled flush only runs
    /// if it still matches.
    generation: AtomicU64,
    /// Set while the durable copy lags the in-memory queue after a failed
    /// save. Cleared by the next successful rewrite.
    unsaved: AtomicBool,
    last_sync: Mutex<Option<DateTime<Utc>>>,
    status: watch::Sender<SyncStatus>,
}

impl<D: Delivery, S: QueueStore> SyncEngine<D, S> {
    /// Create an engine with an empty queue, starting offline.
    pub fn new(config: EngineConfig, delivery: D, store: S) -> Self {
        let (status, _) = watch::channel(SyncStatus::default());
        SyncEngine {
            config,
            delivery,
            store,
            clock: Arc::new(SystemClock),
            queue: tokio::sync::Mutex::new(Vec::new()),
            pending: AtomicUsize::new(0),
            online: AtomicBool::new(false),
            syncing: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            unsaved: AtomicBool::new(false),
            last_sync: Mutex::new(None),
            status,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Seed the last sync time, e.g. from a previous run.
    pub fn with_last_sync(self, last_sync: Option<DateTime<Utc>>) -> Self {
        *self.last_sync.lock().unwrap_or_else(|e| e.into_inner()) = last_sync;
        self.publish();
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pending_count(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Snapshot of the queue in delivery order.
    pub async fn pending_operations(&self) -> Vec<PendingOperation> {
        self.queue.lock().await.clone()
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    pub fn last_sync_time(&self) -> Option<DateTime<Utc>> {
        *self.last_sync.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            pending_count: self.pending_count(),
            is_online: self.is_online(),
            is_syncing: self.is_syncing(),
            last_sync_time: self.last_sync_time(),
        }
    }

    /// Subscribe to status changes. The receiver starts at the current status.
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    fn publish(&self) {
        let next = self.status();
        self.status.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }

    fn commit(&self, queue: &mut Vec<PendingOperation>, next: Vec<PendingOperation>) {
        *queue = next;
        self.pending.store(queue.len(), Ordering::SeqCst);
    }

    /// Rewrite the durable copy, tracking whether it now matches memory.
    async fn save(&self, ops: &[PendingOperation]) -> PersistenceResult<()> {
        let saved = self.store.save(ops).await;
        self.unsaved.store(saved.is_err(), Ordering::SeqCst);
        saved
    }

    /// Whether the durable copy is behind the in-memory queue.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved.load(Ordering::SeqCst)
    }

    /// Retry a rewrite that failed earlier. A no-op when the durable copy
    /// is current.
    pub async fn persist_pending_changes(&self) -> SyncResult<()> {
        if !self.has_unsaved_changes() {
            return Ok(());
        }
        let queue = self.queue.lock().await;
        self.save(&queue).await?;
        tracing::info!(pending = queue.len(), "durable queue caught up");
        Ok(())
    }

    /// Queue a mutation for later delivery.
    ///
    /// The operation is persisted before it becomes visible in memory; if the
    /// write fails the queue is unchanged and the error is returned.
    pub async fn enqueue(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<Value>,
    ) -> SyncResult<OpId> {
        let op = PendingOperation::new(
            endpoint,
            method,
            payload,
            self.clock.now(),
            self.config.max_retries,
        )?;
        let id = op.id.clone();

        let mut queue = self.queue.lock().await;
        let mut next = queue.clone();
        next.push(op);
        self.save(&next).await?;
        self.commit(&mut queue, next);
        drop(queue);

        tracing::info!(%id, endpoint, %method, "operation queued");
        self.publish();
        Ok(id)
    }

    /// Record reachability without scheduling a flush.
    pub fn set_online(&self, online: bool) {
        if self.online.swap(online, Ordering::SeqCst) != online {
            self.generation.fetch_add(1, Ordering::SeqCst);
            self.publish();
        }
    }

    /// Handle a connectivity signal.
    ///
    /// On an offline to online transition a flush is scheduled after the
    /// settle delay and its task handle returned. The scheduled flush is
    /// abandoned if another transition arrives first.
    pub fn notify_online_status(self: &Arc<Self>, online: bool) -> Option<JoinHandle<()>>
    where
        D: 'static,
        S: 'static,
    {
        if self.online.swap(online, Ordering::SeqCst) == online {
            return None;
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish();

        if !online {
            tracing::info!("offline, holding queued operations");
            return None;
        }

        let engine = Arc::clone(self);
        let delay = self.config.settle_delay;
        tracing::info!(?delay, "online, scheduling flush");
        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if engine.generation.load(Ordering::SeqCst) != generation || !engine.is_online() {
                tracing::debug!("connectivity changed during settle delay, skipping flush");
                return;
            }
            match engine.flush().await {
                Ok(FlushOutcome::Completed(report)) => {
                    tracing::info!(?report, "automatic flush finished");
                }
                Ok(FlushOutcome::Skipped(reason)) => {
                    tracing::debug!(?reason, "automatic flush skipped");
                }
                Err(e) => tracing::error!(error = %e, "automatic flush failed"),
            }
        }))
    }

    /// Attempt delivery of every queued operation once, in order.
    ///
    /// Returns early without touching the queue when offline, when another
    /// pass is running, or when there is nothing to send. A rewrite left
    /// over from an earlier failed save is retried first in every case.
    pub async fn flush(&self) -> SyncResult<FlushOutcome> {
        self.persist_pending_changes().await?;
        if !self.is_online() {
            return Ok(FlushOutcome::Skipped(SkipReason::Offline));
        }
        let Some(flag) = SyncingFlag::acquire(&self.syncing) else {
            return Ok(FlushOutcome::Skipped(SkipReason::AlreadySyncing));
        };

        let snapshot = self.queue.lock().await.clone();
        if snapshot.is_empty() {
            drop(flag);
            return Ok(FlushOutcome::Skipped(SkipReason::EmptyQueue));
        }
        self.publish();
        tracing::info!(count = snapshot.len(), "flushing queue");

        let mut report = FlushReport::default();
        // id -> retained version, or None when the operation leaves the queue
        let mut outcomes: HashMap<OpId, Option<PendingOperation>> = HashMap::new();

        for op in snapshot {
            report.attempted += 1;
            let result = self
                .delivery
                .send(&op.endpoint, op.method, op.payload.as_ref())
                .await;
            match result {
                Ok(response) => {
                    tracing::debug!(id = %op.id, status = response.status, "delivered");
                    report.delivered += 1;
                    outcomes.insert(op.id, None);
                }
                Err(e) => {
                    let mut updated = op;
                    if updated.record_failure() {
                        tracing::warn!(
                            id = %updated.id,
                            attempt = updated.retry_count,
                            max = updated.max_retries,
                            error = %e,
                            "delivery failed, will retry"
                        );
                        report.retained += 1;
                        outcomes.insert(updated.id.clone(), Some(updated));
                    } else {
                        tracing::warn!(
                            id = %updated.id,
                            endpoint = %updated.endpoint,
                            error = %e,
                            "delivery failed, retries exhausted, dropping operation"
                        );
                        report.dropped += 1;
                        outcomes.insert(updated.id, None);
                    }
                }
            }
        }

        let mut queue = self.queue.lock().await;
        let mut next = Vec::with_capacity(queue.len());
        let mut unattempted = Vec::new();
        for op in queue.iter() {
            match outcomes.remove(&op.id) {
                Some(Some(retained)) => next.push(retained),
                Some(None) => {}
                None => unattempted.push(op.clone()),
            }
        }
        next.extend(unattempted);

        let saved = self.save(&next).await;
        self.commit(&mut queue, next);
        drop(queue);

        *self.last_sync.lock().unwrap_or_else(|e| e.into_inner()) = Some(self.clock.now());
        drop(flag);
        self.publish();

        saved?;
        Ok(FlushOutcome::Completed(report))
    }

    /// Deliver directly when online, otherwise (or on failure) queue.
    pub async fn dispatch(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<Value>,
    ) -> SyncResult<Dispatch> {
        if endpoint.trim().is_empty() {
            return Err(tq_core::Error::EmptyEndpoint.into());
        }
        if self.is_online() {
            let body = payload.as_ref().filter(|_| method.carries_payload());
            match self.delivery.send(endpoint, method, body).await {
                Ok(response) => return Ok(Dispatch::Delivered(response)),
                Err(e) => tracing::warn!(endpoint, error = %e, "direct delivery failed, queuing"),
            }
        }
        let id = self.enqueue(endpoint, method, payload).await?;
        Ok(Dispatch::Queued(id))
    }

    /// Restore the queue at startup.
    ///
    /// Stale records are purged (expired, out of retries, or with a bad id);
    /// if anything was purged the durable copy is rewritten. An unreadable store yields an empty queue.
    pub async fn load_from_durable_store(&self) -> SyncResult<LoadReport> {
        let loaded = self.store.load().await;
        let total = loaded.len();
        let now = self.clock.now();
        let retention = self.config.retention;

        let mut report = LoadReport::default();
        let mut seen = HashSet::new();
        let kept: Vec<PendingOperation> = loaded
            .into_iter()
            .filter(|op| {
                // flush merges outcomes by id, so ids must be well formed and unique
                if !is_valid_op_id(&op.id) || !seen.insert(op.id.clone()) {
                    report.malformed += 1;
                    false
                } else if op.is_expired(now, retention) {
                    report.expired += 1;
                    false
                } else if op.is_exhausted() {
                    report.exhausted += 1;
                    false
                } else {
                    true
                }
            })
            .collect();
        report.restored = kept.len();

        let mut queue = self.queue.lock().await;
        let saved = if kept.len() != total {
            tracing::info!(
                expired = report.expired,
                exhausted = report.exhausted,
                malformed = report.malformed,
                "purged stale operations"
            );
            self.save(&kept).await
        } else {
            Ok(())
        };
        self.commit(&mut queue, kept);
        drop(queue);
        self.publish();

        saved?;
        Ok(report)
    }

    /// Empty the queue and its durable copy. Returns how many were removed.
    pub async fn clear(&self) -> SyncResult<usize> {
        let mut queue = self.queue.lock().await;
        self.save(&[]).await?;
        let removed = queue.len();
        self.commit(&mut queue, Vec::new());
        drop(queue);

        tracing::info!(removed, "queue cleared");
        self.publish();
        Ok(removed)
    }
}
