// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity observation.
//!
//! [`ConnectivityObserver`] turns a raw reachability signal into a single
//! boolean and emits one event per edge on its [`Transitions`] stream. It
//! holds no retry or queuing logic. [`ReachabilityProbe`] produces the raw
//! signal by polling the server, and [`spawn_transition_listener`] forwards
//! transitions into the engine.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::delivery::Delivery;
use super::engine::SyncEngine;
use super::store::QueueStore;

/// Receiving side of an observer's transition stream.
pub struct Transitions {
    rx: mpsc::UnboundedReceiver<bool>,
}

impl Transitions {
    /// Next transition, or `None` once the observer is dropped.
    pub async fn recv(&mut self) -> Option<bool> {
        self.rx.recv().await
    }

    /// Next transition if one is already buffered.
    pub fn try_recv(&mut self) -> Option<bool> {
        self.rx.try_recv().ok()
    }
}

/// Tracks reachability and reports edge transitions to one subscriber.
pub struct ConnectivityObserver {
    online: Mutex<bool>,
    tx: mpsc::UnboundedSender<bool>,
}

impl ConnectivityObserver {
    pub fn new(initial: bool) -> (Self, Transitions) {
        let (tx, rx) = mpsc::unbounded_channel();
        let observer = ConnectivityObserver {
            online: Mutex::new(initial),
            tx,
        };
        (observer, Transitions { rx })
    }

    pub fn current_status(&self) -> bool {
        *self.online.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a raw reachability signal.
    ///
    /// Returns `true` if the signal changed the state, in which case exactly
    /// one event was emitted. Repeated signals of the same state are ignored.
    pub fn report(&self, reachable: bool) -> bool {
        let mut online = self.online.lock().unwrap_or_else(|e| e.into_inner());
        if *online == reachable {
            return false;
        }
        *online = reachable;
        tracing::info!(online = reachable, "connectivity changed");
        if self.tx.send(reachable).is_err() {
            tracing::debug!("no transition subscriber");
        }
        true
    }
}

/// Polls a URL to decide whether the server is reachable.
///
/// Any HTTP response, whatever its status, counts as reachable. Transport
/// errors and timeouts count as unreachable.
pub struct ReachabilityProbe {
    http: reqwest::Client,
    url: String,
    interval: Duration,
}

impl ReachabilityProbe {
    pub fn new(url: impl Into<String>, interval: Duration, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(ReachabilityProbe {
            http,
            url: url.into(),
            interval,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Probe once.
    pub async fn check(&self) -> bool {
        match self.http.get(&self.url).send().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(url = %self.url, error = %e, "probe failed");
                false
            }
        }
    }

    /// Probe on every interval tick and report into `observer` until cancelled.
    pub async fn run(&self, observer: &ConnectivityObserver, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => {}
            }
            let reachable = tokio::select! {
                _ = cancel.cancelled() => return,
                reachable = self.check() => reachable,
            };
            observer.report(reachable);
        }
    }
}

/// Feed the observer's state into `engine` and forward every later transition.
///
/// The task ends when the observer is dropped.
pub fn spawn_transition_listener<D, S>(
    engine: Arc<SyncEngine<D, S>>,
    observer: &ConnectivityObserver,
    mut transitions: Transitions,
) -> JoinHandle<()>
where
    D: Delivery + 'static,
    S: QueueStore + 'static,
{
    let initial = observer.current_status();
    tokio::spawn(async move {
        engine.notify_online_status(initial);
        while let Some(online) = transitions.recv().await {
            engine.notify_online_status(online);
        }
        tracing::debug!("transition stream closed");
    })
}
