// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod clear;
pub mod enqueue;
pub mod flush;
pub mod init;
pub mod list;
pub mod send;
pub mod status;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod watch;

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tq_core::Method;

use crate::config::{resolve_state_dir, Config};
use crate::error::{Error, Result};
use crate::state::StateDir;
use crate::sync::{
    AuthenticatedClient, Delivery, DeliveryError, DeliveryResponse, DeliveryResult,
    FileQueueStore, ReachabilityProbe, SyncEngine,
};

/// Engine as used by the commands: any delivery over the file store.
pub type Engine = SyncEngine<Arc<dyn Delivery>, FileQueueStore>;

/// Resolved state directory and configuration shared by the commands.
pub struct Context {
    pub state: StateDir,
    pub config: Config,
}

impl Context {
    /// Resolve the state directory and load its configuration.
    pub fn load(state_dir: Option<&Path>) -> Result<Self> {
        let state = StateDir::new(resolve_state_dir(state_dir));
        let config = Config::load(&state)?;
        Ok(Context::new(state, config))
    }

    pub fn new(state: StateDir, config: Config) -> Self {
        Context { state, config }
    }

    fn delivery(&self) -> Result<Arc<dyn Delivery>> {
        let Some(url) = &self.config.server.base_url else {
            return Ok(Arc::new(Unconfigured));
        };
        let client = AuthenticatedClient::new(url.clone(), self.config.request_timeout())?
            .with_token(self.config.token());
        client.on_session_invalidated(|| {
            tracing::warn!(
                "server rejected the token, update it with 'tq init --token' or TRANQUIL_TOKEN"
            );
        });
        Ok(Arc::new(client))
    }

    /// Open the durable queue and restore it into a new engine.
    ///
    /// Holds the queue lock until the engine is dropped.
    pub async fn open_engine(&self) -> Result<Arc<Engine>> {
        let store = self.state.open_store()?;
        let engine = SyncEngine::new(self.config.engine_config(), self.delivery()?, store)
            .with_last_sync(self.state.read_last_sync());

        let report = engine.load_from_durable_store().await?;
        tracing::debug!(
            restored = report.restored,
            expired = report.expired,
            exhausted = report.exhausted,
            malformed = report.malformed,
            "queue loaded"
        );
        Ok(Arc::new(engine))
    }

    pub fn probe(&self) -> Result<ReachabilityProbe> {
        Ok(ReachabilityProbe::new(
            self.config.probe_url()?,
            self.config.probe_interval(),
            self.config.request_timeout(),
        )?)
    }

    /// Probe once and record the result in the engine. Unconfigured clients
    /// are always offline.
    pub async fn refresh_online(&self, engine: &Engine) -> Result<bool> {
        let online = if self.config.is_configured() {
            self.probe()?.check().await
        } else {
            false
        };
        engine.set_online(online);
        Ok(online)
    }

    /// Persist the engine's last sync time, if any.
    pub fn record_last_sync(&self, engine: &Engine) -> Result<()> {
        if let Some(ts) = engine.last_sync_time() {
            self.state.write_last_sync(ts)?;
        }
        Ok(())
    }
}

/// Delivery used before a server is configured. Every attempt fails.
struct Unconfigured;

impl Delivery for Unconfigured {
    fn send<'a>(
        &'a self,
        _endpoint: &'a str,
        _method: Method,
        _payload: Option<&'a Value>,
    ) -> Pin<Box<dyn Future<Output = DeliveryResult<DeliveryResponse>> + Send + 'a>> {
        Box::pin(async { Err(DeliveryError::Network("no server configured".into())) })
    }
}

/// Parse a `--data` argument into a JSON payload.
pub fn parse_payload(data: Option<&str>) -> Result<Option<Value>> {
    data.map(|raw| serde_json::from_str(raw).map_err(|e| Error::InvalidPayload(e.to_string())))
        .transpose()
}
