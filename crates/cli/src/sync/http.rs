// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bearer-token HTTP client used to deliver queued operations.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use serde_json::Value;
use tq_core::Method;

use super::delivery::{Delivery, DeliveryError, DeliveryResponse, DeliveryResult};

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Callback fired when the server rejects the session with a 401.
pub type SessionHook = Arc<dyn Fn() + Send + Sync>;

/// HTTP client that attaches a bearer token to every request.
///
/// A 401 response invokes the registered session hook and is then reported
/// as an ordinary [`DeliveryError::Unauthorized`] failure.
pub struct AuthenticatedClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
    session_hook: RwLock<Option<SessionHook>>,
}

impl AuthenticatedClient {
    /// Create a client for `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(AuthenticatedClient {
            http,
            base_url: base_url.into(),
            token: RwLock::new(None),
            session_hook: RwLock::new(None),
        })
    }

    pub fn with_token(self, token: Option<String>) -> Self {
        self.set_token(token);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }

    pub fn clear_token(&self) {
        self.set_token(None);
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Register the hook invoked on a 401 response, replacing any previous one.
    pub fn on_session_invalidated<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.session_hook.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::new(hook));
    }

    /// Join `endpoint` onto the base URL with exactly one slash.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    fn invalidate_session(&self) {
        let hook = self
            .session_hook
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    async fn execute(
        &self,
        endpoint: &str,
        method: Method,
        payload: Option<&Value>,
    ) -> DeliveryResult<DeliveryResponse> {
        let url = self.url_for(endpoint);
        let mut request = match method {
            Method::Create => self.http.post(&url),
            Method::Replace => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };
        if let Some(token) = self.token() {
            request = request.bearer_auth(token);
        }
        if method.carries_payload() {
            if let Some(payload) = payload {
                request = request.json(payload);
            }
        }

        tracing::debug!(verb = method.http_verb(), %url, "sending request");
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!(%url, "session rejected by server");
            self.invalidate_session();
            return Err(DeliveryError::Unauthorized);
        }

        let text = response.text().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };
        Ok(DeliveryResponse {
            status: status.as_u16(),
            body,
        })
    }
}

fn map_transport_error(e: reqwest::Error) -> DeliveryError {
    if e.is_timeout() {
        DeliveryError::Timeout
    } else {
        DeliveryError::Network(e.to_string())
    }
}

impl Delivery for AuthenticatedClient {
    fn send<'a>(
        &'a self,
        endpoint: &'a str,
        method: Method,
        payload: Option<&'a Value>,
    ) -> Pin<Box<dyn Future<Output = DeliveryResult<DeliveryResponse>> + Send + 'a>> {
        Box::pin(self.execute(endpoint, method, payload))
    }
}
