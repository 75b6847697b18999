// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Delivery abstraction for replaying operations against the server.
//!
//! The engine only needs "send this mutation and tell me whether it landed",
//! so it talks to a [`Delivery`] rather than an HTTP client directly.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tq_core::Method;

/// Error type for delivery attempts.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The server rejected the credentials.
    #[error("unauthorized\n  hint: the session is no longer valid, sign in again")]
    Unauthorized,

    /// The server answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// No response arrived within the request timeout.
    #[error("request timed out")]
    Timeout,

    /// The request never reached the server.
    #[error("network error: {0}")]
    Network(String),
}

impl DeliveryError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DeliveryError::Unauthorized)
    }
}

/// Result type for delivery attempts.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// A successful response.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryResponse {
    pub status: u16,
    /// Decoded JSON body, `None` when the body was empty or not JSON.
    pub body: Option<Value>,
}

/// Sends a single mutating request to the server.
///
/// This trait abstracts over the network layer, allowing for easy testing
/// with mock implementations.
pub trait Delivery: Send + Sync {
    /// Send one request. Success means a 2xx response.
    fn send<'a>(
        &'a self,
        endpoint: &'a str,
        method: Method,
        payload: Option<&'a Value>,
    ) -> Pin<Box<dyn Future<Output = DeliveryResult<DeliveryResponse>> + Send + 'a>>;
}

impl<D: Delivery + ?Sized> Delivery for std::sync::Arc<D> {
    fn send<'a>(
        &'a self,
        endpoint: &'a str,
        method: Method,
        payload: Option<&'a Value>,
    ) -> Pin<Box<dyn Future<Output = DeliveryResult<DeliveryResponse>> + Send + 'a>> {
        (**self).send(endpoint, method, payload)
    }
}
