//! The transport boundary.
//!
//! The executor never touches sockets itself. It hands a [`WireRequest`] to a
//! [`Transport`] and gets back either a complete [`HttpResponse`] (any status)
//! or a [`TransportError`] when no response was obtained.
//! [`HttpClient`](crate::clients::HttpClient) is the reqwest-backed
//! implementation; tests substitute scripted transports.

use async_trait::async_trait;

use crate::clients::errors::TransportError;
use crate::clients::http_request::WireRequest;
use crate::clients::http_response::HttpResponse;

/// Sends one request and returns the server's answer.
///
/// Implementations must not retry; retries are the executor's job. The
/// request's `timeout` is enforced by the executor, so implementations may
/// ignore it. Dropping the returned future must abandon the exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a single HTTP exchange.
    async fn send(&self, request: &WireRequest) -> Result<HttpResponse, TransportError>;
}
