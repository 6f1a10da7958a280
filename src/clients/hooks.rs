//! Request lifecycle hooks.
//!
//! Hooks observe (and may adjust) every attempt the executor makes. They are
//! registered on the [`SmitheryRegistry`](crate::SmitheryRegistry) and run in
//! registration order.
//!
//! # Example
//!
//! ```rust
//! use smithery_sdk::clients::{SdkHooks, WireRequest};
//!
//! struct Tracing;
//!
//! impl SdkHooks for Tracing {
//!     fn before_request(&self, request: &mut WireRequest) {
//!         request
//!             .headers
//!             .insert("X-Trace-Id".to_string(), "trace-1".to_string());
//!     }
//! }
//! ```

use crate::clients::errors::TransportError;
use crate::clients::http_request::WireRequest;
use crate::clients::http_response::HttpResponse;

/// Callbacks invoked around each attempt. Every method defaults to a no-op.
pub trait SdkHooks: Send + Sync {
    /// Called before each attempt is handed to the transport.
    fn before_request(&self, _request: &mut WireRequest) {}

    /// Called when the transport returned a response, whatever its status.
    fn after_response(&self, _request: &WireRequest, _response: &HttpResponse) {}

    /// Called when the transport failed to obtain a response.
    fn after_error(&self, _request: &WireRequest, _error: &TransportError) {}
}
