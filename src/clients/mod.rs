//! Request execution for the Smithery registry API.
//!
//! This module turns an operation-level [`HttpRequest`] into a typed
//! [`Outcome`]: it assembles the wire request, sends it through a
//! [`Transport`], classifies the response with a [`ResponseMatcher`] and
//! retries under a [`RetryConfig`].
//!
//! # Overview
//!
//! - [`Executor`]: Runs one logical operation, including retries
//! - [`HttpClient`]: The default reqwest-backed [`Transport`]
//! - [`HttpRequest`] / [`WireRequest`]: The operation request and its
//!   transport-ready form
//! - [`RequestOptions`]: Per-call overrides (timeout, headers, retries,
//!   server URL, cancellation)
//! - [`RetryConfig`] / [`RetryPolicy`]: Backoff configuration and decisions
//! - [`ResponseMatcher`]: Ordered status-to-outcome tables
//! - [`SdkHooks`]: Callbacks around every attempt
//! - [`RegistryError`]: The closed set of failures
//!
//! # Retry Behavior
//!
//! With the default configuration:
//!
//! - **5XX and 429**: Retried with exponential backoff (500 ms, x1.5, capped at 60 s)
//! - **`Retry-After`**: Replaces the computed delay when present
//! - **Connection failures and timeouts**: Retried
//! - **401 and other 4XX**: Returned immediately
//!
//! No attempt starts after `max_elapsed_time` (one hour by default).
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use smithery_sdk::SdkConfig;
//! use smithery_sdk::clients::{
//!     Executor, HttpClient, HttpMethod, HttpRequest, RequestOptions, ResponseKind,
//!     ResponseMatcher,
//! };
//!
//! let executor = Executor::new(Arc::new(HttpClient::new()?), Arc::new(SdkConfig::default()));
//! let request = HttpRequest::builder(HttpMethod::Get, "/servers").build()?;
//! let matcher = ResponseMatcher::<serde_json::Value>::new().on(200, ResponseKind::Success);
//!
//! let body = executor.execute(&request, &matcher, &RequestOptions::new()).await?;
//! ```

mod errors;
mod executor;
mod hooks;
mod http_client;
mod http_request;
mod http_response;
mod matcher;
mod retry;
mod transport;

pub use errors::{
    ApiError, InvalidHttpRequestError, Outcome, RegistryError, ResponseValidationError,
    TransportError,
};
pub use executor::Executor;
pub use hooks::SdkHooks;
pub use http_client::HttpClient;
pub(crate) use http_request::append_query;
pub use http_request::{
    DataType, HttpMethod, HttpRequest, HttpRequestBuilder, RequestOptions, WireRequest,
};
pub use http_response::HttpResponse;
pub use matcher::{ResponseKind, ResponseMatcher};
pub use retry::{RetryConfig, RetryDecision, RetryPolicy, RetryStrategy, StatusPattern};
pub use transport::Transport;
