//! HTTP-level error types for the Smithery SDK.
//!
//! Every call resolves to an [`Outcome`]: the decoded success payload or
//! exactly one [`RegistryError`] variant. Matching on the variant is enough
//! to act on a failure; no message parsing is required.
//!
//! # Taxonomy
//!
//! - Caller input rejected before sending: [`RegistryError::InvalidRequest`],
//!   [`RegistryError::InvalidHttpRequest`]
//! - No response obtained: [`RegistryError::Connection`],
//!   [`RegistryError::Timeout`], [`RegistryError::Aborted`],
//!   [`RegistryError::Protocol`]
//! - Server answered with a classified status: [`RegistryError::Unauthorized`],
//!   [`RegistryError::NotFound`], [`RegistryError::Server`],
//!   [`RegistryError::Client`]
//! - Server answered but the body did not decode:
//!   [`RegistryError::ResponseValidation`]
//! - Status matched no declared pattern: [`RegistryError::UnexpectedStatus`]
//!
//! # Example
//!
//! ```rust,ignore
//! use smithery_sdk::RegistryError;
//!
//! match registry.servers().get(&request, &options).await {
//!     Ok(server) => println!("{}", server.display_name),
//!     Err(RegistryError::NotFound(e)) => println!("no such server ({})", e.status),
//!     Err(RegistryError::Unauthorized(_)) => println!("check SMITHERY_API_KEY"),
//!     Err(other) => println!("request failed: {other}"),
//! }
//! ```

use std::time::Duration;

use thiserror::Error;

use crate::clients::http_response::HttpResponse;
use crate::error::RequestValidationError;

/// The result of one logical operation.
pub type Outcome<T> = Result<T, RegistryError>;

/// Details of a response the server answered with a non-success status.
///
/// # Example
///
/// ```rust
/// use smithery_sdk::clients::ApiError;
///
/// let error = ApiError::new(404, "Server not found");
/// assert_eq!(error.status, 404);
/// assert_eq!(error.to_string(), "Server not found");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// A human-readable summary.
    pub message: String,
    /// The response body, as JSON when it parsed, otherwise as a string.
    pub body: Option<serde_json::Value>,
    /// Reference ID for error reporting (from `X-Request-Id`).
    pub request_id: Option<String>,
    /// Server-requested delay before retrying (from `Retry-After`).
    pub retry_after: Option<Duration>,
}

impl ApiError {
    /// Creates an error with only a status and message.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            body: None,
            request_id: None,
            retry_after: None,
        }
    }

    /// Builds an error from a response, preferring a message carried in the
    /// body (`error`, `message` or `detail`) over `default_message`.
    #[must_use]
    pub fn from_response(response: &HttpResponse, default_message: &str) -> Self {
        let body = response.lenient_body();
        let message = body
            .as_ref()
            .and_then(|body| {
                ["error", "message", "detail"]
                    .iter()
                    .find_map(|key| body.get(key).and_then(serde_json::Value::as_str))
            })
            .map_or_else(|| default_message.to_string(), String::from);

        Self {
            status: response.status,
            message,
            body,
            request_id: response.request_id().map(String::from),
            retry_after: response.retry_after(),
        }
    }
}

/// A response whose status matched but whose body failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Response body failed validation (status {status}): {message}")]
pub struct ResponseValidationError {
    /// The HTTP status code of the response.
    pub status: u16,
    /// The decoder's explanation.
    pub message: String,
    /// The raw response body.
    pub body: String,
}

/// Error returned when an HTTP request fails validation before sending.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A request body was provided without specifying the body type.
    #[error("Cannot set a body without also setting body_type.")]
    MissingBodyType,

    /// A POST or PUT request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// A failure below HTTP: no response was obtained from the server.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection could not be established or was dropped.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The transport gave up waiting.
    #[error("Request timed out")]
    Timeout,

    /// The exchange broke the HTTP contract (bad body stream, redirect loop, ...).
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() || error.is_request() {
            Self::Connection(error.to_string())
        } else {
            Self::Protocol(error.to_string())
        }
    }
}

/// Every way a call can fail.
///
/// Exactly one variant describes a failed call. Variants obtained from a
/// server response carry an [`ApiError`] with the status and body.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// Operation input was out of range.
    #[error(transparent)]
    InvalidRequest(#[from] RequestValidationError),

    /// The assembled HTTP request was malformed.
    #[error(transparent)]
    InvalidHttpRequest(#[from] InvalidHttpRequestError),

    /// The server rejected the credential (401).
    #[error("Unauthorized (status {}): {}", .0.status, .0.message)]
    Unauthorized(ApiError),

    /// The requested resource does not exist (404).
    #[error("Not found (status {}): {}", .0.status, .0.message)]
    NotFound(ApiError),

    /// The server failed (5XX).
    #[error("Server error (status {}): {}", .0.status, .0.message)]
    Server(ApiError),

    /// The server rejected the request (other 4XX).
    #[error("Request failed (status {}): {}", .0.status, .0.message)]
    Client(ApiError),

    /// The status matched none of the operation's declared patterns.
    #[error("Unexpected response status {}: {}", .0.status, .0.message)]
    UnexpectedStatus(ApiError),

    /// The body of a matched response did not decode.
    #[error(transparent)]
    ResponseValidation(#[from] ResponseValidationError),

    /// No connection could be made.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The attempt exceeded its timeout.
    #[error("Request timed out")]
    Timeout {
        /// The timeout that elapsed, when known.
        after: Option<Duration>,
    },

    /// The call was cancelled by the caller.
    #[error("Request aborted")]
    Aborted,

    /// The transport reported a protocol failure.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl RegistryError {
    /// Returns the server error details, if the server answered.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Unauthorized(e)
            | Self::NotFound(e)
            | Self::Server(e)
            | Self::Client(e)
            | Self::UnexpectedStatus(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the HTTP status of the failed response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ResponseValidation(e) => Some(e.status),
            _ => match self.api_error() {
                Some(e) => Some(e.status),
                None => None,
            },
        }
    }

    /// Returns the delay the server asked for via `Retry-After`.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self.api_error() {
            Some(e) => e.retry_after,
            None => None,
        }
    }

    /// Returns `true` for failures where no response was obtained because
    /// the connection failed or timed out.
    #[must_use]
    pub const fn is_connection_level(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout { .. })
    }
}

impl From<TransportError> for RegistryError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Connection(message) => Self::Connection(message),
            TransportError::Timeout => Self::Timeout { after: None },
            TransportError::Protocol(message) => Self::Protocol(message),
        }
    }
}
