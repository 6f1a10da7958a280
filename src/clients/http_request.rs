//! HTTP request types for the Smithery SDK.
//!
//! Two shapes live here:
//!
//! - [`HttpRequest`]: what an operation wants (method, relative path, query,
//!   body), built with [`HttpRequest::builder`]
//! - [`WireRequest`]: the transport-ready request after base URL, default
//!   headers, caller options and credentials have been applied
//!
//! [`RequestOptions`] carries the per-call overrides.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::auth::{Credential, CredentialPlacement};
use crate::clients::errors::InvalidHttpRequestError;
use crate::clients::retry::RetryConfig;
use crate::config::{BaseUrl, SdkConfig};

/// HTTP methods supported by the SDK.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Content type for HTTP request bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    /// JSON content type (`application/json`).
    Json,
}

impl DataType {
    /// Returns the MIME type string for this data type.
    #[must_use]
    pub const fn as_content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
        }
    }
}

/// An operation-level HTTP request.
///
/// Use [`HttpRequest::builder`] to construct requests with the builder pattern.
///
/// # Example
///
/// ```rust
/// use smithery_sdk::clients::{HttpRequest, HttpMethod};
///
/// let request = HttpRequest::builder(HttpMethod::Get, "/servers")
///     .query_param("page", "1")
///     .optional_query_param("q", None::<String>)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.query, vec![("page".to_string(), "1".to_string())]);
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path (relative to the base URL) for this request.
    pub path: String,
    /// The request body, if any.
    pub body: Option<serde_json::Value>,
    /// The content type of the body.
    pub body_type: Option<DataType>,
    /// Query parameters in the order they were added.
    pub query: Vec<(String, String)>,
    /// Headers the operation itself requires.
    pub extra_headers: Option<HashMap<String, String>>,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `body` is `Some` but `body_type` is `None`
    /// - `http_method` is `Post` or `Put` but `body` is `None`
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.body.is_some() && self.body_type.is_none() {
            return Err(InvalidHttpRequestError::MissingBodyType);
        }

        if matches!(self.http_method, HttpMethod::Post | HttpMethod::Put) && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<serde_json::Value>,
    body_type: Option<DataType>,
    query: Vec<(String, String)>,
    extra_headers: Option<HashMap<String, String>>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            body_type: None,
            query: Vec::new(),
            extra_headers: None,
        }
    }

    /// Sets the request body.
    ///
    /// When setting a body, you must also set the body type via [`body_type`](Self::body_type).
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the content type of the request body.
    #[must_use]
    pub const fn body_type(mut self, body_type: DataType) -> Self {
        self.body_type = Some(body_type);
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds a query parameter only when `value` is `Some`.
    #[must_use]
    pub fn optional_query_param(
        self,
        key: impl Into<String>,
        value: Option<impl Into<String>>,
    ) -> Self {
        match value {
            Some(value) => self.query_param(key, value),
            None => self,
        }
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        let request = HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            body_type: self.body_type,
            query: self.query,
            extra_headers: self.extra_headers,
        };
        request.verify()?;
        Ok(request)
    }
}

/// Per-call overrides of the client configuration.
///
/// Every field is optional; unset fields fall back to the client's
/// [`SdkConfig`]. Overrides never modify the shared configuration.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use smithery_sdk::clients::{RequestOptions, RetryConfig};
///
/// let options = RequestOptions::new()
///     .with_timeout(Duration::from_secs(5))
///     .with_header("X-Trace", "abc")
///     .with_retry_config(RetryConfig::none());
/// assert_eq!(options.timeout, Some(Duration::from_secs(5)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    /// Timeout for each attempt; overrides the client default.
    pub timeout: Option<Duration>,
    /// Headers merged over the client's headers; these win on collision.
    pub headers: HashMap<String, String>,
    /// Retry behavior for this call only.
    pub retry_config: Option<RetryConfig>,
    /// Base URL for this call only.
    pub server_url: Option<BaseUrl>,
    /// Cancels the call, including any pending retries.
    pub cancellation: Option<CancellationToken>,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replaces the retry configuration for this call.
    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = Some(retry_config);
        self
    }

    /// Sends this call to a different base URL.
    #[must_use]
    pub fn with_server_url(mut self, server_url: BaseUrl) -> Self {
        self.server_url = Some(server_url);
        self
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// A fully assembled request, ready for a [`Transport`](crate::clients::Transport).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The absolute URL including the encoded query string.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// The serialized body, if any.
    pub body: Option<String>,
    /// How long the attempt may take; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl WireRequest {
    /// Assembles the transport request for one attempt.
    ///
    /// Applied in order: base URL and path, query parameters, default headers,
    /// client headers, operation headers, caller headers (caller wins), the
    /// credential, and the timeout (per call, then client default, else none).
    /// No input is modified.
    #[must_use]
    pub fn build(
        request: &HttpRequest,
        credential: Option<&Credential>,
        config: &SdkConfig,
        options: &RequestOptions,
    ) -> Self {
        let base = options.server_url.as_ref().unwrap_or_else(|| config.base_url());
        let mut query = request.query.clone();

        let mut headers = HashMap::new();
        set_header(&mut headers, "Accept", "application/json");
        set_header(&mut headers, "User-Agent", &config.user_agent());
        if let Some(body_type) = &request.body_type {
            set_header(&mut headers, "Content-Type", body_type.as_content_type());
        }
        for (name, value) in config.headers() {
            set_header(&mut headers, name, value);
        }
        if let Some(extra) = &request.extra_headers {
            for (name, value) in extra {
                set_header(&mut headers, name, value);
            }
        }
        for (name, value) in &options.headers {
            set_header(&mut headers, name, value);
        }

        if let Some(credential) = credential {
            match credential.injection() {
                (CredentialPlacement::Header(name), value) => {
                    set_header(&mut headers, &name, &value);
                }
                (CredentialPlacement::Query(name), value) => {
                    query.retain(|(key, _)| *key != name);
                    query.push((name, value));
                }
            }
        }

        Self {
            method: request.http_method,
            url: append_query(&base.join(&request.path), &query),
            headers,
            body: request.body.as_ref().map(serde_json::Value::to_string),
            timeout: options.timeout.or_else(|| config.timeout()),
        }
    }

    /// Returns a header value, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Inserts a header, replacing any existing header with the same name in
/// any letter case.
fn set_header(headers: &mut HashMap<String, String>, name: &str, value: &str) {
    headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}

/// Percent-encodes `query` and appends it to `url`.
pub(crate) fn append_query(url: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let encoded = query
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_config() -> SdkConfig {
        SdkConfig::builder()
            .base_url(BaseUrl::new("https://registry.example.com/v1").unwrap())
            .header("X-Client", "default")
            .timeout(Duration::from_secs(30))
            .build()
    }

    fn list_request() -> HttpRequest {
        HttpRequest::builder(HttpMethod::Get, "/servers")
            .query_param("page", "2")
            .query_param("pageSize", "10")
            .optional_query_param("q", Some("slack bot"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Post.to_string(), "post");
        assert_eq!(HttpMethod::Put.to_string(), "put");
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
    }

    #[test]
    fn test_verify_requires_body_for_post() {
        let result = HttpRequest::builder(HttpMethod::Post, "/servers").build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::MissingBody { method }) if method == "post"
        ));
    }

    #[test]
    fn test_verify_requires_body_type_when_body_present() {
        let result = HttpRequest::builder(HttpMethod::Get, "/servers")
            .body(json!({"key": "value"}))
            .build();

        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::MissingBodyType)
        ));
    }

    #[test]
    fn test_optional_query_params_are_omitted() {
        let request = HttpRequest::builder(HttpMethod::Get, "/servers")
            .optional_query_param("q", None::<&str>)
            .query_param("page", "1")
            .build()
            .unwrap();
        assert_eq!(request.query, vec![("page".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_wire_request_url_and_query_encoding() {
        let wire = WireRequest::build(
            &list_request(),
            None,
            &test_config(),
            &RequestOptions::new(),
        );
        assert_eq!(
            wire.url,
            "https://registry.example.com/v1/servers?page=2&pageSize=10&q=slack%20bot"
        );
        assert_eq!(wire.method, HttpMethod::Get);
        assert!(wire.body.is_none());
    }

    #[test]
    fn test_wire_request_default_headers() {
        let wire = WireRequest::build(
            &list_request(),
            None,
            &test_config(),
            &RequestOptions::new(),
        );
        assert_eq!(wire.header("accept"), Some("application/json"));
        assert_eq!(wire.header("x-client"), Some("default"));
        assert!(wire.header("user-agent").unwrap().contains("Smithery SDK"));
        assert!(wire.header("authorization").is_none());
        assert!(wire.header("content-type").is_none());
    }

    #[test]
    fn test_caller_headers_win_case_insensitively() {
        let options = RequestOptions::new()
            .with_header("accept", "text/plain")
            .with_header("x-CLIENT", "caller");
        let wire = WireRequest::build(&list_request(), None, &test_config(), &options);

        assert_eq!(wire.header("Accept"), Some("text/plain"));
        assert_eq!(wire.header("X-Client"), Some("caller"));
        assert_eq!(
            wire.headers
                .keys()
                .filter(|k| k.eq_ignore_ascii_case("accept"))
                .count(),
            1
        );
    }

    #[test]
    fn test_bearer_credential_is_injected_as_header() {
        let credential = Credential::bearer("secret").unwrap();
        let wire = WireRequest::build(
            &list_request(),
            Some(&credential),
            &test_config(),
            &RequestOptions::new(),
        );
        assert_eq!(wire.header("Authorization"), Some("Bearer secret"));
    }

    #[test]
    fn test_query_credential_is_injected_into_url() {
        let credential = Credential::api_key_query("sk-1").unwrap();
        let wire = WireRequest::build(
            &list_request(),
            Some(&credential),
            &test_config(),
            &RequestOptions::new(),
        );
        assert!(wire.url.ends_with("&api_key=sk-1"));
        assert!(wire.header("Authorization").is_none());
    }

    #[test]
    fn test_timeout_precedence() {
        let config = test_config();
        let request = list_request();

        let wire = WireRequest::build(&request, None, &config, &RequestOptions::new());
        assert_eq!(wire.timeout, Some(Duration::from_secs(30)));

        let options = RequestOptions::new().with_timeout(Duration::from_secs(2));
        let wire = WireRequest::build(&request, None, &config, &options);
        assert_eq!(wire.timeout, Some(Duration::from_secs(2)));

        let config = SdkConfig::builder().no_timeout().build();
        let wire = WireRequest::build(&request, None, &config, &RequestOptions::new());
        assert_eq!(wire.timeout, None);
    }

    #[test]
    fn test_server_url_override() {
        let options = RequestOptions::new()
            .with_server_url(BaseUrl::new("http://localhost:8080").unwrap());
        let wire = WireRequest::build(&list_request(), None, &test_config(), &options);
        assert!(wire.url.starts_with("http://localhost:8080/servers?"));
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = HttpRequest::builder(HttpMethod::Post, "/servers")
            .body(json!({"name": "x"}))
            .body_type(DataType::Json)
            .build()
            .unwrap();
        let wire = WireRequest::build(&request, None, &test_config(), &RequestOptions::new());
        assert_eq!(wire.header("content-type"), Some("application/json"));
        assert_eq!(wire.body.as_deref(), Some(r#"{"name":"x"}"#));
    }

    #[test]
    fn test_build_does_not_modify_inputs() {
        let request = list_request();
        let before = request.query.clone();
        let credential = Credential::api_key_query("sk-1").unwrap();
        let _ = WireRequest::build(
            &request,
            Some(&credential),
            &test_config(),
            &RequestOptions::new(),
        );
        assert_eq!(request.query, before);
    }
}
