//! Reqwest-backed transport.
//!
//! This module provides the [`HttpClient`] type, the default
//! [`Transport`] used by [`SmitheryRegistry`](crate::SmitheryRegistry).

use std::collections::HashMap;

use async_trait::async_trait;

use crate::clients::errors::TransportError;
use crate::clients::http_request::{HttpMethod, WireRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::Transport;
use crate::error::ConfigError;

/// HTTP transport built on `reqwest` with rustls.
///
/// The client performs exactly one exchange per [`Transport::send`] call and
/// returns every status code as a response; classification and retries
/// happen in the executor.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync` and cheap to clone; clones share a
/// connection pool.
///
/// # Example
///
/// ```rust
/// use smithery_sdk::clients::HttpClient;
///
/// let client = HttpClient::new().unwrap();
/// # let _ = client;
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new transport with a fresh connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientInit`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| ConfigError::HttpClientInit {
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest` client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: &WireRequest) -> Result<HttpResponse, TransportError> {
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.clone());
        }

        let res = req_builder.send().await?;

        let status = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.text().await?;

        tracing::debug!(status, url = %request.url, "received response");

        Ok(HttpResponse::new(status, headers, body))
    }
}
