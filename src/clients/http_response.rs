//! HTTP response types for the Smithery SDK.
//!
//! This module provides the [`HttpResponse`] type: the status, headers and
//! raw body of a completed exchange, as returned by a
//! [`Transport`](crate::clients::Transport).

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

/// An HTTP response received from the server.
///
/// Header names are stored lowercase; a header may carry several values.
/// The body is kept raw so each operation can decode it into its own type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, lowercasing header names.
    #[must_use]
    pub fn new(
        status: u16,
        headers: HashMap<String, Vec<String>>,
        body: impl Into<String>,
    ) -> Self {
        let mut normalized: HashMap<String, Vec<String>> = HashMap::new();
        for (name, values) in headers {
            normalized
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(values);
        }
        Self {
            status,
            headers: normalized,
            body: body.into(),
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Returns the first value of a header, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    ///
    /// This ID is useful for debugging and should be included in error reports.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the delay requested by the `Retry-After` header.
    ///
    /// Both forms are accepted: delta-seconds (`"120"`, `"2.5"`) and an
    /// HTTP-date. A date in the past yields a zero delay; anything
    /// unparseable yields `None`.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        self.header("retry-after").and_then(parse_retry_after)
    }

    /// Decodes the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Returns the body as JSON when it parses, as a JSON string when it does
    /// not, and `None` when it is empty.
    #[must_use]
    pub fn lenient_body(&self) -> Option<serde_json::Value> {
        if self.body.trim().is_empty() {
            return None;
        }
        Some(
            serde_json::from_str(&self.body)
                .unwrap_or_else(|_| serde_json::Value::String(self.body.clone())),
        )
    }
}

fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<f64>() {
        return Duration::try_from_secs_f64(seconds).ok();
    }

    let date = DateTime::parse_from_rfc2822(value).ok()?;
    let delta = date.with_timezone(&Utc) - Utc::now();
    Some(delta.to_std().unwrap_or(Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_header(name: &str, value: &str) -> HttpResponse {
        let mut headers = HashMap::new();
        headers.insert(name.to_string(), vec![value.to_string()]);
        HttpResponse::new(200, headers, "")
    }

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), "");
            assert!(
                response.is_ok(),
                "Expected is_ok() to be true for code {code}"
            );
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_4xx_and_5xx() {
        for code in [400, 401, 404, 429, 500, 503] {
            assert!(!HttpResponse::new(code, HashMap::new(), "").is_ok());
        }
    }

    #[test]
    fn test_header_names_are_case_insensitive() {
        let response = with_header("X-Request-Id", "abc-123-xyz");
        assert_eq!(response.request_id(), Some("abc-123-xyz"));
        assert_eq!(response.header("X-REQUEST-ID"), Some("abc-123-xyz"));
    }

    #[test]
    fn test_retry_after_seconds() {
        let response = with_header("retry-after", "2.5");
        assert_eq!(response.retry_after(), Some(Duration::from_millis(2500)));

        let response = with_header("retry-after", "120");
        assert_eq!(response.retry_after(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_retry_after_http_date() {
        let future = Utc::now() + chrono::Duration::seconds(30);
        let response = with_header("retry-after", &future.to_rfc2822());
        let delay = response.retry_after().unwrap();
        assert!(delay <= Duration::from_secs(30));
        assert!(delay >= Duration::from_secs(28));

        let response = with_header("retry-after", "Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(response.retry_after(), Some(Duration::ZERO));
    }

    #[test]
    fn test_retry_after_rejects_garbage() {
        assert!(with_header("retry-after", "soon").retry_after().is_none());
        assert!(with_header("retry-after", "-5").retry_after().is_none());
        assert!(HttpResponse::new(503, HashMap::new(), "")
            .retry_after()
            .is_none());
    }

    #[test]
    fn test_retry_after_ignores_unrepresentable_seconds() {
        for value in ["1e30", "18446744073709551616", "NaN", "inf"] {
            assert!(
                with_header("retry-after", value).retry_after().is_none(),
                "Expected {value} to be ignored"
            );
        }
    }

    #[test]
    fn test_json_decodes_body() {
        let response = HttpResponse::new(200, HashMap::new(), r#"{"a": 1}"#);
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_lenient_body() {
        assert!(HttpResponse::new(500, HashMap::new(), "  ")
            .lenient_body()
            .is_none());
        assert_eq!(
            HttpResponse::new(500, HashMap::new(), "oops").lenient_body(),
            Some(json!("oops"))
        );
        assert_eq!(
            HttpResponse::new(500, HashMap::new(), r#"{"error":"x"}"#).lenient_body(),
            Some(json!({"error": "x"}))
        );
    }
}
