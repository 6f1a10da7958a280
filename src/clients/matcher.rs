//! Response classification.
//!
//! Each operation declares how response statuses map to outcomes as an
//! ordered list of arms. The first arm whose [`StatusPattern`] matches wins.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use smithery_sdk::clients::{HttpResponse, ResponseKind, ResponseMatcher, StatusPattern};
//! use smithery_sdk::RegistryError;
//!
//! let matcher = ResponseMatcher::<serde_json::Value>::new()
//!     .on(200, ResponseKind::Success)
//!     .on(404, ResponseKind::NotFound)
//!     .on(StatusPattern::Class(5), ResponseKind::ServerError);
//!
//! let response = HttpResponse::new(404, HashMap::new(), "");
//! assert!(matches!(
//!     matcher.match_response(&response),
//!     Err(RegistryError::NotFound(_))
//! ));
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::clients::errors::{ApiError, Outcome, RegistryError, ResponseValidationError};
use crate::clients::http_response::HttpResponse;
use crate::clients::retry::StatusPattern;

/// What a matched status means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseKind {
    /// Decode the body as the operation's payload.
    Success,
    /// The credential was rejected.
    Unauthorized,
    /// The resource does not exist.
    NotFound,
    /// The server failed.
    ServerError,
    /// The server rejected the request.
    ClientError,
}

impl ResponseKind {
    fn default_message(self, status: u16) -> String {
        match self {
            Self::Success => format!("Unexpected success status: {status}"),
            Self::Unauthorized => "Authentication failed".to_string(),
            Self::NotFound => "Resource not found".to_string(),
            Self::ServerError => format!("Server error: {status}"),
            Self::ClientError => format!("Request failed: {status}"),
        }
    }
}

#[derive(Clone, Debug)]
struct Arm {
    pattern: StatusPattern,
    kind: ResponseKind,
    message: Option<String>,
}

/// An ordered status-to-outcome table for one operation.
pub struct ResponseMatcher<T> {
    arms: Vec<Arm>,
    _payload: PhantomData<fn() -> T>,
}

impl<T> ResponseMatcher<T> {
    /// Creates a matcher with no arms; every status is unexpected.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            arms: Vec::new(),
            _payload: PhantomData,
        }
    }

    /// Appends an arm.
    #[must_use]
    pub fn on(mut self, pattern: impl Into<StatusPattern>, kind: ResponseKind) -> Self {
        self.arms.push(Arm {
            pattern: pattern.into(),
            kind,
            message: None,
        });
        self
    }

    /// Appends an arm whose error carries `message` when the body has none.
    #[must_use]
    pub fn on_with_message(
        mut self,
        pattern: impl Into<StatusPattern>,
        kind: ResponseKind,
        message: impl Into<String>,
    ) -> Self {
        self.arms.push(Arm {
            pattern: pattern.into(),
            kind,
            message: Some(message.into()),
        });
        self
    }

    fn arm_for(&self, status: u16) -> Option<&Arm> {
        self.arms.iter().find(|arm| arm.pattern.matches(status))
    }
}

impl<T: DeserializeOwned> ResponseMatcher<T> {
    /// Classifies a response into the operation's outcome.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::ResponseValidation`] if a success body does not decode
    /// - the error variant of the matched arm
    /// - [`RegistryError::UnexpectedStatus`] if no arm matches
    pub fn match_response(&self, response: &HttpResponse) -> Outcome<T> {
        let status = response.status;
        let Some(arm) = self.arm_for(status) else {
            return Err(RegistryError::UnexpectedStatus(ApiError::from_response(
                response,
                &format!("Unexpected response status: {status}"),
            )));
        };

        let message = arm
            .message
            .clone()
            .unwrap_or_else(|| arm.kind.default_message(status));

        match arm.kind {
            ResponseKind::Success => response.json().map_err(|e| {
                RegistryError::ResponseValidation(ResponseValidationError {
                    status,
                    message: e.to_string(),
                    body: response.body.clone(),
                })
            }),
            ResponseKind::Unauthorized => Err(RegistryError::Unauthorized(
                ApiError::from_response(response, &message),
            )),
            ResponseKind::NotFound => Err(RegistryError::NotFound(ApiError::from_response(
                response, &message,
            ))),
            ResponseKind::ServerError => Err(RegistryError::Server(ApiError::from_response(
                response, &message,
            ))),
            ResponseKind::ClientError => Err(RegistryError::Client(ApiError::from_response(
                response, &message,
            ))),
        }
    }
}

impl<T> Default for ResponseMatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ResponseMatcher<T> {
    fn clone(&self) -> Self {
        Self {
            arms: self.arms.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ResponseMatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseMatcher")
            .field("arms", &self.arms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        name: String,
    }

    fn matcher() -> ResponseMatcher<Payload> {
        ResponseMatcher::new()
            .on(200, ResponseKind::Success)
            .on(401, ResponseKind::Unauthorized)
            .on_with_message(404, ResponseKind::NotFound, "Server not found")
            .on(StatusPattern::Class(5), ResponseKind::ServerError)
            .on(StatusPattern::Class(4), ResponseKind::ClientError)
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse::new(status, HashMap::new(), body)
    }

    #[test]
    fn test_success_decodes_payload() {
        let result = matcher().match_response(&response(200, r#"{"name":"a"}"#));
        assert_eq!(
            result.unwrap(),
            Payload {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn test_undecodable_success_is_response_validation() {
        let result = matcher().match_response(&response(200, r#"{"other":1}"#));
        match result {
            Err(RegistryError::ResponseValidation(e)) => {
                assert_eq!(e.status, 200);
                assert_eq!(e.body, r#"{"other":1}"#);
                assert!(e.message.contains("name"));
            }
            other => panic!("expected ResponseValidation, got {other:?}"),
        }
    }

    #[test]
    fn test_first_matching_arm_wins() {
        // 404 is listed before 4XX
        let result = matcher().match_response(&response(404, ""));
        match result {
            Err(RegistryError::NotFound(e)) => assert_eq!(e.message, "Server not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }

        let result = matcher().match_response(&response(422, ""));
        assert!(matches!(result, Err(RegistryError::Client(e)) if e.message == "Request failed: 422"));
    }

    #[test]
    fn test_error_arm_keeps_non_json_body_as_string() {
        let result = matcher().match_response(&response(502, "<html>Bad Gateway</html>"));
        match result {
            Err(RegistryError::Server(e)) => {
                assert_eq!(e.status, 502);
                assert_eq!(e.message, "Server error: 502");
                assert_eq!(e.body, Some(json!("<html>Bad Gateway</html>")));
            }
            other => panic!("expected Server, got {other:?}"),
        }
    }

    #[test]
    fn test_unauthorized_uses_body_message() {
        let result = matcher().match_response(&response(401, r#"{"error":"Invalid API key"}"#));
        assert!(matches!(
            result,
            Err(RegistryError::Unauthorized(e)) if e.message == "Invalid API key"
        ));
    }

    #[test]
    fn test_unmatched_status_is_unexpected() {
        let result = matcher().match_response(&response(302, "moved"));
        match result {
            Err(RegistryError::UnexpectedStatus(e)) => {
                assert_eq!(e.status, 302);
                assert_eq!(e.body, Some(json!("moved")));
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_retry_after_is_ignored() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["1e30".to_string()]);
        let response = HttpResponse::new(404, headers, "");

        match matcher().match_response(&response) {
            Err(RegistryError::NotFound(e)) => {
                assert_eq!(e.status, 404);
                assert_eq!(e.retry_after, None);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_matcher_treats_everything_as_unexpected() {
        let matcher = ResponseMatcher::<Payload>::default();
        assert!(matches!(
            matcher.match_response(&response(200, r#"{"name":"a"}"#)),
            Err(RegistryError::UnexpectedStatus(_))
        ));
    }
}
