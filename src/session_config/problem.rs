//! Problem details for configuration failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content type for problem details bodies.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// An RFC 7807 style error body.
///
/// `title`, `status`, `detail` and `instance` are always serialized;
/// `configSchema` and `errors` only when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{title} ({status}): {detail}")]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct ProblemDetails {
    /// Short summary of the problem type.
    pub title: String,
    /// HTTP status code for this occurrence.
    pub status: u16,
    /// Explanation specific to this occurrence.
    pub detail: String,
    /// The request path the problem occurred on.
    pub instance: String,
    /// The schema the configuration was validated against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_schema: Option<serde_json::Value>,
    /// One entry per failing field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ProblemError>>,
}

/// A single failing configuration field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemError {
    /// Dot-joined path, e.g. `auth.token`.
    pub param: String,
    /// JSON pointer, e.g. `/auth/token`.
    pub pointer: String,
    /// Why the value was rejected.
    pub reason: String,
    /// The value found at that path; `null` if absent.
    pub received: serde_json::Value,
}

impl ProblemDetails {
    /// Creates a problem with no schema and no field errors.
    pub fn new(status: u16, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status,
            detail: detail.into(),
            instance: String::new(),
            config_schema: None,
            errors: None,
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    pub fn with_config_schema(mut self, schema: serde_json::Value) -> Self {
        self.config_schema = Some(schema);
        self
    }

    pub fn with_errors(mut self, errors: Vec<ProblemError>) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Serializes the problem as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
