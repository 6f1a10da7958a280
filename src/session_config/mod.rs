//! Session configuration carried in request query strings.
//!
//! An MCP server receives its per-session configuration from two sources in
//! the connection URL:
//!
//! 1. `config`: a base64-encoded JSON object
//! 2. any other parameter, read as a dot-notation (`auth.token=x`) or
//!    bracket-notation (`auth[token]=x`) override
//!
//! [`resolve_config`] merges both (overrides win), optionally validates the
//! result against a schema, and reports failures as [`ProblemDetails`].
//! [`create_server_url`] builds such URLs on the client side.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use smithery_sdk::session_config::{resolve_config, JsonSchemaValidator, QueryParams};
//!
//! let schema = JsonSchemaValidator::new(json!({
//!     "type": "object",
//!     "properties": {"debug": {"type": "boolean"}}
//! }))
//! .unwrap();
//!
//! let params = QueryParams::parse("debug=true&api_key=sk-1");
//! let config = resolve_config("/mcp", &params, Some(&schema)).unwrap();
//! assert_eq!(config.into_value(), json!({"debug": true}));
//! ```

mod path;
mod problem;
mod schema;
mod url;

pub use problem::{ProblemDetails, ProblemError, APPLICATION_PROBLEM_JSON};
pub use schema::{JsonSchemaValidator, SchemaIssue, SchemaValidator};
pub use url::{create_server_url, ServerUrlOptions};

use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Parameters that are never read as configuration overrides.
pub const RESERVED_PARAMS: [&str; 3] = ["config", "api_key", "profile"];

const INVALID_ENCODING_TITLE: &str = "Invalid config parameter";
const INVALID_CONFIG_TITLE: &str = "Invalid configuration parameters";

/// Decoded query parameters, in order of appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Parses a raw query string (without the leading `?`).
    ///
    /// `+` decodes to a space and percent escapes are decoded; a parameter
    /// without `=` has an empty value.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect()
    }

    /// Returns the last value given for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for QueryParams {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or_else(|_| spaced.clone(), std::borrow::Cow::into_owned)
}

/// A merged and validated configuration object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedConfig(Map<String, Value>);

impl ResolvedConfig {
    /// Returns a top-level value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Resolves the session configuration from query parameters.
///
/// `instance` is the request path, echoed in any [`ProblemDetails`].
///
/// # Errors
///
/// - status 400 if `config` is not base64-encoded JSON describing an object
/// - status 422 if the merged configuration fails `schema`
pub fn resolve_config(
    instance: &str,
    params: &QueryParams,
    schema: Option<&dyn SchemaValidator>,
) -> Result<ResolvedConfig, ProblemDetails> {
    let mut config = match params.get("config").filter(|c| !c.is_empty()) {
        Some(encoded) => decode_config(encoded).map_err(|reason| {
            tracing::debug!(%instance, %reason, "rejecting config parameter");
            ProblemDetails::new(
                400,
                INVALID_ENCODING_TITLE,
                format!(
                    "The 'config' query parameter must be a base64-encoded JSON object: {reason}"
                ),
            )
            .with_instance(instance)
        })?,
        None => Map::new(),
    };

    let mut overrides = Map::new();
    for (key, value) in params.iter() {
        if RESERVED_PARAMS.contains(&key) {
            continue;
        }
        let path = path::split_key(key);
        if path.is_empty() {
            continue;
        }
        path::set_path(&mut overrides, &path, path::parse_value(value));
    }
    path::deep_merge(&mut config, overrides);

    if let Some(schema) = schema {
        let merged = Value::Object(std::mem::take(&mut config));
        if let Err(issues) = schema.validate(&merged) {
            tracing::debug!(%instance, issues = issues.len(), "configuration failed validation");
            let errors = issues
                .into_iter()
                .map(|issue| problem_error(&merged, issue.pointer, issue.reason))
                .collect();
            return Err(validation_problem(instance, schema, errors));
        }
        if let Value::Object(map) = merged {
            config = map;
        }
    }

    Ok(ResolvedConfig(config))
}

/// Resolves the session configuration and deserializes it into `T`.
///
/// # Errors
///
/// Everything [`resolve_config`] reports, plus status 422 if the merged
/// configuration does not deserialize into `T`.
pub fn resolve_config_as<T: DeserializeOwned>(
    instance: &str,
    params: &QueryParams,
    schema: Option<&dyn SchemaValidator>,
) -> Result<T, ProblemDetails> {
    let merged = resolve_config(instance, params, schema)?.into_value();
    serde_json::from_value(merged.clone()).map_err(|e| {
        let errors = vec![problem_error(&merged, String::new(), e.to_string())];
        let problem = ProblemDetails::new(
            422,
            INVALID_CONFIG_TITLE,
            "Configuration failed schema validation.",
        )
        .with_instance(instance)
        .with_errors(errors);
        match schema {
            Some(schema) => problem.with_config_schema(schema.json_schema().clone()),
            None => problem,
        }
    })
}

fn decode_config(encoded: &str) -> Result<Map<String, Value>, String> {
    let bytes = STANDARD
        .decode(encoded)
        .or_else(|_| URL_SAFE.decode(encoded))
        .or_else(|_| URL_SAFE_NO_PAD.decode(encoded))
        .map_err(|e| format!("invalid base64: {e}"))?;
    let value: Value =
        serde_json::from_slice(&bytes).map_err(|e| format!("invalid JSON: {e}"))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err("decoded config is not a JSON object".to_string()),
    }
}

fn problem_error(merged: &Value, pointer: String, reason: String) -> ProblemError {
    ProblemError {
        param: path::pointer_to_dotted(&pointer),
        received: merged.pointer(&pointer).cloned().unwrap_or(Value::Null),
        pointer,
        reason,
    }
}

fn validation_problem(
    instance: &str,
    schema: &dyn SchemaValidator,
    errors: Vec<ProblemError>,
) -> ProblemDetails {
    ProblemDetails::new(
        422,
        INVALID_CONFIG_TITLE,
        "Configuration failed schema validation.",
    )
    .with_instance(instance)
    .with_config_schema(schema.json_schema().clone())
    .with_errors(errors)
}
