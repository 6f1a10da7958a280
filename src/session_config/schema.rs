//! Schema validation for resolved configuration.

use std::fmt;

use serde_json::Value;

use crate::error::ConfigError;

/// One reason a configuration failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    /// JSON pointer to the failing value (`""` for the root).
    pub pointer: String,
    /// The validator's message.
    pub reason: String,
}

/// Validates a configuration object against a schema.
pub trait SchemaValidator: Send + Sync {
    /// The schema, as reported in `configSchema` on failure.
    fn json_schema(&self) -> &Value;

    /// Validates `config`.
    ///
    /// # Errors
    ///
    /// Returns every issue found; the list is never empty.
    fn validate(&self, config: &Value) -> Result<(), Vec<SchemaIssue>>;
}

/// [`SchemaValidator`] backed by a compiled JSON Schema.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use smithery_sdk::session_config::{JsonSchemaValidator, SchemaValidator};
///
/// let validator = JsonSchemaValidator::new(json!({
///     "type": "object",
///     "properties": {"port": {"type": "integer"}}
/// }))
/// .unwrap();
///
/// assert!(validator.validate(&json!({"port": 8080})).is_ok());
/// let issues = validator.validate(&json!({"port": "high"})).unwrap_err();
/// assert_eq!(issues[0].pointer, "/port");
/// ```
pub struct JsonSchemaValidator {
    schema: Value,
    validator: jsonschema::Validator,
}

impl JsonSchemaValidator {
    /// Compiles `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSchema`] if `schema` is not a valid JSON
    /// Schema.
    pub fn new(schema: Value) -> Result<Self, ConfigError> {
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| ConfigError::InvalidSchema {
                reason: e.to_string(),
            })?;
        Ok(Self { schema, validator })
    }
}

impl SchemaValidator for JsonSchemaValidator {
    fn json_schema(&self) -> &Value {
        &self.schema
    }

    fn validate(&self, config: &Value) -> Result<(), Vec<SchemaIssue>> {
        let issues: Vec<SchemaIssue> = self
            .validator
            .iter_errors(config)
            .map(|error| SchemaIssue {
                pointer: error.instance_path().to_string(),
                reason: error.to_string(),
            })
            .collect();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

impl fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaValidator")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

// Verify JsonSchemaValidator is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<JsonSchemaValidator>();
};
