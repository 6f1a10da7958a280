//! Building server URLs that carry session configuration.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::clients::append_query;
use crate::session_config::{QueryParams, RESERVED_PARAMS};

/// What to attach to a server URL.
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct ServerUrlOptions {
    /// Sent as `api_key`.
    pub api_key: Option<String>,
    /// Sent as `profile`.
    pub profile: Option<String>,
    /// Sent as `config`: compact JSON, base64-encoded.
    pub config: Option<serde_json::Value>,
}

impl ServerUrlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }
}

/// Appends `config`, `api_key` and `profile` parameters to `base_url`.
///
/// Existing query parameters and any fragment are kept; a parameter that
/// `options` sets replaces an existing one of the same name. Empty strings
/// are not sent.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use smithery_sdk::session_config::{create_server_url, ServerUrlOptions};
///
/// let url = create_server_url(
///     "https://server.smithery.ai/@acme/slack/mcp",
///     &ServerUrlOptions::new().with_api_key("sk-1").with_config(json!({"a": 1})),
/// );
/// assert_eq!(
///     url,
///     "https://server.smithery.ai/@acme/slack/mcp?config=eyJhIjoxfQ%3D%3D&api_key=sk-1"
/// );
/// ```
#[must_use]
pub fn create_server_url(base_url: &str, options: &ServerUrlOptions) -> String {
    let (without_fragment, fragment) = match base_url.split_once('#') {
        Some((url, fragment)) => (url, Some(fragment)),
        None => (base_url, None),
    };
    let (path, existing) = without_fragment
        .split_once('?')
        .unwrap_or((without_fragment, ""));

    let mut added: Vec<(String, String)> = Vec::new();
    if let Some(config) = &options.config {
        added.push(("config".to_string(), STANDARD.encode(config.to_string())));
    }
    if let Some(api_key) = options.api_key.as_deref().filter(|k| !k.is_empty()) {
        added.push(("api_key".to_string(), api_key.to_string()));
    }
    if let Some(profile) = options.profile.as_deref().filter(|p| !p.is_empty()) {
        added.push(("profile".to_string(), profile.to_string()));
    }

    let mut query: Vec<(String, String)> = QueryParams::parse(existing)
        .into_iter()
        .filter(|(key, _)| {
            !(RESERVED_PARAMS.contains(&key.as_str()) && added.iter().any(|(k, _)| k == key))
        })
        .collect();
    query.extend(added);

    let mut url = append_query(path, &query);
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session_config::resolve_config;
    use serde_json::json;

    #[test]
    fn test_no_options_leaves_url_alone() {
        assert_eq!(
            create_server_url("https://example.com/mcp", &ServerUrlOptions::new()),
            "https://example.com/mcp"
        );
    }

    #[test]
    fn test_keeps_existing_params_and_fragment() {
        let url = create_server_url(
            "https://example.com/mcp?region=eu&profile=old#top",
            &ServerUrlOptions::new().with_profile("work"),
        );
        assert_eq!(url, "https://example.com/mcp?region=eu&profile=work#top");
    }

    #[test]
    fn test_empty_credentials_are_skipped() {
        let url = create_server_url(
            "https://example.com/mcp",
            &ServerUrlOptions::new().with_api_key("").with_profile(""),
        );
        assert_eq!(url, "https://example.com/mcp");
    }

    #[test]
    fn test_config_round_trips_through_resolver() {
        let config = json!({"apiKey": "k/+=", "nested": {"n": 1, "list": [true, null]}});
        let url = create_server_url(
            "https://example.com/mcp",
            &ServerUrlOptions::new().with_config(config.clone()),
        );
        let (_, query) = url.split_once('?').unwrap();
        let resolved = resolve_config("/mcp", &QueryParams::parse(query), None).unwrap();
        assert_eq!(resolved.into_value(), config);
    }
}
