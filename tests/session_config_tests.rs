//! Integration tests for session configuration.
//!
//! These tests exercise the public resolver surface the way an MCP server
//! would: from a raw request query string to either a configuration object
//! or a problem details body.

use serde::Deserialize;
use serde_json::{json, Value};
use smithery_sdk::session_config::{
    create_server_url, resolve_config, resolve_config_as, JsonSchemaValidator, QueryParams,
    ServerUrlOptions,
};
use tokio_test::{assert_err, assert_ok};

fn weather_schema() -> JsonSchemaValidator {
    JsonSchemaValidator::new(json!({
        "type": "object",
        "required": ["apiKey"],
        "properties": {
            "apiKey": {"type": "string", "minLength": 1},
            "units": {"enum": ["metric", "imperial"]},
            "cache": {
                "type": "object",
                "properties": {"ttl": {"type": "integer", "minimum": 0}}
            }
        }
    }))
    .unwrap()
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct WeatherConfig {
    api_key: String,
    units: Option<String>,
}

#[test]
fn test_client_url_resolves_on_server() {
    let url = create_server_url(
        "https://server.smithery.ai/@acme/weather/mcp",
        &ServerUrlOptions::new()
            .with_api_key("sk-123")
            .with_profile("default")
            .with_config(json!({"apiKey": "wk-1", "units": "metric"})),
    );
    let (path, query) = url.split_once('?').unwrap();
    assert_eq!(path, "https://server.smithery.ai/@acme/weather/mcp");

    let params = QueryParams::parse(query);
    assert_eq!(params.get("api_key"), Some("sk-123"));
    assert_eq!(params.get("profile"), Some("default"));

    let schema = weather_schema();
    let config: WeatherConfig = assert_ok!(resolve_config_as("/mcp", &params, Some(&schema)));
    assert_eq!(
        config,
        WeatherConfig {
            api_key: "wk-1".to_string(),
            units: Some("metric".to_string()),
        }
    );
}

#[test]
fn test_overrides_win_over_encoded_config() {
    let url = create_server_url(
        "https://example.com/mcp",
        &ServerUrlOptions::new().with_config(json!({"apiKey": "wk-1", "cache": {"ttl": 60}})),
    );
    let query = format!("{}&cache.ttl=5&units=imperial", url.split_once('?').unwrap().1);

    let schema = weather_schema();
    let resolved = assert_ok!(resolve_config(
        "/mcp",
        &QueryParams::parse(&query),
        Some(&schema)
    ));
    assert_eq!(
        resolved.into_value(),
        json!({"apiKey": "wk-1", "cache": {"ttl": 5}, "units": "imperial"})
    );
}

#[test]
fn test_schema_failure_renders_problem_body() {
    let schema = weather_schema();
    let params = QueryParams::parse("apiKey=wk-1&cache[ttl]=-3&units=kelvin");

    let problem = assert_err!(resolve_config("/mcp", &params, Some(&schema)));
    let body: Value = serde_json::from_str(&problem.to_json().unwrap()).unwrap();

    assert_eq!(body["status"], json!(422));
    assert_eq!(body["title"], json!("Invalid configuration parameters"));
    assert_eq!(body["instance"], json!("/mcp"));
    assert_eq!(body["configSchema"]["required"], json!(["apiKey"]));

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    let ttl = errors.iter().find(|e| e["pointer"] == "/cache/ttl").unwrap();
    assert_eq!(ttl["param"], json!("cache.ttl"));
    assert_eq!(ttl["received"], json!(-3));
    let units = errors.iter().find(|e| e["pointer"] == "/units").unwrap();
    assert_eq!(units["received"], json!("kelvin"));
}

#[test]
fn test_malformed_config_renders_400_body() {
    let params = QueryParams::parse("config=not%20base64!");
    let problem = assert_err!(resolve_config("/mcp", &params, Some(&weather_schema())));
    let body: Value = serde_json::from_str(&problem.to_json().unwrap()).unwrap();

    assert_eq!(body["status"], json!(400));
    assert_eq!(body["title"], json!("Invalid config parameter"));
    assert!(body.get("errors").is_none());
    assert!(body.get("configSchema").is_none());
}
