//! # Smithery Rust SDK
//!
//! A Rust SDK for the Smithery registry API and for MCP servers that accept
//! Smithery session configuration.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`SdkConfig`] and [`SdkConfigBuilder`]
//! - Validated newtypes for credentials and the base URL
//! - Pluggable credential sources (static, environment, callback) via [`auth`]
//! - A registry client ([`SmitheryRegistry`]) with typed operations
//! - Retries with exponential backoff, timeouts and cancellation for every call
//! - Lazy pagination via [`pagination::PageIterator`]
//! - Session configuration resolution with JSON Schema validation via
//!   [`session_config`]
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use smithery_sdk::{SdkConfig, SmitheryRegistry};
//! use smithery_sdk::auth::SecuritySource;
//!
//! let config = SdkConfig::builder()
//!     .security(SecuritySource::from_default_env())
//!     .timeout(Duration::from_secs(10))
//!     .build();
//!
//! let registry = SmitheryRegistry::new(config).unwrap();
//! ```
//!
//! ## Listing Servers
//!
//! ```rust,ignore
//! use smithery_sdk::clients::RequestOptions;
//! use smithery_sdk::models::ListServersRequest;
//! use smithery_sdk::pagination::PageIterator;
//!
//! let request = ListServersRequest::builder().q("slack").page_size(10).build()?;
//! let first = registry.servers().list(&request, RequestOptions::new()).await;
//!
//! let servers = PageIterator::new(first).collect_items().await?;
//! for server in servers {
//!     println!("{} ({})", server.display_name, server.qualified_name);
//! }
//! ```
//!
//! ## Fetching One Server
//!
//! ```rust,ignore
//! use smithery_sdk::RegistryError;
//! use smithery_sdk::clients::RequestOptions;
//! use smithery_sdk::models::GetServerRequest;
//!
//! let request = GetServerRequest::new("@smithery/github")?;
//! match registry.servers().get(&request, &RequestOptions::new()).await {
//!     Ok(server) => println!("{} connections", server.connections.len()),
//!     Err(RegistryError::NotFound(_)) => println!("no such server"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Resolving Session Configuration
//!
//! ```rust
//! use serde_json::json;
//! use smithery_sdk::session_config::{resolve_config, QueryParams};
//!
//! let params = QueryParams::parse("model.name=gpt&model.temperature=0.2");
//! let config = resolve_config("/mcp", &params, None).unwrap();
//! assert_eq!(
//!     config.into_value(),
//!     json!({"model": {"name": "gpt", "temperature": 0.2}})
//! );
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Newtypes and operation inputs validate on construction
//! - **Closed errors**: Every failure is one [`RegistryError`] variant
//! - **Thread-safe**: All client types are `Send + Sync`
//! - **Async-first**: Designed for use with the Tokio runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod registry;
pub mod session_config;

// Re-export public types at crate root for convenience
pub use auth::{Credential, SecuritySource};
pub use clients::{ApiError, Outcome, RegistryError, RequestOptions, RetryConfig};
pub use config::{ApiKey, BaseUrl, BearerToken, SdkConfig, SdkConfigBuilder};
pub use error::{ConfigError, RequestValidationError};
pub use registry::SmitheryRegistry;
pub use session_config::{resolve_config, resolve_config_as, ProblemDetails, ResolvedConfig};
