//! Configuration types for the Smithery SDK.
//!
//! This module provides the client-wide configuration: where requests go,
//! how they authenticate, how long they may take and how they are retried.
//! Configuration is an immutable value threaded through client construction;
//! there is no global state. Per-call changes go through
//! [`RequestOptions`](crate::clients::RequestOptions).
//!
//! # Overview
//!
//! - [`SdkConfig`]: The configuration struct holding all client settings
//! - [`SdkConfigBuilder`]: A builder for constructing [`SdkConfig`] instances
//! - [`BaseUrl`]: A validated base URL
//! - [`BearerToken`], [`ApiKey`]: Validated credentials with masked debug output
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use smithery_sdk::{SdkConfig, BaseUrl};
//! use smithery_sdk::auth::SecuritySource;
//!
//! let config = SdkConfig::builder()
//!     .base_url(BaseUrl::new("https://api.smithery.ai/v1").unwrap())
//!     .security(SecuritySource::from_default_env())
//!     .timeout(Duration::from_secs(10))
//!     .build();
//! ```

mod newtypes;

pub use newtypes::{ApiKey, BaseUrl, BearerToken};

use std::collections::HashMap;
use std::time::Duration;

use crate::auth::SecuritySource;
use crate::clients::RetryConfig;

/// Default registry API location.
pub const DEFAULT_BASE_URL: &str = "https://api.smithery.ai/v1";

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for the Smithery SDK.
///
/// # Thread Safety
///
/// `SdkConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct SdkConfig {
    base_url: BaseUrl,
    security: SecuritySource,
    timeout: Option<Duration>,
    headers: HashMap<String, String>,
    retry_config: RetryConfig,
    user_agent_prefix: Option<String>,
}

impl SdkConfig {
    /// Creates a new builder for constructing an `SdkConfig`.
    #[must_use]
    pub fn builder() -> SdkConfigBuilder {
        SdkConfigBuilder::new()
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the credential source.
    #[must_use]
    pub const fn security(&self) -> &SecuritySource {
        &self.security
    }

    /// Returns the default per-attempt timeout; `None` means no timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the headers added to every request.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns the default retry configuration.
    #[must_use]
    pub const fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> String {
        let prefix = self
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        format!("{prefix}Smithery SDK v{SDK_VERSION} | Rust {rust_version}")
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        SdkConfigBuilder::new().build()
    }
}

// Verify SdkConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SdkConfig>();
};

/// Builder for constructing [`SdkConfig`] instances.
///
/// # Defaults
///
/// - `base_url`: [`DEFAULT_BASE_URL`]
/// - `security`: [`SecuritySource::Anonymous`]
/// - `timeout`: 30 seconds
/// - `headers`: Empty
/// - `retry_config`: [`RetryConfig::default`]
/// - `user_agent_prefix`: `None`
///
/// # Example
///
/// ```rust
/// use smithery_sdk::SdkConfig;
/// use smithery_sdk::auth::Credential;
/// use smithery_sdk::clients::RetryConfig;
///
/// let config = SdkConfig::builder()
///     .security(Credential::bearer("my-key").unwrap().into())
///     .retry_config(RetryConfig::none())
///     .user_agent_prefix("MyApp/1.0")
///     .build();
///
/// assert!(config.user_agent().starts_with("MyApp/1.0 | "));
/// ```
#[derive(Debug, Default)]
pub struct SdkConfigBuilder {
    base_url: Option<BaseUrl>,
    security: Option<SecuritySource>,
    timeout: Option<Option<Duration>>,
    headers: HashMap<String, String>,
    retry_config: Option<RetryConfig>,
    user_agent_prefix: Option<String>,
}

impl SdkConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the credential source.
    #[must_use]
    pub fn security(mut self, security: SecuritySource) -> Self {
        self.security = Some(security);
        self
    }

    /// Sets the default per-attempt timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(Some(timeout));
        self
    }

    /// Disables the default timeout; attempts wait until the transport
    /// returns unless a call sets its own timeout.
    #[must_use]
    pub const fn no_timeout(mut self) -> Self {
        self.timeout = Some(None);
        self
    }

    /// Adds a header sent with every request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the default retry configuration.
    #[must_use]
    pub fn retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = Some(retry_config);
        self
    }

    /// Sets a prefix for the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`SdkConfig`].
    #[must_use]
    pub fn build(self) -> SdkConfig {
        let base_url = self.base_url.unwrap_or_else(default_base_url);
        SdkConfig {
            base_url,
            security: self.security.unwrap_or_default(),
            timeout: self.timeout.unwrap_or(Some(DEFAULT_TIMEOUT)),
            headers: self.headers,
            retry_config: self.retry_config.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
        }
    }
}

fn default_base_url() -> BaseUrl {
    // DEFAULT_BASE_URL is a valid URL literal
    BaseUrl::new(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!("default base URL is valid"))
}
