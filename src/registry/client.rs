//! The registry entry point.

use std::sync::Arc;

use crate::clients::{Executor, HttpClient, SdkHooks, Transport};
use crate::config::SdkConfig;
use crate::error::ConfigError;
use crate::registry::servers::Servers;

/// Client for the Smithery registry API.
///
/// The client holds immutable configuration and a shared transport; clones
/// are cheap and share both.
///
/// # Thread Safety
///
/// `SmitheryRegistry` is `Clone + Send + Sync`.
///
/// # Example
///
/// ```rust,ignore
/// use smithery_sdk::{SdkConfig, SmitheryRegistry};
/// use smithery_sdk::auth::SecuritySource;
/// use smithery_sdk::models::GetServerRequest;
/// use smithery_sdk::clients::RequestOptions;
///
/// let config = SdkConfig::builder()
///     .security(SecuritySource::from_default_env())
///     .build();
/// let registry = SmitheryRegistry::new(config)?;
///
/// let server = registry
///     .servers()
///     .get(&GetServerRequest::new("@smithery/github")?, &RequestOptions::new())
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct SmitheryRegistry {
    executor: Executor,
}

// Verify SmitheryRegistry is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SmitheryRegistry>();
};

impl SmitheryRegistry {
    /// Creates a client that sends requests with the default [`HttpClient`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientInit`] if the HTTP client cannot be
    /// created.
    pub fn new(config: SdkConfig) -> Result<Self, ConfigError> {
        Self::builder().config(config).build()
    }

    /// Creates a client over a custom transport.
    #[must_use]
    pub fn with_transport(config: SdkConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            executor: Executor::new(transport, Arc::new(config)),
        }
    }

    /// Creates a builder for a client with hooks or a custom transport.
    #[must_use]
    pub fn builder() -> SmitheryRegistryBuilder {
        SmitheryRegistryBuilder::default()
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &SdkConfig {
        self.executor.config()
    }

    /// Operations on registry servers.
    #[must_use]
    pub fn servers(&self) -> Servers {
        Servers::new(self.executor.clone())
    }
}

/// Builder for [`SmitheryRegistry`].
///
/// # Defaults
///
/// - `config`: [`SdkConfig::default`]
/// - `transport`: a new [`HttpClient`]
/// - `hooks`: none
#[derive(Default)]
pub struct SmitheryRegistryBuilder {
    config: Option<SdkConfig>,
    transport: Option<Arc<dyn Transport>>,
    hooks: Vec<Arc<dyn SdkHooks>>,
}

impl SmitheryRegistryBuilder {
    /// Sets the client configuration.
    #[must_use]
    pub fn config(mut self, config: SdkConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Registers a hook; hooks run in registration order.
    #[must_use]
    pub fn hook(mut self, hook: Arc<dyn SdkHooks>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientInit`] if no transport was supplied
    /// and the default one cannot be created.
    pub fn build(self) -> Result<SmitheryRegistry, ConfigError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpClient::new()?),
        };
        Ok(SmitheryRegistry {
            executor: Executor::with_hooks(
                transport,
                Arc::new(self.config.unwrap_or_default()),
                self.hooks,
            ),
        })
    }
}

impl std::fmt::Debug for SmitheryRegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmitheryRegistryBuilder")
            .field("config", &self.config)
            .field("transport", &self.transport.is_some())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BaseUrl;

    #[test]
    fn test_new_uses_given_config() {
        let config = SdkConfig::builder()
            .base_url(BaseUrl::new("http://localhost:4000").unwrap())
            .build();
        let registry = SmitheryRegistry::new(config).unwrap();
        assert_eq!(registry.config().base_url().as_ref(), "http://localhost:4000");
    }

    #[test]
    fn test_builder_defaults() {
        let registry = SmitheryRegistry::builder().build().unwrap();
        assert_eq!(
            registry.config().base_url().as_ref(),
            crate::config::DEFAULT_BASE_URL
        );
    }

    #[test]
    fn test_registry_is_clone_send_sync() {
        fn assert_traits<T: Clone + Send + Sync>() {}
        assert_traits::<SmitheryRegistry>();
    }
}
