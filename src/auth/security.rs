//! Credential sources and per-attempt credential resolution.
//!
//! A [`SecuritySource`] describes *where* a credential comes from; calling
//! [`SecuritySource::resolve`] produces the concrete [`Credential`] used for a
//! single attempt. Resolution never fails: a source with nothing to offer
//! yields `None` and the request is sent unauthenticated, leaving the server
//! to answer with `401`.

use std::fmt;
use std::sync::Arc;

use crate::config::{ApiKey, BearerToken};
use crate::error::ConfigError;

/// Environment variable read by [`SecuritySource::from_default_env`].
pub const API_KEY_ENV_VAR: &str = "SMITHERY_API_KEY";

/// Where a credential is placed on the outgoing request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialPlacement {
    /// Sent as a request header with the given name.
    Header(String),
    /// Sent as a query parameter with the given name.
    Query(String),
}

/// A concrete credential for one request attempt.
///
/// Secret material is masked in `Debug` output.
///
/// # Example
///
/// ```rust
/// use smithery_sdk::auth::{Credential, CredentialPlacement};
///
/// let credential = Credential::bearer("my-token").unwrap();
/// let (placement, value) = credential.injection();
/// assert_eq!(placement, CredentialPlacement::Header("Authorization".to_string()));
/// assert_eq!(value, "Bearer my-token");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credential {
    /// `Authorization: Bearer <token>`.
    Bearer(BearerToken),
    /// A raw key placed in a named header or query parameter.
    ApiKey {
        /// The key value.
        key: ApiKey,
        /// Where the key is sent.
        placement: CredentialPlacement,
    },
}

impl Credential {
    /// Creates a bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBearerToken`] if the token is empty.
    pub fn bearer(token: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self::Bearer(BearerToken::new(token)?))
    }

    /// Creates an API key credential sent in the `api_key` query parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn api_key_query(key: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self::ApiKey {
            key: ApiKey::new(key)?,
            placement: CredentialPlacement::Query("api_key".to_string()),
        })
    }

    /// Creates an API key credential sent in a named header.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyApiKey`] if the key is empty.
    pub fn api_key_header(
        header: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::ApiKey {
            key: ApiKey::new(key)?,
            placement: CredentialPlacement::Header(header.into()),
        })
    }

    /// Returns the placement and the exact value to send.
    #[must_use]
    pub fn injection(&self) -> (CredentialPlacement, String) {
        match self {
            Self::Bearer(token) => (
                CredentialPlacement::Header("Authorization".to_string()),
                format!("Bearer {}", token.as_ref()),
            ),
            Self::ApiKey { key, placement } => (placement.clone(), key.as_ref().to_string()),
        }
    }
}

/// Produces credentials on demand.
///
/// Implemented for any `Fn() -> Option<Credential> + Send + Sync`, so closures
/// that read an environment variable or a refreshed token cache can be used
/// directly. Implementations are called once per attempt and may be called
/// from several tasks at once.
pub trait CredentialSupplier: Send + Sync {
    /// Returns the credential for the current attempt, if one is available.
    fn credential(&self) -> Option<Credential>;
}

impl<F> CredentialSupplier for F
where
    F: Fn() -> Option<Credential> + Send + Sync,
{
    fn credential(&self) -> Option<Credential> {
        self()
    }
}

/// The configured origin of request credentials.
///
/// Shared read-only between concurrent calls; cloning is cheap.
///
/// # Example
///
/// ```rust
/// use smithery_sdk::auth::{Credential, SecuritySource};
///
/// let source = SecuritySource::from(Credential::bearer("token").unwrap());
/// assert!(source.resolve().is_some());
///
/// assert!(SecuritySource::Anonymous.resolve().is_none());
/// ```
#[derive(Clone, Default)]
pub enum SecuritySource {
    /// No credential; requests are sent unauthenticated.
    #[default]
    Anonymous,
    /// A fixed credential.
    Static(Credential),
    /// A credential computed for every attempt.
    Supplier(Arc<dyn CredentialSupplier>),
}

impl SecuritySource {
    /// Wraps a supplier.
    pub fn from_supplier(supplier: impl CredentialSupplier + 'static) -> Self {
        Self::Supplier(Arc::new(supplier))
    }

    /// Reads a bearer token from `var` on every attempt.
    ///
    /// A missing or empty variable resolves to no credential.
    pub fn bearer_from_env(var: impl Into<String>) -> Self {
        let var = var.into();
        Self::from_supplier(move || {
            std::env::var(&var)
                .ok()
                .and_then(|token| Credential::bearer(token).ok())
        })
    }

    /// Reads a bearer token from [`API_KEY_ENV_VAR`] on every attempt.
    #[must_use]
    pub fn from_default_env() -> Self {
        Self::bearer_from_env(API_KEY_ENV_VAR)
    }

    /// Resolves the credential for the current attempt.
    #[must_use]
    pub fn resolve(&self) -> Option<Credential> {
        match self {
            Self::Anonymous => None,
            Self::Static(credential) => Some(credential.clone()),
            Self::Supplier(supplier) => supplier.credential(),
        }
    }
}

impl From<Credential> for SecuritySource {
    fn from(credential: Credential) -> Self {
        Self::Static(credential)
    }
}

impl fmt::Debug for SecuritySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::Static(credential) => f.debug_tuple("Static").field(credential).finish(),
            Self::Supplier(_) => f.write_str("Supplier(..)"),
        }
    }
}
