//! Authentication types for the Smithery SDK.
//!
//! This module resolves credentials for outgoing requests.
//!
//! # Overview
//!
//! - [`SecuritySource`]: Where credentials come from (static, environment, supplier)
//! - [`Credential`]: A concrete credential for one request attempt
//! - [`CredentialPlacement`]: Whether a credential travels in a header or the query string
//!
//! # Example
//!
//! ```rust
//! use smithery_sdk::auth::{Credential, SecuritySource};
//!
//! // A fixed bearer token
//! let source = SecuritySource::from(Credential::bearer("my-api-key").unwrap());
//!
//! // Or a token read from `SMITHERY_API_KEY` on every attempt
//! let from_env = SecuritySource::from_default_env();
//! # let _ = (source, from_env);
//! ```

mod security;

pub use security::{
    Credential, CredentialPlacement, CredentialSupplier, SecuritySource, API_KEY_ENV_VAR,
};
