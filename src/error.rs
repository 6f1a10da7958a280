//! Error types for SDK configuration and request construction.
//!
//! This module contains the errors raised before anything touches the
//! network: invalid client configuration and out-of-range operation input.
//!
//! # Error Handling
//!
//! All configuration constructors and operation request builders return
//! `Result<T, E>` to enable fail-fast validation. Error messages are designed
//! to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use smithery_sdk::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during SDK configuration.
///
/// This enum represents all possible errors that can occur when creating
/// or validating configuration types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Bearer token cannot be empty.
    #[error("Bearer token cannot be empty. Please provide a valid Smithery API key.")]
    EmptyBearerToken,

    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid Smithery API key.")]
    EmptyApiKey,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Please provide a URL with scheme (e.g., 'https://api.smithery.ai/v1').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A retry status pattern could not be parsed.
    #[error("Invalid status pattern '{pattern}'. Expected a status code (e.g., '429') or a class (e.g., '5XX').")]
    InvalidStatusPattern {
        /// The pattern that was provided.
        pattern: String,
    },

    /// A JSON schema could not be compiled.
    #[error("Invalid config schema: {reason}")]
    InvalidSchema {
        /// The compiler's explanation.
        reason: String,
    },

    /// The underlying HTTP client could not be created.
    #[error("Failed to initialize HTTP client: {reason}")]
    HttpClientInit {
        /// The reason reported by the HTTP library.
        reason: String,
    },
}

/// Errors raised while building an operation request.
///
/// These are detected before any network call and are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestValidationError {
    /// Page numbers start at 1.
    #[error("Invalid page {page}. Pages are numbered from 1.")]
    PageOutOfRange {
        /// The page that was requested.
        page: u32,
    },

    /// Page size must be within the accepted bounds.
    #[error("Invalid page size {page_size}. Expected a value between 1 and 100.")]
    PageSizeOutOfRange {
        /// The page size that was requested.
        page_size: u32,
    },

    /// A required string field was empty.
    #[error("Missing required field: '{field}'.")]
    EmptyField {
        /// The name of the empty field.
        field: &'static str,
    },
}
