//! Configuration error types for the SonarQube API client.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that
//! invalid settings are rejected before any client is built.
//!
//! # Example
//!
//! ```rust
//! use sonarqube_api::{ConfigError, ServerUrl};
//!
//! let result = ServerUrl::new("");
//! assert!(matches!(result, Err(ConfigError::InvalidServerUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Server URL is invalid.
    #[error("Invalid server URL '{url}'. Expected an http or https URL (e.g., 'https://sonar.example.com').")]
    InvalidServerUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// An environment variable required by `from_env` is not set.
    #[error("Environment variable '{name}' is not set.")]
    MissingEnvVar {
        /// The name of the variable.
        name: &'static str,
    },
}
