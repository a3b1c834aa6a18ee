//! Configuration types for the SonarQube API client.
//!
//! # Overview
//!
//! - [`SonarQubeConfig`]: The configuration shared by every request
//! - [`SonarQubeConfigBuilder`]: A builder for constructing [`SonarQubeConfig`] instances
//! - [`ServerUrl`]: A validated server base URL
//! - [`AccessToken`]: A bearer token with masked debug output
//!
//! # Example
//!
//! ```rust
//! use sonarqube_api::{SonarQubeConfig, ServerUrl, AccessToken};
//!
//! let config = SonarQubeConfig::builder()
//!     .server_url(ServerUrl::new("https://sonar.example.com").unwrap())
//!     .token(AccessToken::new("squ_abc123"))
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

use std::time::Duration;

pub use newtypes::{AccessToken, ServerUrl};

use crate::error::ConfigError;

/// Environment variable holding the server URL, as used by the scanners.
pub const SONAR_HOST_URL_ENV: &str = "SONAR_HOST_URL";

/// Environment variable holding the access token, as used by the scanners.
pub const SONAR_TOKEN_ENV: &str = "SONAR_TOKEN";

/// Configuration for the SonarQube API client.
///
/// `SonarQubeConfig` is `Clone`, `Send`, and `Sync`. It is immutable once
/// built; clients copy what they need at construction time.
#[derive(Clone, Debug)]
pub struct SonarQubeConfig {
    server_url: ServerUrl,
    token: Option<AccessToken>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
}

impl SonarQubeConfig {
    /// Creates a new builder for constructing a `SonarQubeConfig`.
    #[must_use]
    pub fn builder() -> SonarQubeConfigBuilder {
        SonarQubeConfigBuilder::new()
    }

    /// Builds a configuration from `SONAR_HOST_URL` and `SONAR_TOKEN`.
    ///
    /// `SONAR_TOKEN` is optional; when it is unset requests are anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `SONAR_HOST_URL` is unset,
    /// or [`ConfigError::InvalidServerUrl`] if it is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var(SONAR_HOST_URL_ENV).map_err(|_| ConfigError::MissingEnvVar {
            name: SONAR_HOST_URL_ENV,
        })?;

        let mut builder = Self::builder().server_url(ServerUrl::new(url)?);
        if let Ok(token) = std::env::var(SONAR_TOKEN_ENV) {
            builder = builder.token(AccessToken::new(token));
        }
        builder.build()
    }

    /// Returns the server URL.
    #[must_use]
    pub const fn server_url(&self) -> &ServerUrl {
        &self.server_url
    }

    /// Returns the access token, if configured.
    #[must_use]
    pub const fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

// Verify SonarQubeConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SonarQubeConfig>();
};

/// Builder for constructing [`SonarQubeConfig`] instances.
///
/// Only `server_url` is required.
#[derive(Debug, Default)]
pub struct SonarQubeConfigBuilder {
    server_url: Option<ServerUrl>,
    token: Option<AccessToken>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
}

impl SonarQubeConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the server URL (required).
    #[must_use]
    pub fn server_url(mut self, url: ServerUrl) -> Self {
        self.server_url = Some(url);
        self
    }

    /// Sets the bearer token used for every request.
    #[must_use]
    pub fn token(mut self, token: AccessToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Sets a prefix prepended to the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the total timeout applied by the transport to each request.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the [`SonarQubeConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `server_url` is not set.
    pub fn build(self) -> Result<SonarQubeConfig, ConfigError> {
        let server_url = self
            .server_url
            .ok_or(ConfigError::MissingRequiredField {
                field: "server_url",
            })?;

        Ok(SonarQubeConfig {
            server_url,
            token: self.token,
            user_agent_prefix: self.user_agent_prefix,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_url() -> ServerUrl {
        ServerUrl::new("https://sonar.example.com").unwrap()
    }

    #[test]
    fn test_builder_requires_server_url() {
        let result = SonarQubeConfig::builder().build();
        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField {
                field: "server_url"
            })
        ));
    }

    #[test]
    fn test_builder_with_only_server_url() {
        let config = SonarQubeConfig::builder()
            .server_url(server_url())
            .build()
            .unwrap();

        assert_eq!(config.server_url().as_ref(), "https://sonar.example.com");
        assert!(config.token().is_none());
        assert!(config.user_agent_prefix().is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_builder_with_all_fields() {
        let config = SonarQubeConfig::builder()
            .server_url(server_url())
            .token(AccessToken::new("squ_token"))
            .user_agent_prefix("MyTool/1.0")
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap();

        assert_eq!(config.token().unwrap().as_ref(), "squ_token");
        assert_eq!(config.user_agent_prefix(), Some("MyTool/1.0"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_config_debug_masks_token() {
        let config = SonarQubeConfig::builder()
            .server_url(server_url())
            .token(AccessToken::new("squ_very_secret"))
            .build()
            .unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("squ_very_secret"));
        assert!(debug.contains("AccessToken(*****)"));
    }

    #[test]
    fn test_config_is_clone() {
        let config = SonarQubeConfig::builder()
            .server_url(server_url())
            .build()
            .unwrap();
        let clone = config.clone();
        assert_eq!(clone.server_url(), config.server_url());
    }
}
