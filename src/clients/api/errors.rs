//! Error classification for Web API calls.
//!
//! Every failure surfaced by a resource call is an [`ApiError`]. Its
//! [`kind`](ApiError::kind) is one of a closed set of [`ErrorKind`]s, mapped
//! from the HTTP status at the executor boundary:
//!
//! | Status          | Kind                     |
//! |-----------------|--------------------------|
//! | 400             | [`ErrorKind::Validation`] |
//! | 401             | [`ErrorKind::Authentication`] |
//! | 403             | [`ErrorKind::Authorization`] |
//! | 404             | [`ErrorKind::NotFound`] |
//! | 429             | [`ErrorKind::RateLimit`] |
//! | other 4xx/5xx   | [`ErrorKind::Api`] |
//! | no response     | [`ErrorKind::Network`] |
//! | 2xx, bad body   | [`ErrorKind::Decode`] |
//!
//! A non-2xx status is classified even if its body could not be read.
//!
//! Client-side parameter validation failures are also
//! [`ErrorKind::Validation`]; they are raised before any request is sent.
//!
//! # Example
//!
//! ```rust,ignore
//! use sonarqube_api::{ApiError, ErrorKind};
//!
//! match sonar.projects().delete("my-app").execute().await {
//!     Ok(()) => println!("deleted"),
//!     Err(e) if e.kind() == ErrorKind::NotFound => println!("already gone"),
//!     Err(e) => return Err(e),
//! }
//! ```

use std::fmt;

use thiserror::Error;

use crate::clients::errors::{display_messages, HttpError, HttpResponseError, InvalidHttpRequestError};
use crate::request::ValidationError;

/// The closed set of error kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid credentials (401).
    Authentication,
    /// Authenticated but not permitted (403).
    Authorization,
    /// The requested entity does not exist (404).
    NotFound,
    /// Invalid parameters, detected by the server (400) or the client.
    Validation,
    /// Too many requests (429).
    RateLimit,
    /// Any other non-2xx response.
    Api,
    /// No response was received.
    Network,
    /// A 2xx response could not be decoded into the expected shape.
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::RateLimit => "rate_limit",
            Self::Api => "api",
            Self::Network => "network",
            Self::Decode => "decode",
        };
        f.write_str(name)
    }
}

/// Error type for Web API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the credentials (HTTP 401).
    #[error("Authentication failed: {}", display_messages(.messages))]
    Authentication {
        /// Messages returned by the server.
        messages: Vec<String>,
    },

    /// The credentials lack the required permission (HTTP 403).
    #[error("Insufficient privileges: {}", display_messages(.messages))]
    Authorization {
        /// Messages returned by the server.
        messages: Vec<String>,
    },

    /// The requested entity was not found (HTTP 404).
    #[error("Not found: {}", display_messages(.messages))]
    NotFound {
        /// Messages returned by the server.
        messages: Vec<String>,
    },

    /// The server rejected the parameters (HTTP 400).
    #[error("Bad request: {}", display_messages(.messages))]
    BadRequest {
        /// Messages returned by the server.
        messages: Vec<String>,
    },

    /// The server is throttling requests (HTTP 429).
    #[error("Rate limit exceeded: {}", display_messages(.messages))]
    RateLimited {
        /// Messages returned by the server.
        messages: Vec<String>,
        /// Seconds to wait before retrying, from `Retry-After`.
        retry_after: Option<u64>,
    },

    /// Any other non-2xx response.
    #[error("API error (HTTP {status}): {}", display_messages(.messages))]
    Api {
        /// The HTTP status code.
        status: u16,
        /// Messages returned by the server.
        messages: Vec<String>,
    },

    /// No response was received.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Parameters failed client-side validation; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The HTTP request itself was malformed; no request was sent.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// A successful response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Classifies a non-2xx response by its status code.
    ///
    /// The body is never consulted for the classification.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sonarqube_api::{ApiError, ErrorKind};
    ///
    /// let error = ApiError::from_status(403, vec!["Insufficient privileges".to_string()], None);
    /// assert_eq!(error.kind(), ErrorKind::Authorization);
    /// assert_eq!(error.status(), Some(403));
    /// ```
    #[must_use]
    pub fn from_status(code: u16, messages: Vec<String>, retry_after: Option<u64>) -> Self {
        match code {
            400 => Self::BadRequest { messages },
            401 => Self::Authentication { messages },
            403 => Self::Authorization { messages },
            404 => Self::NotFound { messages },
            429 => Self::RateLimited {
                messages,
                retry_after,
            },
            status => Self::Api { status, messages },
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Authorization { .. } => ErrorKind::Authorization,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::BadRequest { .. } | Self::Validation(_) | Self::InvalidRequest(_) => {
                ErrorKind::Validation
            }
            Self::RateLimited { .. } => ErrorKind::RateLimit,
            Self::Api { .. } => ErrorKind::Api,
            Self::Network(_) => ErrorKind::Network,
            Self::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Returns the HTTP status for errors produced by a server response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest { .. } => Some(400),
            Self::Authentication { .. } => Some(401),
            Self::Authorization { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the server-supplied error messages, if any.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Authentication { messages }
            | Self::Authorization { messages }
            | Self::NotFound { messages }
            | Self::BadRequest { messages }
            | Self::RateLimited { messages, .. }
            | Self::Api { messages, .. } => messages.as_slice(),
            _ => &[],
        }
    }

    /// Returns `true` if the error was raised before any request was sent.
    #[must_use]
    pub const fn is_client_side(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidRequest(_))
    }
}

impl From<HttpResponseError> for ApiError {
    fn from(error: HttpResponseError) -> Self {
        Self::from_status(error.code, error.messages, error.retry_after)
    }
}

impl From<HttpError> for ApiError {
    fn from(error: HttpError) -> Self {
        match error {
            HttpError::Response(e) => e.into(),
            HttpError::InvalidRequest(e) => Self::InvalidRequest(e),
            HttpError::Network(e) => Self::Network(e),
        }
    }
}
