//! HTTP-specific error types for the SonarQube API client.
//!
//! - [`HttpResponseError`]: Non-2xx HTTP responses from the server
//! - [`InvalidHttpRequestError`]: When a request fails validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! These are transport-level errors. Resource calls surface them through
//! [`ApiError`](crate::clients::api::ApiError), which classifies the status
//! code into an [`ErrorKind`](crate::clients::api::ErrorKind).

use thiserror::Error;

/// Error returned when an HTTP request receives a non-successful response.
///
/// `messages` holds the `msg` entries of the server's `errors` array, in
/// order. It is empty when the body was missing or not in that shape.
///
/// # Example
///
/// ```rust
/// use sonarqube_api::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 404,
///     messages: vec!["Component key 'foo' not found".to_string()],
///     retry_after: None,
/// };
///
/// assert_eq!(error.to_string(), "HTTP 404: Component key 'foo' not found");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("HTTP {code}: {}", display_messages(.messages))]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Error messages returned by the server.
    pub messages: Vec<String>,
    /// Seconds to wait before retrying (from the `Retry-After` header).
    pub retry_after: Option<u64>,
}

/// Error returned when an HTTP request fails validation.
///
/// Raised before a request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST request was made without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A GET request was given a body.
    #[error("Cannot send a body with {method}.")]
    UnexpectedBody {
        /// The HTTP method that forbids a body.
        method: String,
    },

    /// The API path is empty after normalization.
    #[error("Invalid API path: '{path}'")]
    InvalidPath {
        /// The path that was provided.
        path: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error: no response was received.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Joins server messages for display, or a placeholder if there are none.
pub(crate) fn display_messages(messages: &[String]) -> String {
    if messages.is_empty() {
        "no error message returned".to_string()
    } else {
        messages.join("; ")
    }
}
