//! HTTP client types for SonarQube Web API communication.
//!
//! This module provides the transport layer beneath the request builders.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client; one round trip per call
//! - [`HttpRequest`]: A request to be sent to the server
//! - [`HttpResponse`]: A decoded response
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST)
//! - [`RequestBody`]: Form bodies for writes
//! - [`ApiClient`]: The executor used by request builders
//! - [`ApiError`] / [`ErrorKind`]: Classified call failures
//!
//! # Retry Behavior
//!
//! Requests are never retried. A 429 response surfaces as
//! [`ApiError::RateLimited`] carrying the `Retry-After` value so callers can
//! decide for themselves.

pub mod api;
mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use api::{ApiClient, ApiError, ErrorKind};
pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, RequestBody};
pub use http_response::HttpResponse;
