//! HTTP response types for the SonarQube API client.
//!
//! This module provides the [`HttpResponse`] type for accessing a decoded
//! response and the server's error messages.

use std::collections::HashMap;

/// An HTTP response from the Web API.
///
/// The body is decoded eagerly:
/// - an empty body becomes `Value::Null`
/// - a JSON body becomes the corresponding value
/// - any other body becomes `Value::String` holding the raw text
///   (`api/system/ping` answers with plain `pong`)
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, lowercased (headers may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The decoded response body.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Decodes raw response text into a body value.
    #[must_use]
    pub fn decode_body(text: &str) -> serde_json::Value {
        if text.trim().is_empty() {
            return serde_json::Value::Null;
        }
        serde_json::from_str(text)
            .unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
    }

    /// Returns `true` if the status code is 2xx.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Returns the first value of a header (name is case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `msg` entries of the body's `errors` array.
    ///
    /// The Web API reports failures as `{"errors":[{"msg":"..."}]}`.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.body
            .get("errors")
            .and_then(serde_json::Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .filter_map(|e| e.get("msg").and_then(serde_json::Value::as_str))
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the `Retry-After` header in seconds, if present.
    ///
    /// Only the delta-seconds form is understood; HTTP dates yield `None`.
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        self.header("retry-after")
            .and_then(|v| v.trim().parse::<u64>().ok())
    }
}
