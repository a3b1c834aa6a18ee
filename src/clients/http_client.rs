//! HTTP client for SonarQube Web API communication.
//!
//! This module provides the [`HttpClient`] type, which performs exactly one
//! HTTP round trip per call and normalizes its outcome.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError};
use crate::clients::http_request::{HttpMethod, HttpRequest, RequestBody};
use crate::clients::http_response::HttpResponse;
use crate::config::{ServerUrl, SonarQubeConfig};

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client for making requests to the Web API.
///
/// The client handles:
/// - URL construction from the configured server URL
/// - Default headers including User-Agent and the bearer token
/// - Query serialization for reads and form bodies for writes
/// - Mapping non-2xx responses to [`HttpResponseError`]
///
/// Requests are never retried; each call is issued exactly once.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`. Cloning it is cheap and shares the
/// underlying connection pool.
///
/// # Example
///
/// ```rust,ignore
/// use sonarqube_api::{SonarQubeConfig, ServerUrl};
/// use sonarqube_api::clients::{HttpClient, HttpRequest, HttpMethod};
///
/// let config = SonarQubeConfig::builder()
///     .server_url(ServerUrl::new("https://sonar.example.com")?)
///     .build()?;
/// let client = HttpClient::new(&config)?;
///
/// let request = HttpRequest::builder(HttpMethod::Get, "api/system/status").build()?;
/// let response = client.request(request).await?;
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Server base URL.
    base_url: ServerUrl,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client
    /// cannot be created (e.g., TLS initialization failure).
    pub fn new(config: &SonarQubeConfig) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}SonarQube API Library v{SDK_VERSION} | Rust");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        // Anonymous access: no Authorization header at all
        if let Some(token) = config.token().filter(|t| !t.is_empty()) {
            default_headers.insert(
                "Authorization".to_string(),
                format!("Bearer {}", token.as_ref()),
            );
        }

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.server_url().clone(),
            default_headers,
        })
    }

    /// Returns the server base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_ref()
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends an HTTP request to the server.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - No response is received, or a 2xx body cannot be read (`Network`)
    /// - A non-2xx response is received (`Response`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.base_url.join(&request.path);
        tracing::debug!("Sending {} request to {}", request.http_method, request.path);

        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };

        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(RequestBody::Form(fields)) = &request.body {
            req_builder = req_builder.form(fields);
        }

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());

        if res.status().is_success() {
            let body_text = res.text().await?;
            return Ok(HttpResponse::new(
                code,
                res_headers,
                HttpResponse::decode_body(&body_text),
            ));
        }

        // The status is known; a body that cannot be read only loses the messages
        let body_text = match res.text().await {
            Ok(text) => text,
            Err(error) => {
                tracing::debug!("Failed to read error body from {}: {}", request.path, error);
                String::new()
            }
        };
        let response = HttpResponse::new(code, res_headers, HttpResponse::decode_body(&body_text));

        tracing::debug!(
            "Request to {} failed with status {}",
            request.path,
            response.code
        );

        Err(HttpError::Response(HttpResponseError {
            code,
            messages: response.error_messages(),
            retry_after: response.retry_after(),
        }))
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}
