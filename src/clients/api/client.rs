//! Web API client.
//!
//! [`ApiClient`] is the HTTP executor behind every request builder. It
//! serializes a [`ParamMap`] into a query string (reads) or a form body
//! (writes), performs one round trip, and decodes the JSON response.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::clients::api::ApiError;
use crate::clients::{HttpClient, HttpMethod, HttpRequest, InvalidHttpRequestError, RequestBody};
use crate::config::SonarQubeConfig;
use crate::request::{
    Endpoint, Executor, ExecutorFuture, Paginated, PaginatedEndpoint, PaginatedRequest, ParamMap,
    RequestBuilder,
};

/// Executes Web API calls against one server.
///
/// Cloning is cheap; clones share the connection pool.
///
/// # Thread Safety
///
/// `ApiClient` is `Send + Sync`.
///
/// # Example
///
/// ```rust,ignore
/// use sonarqube_api::{ApiClient, SonarQubeConfig};
/// use sonarqube_api::request::ParamMap;
///
/// let client = ApiClient::new(&SonarQubeConfig::from_env()?)?;
///
/// let mut params = ParamMap::new();
/// params.set("q", "backend");
/// let page: serde_json::Value = client.get("api/projects/search", &params).await?;
/// ```
#[derive(Clone, Debug)]
pub struct ApiClient {
    http_client: Arc<HttpClient>,
}

// Verify ApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
};

impl ApiClient {
    /// Creates a client for the configured server.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be created.
    pub fn new(config: &SonarQubeConfig) -> Result<Self, ApiError> {
        let http_client = HttpClient::new(config)?;
        Ok(Self {
            http_client: Arc::new(http_client),
        })
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Sends a GET request with `params` as the query string.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified from the response status, a
    /// network error, or a decode error.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ParamMap,
    ) -> Result<T, ApiError> {
        self.call(HttpMethod::Get, path, params).await
    }

    /// Sends a POST request with `params` as a form body.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified from the response status, a
    /// network error, or a decode error.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ParamMap,
    ) -> Result<T, ApiError> {
        self.call(HttpMethod::Post, path, params).await
    }

    /// Sends one request and decodes the response body into `T`.
    ///
    /// Empty bodies decode as JSON `null`, so `()` accepts them.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        params: &ParamMap,
    ) -> Result<T, ApiError> {
        let path = normalize_path(path)?;
        let pairs = params.to_pairs();

        let builder = HttpRequest::builder(method, path);
        let builder = match method {
            HttpMethod::Get => builder.query(pairs),
            HttpMethod::Post => builder.body(RequestBody::Form(pairs)),
        };
        let request = builder.build()?;

        let response = self.http_client.request(request).await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Returns an executor that calls `E` through this client.
    #[must_use]
    pub fn executor<E: Endpoint>(&self) -> Executor<E::Response> {
        let client = self.clone();
        Arc::new(move |params: ParamMap| -> ExecutorFuture<E::Response> {
            let client = client.clone();
            Box::pin(async move { client.call(E::METHOD, E::PATH, &params).await })
        })
    }

    /// Returns a builder for `E` backed by this client.
    #[must_use]
    pub fn request<E: Endpoint>(&self) -> RequestBuilder<E> {
        RequestBuilder::new(self.executor::<E>())
    }

    /// Returns a paginated builder for `E` backed by this client.
    #[must_use]
    pub fn paginated<E>(&self) -> PaginatedRequest<E>
    where
        E: PaginatedEndpoint,
        E::Response: Paginated,
    {
        PaginatedRequest::new(self.request::<E>())
    }
}

/// Strips leading slashes; an empty path is rejected.
fn normalize_path(path: &str) -> Result<String, InvalidHttpRequestError> {
    let normalized = path.trim_start_matches('/');
    if normalized.is_empty() {
        return Err(InvalidHttpRequestError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(normalized.to_string())
}
