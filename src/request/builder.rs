//! The parameterized request builder.
//!
//! A [`RequestBuilder`] accumulates parameters for one [`Endpoint`] through
//! chained calls, validates them against the endpoint's declared rules when
//! executed, and hands them to an injected executor.
//!
//! Endpoint-specific setters are inherent methods on
//! `RequestBuilder<SomeEndpoint>`, defined next to each resource. They all
//! funnel into the generic [`param`](RequestBuilder::param) family here.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use serde::de::DeserializeOwned;

use crate::clients::api::ApiError;
use crate::clients::HttpMethod;
use crate::request::params::{ParamMap, ParamValue};
use crate::request::rules::{validate, Rule, ValidationError};

/// The future returned by an executor.
pub type ExecutorFuture<T> = BoxFuture<'static, Result<T, ApiError>>;

/// The injected capability that turns a populated parameter map into one
/// decoded response.
///
/// It owns request serialization and error translation; builders never see
/// HTTP.
pub type Executor<T> = Arc<dyn Fn(ParamMap) -> ExecutorFuture<T> + Send + Sync>;

/// A single Web API action.
///
/// Implementors are zero-sized markers that declare the wire location, the
/// decoded response type and the parameter rules of one action.
pub trait Endpoint: 'static {
    /// The decoded response of a successful call.
    type Response: DeserializeOwned + Send + 'static;

    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The path relative to the server URL (e.g., `api/projects/search`).
    const PATH: &'static str;

    /// Parameter constraints checked before every call.
    const RULES: &'static [Rule] = &[];

    /// Set when the server has deprecated this action; logged on execution.
    const DEPRECATION: Option<&'static str> = None;
}

/// Accumulates parameters for `E` and executes the call.
///
/// Setters take and return the builder by value. Nothing touches the
/// network until [`execute`](Self::execute) is called.
///
/// # Example
///
/// ```rust,ignore
/// let response = sonar
///     .projects()
///     .create("my-app", "My App")
///     .visibility(Visibility::Private)
///     .execute()
///     .await?;
/// ```
pub struct RequestBuilder<E: Endpoint> {
    params: ParamMap,
    executor: Executor<E::Response>,
    _endpoint: PhantomData<fn() -> E>,
}

impl<E: Endpoint> Clone for RequestBuilder<E> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            executor: Arc::clone(&self.executor),
            _endpoint: PhantomData,
        }
    }
}

impl<E: Endpoint> fmt::Debug for RequestBuilder<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("path", &E::PATH)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl<E: Endpoint> RequestBuilder<E> {
    /// Creates a builder with an empty parameter map around `executor`.
    #[must_use]
    pub fn new(executor: Executor<E::Response>) -> Self {
        Self {
            params: ParamMap::new(),
            executor,
            _endpoint: PhantomData,
        }
    }

    /// Creates a builder from a plain async closure.
    ///
    /// Useful for driving the builder without HTTP, e.g. in tests.
    #[must_use]
    pub fn from_fn<F, Fut>(f: F) -> Self
    where
        F: Fn(ParamMap) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<E::Response, ApiError>> + Send + 'static,
    {
        Self::new(Arc::new(move |params| -> ExecutorFuture<E::Response> {
            Box::pin(f(params))
        }))
    }

    /// Stores `value` under `key`, replacing any previous value.
    #[must_use]
    pub fn param(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.params.set(key, value);
        self
    }

    /// Stores `value` under `key` if it is `Some`; `None` leaves the map untouched.
    #[must_use]
    pub fn param_opt<V: Into<ParamValue>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Appends `value` to the comma-separated list under `key`.
    #[must_use]
    pub fn append(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.append(key, value);
        self
    }

    /// Appends `value` to the repeated-key list under `key`.
    #[must_use]
    pub fn append_multi(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.append_multi(key, value);
        self
    }

    /// Removes `key` from the map.
    #[must_use]
    pub fn clear(mut self, key: &str) -> Self {
        self.params.remove(key);
        self
    }

    /// Returns the accumulated parameters.
    #[must_use]
    pub const fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Checks the accumulated parameters against the endpoint rules.
    ///
    /// # Errors
    ///
    /// Returns the first rule violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate(E::RULES, &self.params)
    }

    /// Validates the parameters and invokes the executor.
    ///
    /// Validation runs synchronously inside this call; on failure the
    /// returned future resolves to [`ApiError::Validation`] without the
    /// executor being invoked.
    ///
    /// # Errors
    ///
    /// The future resolves to the validation error, or to whatever the
    /// executor returns.
    pub fn execute(&self) -> ExecutorFuture<E::Response> {
        self.execute_with(self.params.clone())
    }

    /// Validates `params` and invokes the executor with them.
    pub(crate) fn execute_with(&self, params: ParamMap) -> ExecutorFuture<E::Response> {
        if let Err(error) = validate(E::RULES, &params) {
            return Box::pin(future::ready(Err(error.into())));
        }
        if let Some(notice) = E::DEPRECATION {
            tracing::warn!("Deprecated Web API call to {}: {}", E::PATH, notice);
        }
        (self.executor)(params)
    }
}
