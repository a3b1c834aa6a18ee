//! Request construction, validation and pagination.
//!
//! This module is transport-agnostic. Builders hold a [`ParamMap`], check it
//! against the [`Rule`]s declared by their [`Endpoint`], and pass it to an
//! injected [`Executor`]. The HTTP executor lives in
//! [`ApiClient`](crate::clients::ApiClient).
//!
//! - [`RequestBuilder`]: chained setters plus `execute`
//! - [`PaginatedRequest`]: page selection and lazy traversal of paged results
//! - [`Rule`] / [`validate`]: declarative parameter constraints

mod builder;
mod paginator;
mod params;
mod rules;

pub use builder::{Endpoint, Executor, ExecutorFuture, RequestBuilder};
pub use paginator::{
    Paginated, PaginatedEndpoint, PaginatedRequest, Paging, PAGE_PARAM, PAGE_SIZE_PARAM,
};
pub use params::{ParamMap, ParamValue};
pub use rules::{validate, Rule, ValidationError, ValidationReason};
