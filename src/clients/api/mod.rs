//! The Web API executor and its error classification.
//!
//! - [`ApiClient`]: Serializes builder parameters, performs the call and decodes the response
//! - [`ApiError`]: Every failure of a resource call
//! - [`ErrorKind`]: The closed classification of [`ApiError`]

mod client;
mod errors;

pub use client::ApiClient;
pub use errors::{ApiError, ErrorKind};
