//! # SonarQube API Rust Client
//!
//! A typed client for the SonarQube Web API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`SonarQubeConfig`] and [`SonarQubeConfigBuilder`]
//! - A generic request builder with declarative parameter validation
//! - Lazy auto-pagination over paged search endpoints
//! - An HTTP executor that classifies failures into a closed set of [`ErrorKind`]s
//! - Typed clients for projects, issues, settings, users and system state
//!
//! ## Quick Start
//!
//! ```rust
//! use sonarqube_api::{AccessToken, ServerUrl, SonarQubeConfig};
//!
//! let config = SonarQubeConfig::builder()
//!     .server_url(ServerUrl::new("https://sonar.example.com").unwrap())
//!     .token(AccessToken::new("squ_abc123"))
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Making API Requests
//!
//! Builders accumulate parameters and validate them when executed. Nothing
//! is sent until `execute` (or a pagination method) is called.
//!
//! ```rust,ignore
//! use sonarqube_api::{ErrorKind, SonarQube, SonarQubeConfig};
//! use sonarqube_api::resources::Visibility;
//!
//! let sonar = SonarQube::new(&SonarQubeConfig::from_env()?)?;
//!
//! sonar
//!     .projects()
//!     .update_visibility("my-app", Visibility::Private)
//!     .execute()
//!     .await?;
//!
//! match sonar.projects().delete("old-app").execute().await {
//!     Ok(()) => {}
//!     Err(e) if e.kind() == ErrorKind::NotFound => {}
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Pagination
//!
//! Paged searches expose the current page (`execute`), a lazy stream of
//! pages (`pages`), a lazy stream of items (`items`) and a drained
//! collection (`collect_all`). Pages are fetched on demand.
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//!
//! let mut issues = sonar.issues().search().project("my-app").items();
//! while let Some(issue) = issues.try_next().await? {
//!     println!("{}: {:?}", issue.key, issue.message);
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: Invalid parameters never reach the network
//! - **Thread-safe**: All clients are `Send + Sync` and cheap to clone
//! - **No hidden retries**: Each call is one round trip; rate limits surface as errors

pub mod clients;
pub mod config;
pub mod error;
pub mod request;
pub mod resources;
mod sonarqube;

// Re-export public types at crate root for convenience
pub use config::{AccessToken, ServerUrl, SonarQubeConfig, SonarQubeConfigBuilder};
pub use error::ConfigError;
pub use sonarqube::SonarQube;

// Re-export the executor and its error taxonomy
pub use clients::{ApiClient, ApiError, ErrorKind, HttpClient, HttpError, HttpMethod};

// Re-export request building types
pub use request::{
    PaginatedRequest, ParamMap, ParamValue, RequestBuilder, ValidationError, ValidationReason,
};
