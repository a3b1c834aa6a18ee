//! Typed clients for the Web API resources.
//!
//! Each resource client hands out request builders for its actions. Every
//! action is described by a zero-sized [`Endpoint`](crate::request::Endpoint)
//! marker carrying its path, method, response type and parameter rules.
//!
//! | Client | Actions |
//! |--------|---------|
//! | [`ProjectsClient`] | `search`, `create`, `delete`, `bulk_delete`, `update_visibility` |
//! | [`IssuesClient`] | `search`, `add_comment`, `assign`, `set_severity`, `do_transition` |
//! | [`SettingsClient`] | `set`, `reset`, `values`, `list_definitions` |
//! | [`UsersClient`] | `search`, `create`, `deactivate` |
//! | [`SystemClient`] | `status`, `health`, `ping` |

pub mod common;
pub mod issues;
pub mod projects;
pub mod settings;
pub mod system;
pub mod users;

pub use common::{format_date, SonarDate, Visibility, SONAR_DATE_FORMAT};
pub use issues::{Issue, IssueSearchResponse, IssueType, IssuesClient, Severity};
pub use projects::{Project, ProjectSearchResponse, ProjectsClient};
pub use settings::{SettingDefinition, SettingValue, SettingsClient};
pub use system::{SystemClient, SystemHealth, SystemStatus};
pub use users::{User, UserSearchResponse, UsersClient};
