//! The entry point tying configuration, executor and resource clients together.

use crate::clients::{ApiClient, ApiError};
use crate::config::SonarQubeConfig;
use crate::resources::{IssuesClient, ProjectsClient, SettingsClient, SystemClient, UsersClient};

/// A connected SonarQube client.
///
/// Resource clients returned by the accessors share one connection pool.
///
/// # Example
///
/// ```rust,ignore
/// use sonarqube_api::{SonarQube, SonarQubeConfig};
///
/// let sonar = SonarQube::new(&SonarQubeConfig::from_env()?)?;
///
/// let status = sonar.system().status().execute().await?;
/// let projects = sonar.projects().search().collect_all().await?;
/// ```
#[derive(Clone, Debug)]
pub struct SonarQube {
    client: ApiClient,
}

// Verify SonarQube is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SonarQube>();
};

impl SonarQube {
    /// Creates a client for the configured server.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be created.
    pub fn new(config: &SonarQubeConfig) -> Result<Self, ApiError> {
        Ok(Self::with_client(ApiClient::new(config)?))
    }

    /// Wraps an existing executor.
    #[must_use]
    pub const fn with_client(client: ApiClient) -> Self {
        Self { client }
    }

    /// Returns the underlying executor, for calling actions without a typed client.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Project management.
    #[must_use]
    pub fn projects(&self) -> ProjectsClient {
        ProjectsClient::new(self.client.clone())
    }

    /// Issue search and workflow.
    #[must_use]
    pub fn issues(&self) -> IssuesClient {
        IssuesClient::new(self.client.clone())
    }

    /// Configuration settings.
    #[must_use]
    pub fn settings(&self) -> SettingsClient {
        SettingsClient::new(self.client.clone())
    }

    /// User accounts.
    #[must_use]
    pub fn users(&self) -> UsersClient {
        UsersClient::new(self.client.clone())
    }

    /// Server state.
    #[must_use]
    pub fn system(&self) -> SystemClient {
        SystemClient::new(self.client.clone())
    }
}
