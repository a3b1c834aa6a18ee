//! Project management (`api/projects`).
//!
//! # Example
//!
//! ```rust,ignore
//! use sonarqube_api::resources::Visibility;
//!
//! let created = sonar
//!     .projects()
//!     .create("my-app", "My App")
//!     .visibility(Visibility::Private)
//!     .execute()
//!     .await?;
//!
//! let stale = sonar
//!     .projects()
//!     .search()
//!     .analyzed_before("2024-01-01")
//!     .collect_all()
//!     .await?;
//! ```

use serde::{Deserialize, Serialize};

use crate::clients::{ApiClient, HttpMethod};
use crate::request::{
    Endpoint, Paginated, PaginatedEndpoint, PaginatedRequest, Paging, RequestBuilder, Rule,
};
use crate::resources::common::{sonar_date, SonarDate, Visibility, VISIBILITIES};

/// Component qualifiers accepted by project searches.
const QUALIFIERS: &[&str] = &["TRK", "VW", "APP"];

/// A project, portfolio or application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// The unique project key.
    pub key: String,

    /// The display name.
    pub name: String,

    /// The component qualifier (`TRK` for projects).
    #[serde(default)]
    pub qualifier: Option<String>,

    /// Who can browse the project.
    #[serde(default)]
    pub visibility: Option<Visibility>,

    /// When the last analysis ran; absent for provisioned projects.
    #[serde(default, with = "sonar_date")]
    pub last_analysis_date: Option<SonarDate>,

    /// The SCM revision of the last analysis.
    #[serde(default)]
    pub revision: Option<String>,

    /// Whether the project is managed by an external provisioning system.
    #[serde(default)]
    pub managed: bool,
}

/// One page of `api/projects/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSearchResponse {
    /// Paging information.
    pub paging: Paging,
    /// The projects on this page.
    #[serde(default)]
    pub components: Vec<Project>,
}

impl Paginated for ProjectSearchResponse {
    type Item = Project;

    fn paging(&self) -> &Paging {
        &self.paging
    }

    fn item_count(&self) -> usize {
        self.components.len()
    }

    fn into_items(self) -> Vec<Project> {
        self.components
    }
}

/// Response of `api/projects/create`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateProjectResponse {
    /// The created project.
    pub project: Project,
}

/// `GET api/projects/search`
#[derive(Debug)]
pub struct SearchProjects;

impl Endpoint for SearchProjects {
    type Response = ProjectSearchResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "api/projects/search";
    const RULES: &'static [Rule] = &[Rule::OneOf {
        key: "qualifiers",
        allowed: QUALIFIERS,
    }];
}

impl PaginatedEndpoint for SearchProjects {
    const DEFAULT_PAGE_SIZE: u32 = 100;
    const MAX_PAGE_SIZE: u32 = 500;
}

/// `POST api/projects/create`
#[derive(Debug)]
pub struct CreateProject;

impl Endpoint for CreateProject {
    type Response = CreateProjectResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "api/projects/create";
    const RULES: &'static [Rule] = &[
        Rule::Required("project"),
        Rule::Required("name"),
        Rule::OneOf {
            key: "visibility",
            allowed: VISIBILITIES,
        },
    ];
}

/// `POST api/projects/delete`
#[derive(Debug)]
pub struct DeleteProject;

impl Endpoint for DeleteProject {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "api/projects/delete";
    const RULES: &'static [Rule] = &[Rule::Required("project")];
}

/// `POST api/projects/bulk_delete`
#[derive(Debug)]
pub struct BulkDeleteProjects;

impl Endpoint for BulkDeleteProjects {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "api/projects/bulk_delete";
    const RULES: &'static [Rule] = &[
        Rule::AnyOf {
            label: "project filters",
            keys: &["analyzedBefore", "projects", "q"],
        },
        Rule::OneOf {
            key: "qualifiers",
            allowed: QUALIFIERS,
        },
    ];
}

/// `POST api/projects/update_visibility`
#[derive(Debug)]
pub struct UpdateProjectVisibility;

impl Endpoint for UpdateProjectVisibility {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "api/projects/update_visibility";
    const RULES: &'static [Rule] = &[
        Rule::Required("project"),
        Rule::Required("visibility"),
        Rule::OneOf {
            key: "visibility",
            allowed: VISIBILITIES,
        },
    ];
}

impl PaginatedRequest<SearchProjects> {
    /// Limits the search to keys or names containing `query`.
    #[must_use]
    pub fn query(self, query: &str) -> Self {
        self.param("q", query)
    }

    /// Adds a component qualifier (`TRK`, `VW`, `APP`).
    #[must_use]
    pub fn qualifier(self, qualifier: &str) -> Self {
        self.append("qualifiers", qualifier)
    }

    /// Adds a project key to the filter.
    #[must_use]
    pub fn project(self, key: &str) -> Self {
        self.append("projects", key)
    }

    /// Keeps projects last analyzed before `date` (`YYYY-MM-DD` or a timestamp).
    #[must_use]
    pub fn analyzed_before(self, date: &str) -> Self {
        self.param("analyzedBefore", date)
    }

    /// Keeps only provisioned projects that were never analyzed.
    #[must_use]
    pub fn on_provisioned_only(self, only: bool) -> Self {
        self.param("onProvisionedOnly", only)
    }
}

impl RequestBuilder<CreateProject> {
    /// Sets the visibility of the new project.
    #[must_use]
    pub fn visibility(self, visibility: Visibility) -> Self {
        self.param("visibility", visibility.as_str())
    }

    /// Sets the name of the main branch.
    #[must_use]
    pub fn main_branch(self, branch: &str) -> Self {
        self.param("mainBranch", branch)
    }
}

impl RequestBuilder<BulkDeleteProjects> {
    /// Limits deletion to keys or names containing `query`.
    #[must_use]
    pub fn query(self, query: &str) -> Self {
        self.param("q", query)
    }

    /// Adds a project key to delete.
    #[must_use]
    pub fn project(self, key: &str) -> Self {
        self.append("projects", key)
    }

    /// Adds a component qualifier (`TRK`, `VW`, `APP`).
    #[must_use]
    pub fn qualifier(self, qualifier: &str) -> Self {
        self.append("qualifiers", qualifier)
    }

    /// Deletes projects last analyzed before `date`.
    #[must_use]
    pub fn analyzed_before(self, date: &str) -> Self {
        self.param("analyzedBefore", date)
    }

    /// Deletes only provisioned projects that were never analyzed.
    #[must_use]
    pub fn on_provisioned_only(self, only: bool) -> Self {
        self.param("onProvisionedOnly", only)
    }
}

/// Client for `api/projects`.
#[derive(Clone, Debug)]
pub struct ProjectsClient {
    client: ApiClient,
}

impl ProjectsClient {
    /// Creates a projects client on top of `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Searches projects. Requires 'Administer System'.
    #[must_use]
    pub fn search(&self) -> PaginatedRequest<SearchProjects> {
        self.client.paginated()
    }

    /// Creates a project.
    #[must_use]
    pub fn create(&self, project: &str, name: &str) -> RequestBuilder<CreateProject> {
        self.client
            .request::<CreateProject>()
            .param("project", project)
            .param("name", name)
    }

    /// Deletes a project.
    #[must_use]
    pub fn delete(&self, project: &str) -> RequestBuilder<DeleteProject> {
        self.client.request::<DeleteProject>().param("project", project)
    }

    /// Deletes every project matching the filters.
    ///
    /// At least one of `analyzed_before`, `project` or `query` must be set.
    #[must_use]
    pub fn bulk_delete(&self) -> RequestBuilder<BulkDeleteProjects> {
        self.client.request()
    }

    /// Changes the visibility of a project.
    #[must_use]
    pub fn update_visibility(
        &self,
        project: &str,
        visibility: Visibility,
    ) -> RequestBuilder<UpdateProjectVisibility> {
        self.client
            .request::<UpdateProjectVisibility>()
            .param("project", project)
            .param("visibility", visibility.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerUrl, SonarQubeConfig};
    use crate::request::{ParamValue, ValidationReason};

    fn projects() -> ProjectsClient {
        let config = SonarQubeConfig::builder()
            .server_url(ServerUrl::new("https://sonar.example.com").unwrap())
            .build()
            .unwrap();
        ProjectsClient::new(ApiClient::new(&config).unwrap())
    }

    #[test]
    fn test_search_response_deserialization() {
        let json = r#"{
            "paging": {"pageIndex": 1, "pageSize": 100, "total": 2},
            "components": [
                {
                    "key": "project-key-1",
                    "name": "Project Name 1",
                    "qualifier": "TRK",
                    "visibility": "public",
                    "lastAnalysisDate": "2017-03-01T11:39:03+0300",
                    "revision": "cfb82f55c6ef32e61828c4cb3db2da12795fd767",
                    "managed": false
                },
                {
                    "key": "project-key-2",
                    "name": "Project Name 2",
                    "qualifier": "TRK",
                    "visibility": "private"
                }
            ]
        }"#;

        let page: ProjectSearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.paging.total, 2);
        assert_eq!(page.item_count(), 2);
        assert_eq!(page.components[0].visibility, Some(Visibility::Public));
        assert!(page.components[0].last_analysis_date.is_some());
        assert!(page.components[1].last_analysis_date.is_none());
        assert_eq!(page.into_items()[1].key, "project-key-2");
    }

    #[test]
    fn test_create_sets_required_params() {
        let builder = projects()
            .create("my-app", "My App")
            .visibility(Visibility::Private);
        assert!(builder.validate().is_ok());
        assert_eq!(
            builder.params().get("visibility"),
            Some(&ParamValue::from("private"))
        );
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let error = projects().create("my-app", "").validate().unwrap_err();
        assert_eq!(error.reason, ValidationReason::MissingRequired);
        assert_eq!(error.parameter, "name");
    }

    #[test]
    fn test_bulk_delete_requires_a_filter() {
        let error = projects().bulk_delete().validate().unwrap_err();
        assert_eq!(error.reason, ValidationReason::MissingRequired);

        let builder = projects().bulk_delete().project("a").project("b");
        assert!(builder.validate().is_ok());
        assert_eq!(
            builder.params().to_pairs(),
            vec![("projects".to_string(), "a,b".to_string())]
        );
    }

    #[test]
    fn test_search_rejects_unknown_qualifier() {
        let error = projects()
            .search()
            .qualifier("TRK")
            .qualifier("FIL")
            .validate()
            .unwrap_err();
        assert_eq!(error.reason, ValidationReason::InvalidValue);
    }

    #[test]
    fn test_search_page_size_limit() {
        assert!(projects().search().page_size(500).validate().is_ok());
        let error = projects().search().page_size(501).validate().unwrap_err();
        assert_eq!(error.reason, ValidationReason::OutOfRange);
    }

    #[test]
    fn test_update_visibility_params() {
        let builder = projects().update_visibility("my-app", Visibility::Public);
        assert!(builder.validate().is_ok());
        assert_eq!(
            builder.params().to_pairs(),
            vec![
                ("project".to_string(), "my-app".to_string()),
                ("visibility".to_string(), "public".to_string()),
            ]
        );
    }
}
