//! Issue search and workflow (`api/issues`).
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use sonarqube_api::resources::{IssueType, Severity};
//!
//! let mut bugs = sonar
//!     .issues()
//!     .search()
//!     .project("my-app")
//!     .issue_type(IssueType::Bug)
//!     .severity(Severity::Critical)
//!     .severity(Severity::Blocker)
//!     .items();
//!
//! while let Some(issue) = bugs.try_next().await? {
//!     sonar.issues().do_transition(&issue.key, "confirm").execute().await?;
//! }
//! ```

use std::fmt;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::clients::{ApiClient, HttpMethod};
use crate::request::{
    Endpoint, Paginated, PaginatedEndpoint, PaginatedRequest, Paging, RequestBuilder, Rule,
};
use crate::resources::common::{format_date, sonar_date, SonarDate};

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Informational.
    Info,
    /// Minor.
    Minor,
    /// Major.
    Major,
    /// Critical.
    Critical,
    /// Blocker.
    Blocker,
}

impl Severity {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Minor => "MINOR",
            Self::Major => "MAJOR",
            Self::Critical => "CRITICAL",
            Self::Blocker => "BLOCKER",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    /// A bug.
    Bug,
    /// A vulnerability.
    Vulnerability,
    /// A code smell.
    CodeSmell,
}

impl IssueType {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bug => "BUG",
            Self::Vulnerability => "VULNERABILITY",
            Self::CodeSmell => "CODE_SMELL",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const SEVERITIES: &[&str] = &["INFO", "MINOR", "MAJOR", "CRITICAL", "BLOCKER"];
const TYPES: &[&str] = &["BUG", "VULNERABILITY", "CODE_SMELL"];
const STATUSES: &[&str] = &[
    "OPEN",
    "CONFIRMED",
    "REOPENED",
    "RESOLVED",
    "CLOSED",
    "ACCEPTED",
    "FALSE_POSITIVE",
];
const TRANSITIONS: &[&str] = &[
    "confirm",
    "unconfirm",
    "reopen",
    "resolve",
    "falsepositive",
    "wontfix",
    "close",
    "accept",
];

/// Location of an issue within its file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    /// First line, 1-based.
    pub start_line: u32,
    /// Last line, 1-based.
    pub end_line: u32,
    /// Offset within the first line.
    #[serde(default)]
    pub start_offset: u32,
    /// Offset within the last line.
    #[serde(default)]
    pub end_offset: u32,
}

/// A comment on an issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssueComment {
    /// The comment key.
    pub key: String,
    /// Login of the author.
    #[serde(default)]
    pub login: Option<String>,
    /// Rendered HTML.
    #[serde(default)]
    pub html_text: Option<String>,
    /// Source markdown.
    #[serde(default)]
    pub markdown: Option<String>,
    /// When the comment was written.
    #[serde(default, with = "sonar_date")]
    pub created_at: Option<SonarDate>,
}

/// An issue.
///
/// Enumerated fields (`severity`, `issue_type`, `status`) are kept as
/// strings so that values introduced by newer servers still decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// The issue key.
    pub key: String,

    /// The rule that raised the issue (e.g., `java:S1144`).
    pub rule: String,

    /// The component key of the file or project.
    pub component: String,

    /// The project key.
    #[serde(default)]
    pub project: Option<String>,

    /// Severity (`INFO` .. `BLOCKER`).
    #[serde(default)]
    pub severity: Option<String>,

    /// Issue type (`BUG`, `VULNERABILITY`, `CODE_SMELL`).
    #[serde(default, rename = "type")]
    pub issue_type: Option<String>,

    /// Workflow status.
    pub status: String,

    /// Resolution, once resolved.
    #[serde(default)]
    pub resolution: Option<String>,

    /// The issue message.
    #[serde(default)]
    pub message: Option<String>,

    /// Line of the primary location.
    #[serde(default)]
    pub line: Option<u32>,

    /// Precise primary location.
    #[serde(default)]
    pub text_range: Option<TextRange>,

    /// Remediation effort (e.g., `5min`).
    #[serde(default)]
    pub effort: Option<String>,

    /// SCM author of the offending line.
    #[serde(default)]
    pub author: Option<String>,

    /// Login of the assignee.
    #[serde(default)]
    pub assignee: Option<String>,

    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Comments, when requested.
    #[serde(default)]
    pub comments: Vec<IssueComment>,

    /// When the issue was created.
    #[serde(default, with = "sonar_date")]
    pub creation_date: Option<SonarDate>,

    /// When the issue was last updated.
    #[serde(default, with = "sonar_date")]
    pub update_date: Option<SonarDate>,

    /// When the issue was closed.
    #[serde(default, with = "sonar_date")]
    pub close_date: Option<SonarDate>,
}

/// One value of a facet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetValue {
    /// The value.
    pub val: String,
    /// Number of matching issues.
    pub count: u64,
}

/// A facet requested on an issue search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Facet {
    /// The faceted property (e.g., `severities`).
    pub property: String,
    /// The counted values.
    #[serde(default)]
    pub values: Vec<FacetValue>,
}

/// One page of `api/issues/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssueSearchResponse {
    /// Paging information.
    pub paging: Paging,
    /// The issues on this page.
    #[serde(default)]
    pub issues: Vec<Issue>,
    /// Total remediation effort in minutes.
    #[serde(default)]
    pub effort_total: Option<u64>,
    /// Requested facets.
    #[serde(default)]
    pub facets: Vec<Facet>,
}

impl Paginated for IssueSearchResponse {
    type Item = Issue;

    fn paging(&self) -> &Paging {
        &self.paging
    }

    fn item_count(&self) -> usize {
        self.issues.len()
    }

    fn into_items(self) -> Vec<Issue> {
        self.issues
    }
}

/// Response of the issue workflow actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueResponse {
    /// The issue after the change.
    pub issue: Issue,
}

/// `GET api/issues/search`
#[derive(Debug)]
pub struct SearchIssues;

impl Endpoint for SearchIssues {
    type Response = IssueSearchResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "api/issues/search";
    const RULES: &'static [Rule] = &[
        Rule::OneOf {
            key: "types",
            allowed: TYPES,
        },
        Rule::OneOf {
            key: "severities",
            allowed: SEVERITIES,
        },
        Rule::OneOf {
            key: "statuses",
            allowed: STATUSES,
        },
        Rule::Exclusive {
            label: "branch selectors",
            keys: &["branch", "pullRequest"],
        },
    ];
}

impl PaginatedEndpoint for SearchIssues {
    const DEFAULT_PAGE_SIZE: u32 = 100;
    const MAX_PAGE_SIZE: u32 = 500;
}

/// `POST api/issues/add_comment`
#[derive(Debug)]
pub struct AddComment;

impl Endpoint for AddComment {
    type Response = IssueResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "api/issues/add_comment";
    const RULES: &'static [Rule] = &[Rule::Required("issue"), Rule::Required("text")];
}

/// `POST api/issues/assign`
#[derive(Debug)]
pub struct AssignIssue;

impl Endpoint for AssignIssue {
    type Response = IssueResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "api/issues/assign";
    const RULES: &'static [Rule] = &[Rule::Required("issue")];
}

/// `POST api/issues/set_severity`
#[derive(Debug)]
pub struct SetSeverity;

impl Endpoint for SetSeverity {
    type Response = IssueResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "api/issues/set_severity";
    const RULES: &'static [Rule] = &[
        Rule::Required("issue"),
        Rule::Required("severity"),
        Rule::OneOf {
            key: "severity",
            allowed: SEVERITIES,
        },
    ];
    const DEPRECATION: Option<&'static str> =
        Some("severities are deprecated since SonarQube 10.4 in favor of software quality impacts");
}

/// `POST api/issues/do_transition`
#[derive(Debug)]
pub struct DoTransition;

impl Endpoint for DoTransition {
    type Response = IssueResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "api/issues/do_transition";
    const RULES: &'static [Rule] = &[
        Rule::Required("issue"),
        Rule::Required("transition"),
        Rule::OneOf {
            key: "transition",
            allowed: TRANSITIONS,
        },
    ];
}

impl PaginatedRequest<SearchIssues> {
    /// Adds a component (project, directory or file) key.
    #[must_use]
    pub fn component(self, key: &str) -> Self {
        self.append("components", key)
    }

    /// Adds a project key.
    #[must_use]
    pub fn project(self, key: &str) -> Self {
        self.append("projects", key)
    }

    /// Adds an issue type.
    #[must_use]
    pub fn issue_type(self, issue_type: IssueType) -> Self {
        self.append("types", issue_type.as_str())
    }

    /// Adds a severity.
    #[must_use]
    pub fn severity(self, severity: Severity) -> Self {
        self.append("severities", severity.as_str())
    }

    /// Adds a workflow status (e.g., `OPEN`).
    #[must_use]
    pub fn status(self, status: &str) -> Self {
        self.append("statuses", status)
    }

    /// Keeps only resolved (`true`) or unresolved (`false`) issues.
    #[must_use]
    pub fn resolved(self, resolved: bool) -> Self {
        self.param("resolved", resolved)
    }

    /// Adds an assignee login; `__me__` selects the current user.
    #[must_use]
    pub fn assignee(self, login: &str) -> Self {
        self.append("assignees", login)
    }

    /// Adds a tag.
    #[must_use]
    pub fn tag(self, tag: &str) -> Self {
        self.append("tags", tag)
    }

    /// Keeps issues created at or after `date`.
    #[must_use]
    pub fn created_after<Tz: TimeZone>(self, date: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        self.param("createdAfter", format_date(date))
    }

    /// Keeps issues from the new code period.
    #[must_use]
    pub fn in_new_code_period(self, only: bool) -> Self {
        self.param("inNewCodePeriod", only)
    }

    /// Searches a branch instead of the main branch.
    #[must_use]
    pub fn branch(self, branch: &str) -> Self {
        self.param("branch", branch)
    }

    /// Searches a pull request instead of the main branch.
    #[must_use]
    pub fn pull_request(self, id: &str) -> Self {
        self.param("pullRequest", id)
    }

    /// Sorts by `field` (e.g., `CREATION_DATE`).
    #[must_use]
    pub fn sort(self, field: &str, ascending: bool) -> Self {
        self.param("s", field).param("asc", ascending)
    }

    /// Requests a facet (e.g., `severities`).
    #[must_use]
    pub fn facet(self, facet: &str) -> Self {
        self.append("facets", facet)
    }
}

impl RequestBuilder<AssignIssue> {
    /// Sets the assignee login. Leaving it unset unassigns the issue.
    #[must_use]
    pub fn assignee(self, login: &str) -> Self {
        self.param("assignee", login)
    }
}

/// Client for `api/issues`.
#[derive(Clone, Debug)]
pub struct IssuesClient {
    client: ApiClient,
}

impl IssuesClient {
    /// Creates an issues client on top of `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Searches issues.
    #[must_use]
    pub fn search(&self) -> PaginatedRequest<SearchIssues> {
        self.client.paginated()
    }

    /// Adds a comment to an issue.
    #[must_use]
    pub fn add_comment(&self, issue: &str, text: &str) -> RequestBuilder<AddComment> {
        self.client
            .request::<AddComment>()
            .param("issue", issue)
            .param("text", text)
    }

    /// Assigns or unassigns an issue.
    #[must_use]
    pub fn assign(&self, issue: &str) -> RequestBuilder<AssignIssue> {
        self.client.request::<AssignIssue>().param("issue", issue)
    }

    /// Changes the severity of an issue.
    ///
    /// The server has deprecated this action; each execution logs a warning.
    #[must_use]
    pub fn set_severity(&self, issue: &str, severity: Severity) -> RequestBuilder<SetSeverity> {
        self.client
            .request::<SetSeverity>()
            .param("issue", issue)
            .param("severity", severity.as_str())
    }

    /// Applies a workflow transition (e.g., `confirm`, `resolve`, `reopen`).
    #[must_use]
    pub fn do_transition(&self, issue: &str, transition: &str) -> RequestBuilder<DoTransition> {
        self.client
            .request::<DoTransition>()
            .param("issue", issue)
            .param("transition", transition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerUrl, SonarQubeConfig};
    use crate::request::{ParamValue, ValidationReason};
    use chrono::{FixedOffset, TimeZone as _};

    fn issues() -> IssuesClient {
        let config = SonarQubeConfig::builder()
            .server_url(ServerUrl::new("https://sonar.example.com").unwrap())
            .build()
            .unwrap();
        IssuesClient::new(ApiClient::new(&config).unwrap())
    }

    const SEARCH_PAGE: &str = r#"{
        "total": 1,
        "p": 1,
        "ps": 100,
        "paging": {"pageIndex": 1, "pageSize": 100, "total": 1},
        "effortTotal": 10,
        "issues": [
            {
                "key": "AU-Tpxb--iU5OvuD2FLy",
                "rule": "java:S1144",
                "severity": "MAJOR",
                "component": "my-app:src/Main.java",
                "project": "my-app",
                "line": 81,
                "textRange": {"startLine": 81, "endLine": 81, "startOffset": 2, "endOffset": 9},
                "status": "OPEN",
                "message": "Remove this unused private method.",
                "effort": "10min",
                "author": "dev@example.com",
                "tags": ["unused"],
                "creationDate": "2024-01-15T10:30:00+0000",
                "updateDate": "2024-01-16T08:00:00+0000",
                "type": "CODE_SMELL",
                "impacts": [{"softwareQuality": "MAINTAINABILITY", "severity": "MEDIUM"}]
            }
        ],
        "components": [],
        "facets": [
            {"property": "severities", "values": [{"val": "MAJOR", "count": 1}]}
        ]
    }"#;

    #[test]
    fn test_search_response_deserialization() {
        let page: IssueSearchResponse = serde_json::from_str(SEARCH_PAGE).unwrap();
        assert_eq!(page.paging.total, 1);
        assert_eq!(page.effort_total, Some(10));
        assert_eq!(page.facets[0].values[0].count, 1);

        let issue = &page.issues[0];
        assert_eq!(issue.issue_type.as_deref(), Some("CODE_SMELL"));
        assert_eq!(issue.text_range.unwrap().start_offset, 2);
        assert!(issue.close_date.is_none());
        assert!(issue.creation_date.is_some());
    }

    #[test]
    fn test_search_filters_are_comma_lists() {
        let request = issues()
            .search()
            .issue_type(IssueType::Bug)
            .issue_type(IssueType::Vulnerability)
            .severity(Severity::Blocker);

        assert_eq!(
            request.params().get("types"),
            Some(&ParamValue::List(vec![
                "BUG".to_string(),
                "VULNERABILITY".to_string()
            ]))
        );
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_search_rejects_unknown_status() {
        let error = issues().search().status("DONE").validate().unwrap_err();
        assert_eq!(error.reason, ValidationReason::InvalidValue);
        assert_eq!(error.parameter, "statuses");
    }

    #[test]
    fn test_branch_and_pull_request_are_exclusive() {
        let error = issues()
            .search()
            .branch("feature/x")
            .pull_request("42")
            .validate()
            .unwrap_err();
        assert_eq!(error.reason, ValidationReason::MutuallyExclusive);
    }

    #[test]
    fn test_created_after_uses_wire_format() {
        let date = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
            .unwrap();
        let request = issues().search().created_after(&date);
        assert_eq!(
            request.params().get("createdAfter"),
            Some(&ParamValue::from("2024-01-15T10:30:00+0000"))
        );
    }

    #[test]
    fn test_assign_without_assignee_unassigns() {
        let builder = issues().assign("AU-Tpxb");
        assert!(builder.validate().is_ok());
        assert!(!builder.params().contains("assignee"));

        let builder = builder.assignee("jdoe");
        assert_eq!(
            builder.params().get("assignee"),
            Some(&ParamValue::from("jdoe"))
        );
    }

    #[test]
    fn test_do_transition_rejects_unknown_transition() {
        let error = issues()
            .do_transition("AU-Tpxb", "archive")
            .validate()
            .unwrap_err();
        assert_eq!(error.reason, ValidationReason::InvalidValue);
        assert!(issues().do_transition("AU-Tpxb", "confirm").validate().is_ok());
    }

    #[test]
    fn test_set_severity_is_marked_deprecated() {
        assert!(SetSeverity::DEPRECATION.is_some());
        assert!(AddComment::DEPRECATION.is_none());
        assert!(issues()
            .set_severity("AU-Tpxb", Severity::Minor)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_add_comment_requires_text() {
        let error = issues().add_comment("AU-Tpxb", "").validate().unwrap_err();
        assert_eq!(error.parameter, "text");
    }
}
