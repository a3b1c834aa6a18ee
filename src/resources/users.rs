//! User accounts (`api/users`).

use serde::{Deserialize, Serialize};

use crate::clients::{ApiClient, HttpMethod};
use crate::request::{
    Endpoint, Paginated, PaginatedEndpoint, PaginatedRequest, Paging, RequestBuilder, Rule,
};
use crate::resources::common::{sonar_date, SonarDate};

/// A user account.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The login.
    pub login: String,
    /// The display name.
    #[serde(default)]
    pub name: Option<String>,
    /// The email address, visible to administrators.
    #[serde(default)]
    pub email: Option<String>,
    /// Whether the account is active.
    #[serde(default)]
    pub active: bool,
    /// Whether the account is managed by SonarQube rather than an identity provider.
    #[serde(default)]
    pub local: bool,
    /// Groups the user belongs to.
    #[serde(default)]
    pub groups: Vec<String>,
    /// SCM accounts linked to the user.
    #[serde(default)]
    pub scm_accounts: Vec<String>,
    /// Identity provider, for external accounts.
    #[serde(default)]
    pub external_provider: Option<String>,
    /// Last login time.
    #[serde(default, with = "sonar_date")]
    pub last_connection_date: Option<SonarDate>,
}

/// One page of `api/users/search`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserSearchResponse {
    /// Paging information.
    pub paging: Paging,
    /// The users on this page.
    #[serde(default)]
    pub users: Vec<User>,
}

impl Paginated for UserSearchResponse {
    type Item = User;

    fn paging(&self) -> &Paging {
        &self.paging
    }

    fn item_count(&self) -> usize {
        self.users.len()
    }

    fn into_items(self) -> Vec<User> {
        self.users
    }
}

/// Response of `api/users/create` and `api/users/deactivate`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserResponse {
    /// The user after the change.
    pub user: User,
}

/// `GET api/users/search`
#[derive(Debug)]
pub struct SearchUsers;

impl Endpoint for SearchUsers {
    type Response = UserSearchResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "api/users/search";
}

impl PaginatedEndpoint for SearchUsers {
    const DEFAULT_PAGE_SIZE: u32 = 50;
    const MAX_PAGE_SIZE: u32 = 500;
}

/// `POST api/users/create`
#[derive(Debug)]
pub struct CreateUser;

impl Endpoint for CreateUser {
    type Response = UserResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "api/users/create";
    const RULES: &'static [Rule] = &[Rule::Required("login"), Rule::Required("name")];
}

/// `POST api/users/deactivate`
#[derive(Debug)]
pub struct DeactivateUser;

impl Endpoint for DeactivateUser {
    type Response = UserResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "api/users/deactivate";
    const RULES: &'static [Rule] = &[Rule::Required("login")];
}

impl PaginatedRequest<SearchUsers> {
    /// Limits the search to logins, names or emails containing `query`.
    #[must_use]
    pub fn query(self, query: &str) -> Self {
        self.param("q", query)
    }
}

impl RequestBuilder<CreateUser> {
    /// Sets the email address.
    #[must_use]
    pub fn email(self, email: &str) -> Self {
        self.param("email", email)
    }

    /// Sets the password of a local account.
    #[must_use]
    pub fn password(self, password: &str) -> Self {
        self.param("password", password)
    }

    /// Creates an account authenticated by an identity provider (`false`)
    /// instead of a local one.
    #[must_use]
    pub fn local(self, local: bool) -> Self {
        self.param("local", local)
    }

    /// Links an SCM account (sent as repeated `scmAccount`).
    #[must_use]
    pub fn scm_account(self, account: &str) -> Self {
        self.append_multi("scmAccount", account)
    }
}

impl RequestBuilder<DeactivateUser> {
    /// Also removes personal data from the account.
    #[must_use]
    pub fn anonymize(self, anonymize: bool) -> Self {
        self.param("anonymize", anonymize)
    }
}

/// Client for `api/users`.
#[derive(Clone, Debug)]
pub struct UsersClient {
    client: ApiClient,
}

impl UsersClient {
    /// Creates a users client on top of `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Searches users.
    #[must_use]
    pub fn search(&self) -> PaginatedRequest<SearchUsers> {
        self.client.paginated()
    }

    /// Creates a user.
    #[must_use]
    pub fn create(&self, login: &str, name: &str) -> RequestBuilder<CreateUser> {
        self.client
            .request::<CreateUser>()
            .param("login", login)
            .param("name", name)
    }

    /// Deactivates a user.
    #[must_use]
    pub fn deactivate(&self, login: &str) -> RequestBuilder<DeactivateUser> {
        self.client.request::<DeactivateUser>().param("login", login)
    }
}
