//! Server state (`api/system`).

use serde::{Deserialize, Serialize};

use crate::clients::{ApiClient, HttpMethod};
use crate::request::{Endpoint, RequestBuilder};

/// Response of `api/system/status`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SystemStatus {
    /// Server id.
    #[serde(default)]
    pub id: Option<String>,
    /// Server version.
    #[serde(default)]
    pub version: Option<String>,
    /// Running status: `STARTING`, `UP`, `DOWN`, `RESTARTING`,
    /// `DB_MIGRATION_NEEDED` or `DB_MIGRATION_RUNNING`.
    pub status: String,
}

impl SystemStatus {
    /// Returns `true` when the server is fully operational.
    #[must_use]
    pub fn is_up(&self) -> bool {
        self.status == "UP"
    }
}

/// A reason for a degraded health status.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HealthCause {
    /// Description of the cause.
    pub message: String,
}

/// Response of `api/system/health`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SystemHealth {
    /// `GREEN`, `YELLOW` or `RED`.
    pub health: String,
    /// Why the health is not `GREEN`.
    #[serde(default)]
    pub causes: Vec<HealthCause>,
}

impl SystemHealth {
    /// Returns `true` for `GREEN`.
    #[must_use]
    pub fn is_green(&self) -> bool {
        self.health == "GREEN"
    }
}

/// `GET api/system/status`
#[derive(Debug)]
pub struct GetStatus;

impl Endpoint for GetStatus {
    type Response = SystemStatus;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "api/system/status";
}

/// `GET api/system/health`
#[derive(Debug)]
pub struct GetHealth;

impl Endpoint for GetHealth {
    type Response = SystemHealth;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "api/system/health";
}

/// `GET api/system/ping`
#[derive(Debug)]
pub struct Ping;

impl Endpoint for Ping {
    type Response = String;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "api/system/ping";
}

/// Client for `api/system`.
#[derive(Clone, Debug)]
pub struct SystemClient {
    client: ApiClient,
}

impl SystemClient {
    /// Creates a system client on top of `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Reads the running status. Does not require authentication.
    #[must_use]
    pub fn status(&self) -> RequestBuilder<GetStatus> {
        self.client.request()
    }

    /// Reads the health status. Requires 'Administer System'.
    #[must_use]
    pub fn health(&self) -> RequestBuilder<GetHealth> {
        self.client.request()
    }

    /// Checks that the server answers; resolves to `"pong"`.
    #[must_use]
    pub fn ping(&self) -> RequestBuilder<Ping> {
        self.client.request()
    }
}
