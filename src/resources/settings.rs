//! Configuration settings (`api/settings`).
//!
//! A setting holds exactly one kind of value: a single `value`, a
//! multi-value list (`values`) or a property set (`fieldValues`). Setting
//! more than one kind on the same call is rejected before sending.
//!
//! # Example
//!
//! ```rust,ignore
//! sonar
//!     .settings()
//!     .set("sonar.exclusions")
//!     .add_value("**/generated/**")
//!     .add_value("**/vendor/**")
//!     .component("my-app")
//!     .execute()
//!     .await?;
//!
//! let values = sonar.settings().values().key("sonar.exclusions").execute().await?;
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clients::{ApiClient, HttpMethod};
use crate::request::{Endpoint, RequestBuilder, Rule};

const VALUE_TYPES: &[&str] = &["value", "values", "fieldValues"];

/// A setting value as returned by `api/settings/values`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingValue {
    /// The setting key.
    pub key: String,
    /// Single value.
    #[serde(default)]
    pub value: Option<String>,
    /// Multi-value list.
    #[serde(default)]
    pub values: Vec<String>,
    /// Property set entries.
    #[serde(default)]
    pub field_values: Vec<BTreeMap<String, String>>,
    /// Whether the value is inherited from a parent scope.
    #[serde(default)]
    pub inherited: bool,
}

/// Response of `api/settings/values`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValuesResponse {
    /// The requested settings that have a value.
    #[serde(default)]
    pub settings: Vec<SettingValue>,
    /// Keys of secured settings that are set.
    #[serde(default)]
    pub set_secured_settings: Vec<String>,
}

/// A field of a property set definition.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SettingField {
    /// Field key.
    pub key: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Value type.
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    /// Accepted values for single-select fields.
    #[serde(default)]
    pub options: Vec<String>,
}

/// A setting definition as returned by `api/settings/list_definitions`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingDefinition {
    /// Setting key.
    pub key: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Value type (e.g., `STRING`, `BOOLEAN`, `PROPERTY_SET`).
    #[serde(default, rename = "type")]
    pub setting_type: Option<String>,
    /// Category shown in the UI.
    #[serde(default)]
    pub category: Option<String>,
    /// Sub-category shown in the UI.
    #[serde(default)]
    pub sub_category: Option<String>,
    /// Default value.
    #[serde(default)]
    pub default_value: Option<String>,
    /// Whether the setting takes a list of values.
    #[serde(default)]
    pub multi_values: bool,
    /// Accepted values for single-select settings.
    #[serde(default)]
    pub options: Vec<String>,
    /// Fields of a property set.
    #[serde(default)]
    pub fields: Vec<SettingField>,
}

/// Response of `api/settings/list_definitions`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DefinitionsResponse {
    /// The definitions.
    #[serde(default)]
    pub definitions: Vec<SettingDefinition>,
}

/// `POST api/settings/set`
#[derive(Debug)]
pub struct SetSetting;

impl Endpoint for SetSetting {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "api/settings/set";
    const RULES: &'static [Rule] = &[
        Rule::Required("key"),
        Rule::AnyOf {
            label: "value types",
            keys: VALUE_TYPES,
        },
        Rule::Exclusive {
            label: "value types",
            keys: VALUE_TYPES,
        },
    ];
}

/// `POST api/settings/reset`
#[derive(Debug)]
pub struct ResetSettings;

impl Endpoint for ResetSettings {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;
    const PATH: &'static str = "api/settings/reset";
    const RULES: &'static [Rule] = &[Rule::Required("keys")];
}

/// `GET api/settings/values`
#[derive(Debug)]
pub struct SettingValues;

impl Endpoint for SettingValues {
    type Response = ValuesResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "api/settings/values";
}

/// `GET api/settings/list_definitions`
#[derive(Debug)]
pub struct ListDefinitions;

impl Endpoint for ListDefinitions {
    type Response = DefinitionsResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    const PATH: &'static str = "api/settings/list_definitions";
}

impl RequestBuilder<SetSetting> {
    /// Sets a single value.
    #[must_use]
    pub fn value(self, value: &str) -> Self {
        self.param("value", value)
    }

    /// Adds one entry of a multi-value setting (sent as repeated `values`).
    #[must_use]
    pub fn add_value(self, value: &str) -> Self {
        self.append_multi("values", value)
    }

    /// Adds one entry of a property set (sent as repeated `fieldValues`).
    #[must_use]
    pub fn add_field_values(self, fields: &BTreeMap<String, String>) -> Self {
        let encoded = Value::from(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                .collect::<serde_json::Map<_, _>>(),
        );
        self.append_multi("fieldValues", encoded.to_string())
    }

    /// Scopes the setting to a project.
    #[must_use]
    pub fn component(self, key: &str) -> Self {
        self.param("component", key)
    }
}

impl RequestBuilder<ResetSettings> {
    /// Adds a key to reset.
    #[must_use]
    pub fn key(self, key: &str) -> Self {
        self.append("keys", key)
    }

    /// Scopes the reset to a project.
    #[must_use]
    pub fn component(self, key: &str) -> Self {
        self.param("component", key)
    }
}

impl RequestBuilder<SettingValues> {
    /// Adds a key to fetch; all settings are returned when none is given.
    #[must_use]
    pub fn key(self, key: &str) -> Self {
        self.append("keys", key)
    }

    /// Reads the values of a project.
    #[must_use]
    pub fn component(self, key: &str) -> Self {
        self.param("component", key)
    }
}

impl RequestBuilder<ListDefinitions> {
    /// Lists the definitions applicable to a project.
    #[must_use]
    pub fn component(self, key: &str) -> Self {
        self.param("component", key)
    }
}

/// Client for `api/settings`.
#[derive(Clone, Debug)]
pub struct SettingsClient {
    client: ApiClient,
}

impl SettingsClient {
    /// Creates a settings client on top of `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Updates a setting. Exactly one kind of value must then be given.
    #[must_use]
    pub fn set(&self, key: &str) -> RequestBuilder<SetSetting> {
        self.client.request::<SetSetting>().param("key", key)
    }

    /// Removes settings so that defaults or inherited values apply.
    #[must_use]
    pub fn reset(&self) -> RequestBuilder<ResetSettings> {
        self.client.request()
    }

    /// Reads setting values.
    #[must_use]
    pub fn values(&self) -> RequestBuilder<SettingValues> {
        self.client.request()
    }

    /// Lists setting definitions.
    #[must_use]
    pub fn list_definitions(&self) -> RequestBuilder<ListDefinitions> {
        self.client.request()
    }
}
