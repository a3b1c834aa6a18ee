//! Types shared by several resources.

use std::fmt;

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::{Deserialize, Serialize};

/// The timestamp format used by the Web API (`2024-01-15T10:30:00+0000`).
pub const SONAR_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Formats a timestamp the way the Web API expects it in parameters.
#[must_use]
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    date.format(SONAR_DATE_FORMAT).to_string()
}

/// Serde adapter for optional Web API timestamps.
///
/// Use with `#[serde(default, with = "sonar_date")]`.
pub mod sonar_date {
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::SONAR_DATE_FORMAT;

    /// Serializes `Some` as a Web API timestamp and `None` as `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<FixedOffset>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format(SONAR_DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Parses a Web API timestamp; `null` or a missing field yields `None`.
    ///
    /// # Errors
    ///
    /// Fails when the string is not in the Web API format.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| DateTime::parse_from_str(&s, SONAR_DATE_FORMAT).map_err(de::Error::custom))
            .transpose()
    }
}

/// Project visibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Browsable by anyone with access to the server.
    Public,
    /// Restricted to users with explicit permissions.
    Private,
}

impl Visibility {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted visibility wire values.
pub(crate) const VISIBILITIES: &[&str] = &["public", "private"];

/// A parsed Web API timestamp.
pub type SonarDate = DateTime<FixedOffset>;
