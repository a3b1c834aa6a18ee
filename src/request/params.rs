//! Request parameter storage.
//!
//! A [`ParamMap`] holds the parameters accumulated by a builder. Keys are
//! kept in sorted order so that serialized requests are deterministic.

use std::collections::BTreeMap;

use serde_json::Value;

/// A single parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// A string. An empty string is a present value, not an absent one.
    Str(String),
    /// An integer.
    Int(i64),
    /// A boolean, sent as `true`/`false`.
    Bool(bool),
    /// A list sent as one comma-separated value (`types=BUG,CODE_SMELL`).
    List(Vec<String>),
    /// A list sent as one repeated key per element (`values=a&values=b`).
    Multi(Vec<String>),
    /// A nested object, sent as its JSON text.
    Object(Value),
}

impl ParamValue {
    /// Encodes this value as wire pairs under `key`.
    ///
    /// `Multi` yields one pair per element; every other variant yields exactly one.
    #[must_use]
    pub fn to_pairs(&self, key: &str) -> Vec<(String, String)> {
        let single = |v: String| vec![(key.to_string(), v)];
        match self {
            Self::Str(s) => single(s.clone()),
            Self::Int(i) => single(i.to_string()),
            Self::Bool(b) => single(b.to_string()),
            Self::List(items) => single(items.join(",")),
            Self::Multi(items) => items
                .iter()
                .map(|item| (key.to_string(), item.clone()))
                .collect(),
            Self::Object(v) => single(v.to_string()),
        }
    }

    /// Returns the string elements of a text or list value.
    ///
    /// Used by enumerated-value checks, which apply to every list element.
    #[must_use]
    pub fn text_values(&self) -> Vec<&str> {
        match self {
            Self::Str(s) => vec![s.as_str()],
            Self::List(items) | Self::Multi(items) => items.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns `true` for an empty string or an empty list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Str(s) => s.is_empty(),
            Self::List(items) | Self::Multi(items) => items.is_empty(),
            Self::Object(v) => v.is_null(),
            Self::Int(_) | Self::Bool(_) => false,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(ToString::to_string).collect())
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        Self::Object(value)
    }
}

/// Parameters accumulated by a request builder.
///
/// Setting a key twice keeps only the last value. Only the `append_*`
/// methods read and extend the current value.
///
/// # Example
///
/// ```rust
/// use sonarqube_api::request::{ParamMap, ParamValue};
///
/// let mut params = ParamMap::new();
/// params.set("q", "first");
/// params.set("q", "second");
/// params.append("types", "BUG");
/// params.append("types", "VULNERABILITY");
///
/// assert_eq!(params.get("q"), Some(&ParamValue::from("second")));
/// assert_eq!(
///     params.to_pairs(),
///     vec![
///         ("q".to_string(), "second".to_string()),
///         ("types".to_string(), "BUG,VULNERABILITY".to_string()),
///     ]
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamMap {
    entries: BTreeMap<String, ParamValue>,
}

impl ParamMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Removes `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.remove(key)
    }

    /// Appends to the comma-separated list under `key`.
    ///
    /// A missing key starts a new list. A plain string value already stored
    /// under `key` becomes the first list element.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.extend_list(key.into(), value.into(), false);
    }

    /// Appends to the repeated-key list under `key`.
    pub fn append_multi(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.extend_list(key.into(), value.into(), true);
    }

    fn extend_list(&mut self, key: String, value: String, repeated: bool) {
        let mut items = match self.entries.remove(&key) {
            Some(ParamValue::List(items) | ParamValue::Multi(items)) => items,
            Some(ParamValue::Str(s)) => vec![s],
            Some(other) => other.to_pairs(&key).into_iter().map(|(_, v)| v).collect(),
            None => Vec::new(),
        };
        items.push(value);
        let value = if repeated {
            ParamValue::Multi(items)
        } else {
            ParamValue::List(items)
        };
        self.entries.insert(key, value);
    }

    /// Returns the value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is present (including an explicit empty string).
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Encodes all parameters as wire pairs, in key order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .flat_map(|(key, value)| value.to_pairs(key))
            .collect()
    }
}
