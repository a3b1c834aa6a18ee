//! Declarative parameter validation.
//!
//! Each endpoint declares its constraints as a slice of [`Rule`]s. The rules
//! are checked synchronously when a builder is executed, before any request
//! is sent. The first violated rule wins.
//!
//! # Example
//!
//! ```rust
//! use sonarqube_api::request::{validate, ParamMap, Rule, ValidationReason};
//!
//! const RULES: &[Rule] = &[
//!     Rule::Required("key"),
//!     Rule::Exclusive { label: "value types", keys: &["value", "values"] },
//! ];
//!
//! let mut params = ParamMap::new();
//! params.set("value", "1");
//!
//! let error = validate(RULES, &params).unwrap_err();
//! assert_eq!(error.reason, ValidationReason::MissingRequired);
//! ```

use std::fmt;

use thiserror::Error;

use crate::request::params::{ParamMap, ParamValue};

/// Machine-readable reason for a validation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationReason {
    /// A required parameter is absent or empty.
    MissingRequired,
    /// Two or more mutually exclusive parameters are set.
    MutuallyExclusive,
    /// A numeric parameter lies outside its allowed range.
    OutOfRange,
    /// A parameter has a value outside its declared set, or the wrong type.
    InvalidValue,
}

impl ValidationReason {
    /// Returns the stable code for this reason.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingRequired => "missing_required",
            Self::MutuallyExclusive => "mutually_exclusive",
            Self::OutOfRange => "out_of_range",
            Self::InvalidValue => "invalid_value",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A client-side validation failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// Why validation failed.
    pub reason: ValidationReason,
    /// The offending parameter(s), comma-separated.
    pub parameter: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    #[must_use]
    pub fn new(
        reason: ValidationReason,
        parameter: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            reason,
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}

/// A single declarative constraint on an endpoint's parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    /// The parameter must be present and non-empty.
    Required(&'static str),
    /// At least one of the parameters must be present.
    AnyOf {
        /// Description of the group, used in messages.
        label: &'static str,
        /// The parameters in the group.
        keys: &'static [&'static str],
    },
    /// At most one of the parameters may be present.
    Exclusive {
        /// Description of the group, used in messages.
        label: &'static str,
        /// The parameters in the group.
        keys: &'static [&'static str],
    },
    /// An integer parameter, when present, must lie in `[min, max]`.
    Range {
        /// The parameter name.
        key: &'static str,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// Every element of the parameter, when present, must be one of `allowed`.
    OneOf {
        /// The parameter name.
        key: &'static str,
        /// Accepted values.
        allowed: &'static [&'static str],
    },
}

impl Rule {
    /// Checks this rule against `params`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the violation.
    pub fn check(&self, params: &ParamMap) -> Result<(), ValidationError> {
        match *self {
            Self::Required(key) => match params.get(key) {
                None => Err(ValidationError::new(
                    ValidationReason::MissingRequired,
                    key,
                    format!("Missing required parameter '{key}'"),
                )),
                Some(value) if value.is_empty() => Err(ValidationError::new(
                    ValidationReason::MissingRequired,
                    key,
                    format!("Required parameter '{key}' must not be empty"),
                )),
                Some(_) => Ok(()),
            },
            Self::AnyOf { label, keys } => {
                if keys.iter().any(|k| params.contains(k)) {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        ValidationReason::MissingRequired,
                        keys.join(","),
                        format!("One of the {label} must be set: {}", keys.join(", ")),
                    ))
                }
            }
            Self::Exclusive { label, keys } => {
                let set: Vec<&str> = keys.iter().copied().filter(|k| params.contains(k)).collect();
                if set.len() > 1 {
                    Err(ValidationError::new(
                        ValidationReason::MutuallyExclusive,
                        set.join(","),
                        format!("Cannot set multiple {label}: {}", set.join(", ")),
                    ))
                } else {
                    Ok(())
                }
            }
            Self::Range { key, min, max } => match params.get(key) {
                None => Ok(()),
                Some(ParamValue::Int(v)) if (min..=max).contains(v) => Ok(()),
                Some(ParamValue::Int(v)) => Err(ValidationError::new(
                    ValidationReason::OutOfRange,
                    key,
                    format!("Parameter '{key}' must be between {min} and {max}, got {v}"),
                )),
                Some(_) => Err(ValidationError::new(
                    ValidationReason::InvalidValue,
                    key,
                    format!("Parameter '{key}' must be an integer"),
                )),
            },
            Self::OneOf { key, allowed } => {
                let Some(value) = params.get(key) else {
                    return Ok(());
                };
                let values = value.text_values();
                if values.is_empty() && !value.is_empty() {
                    return Err(ValidationError::new(
                        ValidationReason::InvalidValue,
                        key,
                        format!("Parameter '{key}' must be text"),
                    ));
                }
                match values.into_iter().find(|v| !allowed.contains(v)) {
                    Some(bad) => Err(ValidationError::new(
                        ValidationReason::InvalidValue,
                        key,
                        format!(
                            "Value '{bad}' of parameter '{key}' is not one of: {}",
                            allowed.join(", ")
                        ),
                    )),
                    None => Ok(()),
                }
            }
        }
    }
}

/// Checks every rule in order, returning the first violation.
///
/// # Errors
///
/// Returns the [`ValidationError`] of the first rule that fails.
pub fn validate(rules: &[Rule], params: &ParamMap) -> Result<(), ValidationError> {
    rules.iter().try_for_each(|rule| rule.check(params))
}
