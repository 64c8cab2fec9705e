//! Structural validation of decoded response bodies.
//!
//! A [`Schema`] describes which fields of a decoded body must be present
//! and non-zero. It is passed next to the decode target instead of being
//! read from the target type itself.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

/// Errors produced when a decoded body does not satisfy its schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The decoded value is not a JSON object, so it has no fields.
    #[error("decoded body is not an object")]
    NotAnObject,

    /// Required fields are absent or hold their zero value.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// A user-supplied validator rejected the value.
    #[error("{0}")]
    Rejected(String),
}

/// Signature of a user-supplied validator.
pub type ValidatorFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

/// A list of field selectors that must hold non-zero values.
///
/// A selector is a top-level key, or a JSON pointer (RFC 6901) when it
/// starts with `/`, e.g. `/user/id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredFields {
    selectors: Vec<String>,
}

impl RequiredFields {
    /// Creates the list from any iterable of selectors.
    #[must_use]
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selectors: selectors.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the selectors.
    #[must_use]
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    fn lookup<'v>(value: &'v Value, selector: &str) -> Option<&'v Value> {
        if selector.starts_with('/') {
            value.pointer(selector)
        } else {
            value.get(selector)
        }
    }
}

/// Description of what a decoded body must contain.
#[derive(Clone)]
pub enum Schema {
    /// Every top-level field of the decoded object is required.
    AllFields,
    /// Only the listed fields are required.
    Required(RequiredFields),
    /// A user-supplied validator decides.
    Custom(Arc<ValidatorFn>),
}

impl Schema {
    /// Requires the given field selectors.
    #[must_use]
    pub fn required<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Required(RequiredFields::new(selectors))
    }

    /// Wraps a validation function.
    #[must_use]
    pub fn custom<F>(validator: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(validator))
    }

    /// Validates a decoded value.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming every unmet requirement.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        match self {
            Self::AllFields => {
                let object = value.as_object().ok_or(ValidationError::NotAnObject)?;
                let mut missing: Vec<String> = object
                    .iter()
                    .filter(|(_, v)| is_zero(v))
                    .map(|(k, _)| k.clone())
                    .collect();
                missing.sort();
                check_missing(missing)
            }
            Self::Required(fields) => {
                if !value.is_object() {
                    return Err(ValidationError::NotAnObject);
                }
                let missing: Vec<String> = fields
                    .selectors
                    .iter()
                    .filter(|s| RequiredFields::lookup(value, s).is_none_or(is_zero))
                    .cloned()
                    .collect();
                check_missing(missing)
            }
            Self::Custom(validator) => validator(value).map_err(ValidationError::Rejected),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllFields => f.write_str("AllFields"),
            Self::Required(fields) => f.debug_tuple("Required").field(fields).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<RequiredFields> for Schema {
    fn from(fields: RequiredFields) -> Self {
        Self::Required(fields)
    }
}

fn check_missing(missing: Vec<String>) -> Result<(), ValidationError> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

/// Returns true when `value` is the zero value of its JSON type.
#[must_use]
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
