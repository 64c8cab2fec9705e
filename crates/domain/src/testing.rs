//! Failure accumulation for a single test execution.
//!
//! Every configuration mistake and every violated expectation is recorded
//! into a [`FailureReport`] owned by one builder, and reported once at the end.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of problem a [`Failure`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// Method missing, empty or unsupported.
    Method,
    /// URL missing, empty or unparseable.
    Url,
    /// Query parameters empty or with an empty value.
    Query,
    /// Expected status missing or out of range.
    Status,
    /// Headers empty or with an empty value.
    Headers,
    /// The request could not be built or sent.
    RequestError,
    /// The observed status differs from the expected one.
    StatusMismatch,
    /// The response body could not be decoded into the target.
    DecodeError,
    /// The decoded body misses required fields.
    ValidationError,
}

impl FailureCategory {
    /// Returns the label used when rendering the report.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Url => "url",
            Self::Query => "query",
            Self::Status => "status",
            Self::Headers => "headers",
            Self::RequestError => "request error",
            Self::StatusMismatch => "status mismatch",
            Self::DecodeError => "decode error",
            Self::ValidationError => "validation error",
        }
    }

    /// Returns true for categories raised while configuring the builder,
    /// as opposed to those raised by the round-trip itself.
    #[must_use]
    pub const fn is_configuration(self) -> bool {
        matches!(
            self,
            Self::Method | Self::Url | Self::Query | Self::Status | Self::Headers
        )
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single recorded failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// What went wrong.
    pub category: FailureCategory,
    /// Human-readable detail.
    pub message: String,
}

impl Failure {
    /// Creates a failure.
    #[must_use]
    pub fn new(category: FailureCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

/// Ordered accumulator of failures for one execution.
///
/// Failures keep their recording order and none is overwritten, so the
/// rendered report is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureReport {
    failures: Vec<Failure>,
}

impl FailureReport {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Records a failure.
    pub fn record(&mut self, category: FailureCategory, message: impl Into<String>) {
        self.failures.push(Failure::new(category, message));
    }

    /// Returns true if at least one failure of `category` was recorded.
    #[must_use]
    pub fn contains(&self, category: FailureCategory) -> bool {
        self.failures.iter().any(|f| f.category == category)
    }

    /// Returns the number of failures recorded for `category`.
    #[must_use]
    pub fn count(&self, category: FailureCategory) -> usize {
        self.failures
            .iter()
            .filter(|f| f.category == category)
            .count()
    }

    /// Returns true if a configuration failure was recorded.
    #[must_use]
    pub fn has_configuration_failures(&self) -> bool {
        self.failures.iter().any(|f| f.category.is_configuration())
    }

    /// Returns an iterator over the failures in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Failure> {
        self.failures.iter()
    }

    /// Returns the number of failures.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns true when nothing was recorded, i.e. the execution passed.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FailureReport {}

impl<'a> IntoIterator for &'a FailureReport {
    type Item = &'a Failure;
    type IntoIter = std::slice::Iter<'a, Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}
