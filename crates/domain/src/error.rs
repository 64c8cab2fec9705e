//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is empty.
    #[error("Method is required")]
    EmptyMethod,

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The URL is empty.
    #[error("Url is required")]
    EmptyUrl,

    /// A collection of query parameters has no entries.
    #[error("Query is required")]
    EmptyQuery,

    /// A query parameter has an empty value.
    #[error("Query value is required")]
    EmptyQueryValue(String),

    /// Query parameters could not be encoded.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A collection of headers has no entries.
    #[error("Headers is required")]
    EmptyHeaders,

    /// A header has an empty value.
    #[error("Header value is required")]
    EmptyHeaderValue(String),

    /// The expected status is zero.
    #[error("Status is required")]
    MissingStatus,

    /// The expected status is outside the HTTP range.
    #[error("Status must be between 100 and 599")]
    StatusOutOfRange(u16),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
