//! Supertest Domain - Core types
//!
//! This crate defines the domain model of the HTTP assertion builder:
//! request and response specifications, failure reporting and schema
//! validation of decoded bodies. All types here are pure Rust with no I/O.

pub mod error;
pub mod request;
pub mod response;
pub mod schema;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use request::{
    DEFAULT_CONTENT_TYPE, Header, Headers, HttpMethod, QueryParam, QueryParams, RequestSpec,
};
pub use response::{ResponseSpec, StatusCode};
pub use schema::{RequiredFields, Schema, ValidationError, is_zero};
pub use testing::{Failure, FailureCategory, FailureReport};
