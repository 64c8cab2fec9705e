//! Supertest Application - Ports and the request tester
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP transport, test reporting)
//! - The decode-target abstraction for response bodies
//! - The [`RequestTester`] builder and its execution pipeline

pub mod decode;
pub mod ports;
pub mod tester;

pub use decode::DecodeTarget;
pub use ports::{HttpClient, HttpClientError, PanicContext, RecordingContext, TestContext};
pub use tester::{ExecuteResult, RequestTester};
