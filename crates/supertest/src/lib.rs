//! Supertest - fluent HTTP assertions for tests
//!
//! Configure one request and its expectations, execute it, and get every
//! failure reported at once:
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//! use supertest::PanicContext;
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! #[serde(default, rename_all = "camelCase")]
//! struct Todo {
//!     user_id: u32,
//!     id: u32,
//!     title: String,
//!     completed: bool,
//! }
//!
//! let mut todo = Todo::default();
//! let _ = supertest::new()
//!     .method("GET")
//!     .url("http://localhost:3000/todos/1")
//!     .json(&mut todo)
//!     .status(200)
//!     .execute(&mut PanicContext);
//! ```
//!
//! The layers are re-exported here; most callers only need [`new`].

pub use supertest_application::{
    DecodeTarget, ExecuteResult, HttpClient, HttpClientError, PanicContext, RecordingContext,
    RequestTester, TestContext,
};
pub use supertest_domain::{
    DEFAULT_CONTENT_TYPE, DomainError, Failure, FailureCategory, FailureReport, Header, Headers,
    HttpMethod, RequestSpec, RequiredFields, ResponseSpec, Schema, StatusCode, ValidationError,
};
pub use supertest_infrastructure::{ClientConfig, ConfigError, ReqwestHttpClient};

use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Tester sending requests over the network with reqwest.
pub type Tester<'a> = RequestTester<'a, ReqwestHttpClient>;

/// Creates a tester with the `SUPERTEST_*` environment configuration.
///
/// An unreadable environment falls back to the defaults with a warning.
#[must_use]
pub fn new<'a>() -> Tester<'a> {
    let config = ClientConfig::from_env().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring client configuration from environment");
        ClientConfig::default()
    });
    with_config(config)
}

/// Creates a tester whose transport is built from `config`.
#[must_use]
pub fn with_config<'a>(config: ClientConfig) -> Tester<'a> {
    RequestTester::new(ReqwestHttpClient::with_config(config))
}

/// Installs a test-friendly tracing subscriber filtered by `RUST_LOG`
/// (default `warn`).
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
