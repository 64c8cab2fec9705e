//! HTTP Request domain types

mod header;
mod method;
mod query;
mod spec;

pub use header::{DEFAULT_CONTENT_TYPE, Header, Headers};
pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
pub use spec::RequestSpec;
