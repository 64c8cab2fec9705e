//! Request Tester
//!
//! The fluent builder at the heart of the crate: configure a request and
//! its expectations, then execute it once and get every failure reported
//! together.

use std::fmt;

use supertest_domain::{
    DomainError, Failure, FailureCategory, FailureReport, Headers, HttpMethod, QueryParams,
    RequestSpec, ResponseSpec, Schema, StatusCode,
};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, warn};

use crate::decode::DecodeTarget;
use crate::ports::{HttpClient, HttpClientError, TestContext};

/// Result of the terminal operation: the tester holding the response, or
/// the report of everything that went wrong.
pub type ExecuteResult<'a, C> = Result<RequestTester<'a, C>, FailureReport>;

/// Fluent builder that issues one HTTP request and checks its outcome.
///
/// Configuration methods consume and return the builder. Invalid input is
/// recorded in the builder's own [`FailureReport`] and leaves the field
/// unchanged; nothing is raised until [`execute`](Self::execute).
///
/// # Example
///
/// ```ignore
/// let mut todo = Todo::default();
/// RequestTester::new(client)
///     .method("GET")
///     .url("http://localhost:3000/todos/1")
///     .json(&mut todo)
///     .status(200)
///     .validate_body()
///     .execute(&mut PanicContext)?;
/// ```
pub struct RequestTester<'a, C: HttpClient> {
    client: C,
    method: Option<HttpMethod>,
    url: String,
    headers: Headers,
    body: Option<Vec<u8>>,
    expected_status: Option<StatusCode>,
    decode_target: Option<&'a mut dyn DecodeTarget>,
    schema: Option<Schema>,
    response: Option<ResponseSpec>,
    failures: FailureReport,
}

impl<'a, C: HttpClient> RequestTester<'a, C> {
    /// Creates a tester sending through `client`, with the default
    /// `Content-Type: application/json` header and nothing else set.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            method: None,
            url: String::new(),
            headers: Headers::with_defaults(),
            body: None,
            expected_status: None,
            decode_target: None,
            schema: None,
            response: None,
            failures: FailureReport::new(),
        }
    }

    /// Sets the HTTP method (case-insensitive).
    #[must_use]
    pub fn method(mut self, method: impl AsRef<str>) -> Self {
        match method.as_ref().parse::<HttpMethod>() {
            Ok(method) => self.method = Some(method),
            Err(e) => self.record(FailureCategory::Method, e),
        }
        self
    }

    /// Sets the target URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if url.trim().is_empty() {
            self.record(FailureCategory::Url, DomainError::EmptyUrl);
        } else {
            self.url = url;
        }
        self
    }

    /// Appends query parameters to the URL, in the iteration order of `params`.
    ///
    /// Nothing is appended if `params` is empty or holds an empty value.
    #[must_use]
    pub fn query<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        match QueryParams::try_from_pairs(params).and_then(|q| q.append_to(&self.url)) {
            Ok(url) => self.url = url,
            Err(e) => self.record(FailureCategory::Query, e),
        }
        self
    }

    /// Sets the value the response body is decoded into.
    #[must_use]
    pub fn json<T: DecodeTarget>(mut self, target: &'a mut T) -> Self {
        self.decode_target = Some(target);
        self
    }

    /// Sets the expected status code, which must lie in `[100, 599]`.
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        match StatusCode::expected(status) {
            Ok(status) => self.expected_status = Some(status),
            Err(e) => self.record(FailureCategory::Status, e),
        }
        self
    }

    /// Merges headers into the current ones, overwriting on name collision.
    ///
    /// Nothing is merged if `headers` is empty or holds an empty value.
    #[must_use]
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        match Headers::try_from_pairs(headers) {
            Ok(headers) => self.headers.merge(headers),
            Err(e) => self.record(FailureCategory::Headers, e),
        }
        self
    }

    /// Sets a single header.
    #[must_use]
    pub fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers([(name.into(), value.into())])
    }

    /// Sets the raw request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Checks, after decoding, that every field of the decoded body is non-zero.
    #[must_use]
    pub fn validate_body(self) -> Self {
        self.validate_body_with(Schema::AllFields)
    }

    /// Checks the decoded body against `schema` after decoding.
    #[must_use]
    pub fn validate_body_with(mut self, schema: impl Into<Schema>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Returns the URL, query string included.
    #[must_use]
    pub fn get_url(&self) -> &str {
        &self.url
    }

    /// Returns the configured method.
    #[must_use]
    pub const fn get_method(&self) -> Option<HttpMethod> {
        self.method
    }

    /// Returns the expected status, if one was set.
    #[must_use]
    pub const fn get_status(&self) -> Option<StatusCode> {
        self.expected_status
    }

    /// Returns the response captured by the last execution.
    #[must_use]
    pub const fn get_response(&self) -> Option<&ResponseSpec> {
        self.response.as_ref()
    }

    /// Returns the decode target.
    #[must_use]
    pub fn get_body(&self) -> Option<&(dyn DecodeTarget + 'a)> {
        self.decode_target.as_deref()
    }

    /// Returns the current headers.
    #[must_use]
    pub const fn get_headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the request body.
    #[must_use]
    pub fn get_request_body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Returns the failures recorded so far.
    #[must_use]
    pub const fn failures(&self) -> &FailureReport {
        &self.failures
    }

    /// Sends the request, blocking the calling thread, and checks the outcome.
    ///
    /// On failure the combined report is passed to `ctx` and returned.
    ///
    /// Inside a multi-threaded tokio runtime the pipeline runs on the
    /// current worker through [`tokio::task::block_in_place`]. A
    /// current-thread runtime cannot be blocked, so there the call records a
    /// `request error` instead; use [`execute_async`](Self::execute_async).
    ///
    /// # Errors
    ///
    /// Returns the [`FailureReport`] when any configuration error or
    /// violated expectation was recorded.
    pub fn execute<X: TestContext + ?Sized>(mut self, ctx: &mut X) -> ExecuteResult<'a, C> {
        if let Ok(handle) = Handle::try_current() {
            if handle.runtime_flavor() == RuntimeFlavor::MultiThread {
                return tokio::task::block_in_place(|| handle.block_on(self.execute_async(ctx)));
            }
            self.record(
                FailureCategory::RequestError,
                "execute called inside a current-thread runtime; use execute_async",
            );
            return self.finish(ctx);
        }

        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime.block_on(self.execute_async(ctx)),
            Err(e) => {
                let error = HttpClientError::Runtime(e.to_string());
                self.record(FailureCategory::RequestError, error);
                self.finish(ctx)
            }
        }
    }

    /// Async counterpart of [`execute`](Self::execute).
    ///
    /// # Errors
    ///
    /// Returns the [`FailureReport`] when any configuration error or
    /// violated expectation was recorded.
    pub async fn execute_async<X: TestContext + ?Sized>(
        mut self,
        ctx: &mut X,
    ) -> ExecuteResult<'a, C> {
        if let Some(request) = self.prepare() {
            debug!(method = %request.method, url = %request.url, "sending request");
            let result = self.client.execute(&request).await;
            self.inspect(result);
        }
        self.finish(ctx)
    }

    /// Checks the configuration and builds the request to send.
    ///
    /// Returns `None` when a configuration failure was recorded, so no
    /// request goes out with an invalid method, URL or expectation.
    fn prepare(&mut self) -> Option<RequestSpec> {
        if self.method.is_none() {
            self.record_once(FailureCategory::Method, DomainError::EmptyMethod);
        }
        if self.url.trim().is_empty() {
            self.record_once(FailureCategory::Url, DomainError::EmptyUrl);
        }
        if self.expected_status.is_none() {
            self.record_once(FailureCategory::Status, DomainError::MissingStatus);
        }

        let request = RequestSpec::new(self.method.unwrap_or_default(), self.url.clone())
            .with_headers(self.headers.clone());
        if !self.url.trim().is_empty() {
            if let Err(e) = request.parse_url() {
                let message = format!("invalid URL '{}': {e}", self.url);
                self.record(FailureCategory::Url, message);
            }
        }

        if self.failures.has_configuration_failures() {
            debug!(
                failures = self.failures.len(),
                "configuration failures recorded, request not sent"
            );
            return None;
        }

        Some(match &self.body {
            Some(body) => request.with_body(body.clone()),
            None => request,
        })
    }

    /// Compares the response with the expectations and decodes its body.
    fn inspect(&mut self, result: Result<ResponseSpec, HttpClientError>) {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.record(FailureCategory::RequestError, e);
                return;
            }
        };

        debug!(
            status = response.status.as_u16(),
            reason = response.status.reason_phrase(),
            elapsed = ?response.duration,
            "response received"
        );

        if let Some(expected) = self.expected_status {
            if expected != response.status {
                let message = format!(
                    "Expected status: {expected} but got: {}",
                    response.status
                );
                self.record(FailureCategory::StatusMismatch, message);
            }
        }

        if let Some(target) = self.decode_target.as_deref_mut() {
            if let Err(failure) = decode_into(target, self.schema.as_ref(), &response.body) {
                self.record(failure.category, failure.message);
            }
        }

        self.response = Some(response);
    }

    fn finish<X: TestContext + ?Sized>(mut self, ctx: &mut X) -> ExecuteResult<'a, C> {
        if self.failures.is_empty() {
            return Ok(self);
        }

        let report = std::mem::take(&mut self.failures);
        ctx.fail(&report.to_string());
        Err(report)
    }

    fn record(&mut self, category: FailureCategory, message: impl fmt::Display) {
        let message = message.to_string();
        warn!(category = %category, %message, "expectation failed");
        self.failures.record(category, message);
    }

    fn record_once(&mut self, category: FailureCategory, message: impl fmt::Display) {
        if !self.failures.contains(category) {
            self.record(category, message);
        }
    }
}

impl<C: HttpClient> fmt::Debug for RequestTester<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestTester")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("expected_status", &self.expected_status)
            .field("decode_target", &self.decode_target.is_some())
            .field("schema", &self.schema)
            .field("response", &self.response)
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}

/// Decodes `body` into `target`, then validates it against `schema`.
fn decode_into<T: DecodeTarget + ?Sized>(
    target: &mut T,
    schema: Option<&Schema>,
    body: &[u8],
) -> Result<(), Failure> {
    target
        .decode_json(body)
        .map_err(|e| Failure::new(FailureCategory::DecodeError, e.to_string()))?;

    let Some(schema) = schema else {
        return Ok(());
    };
    let decoded = target.to_json().map_err(|e| {
        Failure::new(
            FailureCategory::ValidationError,
            format!("decoded body cannot be inspected: {e}"),
        )
    })?;
    schema
        .validate(&decoded)
        .map_err(|e| Failure::new(FailureCategory::ValidationError, e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::future::Future;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use supertest_domain::Header;

    use super::*;
    use crate::ports::RecordingContext;

    #[derive(Clone)]
    struct StubHttpClient {
        outcome: Result<ResponseSpec, HttpClientError>,
        requests: Arc<Mutex<Vec<RequestSpec>>>,
    }

    impl StubHttpClient {
        fn responding(status: u16, body: &str) -> Self {
            let headers: Headers = [Header::new("Content-Type", "application/json")]
                .into_iter()
                .collect();
            Self {
                outcome: Ok(ResponseSpec::new(
                    status,
                    headers,
                    body.as_bytes().to_vec(),
                    Duration::from_millis(5),
                )),
                requests: Arc::default(),
            }
        }

        fn failing(error: HttpClientError) -> Self {
            Self {
                outcome: Err(error),
                requests: Arc::default(),
            }
        }

        fn sent(&self) -> Vec<RequestSpec> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl HttpClient for StubHttpClient {
        fn execute(
            &self,
            request: &RequestSpec,
        ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send {
            self.requests.lock().unwrap().push(request.clone());
            let outcome = self.outcome.clone();
            async move { outcome }
        }
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    struct Todo {
        user_id: u32,
        id: u32,
        title: String,
        completed: bool,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct PlainTodo {
        user_id: u32,
        id: u32,
        title: String,
        completed: bool,
    }

    const TODO_JSON: &str = r#"{"userId":1,"id":1,"title":"t","completed":false}"#;

    fn new_tester(client: StubHttpClient) -> RequestTester<'static, StubHttpClient> {
        RequestTester::new(client)
    }

    #[test]
    fn test_new_tester_has_default_headers_only() {
        let tester = new_tester(StubHttpClient::responding(200, "{}"));

        assert_eq!(tester.get_headers(), &Headers::with_defaults());
        assert_eq!(tester.get_method(), None);
        assert_eq!(tester.get_url(), "");
        assert_eq!(tester.get_status(), None);
        assert!(tester.get_response().is_none());
        assert!(tester.get_body().is_none());
        assert!(tester.failures().is_empty());
    }

    #[test]
    fn test_empty_method_is_recorded_and_keeps_previous() {
        let tester = new_tester(StubHttpClient::responding(200, "{}"))
            .method("POST")
            .method("");

        assert_eq!(tester.get_method(), Some(HttpMethod::Post));
        assert_eq!(tester.failures().count(FailureCategory::Method), 1);
        assert_eq!(
            tester.failures().to_string(),
            "method: Method is required"
        );
    }

    #[test]
    fn test_unsupported_method_is_recorded() {
        let tester = new_tester(StubHttpClient::responding(200, "{}")).method("brew");

        assert_eq!(tester.get_method(), None);
        assert_eq!(
            tester.failures().to_string(),
            "method: unsupported HTTP method: BREW"
        );
    }

    #[test]
    fn test_empty_url_is_recorded_and_keeps_previous() {
        let tester = new_tester(StubHttpClient::responding(200, "{}"))
            .url("http://host/path")
            .url("   ");

        assert_eq!(tester.get_url(), "http://host/path");
        assert!(tester.failures().contains(FailureCategory::Url));
    }

    #[test]
    fn test_query_is_appended_to_url() {
        let tester = new_tester(StubHttpClient::responding(200, "{}"))
            .url("http://httpbin.org/get")
            .query([("foo", "bar"), ("baz", "qux"), ("key", "value")]);

        assert_eq!(
            tester.get_url(),
            "http://httpbin.org/get?foo=bar&baz=qux&key=value"
        );
        assert!(tester.failures().is_empty());
    }

    #[test]
    fn test_query_with_empty_value_leaves_url_untouched() {
        let tester = new_tester(StubHttpClient::responding(200, "{}"))
            .url("http://host/path")
            .query([("foo", "bar"), ("empty", "")]);

        assert_eq!(tester.get_url(), "http://host/path");
        assert_eq!(
            tester.failures().to_string(),
            "query: Query value is required"
        );
    }

    #[test]
    fn test_invalid_status_is_rejected() {
        for status in [0, 99, 600, 1000] {
            let tester = new_tester(StubHttpClient::responding(200, "{}")).status(status);
            assert_eq!(tester.get_status(), None, "status {status} was stored");
            assert_eq!(tester.failures().count(FailureCategory::Status), 1);
        }

        let tester = new_tester(StubHttpClient::responding(200, "{}")).status(0);
        assert_eq!(tester.failures().to_string(), "status: Status is required");
        let tester = new_tester(StubHttpClient::responding(200, "{}")).status(600);
        assert_eq!(
            tester.failures().to_string(),
            "status: Status must be between 100 and 599"
        );
    }

    #[test]
    fn test_headers_merge_and_overwrite() {
        let tester = new_tester(StubHttpClient::responding(200, "{}"))
            .headers([("content-type", "text/plain"), ("X-Api-Key", "secret")])
            .header("Accept", "application/json");

        let headers = tester.get_headers();
        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.get("x-api-key"), Some("secret"));
        assert!(tester.failures().is_empty());
    }

    #[test]
    fn test_header_with_empty_value_is_not_merged() {
        let tester = new_tester(StubHttpClient::responding(200, "{}"))
            .headers([("X-Trace", "abc"), ("X-Empty", "")]);

        assert_eq!(tester.get_headers(), &Headers::with_defaults());
        assert_eq!(
            tester.failures().to_string(),
            "headers: Header value is required"
        );
    }

    #[test]
    fn test_matching_status_passes() {
        let client = StubHttpClient::responding(200, "{}");
        let mut ctx = RecordingContext::new();

        let tester = new_tester(client.clone())
            .method("GET")
            .url("http://host/get")
            .status(200)
            .execute(&mut ctx)
            .expect("execution should pass");

        assert!(!ctx.is_failed());
        assert_eq!(tester.get_response().map(|r| r.status.as_u16()), Some(200));
        assert_eq!(client.sent().len(), 1);
    }

    #[test]
    fn test_request_carries_headers_and_body() {
        let client = StubHttpClient::responding(201, "{}");
        let mut ctx = RecordingContext::new();

        let result = new_tester(client.clone())
            .method("post")
            .url("http://host/todos")
            .header("Authorization", "Bearer t")
            .body(r#"{"title":"foo"}"#)
            .status(201)
            .execute(&mut ctx);
        assert!(result.is_ok());

        let sent = client.sent();
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[0].url, "http://host/todos");
        assert_eq!(sent[0].headers.get("authorization"), Some("Bearer t"));
        assert_eq!(sent[0].headers.get("content-type"), Some("application/json"));
        assert_eq!(sent[0].body.as_deref(), Some(&br#"{"title":"foo"}"#[..]));
    }

    #[test]
    fn test_status_mismatch_is_reported_once() {
        let mut ctx = RecordingContext::new();

        let report = new_tester(StubHttpClient::responding(404, "{}"))
            .method("GET")
            .url("http://host/missing")
            .status(200)
            .execute(&mut ctx)
            .expect_err("execution should fail");

        assert_eq!(report.len(), 1);
        assert_eq!(report.count(FailureCategory::StatusMismatch), 1);
        assert_eq!(
            report.to_string(),
            "status mismatch: Expected status: 200 but got: 404"
        );
        assert_eq!(ctx.failures().to_vec(), vec![report.to_string()]);
    }

    #[test]
    fn test_transport_failure_is_reported() {
        let mut ctx = RecordingContext::new();
        let client = StubHttpClient::failing(HttpClientError::ConnectionRefused {
            host: "localhost".to_string(),
            port: 1,
        });

        let report = new_tester(client)
            .method("GET")
            .url("http://localhost:1/")
            .status(200)
            .execute(&mut ctx)
            .expect_err("execution should fail");

        assert_eq!(
            report.to_string(),
            "request error: connection refused by localhost:1"
        );
        assert!(!report.contains(FailureCategory::StatusMismatch));
    }

    #[test]
    fn test_body_is_decoded_into_target() {
        let mut todo = Todo::default();
        let mut ctx = RecordingContext::new();

        let passed = RequestTester::new(StubHttpClient::responding(200, TODO_JSON))
            .method("GET")
            .url("http://host/todos/1")
            .json(&mut todo)
            .status(200)
            .execute(&mut ctx)
            .is_ok();

        assert!(passed);
        assert_eq!(
            todo,
            Todo {
                user_id: 1,
                id: 1,
                title: "t".to_string(),
                completed: false,
            }
        );
    }

    #[test]
    fn test_malformed_body_is_a_decode_error() {
        let mut todo = Todo::default();
        let mut ctx = RecordingContext::new();

        let report = RequestTester::new(StubHttpClient::responding(200, "<html>"))
            .method("GET")
            .url("http://host/todos/1")
            .json(&mut todo)
            .status(200)
            .execute(&mut ctx)
            .expect_err("execution should fail");

        assert_eq!(report.len(), 1);
        assert!(report.contains(FailureCategory::DecodeError));
    }

    #[test]
    fn test_zero_valued_body_fails_validation() {
        let mut todo = Todo::default();
        let mut ctx = RecordingContext::new();

        let report = RequestTester::new(StubHttpClient::responding(200, "{}"))
            .method("GET")
            .url("http://host/todos/1")
            .json(&mut todo)
            .status(200)
            .validate_body()
            .execute(&mut ctx)
            .expect_err("execution should fail");

        assert_eq!(
            report.to_string(),
            "validation error: missing required fields: completed, id, title, userId"
        );
    }

    #[test]
    fn test_empty_object_fails_validation_without_serde_defaults() {
        let mut todo = PlainTodo {
            user_id: 0,
            id: 0,
            title: String::new(),
            completed: false,
        };
        let mut ctx = RecordingContext::new();

        let report = RequestTester::new(StubHttpClient::responding(200, "{}"))
            .method("GET")
            .url("http://host/todos/1")
            .json(&mut todo)
            .status(200)
            .validate_body()
            .execute(&mut ctx)
            .expect_err("execution should fail");

        assert!(report.contains(FailureCategory::ValidationError));
        assert!(!report.contains(FailureCategory::DecodeError));
        assert_eq!(ctx.failures().len(), 1);
    }

    #[test]
    fn test_preset_field_survives_partial_body() {
        let mut todo = PlainTodo {
            user_id: 9,
            id: 0,
            title: "draft".to_string(),
            completed: false,
        };
        let client = StubHttpClient::responding(200, r#"{"id":4,"completed":true}"#);
        let mut ctx = RecordingContext::new();

        let passed = RequestTester::new(client)
            .method("GET")
            .url("http://host/todos/4")
            .json(&mut todo)
            .status(200)
            .validate_body()
            .execute(&mut ctx)
            .is_ok();

        assert!(passed, "unexpected failures: {:?}", ctx.failures());
        assert_eq!(
            todo,
            PlainTodo {
                user_id: 9,
                id: 4,
                title: "draft".to_string(),
                completed: true,
            }
        );
    }

    #[test]
    fn test_zero_valued_body_passes_without_validation() {
        let mut todo = Todo::default();
        let mut ctx = RecordingContext::new();

        let passed = RequestTester::new(StubHttpClient::responding(200, "{}"))
            .method("GET")
            .url("http://host/todos/1")
            .json(&mut todo)
            .status(200)
            .execute(&mut ctx)
            .is_ok();

        assert!(passed);
        assert!(!ctx.is_failed());
    }

    #[test]
    fn test_required_fields_schema() {
        let mut todo = Todo::default();
        let mut ctx = RecordingContext::new();

        let passed = RequestTester::new(StubHttpClient::responding(200, TODO_JSON))
            .method("GET")
            .url("http://host/todos/1")
            .json(&mut todo)
            .status(200)
            .validate_body_with(Schema::required(["userId", "id", "title"]))
            .execute(&mut ctx)
            .is_ok();

        assert!(passed, "{:?}", ctx.failures());
    }

    #[test]
    fn test_validation_without_target_is_skipped() {
        let mut ctx = RecordingContext::new();

        let result = new_tester(StubHttpClient::responding(200, "{}"))
            .method("GET")
            .url("http://host/")
            .status(200)
            .validate_body()
            .execute(&mut ctx);

        assert!(result.is_ok());
    }

    #[test]
    fn test_configuration_failures_skip_the_request() {
        let client = StubHttpClient::responding(200, "{}");
        let mut ctx = RecordingContext::new();

        let report = new_tester(client.clone())
            .method("")
            .url("")
            .status(0)
            .execute(&mut ctx)
            .expect_err("execution should fail");

        assert!(client.sent().is_empty());
        assert_eq!(
            report.to_string(),
            "method: Method is required\nurl: Url is required\nstatus: Status is required"
        );
    }

    #[test]
    fn test_missing_configuration_is_detected_at_execute() {
        let client = StubHttpClient::responding(200, "{}");
        let mut ctx = RecordingContext::new();

        let report = new_tester(client.clone())
            .execute(&mut ctx)
            .expect_err("execution should fail");

        assert!(client.sent().is_empty());
        assert!(report.contains(FailureCategory::Method));
        assert!(report.contains(FailureCategory::Url));
        assert!(report.contains(FailureCategory::Status));
    }

    #[test]
    fn test_relative_url_is_rejected() {
        let client = StubHttpClient::responding(200, "{}");
        let mut ctx = RecordingContext::new();

        let report = new_tester(client.clone())
            .method("GET")
            .url("/todos")
            .status(200)
            .execute(&mut ctx)
            .expect_err("execution should fail");

        assert!(client.sent().is_empty());
        assert_eq!(report.count(FailureCategory::Url), 1);
        assert!(report.to_string().starts_with("url: invalid URL '/todos'"));
    }

    #[test]
    fn test_concurrent_testers_do_not_share_failures() {
        std::thread::scope(|scope| {
            let passing = scope.spawn(|| {
                let mut ctx = RecordingContext::new();
                let passed = new_tester(StubHttpClient::responding(200, "{}"))
                    .method("GET")
                    .url("http://host/ok")
                    .status(200)
                    .execute(&mut ctx)
                    .is_ok();
                (passed, ctx)
            });
            let failing = scope.spawn(|| {
                let mut ctx = RecordingContext::new();
                let report = new_tester(StubHttpClient::responding(500, "{}"))
                    .method("GET")
                    .url("http://host/boom")
                    .headers([("X-Empty", "")])
                    .status(200)
                    .execute(&mut ctx)
                    .err();
                (report, ctx)
            });

            let (passed, passing_ctx) = passing.join().unwrap();
            let (report, failing_ctx) = failing.join().unwrap();

            assert!(passed);
            assert!(!passing_ctx.is_failed());
            assert_eq!(report.map(|r| r.len()), Some(1));
            assert_eq!(failing_ctx.failures().len(), 1);
        });
    }

    #[tokio::test]
    async fn test_execute_async_decodes_body() {
        let mut todo = Todo::default();
        let mut ctx = RecordingContext::new();

        let tester = RequestTester::new(StubHttpClient::responding(200, TODO_JSON))
            .method("GET")
            .url("http://host/todos/1")
            .json(&mut todo)
            .status(200)
            .execute_async(&mut ctx)
            .await
            .expect("execution should pass");

        let decoded = tester.get_body().and_then(|t| t.to_json().ok());
        assert_eq!(
            decoded.as_ref().and_then(|v| v["title"].as_str()),
            Some("t")
        );
        drop(tester);
        assert_eq!(todo.user_id, 1);
    }

    #[tokio::test]
    async fn test_blocking_execute_in_current_thread_runtime_is_reported() {
        let client = StubHttpClient::responding(200, "{}");
        let mut ctx = RecordingContext::new();

        let report = new_tester(client.clone())
            .method("GET")
            .url("http://host/get")
            .status(200)
            .execute(&mut ctx)
            .expect_err("execution should fail");

        assert_eq!(report.len(), 1);
        assert!(report.contains(FailureCategory::RequestError));
        assert!(ctx.is_failed());
        assert!(client.sent().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_blocking_execute_in_multi_thread_runtime_passes() {
        let client = StubHttpClient::responding(200, TODO_JSON);
        let mut todo = Todo::default();
        let mut ctx = RecordingContext::new();

        let passed = RequestTester::new(client.clone())
            .method("GET")
            .url("http://host/todos/1")
            .json(&mut todo)
            .status(200)
            .execute(&mut ctx)
            .is_ok();

        assert!(passed);
        assert_eq!(client.sent().len(), 1);
        assert_eq!(todo.id, 1);
    }
}
