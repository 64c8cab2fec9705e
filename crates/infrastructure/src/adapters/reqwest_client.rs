//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It handles all HTTP communication for the tester.

use std::error::Error as _;
use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Url};
use supertest_application::ports::{HttpClient, HttpClientError};
use supertest_domain::{Header, Headers, HttpMethod, RequestSpec, ResponseSpec};
use tracing::debug;

use crate::config::ClientConfig;

/// HTTP client implementation using reqwest.
///
/// Building the underlying `reqwest::Client` can fail (e.g. when the TLS
/// backend cannot be initialised). That failure is kept and returned by
/// every [`execute`](HttpClient::execute) call, so it surfaces as a request
/// error of the scenario instead of a panic.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Result<Client, HttpClientError>,
    config: ClientConfig,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - Timeout: transport default
    /// - User-Agent: "supertest/<version>"
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a new HTTP client from `config`.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let client = Self::build_client(&config);
        Self { client, config }
    }

    /// Creates a new HTTP client with a custom reqwest client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self {
            client: Ok(client),
            config: ClientConfig::default(),
        }
    }

    /// Returns the configuration the client was built from.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_client(config: &ClientConfig) -> Result<Client, HttpClientError> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        builder
            .build()
            .map_err(|e| HttpClientError::Other(format!("failed to build HTTP client: {e}")))
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(
        error: &reqwest::Error,
        timeout_ms: Option<u64>,
        max_redirects: usize,
    ) -> HttpClientError {
        let message = error_chain(error);
        let host = || {
            error
                .url()
                .and_then(|u| u.host_str().map(ToString::to_string))
                .unwrap_or_else(|| "unknown".to_string())
        };

        if error.is_timeout() {
            if let Some(timeout_ms) = timeout_ms {
                return HttpClientError::Timeout { timeout_ms };
            }
        }

        if error.is_connect() {
            let lowered = message.to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lowered.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: max_redirects };
        }

        HttpClientError::Other(message)
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send {
        // Clone what we need to move into the async block
        let client = self.client.clone();
        let method = request.method;
        let url = request.url.clone();
        let headers = request.headers.clone();
        let body = request.body.clone();
        let timeout_ms = self.config.timeout_ms;
        let max_redirects = self.config.max_redirects;

        async move {
            let client = client?;
            let parsed_url =
                Url::parse(&url).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {url}")))?;

            let start = Instant::now();

            let mut builder = client.request(Self::to_reqwest_method(method), parsed_url);
            for header in headers.iter() {
                builder = builder.header(header.name.as_str(), header.value.as_str());
            }
            if let Some(body) = body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms, max_redirects))?;

            let status = response.status().as_u16();
            let response_headers = collect_headers(response.headers());

            // Reading to the end releases the connection back to the client
            let body_bytes = response
                .bytes()
                .await
                .map_err(|e| HttpClientError::Other(format!("Failed to read body: {e}")))?
                .to_vec();

            let duration = start.elapsed();
            debug!(status, bytes = body_bytes.len(), ?duration, "response body read");

            Ok(ResponseSpec::new(
                status,
                response_headers,
                body_bytes,
                duration,
            ))
        }
    }
}

/// Copies every received header, repeated names included. Values that are
/// not valid UTF-8 are decoded lossily.
fn collect_headers(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for (name, value) in map {
        headers.append(Header::new(
            name.as_str(),
            String::from_utf8_lossy(value.as_bytes()),
        ));
    }
    headers
}

/// Renders an error with all of its sources, outermost first.
fn error_chain(error: &reqwest::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
