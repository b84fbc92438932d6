//! Probe client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. Transport-level problems
//! never escape it as errors: everything the network can do wrong is folded
//! into a `ConnectionStatus` so the scheduler treats it as data.

use std::time::Instant;

use reqwest::{Client, Method, Url};

use livecheck_application::ports::HttpClient;
use livecheck_domain::{ConnectionStatus, Headers, HttpMethod, ProbeOutcome, Response, TestSpec};

/// Error building the underlying reqwest client.
#[derive(Debug, thiserror::Error)]
#[error("failed to build HTTP client: {0}")]
pub struct ClientBuildError(String);

/// Probe client backed by `reqwest::Client`.
pub struct ReqwestProbeClient {
    client: Client,
}

impl ReqwestProbeClient {
    /// Creates a probe client with default settings.
    ///
    /// Defaults: follow up to 10 redirects, rustls TLS, a Livecheck
    /// user agent. Per-request timeouts come from each test.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(concat!("Livecheck/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| ClientBuildError(e.to_string()))?;
        Ok(Self { client })
    }

    /// Creates a probe client around a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts the domain method to a reqwest method.
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

    /// Folds a reqwest error into a connection status.
    fn classify_error(error: &reqwest::Error, url: &str) -> ConnectionStatus {
        if error.is_timeout() {
            return ConnectionStatus::timeout(url, error.to_string());
        }
        ConnectionStatus::error(url, error.to_string())
    }
}

impl HttpClient for ReqwestProbeClient {
    async fn execute(&self, test: &TestSpec) -> ProbeOutcome {
        let url = match Url::parse(&test.url) {
            Ok(url) => url,
            Err(e) => {
                return ProbeOutcome::ConnectionFailed(ConnectionStatus::error(
                    test.url.clone(),
                    format!("invalid URL: {e}"),
                ));
            }
        };

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(test.method), url)
            .timeout(test.timeout());
        for header in test.enabled_headers() {
            builder = builder.header(&header.name, &header.value);
        }
        if let Some(body) = &test.body {
            builder = builder.body(body.clone());
        }

        let started = Instant::now();
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(test = %test.name, error = %e, "probe transport failure");
                return ProbeOutcome::ConnectionFailed(Self::classify_error(&e, &test.url));
            }
        };

        let status = response.status();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or("<binary>").to_string(),
                )
            })
            .collect();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return ProbeOutcome::ConnectionFailed(Self::classify_error(&e, &test.url));
            }
        };
        let latency = started.elapsed();

        ProbeOutcome::Response(Response::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            headers,
            body,
            latency,
        ))
    }
}
