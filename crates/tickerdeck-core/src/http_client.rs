//! The network seam. Everything above it speaks [`HttpRequest`] and
//! [`HttpResponse`]; only [`ReqwestHttpClient`] touches sockets.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

const USER_AGENT: &str = concat!("tickerdeck/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A GET to send. Header names are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout_ms(self, timeout_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_success(&self) -> bool {
        matches!(self.status, 200..=299)
    }
}

/// Where below the HTTP layer an exchange broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpFailure {
    Timeout,
    Connect,
    Body,
    Other,
}

/// An exchange that produced no HTTP status at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HttpError {
    failure: HttpFailure,
    message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_failure(HttpFailure::Other, message)
    }

    pub fn with_failure(failure: HttpFailure, message: impl Into<String>) -> Self {
        Self {
            failure,
            message: message.into(),
        }
    }

    pub fn failure(&self) -> HttpFailure {
        self.failure
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn from_reqwest(error: reqwest::Error) -> Self {
        // Drop the URL so the query-string credential never reaches a message.
        let error = error.without_url();
        let (failure, label) = if error.is_timeout() {
            (HttpFailure::Timeout, "request timeout")
        } else if error.is_connect() {
            (HttpFailure::Connect, "connection failed")
        } else if error.is_body() || error.is_decode() {
            (HttpFailure::Body, "failed to read response body")
        } else {
            (HttpFailure::Other, "request failed")
        };
        Self::with_failure(failure, format!("{label}: {error}"))
    }
}

pub type HttpFuture<'a> = Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

/// Executes one request. Tests swap in scripted implementations.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a>;
}

/// reqwest-backed client shared by every transport clone.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    inner: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    /// # Errors
    ///
    /// Fails when reqwest cannot build a client, e.g. no usable TLS backend.
    pub fn try_new() -> Result<Self, HttpError> {
        Self::from_builder(reqwest::Client::builder().user_agent(USER_AGENT))
    }

    pub fn from_builder(builder: reqwest::ClientBuilder) -> Result<Self, HttpError> {
        builder.build().map(Self::from_client).map_err(|error| {
            HttpError::with_failure(
                HttpFailure::Other,
                format!("failed to build HTTP client: {error}"),
            )
        })
    }

    /// Infallible variant of [`try_new`](Self::try_new). A build failure is
    /// logged before falling back to reqwest's stock client.
    pub fn new() -> Self {
        Self::try_new().unwrap_or_else(|error| {
            warn!(error = %error, "using default HTTP client");
            Self::from_client(reqwest::Client::new())
        })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            inner: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        Box::pin(async move {
            let HttpRequest {
                url,
                headers,
                timeout,
            } = request;

            let response = headers
                .iter()
                .fold(self.inner.get(&url).timeout(timeout), |builder, (name, value)| {
                    builder.header(name, value)
                })
                .send()
                .await
                .map_err(HttpError::from_reqwest)?;

            let status = response.status().as_u16();
            let body = response.text().await.map_err(|error| {
                HttpError::with_failure(
                    HttpFailure::Body,
                    format!("failed to read response body: {}", error.without_url()),
                )
            })?;

            Ok(HttpResponse::new(status, body))
        })
    }
}
