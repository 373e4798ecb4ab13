//! Static endpoint configuration and credentials for the Polygon tickers API.
//!
//! Configuration is built once at startup and handed to the transport; nothing
//! in the pipeline reads the environment on its own.

use url::Url;

use crate::ValidationError;

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";
pub const TICKERS_ENDPOINT: &str = "/v3/reference/tickers";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const API_KEY_VARS: [&str; 2] = ["TICKERDECK_POLYGON_API_KEY", "POLYGON_API_KEY"];
const BASE_URL_VAR: &str = "TICKERDECK_BASE_URL";
const TIMEOUT_VAR: &str = "TICKERDECK_TIMEOUT_MS";

/// Fixed query parameters sent with every tickers request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDefaults {
    pub market: String,
    pub exchange: String,
    pub sort: String,
    pub active: bool,
    pub limit: u32,
    pub max_limit: u32,
    pub max_search_len: usize,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            market: String::from("stocks"),
            // NASDAQ
            exchange: String::from("XNAS"),
            sort: String::from("ticker"),
            active: true,
            limit: 20,
            max_limit: 1_000,
            max_search_len: 50,
        }
    }
}

/// Explicitly constructed API configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub tickers_endpoint: String,
    pub timeout_ms: u64,
    pub defaults: QueryDefaults,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: String::from(DEFAULT_BASE_URL),
            tickers_endpoint: String::from(TICKERS_ENDPOINT),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            defaults: QueryDefaults::default(),
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("tickers_endpoint", &self.tickers_endpoint)
            .field("timeout_ms", &self.timeout_ms)
            .field("defaults", &self.defaults)
            .finish()
    }
}

impl ApiConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            ..Self::default()
        }
    }

    /// Reads credentials and overrides from process environment variables.
    ///
    /// Loading a `.env` file is the caller's job.
    pub fn from_env() -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok())
            .and_then(non_blank);
        let base_url = std::env::var(BASE_URL_VAR)
            .ok()
            .and_then(non_blank)
            .unwrap_or_else(|| String::from(DEFAULT_BASE_URL));
        let timeout_ms = std::env::var(TIMEOUT_VAR)
            .ok()
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            api_key,
            base_url,
            timeout_ms,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = non_blank(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// The credential, if one is configured and not blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Absolute URL of the tickers endpoint, without query parameters.
    pub fn tickers_url(&self) -> Result<Url, ValidationError> {
        let joined = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.tickers_endpoint
        );
        Url::parse(&joined).map_err(|_| ValidationError::InvalidBaseUrl {
            value: self.base_url.clone(),
        })
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
