//! # Tickerdeck Core
//!
//! Client pipeline for browsing actively traded NASDAQ tickers from the
//! Polygon reference-tickers endpoint.
//!
//! ## Overview
//!
//! - **Parameter normalization** with defaults and range checks
//! - **Request building** with a fixed, deterministic query order
//! - **Transport** with credential injection, status mapping and cancellation
//! - **Response validation** that rejects malformed payloads before use
//! - **Item transformation** into display-ready stock cards
//! - **Paging** with retry, caching, throttling and cursor bookkeeping
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | TTL page cache |
//! | [`cancel`] | Cooperative cancellation token |
//! | [`config`] | Endpoint configuration and credentials |
//! | [`cursor`] | Next-page cursor extraction |
//! | [`display`] | en-US currency, percentage and number formatting |
//! | [`domain`] | Stock card and page types |
//! | [`error`] | Error taxonomy |
//! | [`http_client`] | HTTP client abstraction |
//! | [`metrics`] | Deterministic placeholder price metrics |
//! | [`pager`] | Infinite-scroll page orchestration |
//! | [`params`] | Input parameter normalization |
//! | [`request`] | Tickers URL construction |
//! | [`response`] | Upstream payload validation |
//! | [`retry`] | Retry policy and backoff |
//! | [`throttling`] | Client-side request budget |
//! | [`tickers`] | The `list_tickers` operation |
//! | [`transport`] | Authenticated GET with error mapping |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickerdeck_core::{ApiConfig, CancelToken, ListTickersParams, TickerClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TickerClient::new(ApiConfig::from_env());
//!     let params = ListTickersParams::default().with_search("apple");
//!     let page = client.list_tickers(&params, &CancelToken::new()).await?;
//!
//!     for stock in &page.stocks {
//!         println!("{} {:.2}", stock.ticker, stock.price);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! ListTickersParams
//!        │ params::TickersQuery::from_params
//!        ▼
//! TickersQuery ──▶ request::build_tickers_url ──▶ transport::Transport
//!                                                        │ serde_json::Value
//!                                                        ▼
//! ListTickersResponse ◀── metrics + cursor ◀── response::validate_response
//! ```
//!
//! ## Security
//!
//! - The API key is appended to the request URL only inside the transport
//! - Logged URLs never include the key
//! - `ApiConfig`'s `Debug` output never shows the key

pub mod cache;
pub mod cancel;
pub mod config;
pub mod cursor;
pub mod display;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod metrics;
pub mod pager;
pub mod params;
pub mod request;
pub mod response;
pub mod retry;
pub mod throttling;
pub mod tickers;
pub mod transport;

// Caching
pub use cache::{PageCache, PageKey};

// Cancellation
pub use cancel::CancelToken;

// Configuration
pub use config::{ApiConfig, QueryDefaults, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS, TICKERS_ENDPOINT};

// Cursor helpers
pub use cursor::{extract_cursor, safe_cursor};

// Formatting
pub use display::{
    format_change, format_change_percent, format_currency, format_number, format_percentage,
};

// Domain models
pub use domain::{ListTickersResponse, StockItem};

// Error types
pub use error::{ErrorClass, TickerError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpFailure, HttpFuture, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Metrics
pub use metrics::{derive_metrics, transform_to_stock_item, transform_to_stock_items, DerivedMetrics};

// Paging
pub use pager::{FetchOutcome, PageFetcher, PagerOptions, TickerPager};

// Parameters
pub use params::{ListTickersParams, TickersQuery};

// Request / response
pub use request::build_tickers_url;
pub use response::{validate_response, PolygonResponse, PolygonTicker};

// Retry logic
pub use retry::{Backoff, RetryPolicy};

// Throttling
pub use throttling::RequestThrottle;

// Client
pub use tickers::TickerClient;
pub use transport::Transport;
