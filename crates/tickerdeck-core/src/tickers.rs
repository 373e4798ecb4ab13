//! The `list_tickers` operation: normalize, build, fetch, validate, transform.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::cancel::CancelToken;
use crate::config::ApiConfig;
use crate::cursor::extract_cursor;
use crate::domain::{ListTickersResponse, StockItem};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::metrics::transform_to_stock_items;
use crate::params::{ListTickersParams, TickersQuery};
use crate::request::build_tickers_url;
use crate::response::{ensure_ok, validate_response};
use crate::transport::Transport;
use crate::TickerError;

/// Client for the NASDAQ reference-tickers listing.
#[derive(Clone)]
pub struct TickerClient {
    config: ApiConfig,
    transport: Transport,
}

impl TickerClient {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    /// Like [`new`](Self::new) but reports a client that cannot be built.
    ///
    /// # Errors
    ///
    /// Returns [`TickerError::Network`] when the HTTP client fails to build.
    pub fn try_new(config: ApiConfig) -> Result<Self, TickerError> {
        let http_client = ReqwestHttpClient::try_new()
            .map_err(|error| TickerError::network(error.message()))?;
        Ok(Self::with_http_client(config, Arc::new(http_client)))
    }

    pub fn with_http_client(config: ApiConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let transport = Transport::new(&config, http_client);
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetches one page of NASDAQ tickers.
    ///
    /// # Errors
    ///
    /// Fails with [`TickerError::Validation`] for out-of-range input,
    /// [`TickerError::MissingCredential`] before any network call when no key
    /// is configured, any transport or shape error from the upstream call,
    /// and [`TickerError::Aborted`] when `cancel` fires mid-flight.
    pub async fn list_tickers(
        &self,
        params: &ListTickersParams,
        cancel: &CancelToken,
    ) -> Result<ListTickersResponse, TickerError> {
        let query = TickersQuery::from_params(params, &self.config.defaults)?;
        self.list_query(&query, cancel).await
    }

    /// Same as [`list_tickers`](Self::list_tickers) for an already
    /// normalized query.
    pub async fn list_query(
        &self,
        query: &TickersQuery,
        cancel: &CancelToken,
    ) -> Result<ListTickersResponse, TickerError> {
        let url = build_tickers_url(&self.config, query)?;
        let body = self.transport.get_json(&url, cancel).await?;
        let data = ensure_ok(validate_response(&body)?)?;

        let next_cursor = extract_cursor(data.next_url.as_deref());
        let stocks = unique_tickers(transform_to_stock_items(data.results));

        debug!(
            search = query.search.as_deref().unwrap_or(""),
            cursor = query.cursor.as_deref().unwrap_or(""),
            items = stocks.len(),
            has_next = next_cursor.is_some(),
            "tickers page decoded"
        );

        Ok(ListTickersResponse {
            stocks,
            next_url: data.next_url,
            next_cursor,
            count: data.count,
            request_id: data.request_id,
        })
    }
}

/// Keeps the first occurrence of each non-empty ticker, preserving upstream
/// order.
fn unique_tickers(items: Vec<StockItem>) -> Vec<StockItem> {
    let mut seen = HashSet::with_capacity(items.len());
    let before = items.len();
    let unique: Vec<StockItem> = items
        .into_iter()
        .filter(|item| !item.ticker.is_empty() && seen.insert(item.ticker.clone()))
        .collect();
    if unique.len() != before {
        debug!(dropped = before - unique.len(), "empty or duplicate tickers dropped from page");
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::transform_to_stock_item;
    use crate::response::PolygonTicker;

    #[test]
    fn keeps_first_occurrence_in_order() {
        let items = vec![
            transform_to_stock_item(PolygonTicker::new("AAPL", Some("first"))),
            transform_to_stock_item(PolygonTicker::new("", Some("blank"))),
            transform_to_stock_item(PolygonTicker::new("MSFT", None)),
            transform_to_stock_item(PolygonTicker::new("AAPL", Some("second"))),
        ];
        let unique = unique_tickers(items);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].name, "first");
        assert_eq!(unique[1].ticker, "MSFT");
    }
}
