//! Tickers request URL construction.

use url::Url;

use crate::config::ApiConfig;
use crate::params::TickersQuery;
use crate::ValidationError;

/// Builds the tickers URL for a normalized query.
///
/// Query pairs are always emitted in the order
/// `market, exchange, sort, active, limit, search, cursor`; `search` and
/// `cursor` are left out entirely when absent. The credential is added later
/// by the transport.
pub fn build_tickers_url(config: &ApiConfig, query: &TickersQuery) -> Result<Url, ValidationError> {
    let mut url = config.tickers_url()?;
    let defaults = &config.defaults;

    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs
            .append_pair("market", &defaults.market)
            .append_pair("exchange", &defaults.exchange)
            .append_pair("sort", &defaults.sort)
            .append_pair("active", if defaults.active { "true" } else { "false" })
            .append_pair("limit", &query.limit.to_string());

        if let Some(search) = &query.search {
            pairs.append_pair("search", search);
        }
        if let Some(cursor) = &query.cursor {
            pairs.append_pair("cursor", cursor);
        }
    }

    Ok(url)
}
