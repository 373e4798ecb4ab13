//! Ticker-to-card transformation with derived pricing.
//!
//! The reference-tickers endpoint carries no pricing, so price and change are
//! derived from the symbol. The formula is fixed so cards stay stable between
//! fetches and processes.

use serde::{Deserialize, Serialize};

use crate::domain::StockItem;
use crate::response::PolygonTicker;

const HASH_MODULUS: u32 = 100_000;
const PRICE_FLOOR: u32 = 50;
const PRICE_SPAN: u32 = 950;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub price: f64,
    pub change: f64,
    #[serde(rename = "changePercent")]
    pub change_percent: f64,
}

/// Rolling hash over the symbol's UTF-16 code units, reduced mod 100 000.
pub fn ticker_hash(ticker: &str) -> u32 {
    ticker
        .encode_utf16()
        .fold(0_u32, |hash, unit| (hash * 31 + u32::from(unit)) % HASH_MODULUS)
}

/// `price` lands in `[50, 1000)`; `changePercent` in `[-10.0, 9.9]` with one
/// decimal.
pub fn derive_metrics(ticker: &str) -> DerivedMetrics {
    let hash = ticker_hash(ticker);

    let price = f64::from(PRICE_FLOOR + hash % PRICE_SPAN);
    let change_percent = (f64::from((hash / 13) % 200) - 100.0) / 10.0;
    let change = price * change_percent / 100.0;

    DerivedMetrics {
        price,
        change,
        change_percent,
    }
}

pub fn transform_to_stock_item(ticker: PolygonTicker) -> StockItem {
    let metrics = derive_metrics(&ticker.ticker);
    let name = ticker.name.unwrap_or_else(|| ticker.ticker.clone());
    StockItem {
        ticker: ticker.ticker,
        name,
        price: metrics.price,
        change: metrics.change,
        change_percent: metrics.change_percent,
    }
}

/// Order-preserving map over a page of raw tickers.
pub fn transform_to_stock_items(tickers: Vec<PolygonTicker>) -> Vec<StockItem> {
    tickers.into_iter().map(transform_to_stock_item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_deterministic_per_ticker() {
        assert_eq!(derive_metrics("AAPL"), derive_metrics("AAPL"));
    }

    #[test]
    fn matches_reference_values() {
        assert_eq!(ticker_hash("AAPL"), 1_436);
        assert_eq!(
            derive_metrics("AAPL"),
            DerivedMetrics {
                price: 536.0,
                change: 5.36,
                change_percent: 1.0,
            }
        );

        let msft = derive_metrics("MSFT");
        assert_eq!(msft.price, 924.0);
        assert_eq!(msft.change_percent, -6.0);
        assert_eq!(msft.change, -55.44);

        let amzn = derive_metrics("AMZN");
        assert_eq!(amzn.price, 980.0);
        assert_eq!(amzn.change_percent, -7.9);
        assert_eq!(amzn.change, 980.0 * -7.9 / 100.0);
    }

    #[test]
    fn empty_ticker_hashes_to_zero() {
        let metrics = derive_metrics("");
        assert_eq!(metrics.price, 50.0);
        assert_eq!(metrics.change_percent, -10.0);
        assert_eq!(metrics.change, -5.0);
    }

    #[test]
    fn price_and_percent_stay_in_range() {
        let samples = [
            "A", "AA", "AAPL", "MSFT", "GOOGL", "BRK.A", "ZZZZZ", "QQQ", "X", "NVDA", "TSLA",
            "ÄPFEL", "日本",
        ];
        for ticker in samples {
            let m = derive_metrics(ticker);
            assert!(m.price >= 50.0 && m.price < 1000.0, "{ticker}: {}", m.price);
            assert!(
                m.change_percent >= -10.0 && m.change_percent <= 9.9,
                "{ticker}: {}",
                m.change_percent
            );
        }
    }

    #[test]
    fn maps_ticker_to_stock_item() {
        let item = transform_to_stock_item(PolygonTicker::new("TSLA", Some("Tesla")));
        assert_eq!(item.ticker, "TSLA");
        assert_eq!(item.name, "Tesla");
        assert_eq!(item.price, derive_metrics("TSLA").price);
    }

    #[test]
    fn name_falls_back_to_ticker() {
        let item = transform_to_stock_item(PolygonTicker::new("ZVZZT", None));
        assert_eq!(item.name, "ZVZZT");
    }

    #[test]
    fn maps_arrays_in_order() {
        let list = transform_to_stock_items(vec![
            PolygonTicker::new("GOOG", Some("Google")),
            PolygonTicker::new("AMZN", Some("Amazon")),
        ]);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].ticker, "GOOG");
        assert_eq!(list[0].name, "Google");
        assert_eq!(list[1].ticker, "AMZN");
        assert_eq!(list[1].name, "Amazon");
        assert_eq!(list[1].change_percent, derive_metrics("AMZN").change_percent);
    }
}
