use serde::{Deserialize, Serialize};

/// Display-ready stock card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub ticker: String,
    pub name: String,
    pub price: f64,
    pub change: f64,
    #[serde(rename = "changePercent")]
    pub change_percent: f64,
}

impl StockItem {
    pub fn is_gain(&self) -> bool {
        self.change >= 0.0
    }
}

/// One normalized tickers page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListTickersResponse {
    pub stocks: Vec<StockItem>,
    /// Upstream link to the next page, kept for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
    #[serde(
        rename = "nextCursor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub next_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ListTickersResponse {
    pub fn has_next_page(&self) -> bool {
        self.next_cursor.is_some()
    }
}
