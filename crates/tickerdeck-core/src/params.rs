//! List-parameter normalization.

use serde::{Deserialize, Serialize};

use crate::config::QueryDefaults;
use crate::cursor::safe_cursor;
use crate::ValidationError;

/// Raw caller input for one tickers page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTickersParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListTickersParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Validated parameters, ready for the request builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TickersQuery {
    pub search: Option<String>,
    pub cursor: Option<String>,
    pub limit: u32,
}

impl TickersQuery {
    pub fn from_params(
        params: &ListTickersParams,
        defaults: &QueryDefaults,
    ) -> Result<Self, ValidationError> {
        let limit = params.limit.unwrap_or(defaults.limit);
        if limit < 1 || limit > defaults.max_limit {
            return Err(ValidationError::LimitOutOfRange {
                value: limit,
                min: 1,
                max: defaults.max_limit,
            });
        }

        let search = normalize_search(params.search.as_deref());
        if let Some(search) = &search {
            // UTF-16 code units; an astral-plane character counts as two.
            let len = search.encode_utf16().count();
            if len > defaults.max_search_len {
                return Err(ValidationError::SearchTooLong {
                    len,
                    max: defaults.max_search_len,
                });
            }
        }

        Ok(Self {
            search,
            cursor: safe_cursor(params.cursor.as_deref()),
            limit,
        })
    }
}

/// Trims search text; empty or all-whitespace input means "no search".
pub fn normalize_search(search: Option<&str>) -> Option<String> {
    let trimmed = search?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_returns_none_for_empty() {
        assert_eq!(normalize_search(Some("  abc  ")).as_deref(), Some("abc"));
        assert_eq!(normalize_search(Some("   ")), None);
        assert_eq!(normalize_search(Some("")), None);
        assert_eq!(normalize_search(None), None);
    }

    #[test]
    fn limit_defaults_to_twenty() {
        let query = TickersQuery::from_params(&ListTickersParams::new(), &QueryDefaults::default())
            .expect("defaults are valid");
        assert_eq!(query.limit, 20);
        assert_eq!(query.search, None);
        assert_eq!(query.cursor, None);
    }

    #[test]
    fn limit_outside_range_is_rejected() {
        let defaults = QueryDefaults::default();
        for limit in [0, 1_001, u32::MAX] {
            let error = TickersQuery::from_params(&ListTickersParams::new().with_limit(limit), &defaults)
                .expect_err("out of range");
            assert!(matches!(error, ValidationError::LimitOutOfRange { value, .. } if value == limit));
        }

        for limit in [1, 1_000] {
            let query = TickersQuery::from_params(&ListTickersParams::new().with_limit(limit), &defaults)
                .expect("boundary is valid");
            assert_eq!(query.limit, limit);
        }
    }

    #[test]
    fn search_is_limited_after_trimming() {
        let defaults = QueryDefaults::default();
        let fifty = "a".repeat(50);
        let padded = format!("   {fifty}   ");
        let query = TickersQuery::from_params(&ListTickersParams::new().with_search(padded), &defaults)
            .expect("50 chars after trim is valid");
        assert_eq!(query.search.as_deref(), Some(fifty.as_str()));

        let error = TickersQuery::from_params(
            &ListTickersParams::new().with_search("b".repeat(51)),
            &defaults,
        )
        .expect_err("51 chars is too long");
        assert_eq!(error, ValidationError::SearchTooLong { len: 51, max: 50 });

        // Astral-plane characters count twice.
        let emoji = "\u{1F680}".repeat(26);
        let error = TickersQuery::from_params(&ListTickersParams::new().with_search(emoji), &defaults)
            .expect_err("26 emoji are 52 code units");
        assert_eq!(error, ValidationError::SearchTooLong { len: 52, max: 50 });

        let emoji = "\u{1F680}".repeat(25);
        TickersQuery::from_params(&ListTickersParams::new().with_search(emoji), &defaults)
            .expect("25 emoji are exactly 50 code units");
    }

    #[test]
    fn whitespace_search_becomes_absent() {
        let query = TickersQuery::from_params(
            &ListTickersParams::new().with_search("    "),
            &QueryDefaults::default(),
        )
        .expect("valid");
        assert_eq!(query.search, None);
    }

    #[test]
    fn url_shaped_cursor_is_unwrapped() {
        let params = ListTickersParams::new()
            .with_cursor("https://api.polygon.io/v3/reference/tickers?cursor=tok-9&limit=20");
        let query = TickersQuery::from_params(&params, &QueryDefaults::default()).expect("valid");
        assert_eq!(query.cursor.as_deref(), Some("tok-9"));
    }
}
