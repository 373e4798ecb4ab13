//! Pagination cursor extraction.
//!
//! Polygon returns the next page as a full `next_url`; only its `cursor`
//! query parameter is threaded back into the next request.

use url::Url;

const CURSOR_PARAM: &str = "cursor";

/// Pulls the `cursor` query parameter out of an upstream `next_url`.
///
/// Returns `None` for absent input, strings that do not parse as absolute
/// URLs, and URLs without a non-empty `cursor` parameter.
pub fn extract_cursor(next_url: Option<&str>) -> Option<String> {
    let next_url = next_url.filter(|value| !value.is_empty())?;
    let url = Url::parse(next_url).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == CURSOR_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Accepts a caller-provided cursor, unwrapping it when a full `next_url` was
/// passed where a bare token was expected.
pub fn safe_cursor(cursor: Option<&str>) -> Option<String> {
    let cursor = cursor.filter(|value| !value.is_empty())?;
    if looks_like_url(cursor) {
        return extract_cursor(Some(cursor));
    }
    Some(cursor.to_owned())
}

/// True when the string contains an `http://` or `https://` scheme marker,
/// in any letter case.
pub fn looks_like_url(value: &str) -> bool {
    let lowered = value.to_ascii_lowercase();
    lowered.contains("http://") || lowered.contains("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_cursor_from_full_next_url() {
        let url = "https://api.polygon.io/v3/reference/tickers?cursor=abc123&limit=20";
        assert_eq!(extract_cursor(Some(url)).as_deref(), Some("abc123"));
        assert_eq!(
            extract_cursor(Some("https://x/y?cursor=abc123&limit=20")).as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn missing_param_or_bad_url_yields_none() {
        assert_eq!(extract_cursor(Some("not a url")), None);
        assert_eq!(
            extract_cursor(Some("https://api.polygon.io/v3/reference/tickers?limit=20")),
            None
        );
        assert_eq!(extract_cursor(Some("https://x/y?cursor=")), None);
        assert_eq!(extract_cursor(Some("")), None);
        assert_eq!(extract_cursor(None), None);
    }

    #[test]
    fn cursor_value_is_percent_decoded() {
        let url = "https://x/y?cursor=YWJj%3D%3D";
        assert_eq!(extract_cursor(Some(url)).as_deref(), Some("YWJj=="));
    }

    #[test]
    fn safe_cursor_passes_plain_tokens_through() {
        assert_eq!(safe_cursor(Some("abc")).as_deref(), Some("abc"));
    }

    #[test]
    fn safe_cursor_unwraps_full_urls() {
        let url = "https://api.polygon.io/v3/reference/tickers?cursor=next-456";
        assert_eq!(safe_cursor(Some(url)).as_deref(), Some("next-456"));
        assert_eq!(
            safe_cursor(Some("HTTPS://x/y?cursor=upper")).as_deref(),
            Some("upper")
        );
    }

    #[test]
    fn safe_cursor_drops_url_without_cursor() {
        assert_eq!(safe_cursor(Some("https://x/y?limit=20")), None);
    }

    #[test]
    fn safe_cursor_treats_empty_as_absent() {
        assert_eq!(safe_cursor(None), None);
        assert_eq!(safe_cursor(Some("")), None);
    }
}
