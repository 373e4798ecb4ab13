//! Behavior-driven tests for error handling
//!
//! These tests verify HOW upstream and local failures surface: which kind
//! each becomes, its user-facing message, and whether the network is touched.

use std::time::Duration;

use tickerdeck_tests::*;

async fn first_page_error(script: Vec<Scripted>) -> (TickerError, Arc<ScriptedHttpClient>) {
    let (client, http) = client_with(script);
    let error = client
        .list_tickers(&ListTickersParams::new(), &CancelToken::new())
        .await
        .expect_err("request should fail");
    (error, http)
}

// =============================================================================
// Configuration
// =============================================================================

#[tokio::test]
async fn when_api_key_is_missing_no_request_is_made() {
    // Given: A client with no credential configured
    let (client, http) = client_with_config(
        ApiConfig::new(None).with_base_url(TEST_BASE_URL),
        vec![page(&[("AAPL", None)], None)],
    );

    // When: A page is requested
    let error = client
        .list_tickers(&ListTickersParams::new(), &CancelToken::new())
        .await
        .expect_err("missing key should fail");

    // Then: A configuration error is raised and nothing reached the network
    assert_eq!(error, TickerError::MissingCredential);
    assert_eq!(error.class(), ErrorClass::Configuration);
    assert!(!error.retryable());
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn when_api_key_is_blank_it_counts_as_missing() {
    // Given: A whitespace-only credential
    let (client, http) = client_with_config(
        ApiConfig::new(Some(String::from("   "))).with_base_url(TEST_BASE_URL),
        vec![page(&[], None)],
    );

    // When: A page is requested
    let error = client
        .list_tickers(&ListTickersParams::new(), &CancelToken::new())
        .await
        .expect_err("blank key should fail");

    // Then: Same as a missing key
    assert_eq!(error, TickerError::MissingCredential);
    assert_eq!(http.request_count(), 0);
}

#[test]
fn config_debug_output_never_shows_the_key() {
    // Given: A configured credential
    let config = test_config();

    // When: The config is debug-printed
    let rendered = format!("{config:?}");

    // Then: The key is redacted
    assert!(!rendered.contains(TEST_API_KEY));
    assert!(rendered.contains("<redacted>"));
}

// =============================================================================
// HTTP status mapping
// =============================================================================

#[tokio::test]
async fn when_upstream_rate_limits_error_is_rate_limited_and_not_retryable() {
    let (error, _http) = first_page_error(vec![status(429, r#"{"status":"ERROR"}"#)]).await;

    assert_eq!(error, TickerError::RateLimited);
    assert_eq!(
        error.to_string(),
        "Rate limit exceeded. Please try again later."
    );
    assert_eq!(error.status(), Some(429));
    assert!(!error.retryable());
}

#[tokio::test]
async fn when_key_is_rejected_errors_name_the_cause() {
    let (unauthorized, _) = first_page_error(vec![status(401, "{}")]).await;
    assert_eq!(unauthorized, TickerError::Unauthorized);
    assert_eq!(unauthorized.to_string(), "Invalid API key");

    let (forbidden, _) = first_page_error(vec![status(403, "{}")]).await;
    assert_eq!(forbidden, TickerError::Forbidden);
    assert_eq!(
        forbidden.to_string(),
        "Access forbidden. Check your API key permissions."
    );
}

#[tokio::test]
async fn when_other_status_fails_upstream_error_text_is_preferred() {
    // Given: A 500 with an upstream error message
    let (error, _) =
        first_page_error(vec![status(500, r#"{"status":"ERROR","error":"internal boom"}"#)]).await;

    // Then: The upstream text is shown verbatim with the status attached
    assert_eq!(
        error,
        TickerError::Api {
            status: 500,
            message: String::from("internal boom")
        }
    );
    assert_eq!(error.to_string(), "internal boom");
    assert!(error.retryable());
}

#[tokio::test]
async fn when_other_status_has_no_readable_body_a_generic_message_is_used() {
    let (error, _) = first_page_error(vec![status(502, "<html>bad gateway</html>")]).await;

    assert_eq!(error.to_string(), "API request failed: 502");
    assert_eq!(error.status(), Some(502));
}

// =============================================================================
// Transport and payload failures
// =============================================================================

#[tokio::test]
async fn when_connection_fails_error_is_a_retryable_network_error() {
    let (error, _) = first_page_error(vec![network_failure("connection refused")]).await;

    assert_eq!(error.to_string(), "Network error: connection refused");
    assert_eq!(error.class(), ErrorClass::Transport);
    assert!(error.retryable());
}

#[tokio::test]
async fn when_body_is_not_json_error_is_invalid_response() {
    let (error, _) = first_page_error(vec![ok("<html>maintenance</html>")]).await;

    assert!(matches!(error, TickerError::InvalidResponse { .. }));
    assert!(error.to_string().starts_with("Unexpected response from Polygon: "));
    assert!(!error.retryable());
}

#[tokio::test]
async fn when_payload_shape_is_wrong_the_offending_path_is_named() {
    let (error, _) =
        first_page_error(vec![ok(r#"{"status":"OK","results":[{"ticker":"AAPL"},{"ticker":42}]}"#)])
            .await;

    assert_eq!(error.class(), ErrorClass::ResponseShape);
    assert!(
        error.to_string().contains("results[1].ticker"),
        "error should name the path: {error}"
    );
}

#[tokio::test]
async fn when_status_field_is_missing_payload_is_rejected() {
    let (error, _) = first_page_error(vec![ok(r#"{"results":[]}"#)]).await;

    assert!(matches!(error, TickerError::InvalidResponse { .. }));
    assert!(error.to_string().contains("status"));
}

#[tokio::test]
async fn when_status_is_not_ok_upstream_message_is_carried_verbatim() {
    let (error, _) = first_page_error(vec![ok(
        r#"{"status":"ERROR","error":"Your plan doesn't include this data timeframe."}"#,
    )])
    .await;

    assert_eq!(
        error,
        TickerError::ApiStatus {
            message: String::from("Your plan doesn't include this data timeframe.")
        }
    );
    assert_eq!(
        error.to_string(),
        "Your plan doesn't include this data timeframe."
    );
}

#[tokio::test]
async fn when_status_is_not_ok_without_message_status_is_reported() {
    let (error, _) = first_page_error(vec![ok(r#"{"status":"DELAYED"}"#)]).await;

    assert_eq!(
        error.to_string(),
        "Polygon request failed with status: DELAYED"
    );
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn when_token_is_already_cancelled_no_request_is_made() {
    // Given: A token cancelled before the call
    let (client, http) = client_with(vec![page(&[], None)]);
    let cancel = CancelToken::new();
    cancel.cancel();

    // When: A page is requested
    let error = client
        .list_tickers(&ListTickersParams::new(), &cancel)
        .await
        .expect_err("cancelled token should abort");

    // Then: The abort is distinguishable and nothing was sent
    assert!(error.is_abort());
    assert_eq!(error.class(), ErrorClass::Abort);
    assert_eq!(http.request_count(), 0);
}

#[tokio::test]
async fn when_request_is_cancelled_in_flight_it_aborts_promptly() {
    // Given: An upstream that never answers
    let (client, http) = client_with(vec![Scripted::Hang]);
    let cancel = CancelToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    // When: The request is cancelled mid-flight
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client.list_tickers(&ListTickersParams::new(), &cancel),
    )
    .await
    .expect("cancellation should end the request");

    // Then: The call ends with an abort, not a network error
    assert_eq!(result.expect_err("aborted"), TickerError::Aborted);
    assert_eq!(http.request_count(), 1);
}
