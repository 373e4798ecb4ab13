//! Authenticated, cancellable GET against the Polygon API.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::cancel::CancelToken;
use crate::config::ApiConfig;
use crate::http_client::{HttpClient, HttpRequest};
use crate::TickerError;

const API_KEY_PARAM: &str = "apikey";

/// Issues single requests; retrying is left to the pager.
#[derive(Clone)]
pub struct Transport {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl Transport {
    pub fn new(config: &ApiConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            api_key: config.credential().map(str::to_owned),
            timeout_ms: config.timeout_ms,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetches `url` with the credential attached and decodes the JSON body.
    ///
    /// A missing credential or an already-cancelled token fails before the
    /// HTTP client is touched.
    pub async fn get_json(&self, url: &Url, cancel: &CancelToken) -> Result<Value, TickerError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(TickerError::MissingCredential);
        };
        if cancel.is_cancelled() {
            return Err(TickerError::Aborted);
        }

        let mut authenticated = url.clone();
        authenticated
            .query_pairs_mut()
            .append_pair(API_KEY_PARAM, api_key);

        let request = HttpRequest::get(authenticated.as_str())
            .header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        debug!(url = %url, "requesting polygon resource");

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %url, "request aborted");
                return Err(TickerError::Aborted);
            }
            result = self.http_client.execute(request) => result.map_err(|error| {
                warn!(url = %url, error = %error, "polygon transport failure");
                TickerError::network(error.message())
            })?,
        };

        if !response.is_success() {
            let error = TickerError::from_status(response.status, upstream_error(&response.body));
            warn!(url = %url, status = response.status, error = %error, "polygon request failed");
            return Err(error);
        }

        serde_json::from_str(&response.body)
            .map_err(|error| TickerError::invalid_response(format!("body is not valid JSON: {error}")))
    }
}

/// Best-effort extraction of `{"error": "..."}` from a failure body.
fn upstream_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_reads_error_field() {
        assert_eq!(
            upstream_error(r#"{"status":"ERROR","error":"bad things"}"#).as_deref(),
            Some("bad things")
        );
        assert_eq!(upstream_error(r#"{"status":"ERROR"}"#), None);
        assert_eq!(upstream_error("<html>gateway</html>"), None);
        assert_eq!(upstream_error(r#"{"error":42}"#), None);
    }

    #[test]
    fn transport_without_key_reports_no_credential() {
        let transport = Transport::new(
            &ApiConfig::default(),
            Arc::new(crate::http_client::ReqwestHttpClient::new()),
        );
        assert!(!transport.has_credential());
    }
}
