//! Structural validation of the raw tickers payload.
//!
//! The check is explicit rather than derive-driven so that failures name the
//! exact offending path (`results[3].ticker: expected string`).

use serde_json::{Map, Value};

use crate::TickerError;

pub const STATUS_OK: &str = "OK";

/// One raw record from `results`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolygonTicker {
    pub ticker: String,
    pub name: Option<String>,
}

impl PolygonTicker {
    pub fn new(ticker: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.map(str::to_owned),
        }
    }
}

/// Tickers payload after the shape check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolygonResponse {
    pub status: String,
    pub error: Option<String>,
    pub results: Vec<PolygonTicker>,
    pub next_url: Option<String>,
    pub request_id: Option<String>,
    pub count: Option<i64>,
}

/// Checks the decoded body against the expected tickers shape.
///
/// `results` defaults to empty when absent or null. Unknown fields are
/// ignored.
pub fn validate_response(body: &Value) -> Result<PolygonResponse, TickerError> {
    let root = body
        .as_object()
        .ok_or_else(|| mismatch("$", "expected object", body))?;

    let status = required_string(root, "status")?;
    let error = optional_string(root, "error", false)?;
    let next_url = optional_string(root, "next_url", true)?;
    let request_id = optional_string(root, "request_id", false)?;
    let count = optional_count(root)?;

    let results = match root.get("results") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| validate_ticker(index, item))
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => return Err(mismatch("results", "expected array", other)),
    };

    Ok(PolygonResponse {
        status,
        error,
        results,
        next_url,
        request_id,
        count,
    })
}

/// Rejects payloads whose `status` is not `OK`, preferring the upstream
/// `error` text verbatim.
pub fn ensure_ok(response: PolygonResponse) -> Result<PolygonResponse, TickerError> {
    if response.status == STATUS_OK {
        return Ok(response);
    }

    let message = response
        .error
        .clone()
        .unwrap_or_else(|| format!("Polygon request failed with status: {}", response.status));
    Err(TickerError::ApiStatus { message })
}

fn validate_ticker(index: usize, item: &Value) -> Result<PolygonTicker, TickerError> {
    let path = format!("results[{index}]");
    let record = item
        .as_object()
        .ok_or_else(|| mismatch(&path, "expected object", item))?;

    let ticker = match record.get("ticker") {
        Some(Value::String(ticker)) => ticker.clone(),
        Some(other) => return Err(mismatch(&format!("{path}.ticker"), "expected string", other)),
        None => return Err(missing(&format!("{path}.ticker"))),
    };

    let name = match record.get("name") {
        None | Some(Value::Null) => None,
        Some(Value::String(name)) => Some(name.clone()),
        Some(other) => return Err(mismatch(&format!("{path}.name"), "expected string or null", other)),
    };

    Ok(PolygonTicker { ticker, name })
}

fn required_string(root: &Map<String, Value>, field: &str) -> Result<String, TickerError> {
    match root.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(mismatch(field, "expected string", other)),
        None => Err(missing(field)),
    }
}

fn optional_string(
    root: &Map<String, Value>,
    field: &str,
    nullable: bool,
) -> Result<Option<String>, TickerError> {
    match root.get(field) {
        None => Ok(None),
        Some(Value::Null) if nullable => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(mismatch(field, "expected string", other)),
    }
}

/// Any integral JSON number is accepted, `3.0` included.
fn optional_count(root: &Map<String, Value>) -> Result<Option<i64>, TickerError> {
    let Some(value) = root.get("count") else {
        return Ok(None);
    };
    let integral = value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    });
    integral
        .map(Some)
        .ok_or_else(|| mismatch("count", "expected integer", value))
}

fn missing(path: &str) -> TickerError {
    TickerError::invalid_response(format!("{path}: required field is missing"))
}

fn mismatch(path: &str, expected: &str, found: &Value) -> TickerError {
    TickerError::invalid_response(format!("{path}: {expected}, found {}", kind_of(found)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
