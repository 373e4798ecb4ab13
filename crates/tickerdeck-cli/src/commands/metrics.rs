use serde::Serialize;
use tickerdeck_core::derive_metrics;

use crate::cli::MetricsArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct MetricsRow {
    ticker: String,
    price: f64,
    change: f64,
    #[serde(rename = "changePercent")]
    change_percent: f64,
}

#[derive(Debug, Serialize)]
struct MetricsResponseData {
    metrics: Vec<MetricsRow>,
}

pub fn run(args: &MetricsArgs) -> Result<CommandResult, CliError> {
    let mut metrics = Vec::with_capacity(args.tickers.len());
    for ticker in &args.tickers {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(CliError::Command(String::from("ticker must not be empty")));
        }

        let derived = derive_metrics(ticker);
        metrics.push(MetricsRow {
            ticker: ticker.to_owned(),
            price: derived.price,
            change: derived.change,
            change_percent: derived.change_percent,
        });
    }

    let data = serde_json::to_value(MetricsResponseData { metrics })?;
    Ok(CommandResult::ok(data).with_warning(
        "price, change and changePercent are deterministic placeholders, not market data",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_rows_for_each_ticker_in_order() {
        let args = MetricsArgs {
            tickers: vec![String::from(" AAPL "), String::from("MSFT")],
        };
        let result = run(&args).expect("metrics");

        let rows = result.data["metrics"].as_array().expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ticker"], "AAPL");
        assert_eq!(rows[0]["price"], 536.0);
        assert_eq!(rows[0]["changePercent"], 1.0);
        assert_eq!(rows[1]["ticker"], "MSFT");
        assert_eq!(rows[1]["price"], 924.0);
        assert_eq!(result.page_count, 0);
    }

    #[test]
    fn blank_ticker_is_rejected() {
        let args = MetricsArgs {
            tickers: vec![String::from("   ")],
        };
        assert!(matches!(run(&args), Err(CliError::Command(_))));
    }
}
