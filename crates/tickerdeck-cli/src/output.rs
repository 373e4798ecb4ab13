use std::io::{self, Write};

use serde_json::{json, Value};
use tickerdeck_core::{format_change, format_change_percent, format_currency, StockItem};

use crate::cli::OutputFormat;
use crate::envelope::Envelope;
use crate::error::CliError;

const NAME_WIDTH: usize = 36;

pub fn render(envelope: &Envelope<Value>, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Ndjson => render_ndjson(&mut out, envelope)?,
        OutputFormat::Table => render_table(&mut out, envelope)?,
    }
    out.flush()?;
    Ok(())
}

/// One row per line, then one line per error.
fn render_ndjson(out: &mut impl Write, envelope: &Envelope<Value>) -> Result<(), CliError> {
    match rows(&envelope.data) {
        Some(rows) => {
            for row in rows {
                writeln!(out, "{}", serde_json::to_string(row)?)?;
            }
        }
        None => writeln!(out, "{}", serde_json::to_string(&envelope.data)?)?,
    }
    for error in &envelope.errors {
        writeln!(out, "{}", serde_json::to_string(&json!({ "error": error }))?)?;
    }
    Ok(())
}

fn render_table(out: &mut impl Write, envelope: &Envelope<Value>) -> Result<(), CliError> {
    match rows(&envelope.data) {
        Some(rows) => {
            let cards: Vec<StockItem> = rows.iter().filter_map(card_from_row).collect();
            write_stock_table(out, &cards)?;
        }
        None => {
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            writeln!(out, "{pretty_data}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;
    writeln!(out, "pages       : {}", envelope.meta.page_count)?;
    if let Some(cursor) = envelope.data.get("nextCursor").and_then(Value::as_str) {
        writeln!(out, "next_cursor : {cursor}")?;
    }

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            writeln!(out, "  - {}: {}", error.code, error.message)?;
        }
    }

    Ok(())
}

/// Aligned ticker table. Also used by the interactive explorer.
pub fn write_stock_table(out: &mut impl Write, stocks: &[StockItem]) -> io::Result<()> {
    if stocks.is_empty() {
        return writeln!(out, "(no tickers)");
    }

    let ticker_width = stocks
        .iter()
        .map(|stock| stock.ticker.chars().count())
        .max()
        .unwrap_or(0)
        .max("TICKER".len());

    writeln!(
        out,
        "{:<ticker_width$}  {:<NAME_WIDTH$}  {:>12}  {:>12}  {:>9}",
        "TICKER", "NAME", "PRICE", "CHANGE", "CHANGE%"
    )?;
    for stock in stocks {
        write_stock_row(out, stock, ticker_width)?;
    }
    Ok(())
}

pub fn write_stock_row(out: &mut impl Write, stock: &StockItem, ticker_width: usize) -> io::Result<()> {
    writeln!(
        out,
        "{:<ticker_width$}  {:<NAME_WIDTH$}  {:>12}  {:>12}  {:>9}",
        stock.ticker,
        truncate(&stock.name, NAME_WIDTH),
        format_currency(stock.price),
        format_change(stock.change),
        format_change_percent(stock.change_percent),
    )
}

fn rows(data: &Value) -> Option<&Vec<Value>> {
    data.get("stocks")
        .or_else(|| data.get("metrics"))
        .and_then(Value::as_array)
}

/// Metrics rows carry no name; the ticker stands in.
fn card_from_row(row: &Value) -> Option<StockItem> {
    let ticker = row.get("ticker")?.as_str()?.to_owned();
    Some(StockItem {
        name: row
            .get("name")
            .and_then(Value::as_str)
            .map_or_else(|| ticker.clone(), str::to_owned),
        price: row.get("price")?.as_f64()?,
        change: row.get("change")?.as_f64()?,
        change_percent: row.get("changePercent")?.as_f64()?,
        ticker,
    })
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_owned();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}
