//! CLI argument definitions for tickerdeck.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `list` | Fetch one or more pages of NASDAQ tickers |
//! | `metrics` | Show the placeholder price metrics for tickers (offline) |
//! | `explore` | Interactive search and infinite scroll |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json, ndjson) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--api-key` | env | Polygon API key |
//! | `--base-url` | `https://api.polygon.io` | Upstream base URL |
//! | `--timeout-ms` | `10000` | Per-request timeout in ms |
//! | `--rate-limit` | `0` | Client-side requests per minute (0 = off) |
//!
//! # Examples
//!
//! ```bash
//! tickerdeck list
//! tickerdeck list apple --limit 50 --format json --pretty
//! tickerdeck list --all --format ndjson
//! tickerdeck metrics AAPL MSFT
//! tickerdeck explore --rate-limit 5
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Browse actively traded NASDAQ tickers from Polygon.io.
#[derive(Debug, Parser)]
#[command(
    name = "tickerdeck",
    author,
    version,
    about = "NASDAQ ticker explorer backed by Polygon.io",
    long_about = "tickerdeck lists actively traded NASDAQ tickers from the Polygon.io \
reference API, with search, cursor pagination and display-ready price metrics.\n\
\n\
The API key is read from --api-key, TICKERDECK_POLYGON_API_KEY or POLYGON_API_KEY \
(a .env file in the working directory is honoured).\n\
\n\
Use 'tickerdeck <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - table: aligned columns with formatted prices (default)
    /// - json: single JSON envelope
    /// - ndjson: one stock per line
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Polygon API key.
    #[arg(
        long,
        global = true,
        env = "TICKERDECK_POLYGON_API_KEY",
        hide_env_values = true
    )]
    pub api_key: Option<String>,

    /// Upstream base URL.
    #[arg(long, global = true, env = "TICKERDECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, env = "TICKERDECK_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Client-side request budget per minute; 0 disables throttling.
    ///
    /// The free Polygon tier allows 5 requests per minute.
    #[arg(long, global = true, default_value_t = 0)]
    pub rate_limit: u32,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON (one stock per line).
    Ndjson,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List NASDAQ tickers, optionally filtered by a search term.
    ///
    /// # Examples
    ///
    ///   tickerdeck list
    ///   tickerdeck list micro --pages 3
    ///   tickerdeck list --cursor YWN0aXZlPXRydWU --limit 100
    List(ListArgs),

    /// Show the placeholder price, change and change percent for tickers.
    ///
    /// Runs offline; the values are derived from the ticker text alone.
    ///
    /// # Examples
    ///
    ///   tickerdeck metrics AAPL MSFT GOOG
    Metrics(MetricsArgs),

    /// Interactive explorer: type to search, press enter for the next page.
    ///
    /// Type ':q' or press Ctrl-D to quit. Ctrl-C cancels a running fetch.
    Explore(ExploreArgs),
}

/// Arguments for the `list` command.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive search across ticker symbols and company names.
    pub search: Option<String>,

    /// Opaque cursor from a previous page's `nextCursor`.
    #[arg(long)]
    pub cursor: Option<String>,

    /// Page size (1-1000).
    #[arg(long, default_value_t = 20)]
    pub limit: u32,

    /// Number of pages to fetch.
    #[arg(long, default_value_t = 1, conflicts_with = "all")]
    pub pages: usize,

    /// Follow cursors until the listing is exhausted.
    #[arg(long, default_value_t = false)]
    pub all: bool,
}

/// Arguments for the `metrics` command.
#[derive(Debug, Args)]
pub struct MetricsArgs {
    /// One or more ticker symbols.
    #[arg(required = true, num_args = 1..)]
    pub tickers: Vec<String>,
}

/// Arguments for the `explore` command.
#[derive(Debug, Args)]
pub struct ExploreArgs {
    /// Initial search term.
    pub search: Option<String>,

    /// Page size (1-1000).
    #[arg(long, default_value_t = 20)]
    pub limit: u32,
}
