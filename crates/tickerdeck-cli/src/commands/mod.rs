pub mod explore;
mod list;
mod metrics;

use std::time::Duration;

use serde_json::Value;
use tickerdeck_core::{ApiConfig, CancelToken, PagerOptions, RequestThrottle, TickerError};
use tokio::task::JoinHandle;
use tracing::info;

use crate::cli::{Cli, Command};
use crate::envelope::{Envelope, EnvelopeError};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub failure: Option<TickerError>,
    pub latency_ms: u64,
    pub cache_hit: bool,
    pub page_count: usize,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            failure: None,
            latency_ms: 0,
            cache_hit: false,
            page_count: 0,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_failure(mut self, failure: Option<TickerError>) -> Self {
        self.failure = failure;
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }

    pub fn with_page_count(mut self, page_count: usize) -> Self {
        self.page_count = page_count;
        self
    }
}

/// A rendered-ready envelope plus the failure that should decide the exit code.
pub struct Executed {
    pub envelope: Envelope<Value>,
    pub failure: Option<TickerError>,
}

pub async fn run(cli: &Cli) -> Result<Executed, CliError> {
    let command_result = match &cli.command {
        Command::List(args) => list::run(args, api_config(cli)?, pager_options(cli, args.limit)).await?,
        Command::Metrics(args) => metrics::run(args)?,
        Command::Explore(_) => {
            return Err(CliError::Command(String::from(
                "explore is interactive and does not produce an envelope",
            )))
        }
    };

    let CommandResult {
        data,
        warnings,
        failure,
        latency_ms,
        cache_hit,
        page_count,
    } = command_result;

    let mut metadata = Metadata::new(latency_ms, cache_hit, page_count);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let errors = failure
        .iter()
        .filter(|error| !error.is_abort())
        .map(EnvelopeError::from)
        .collect();

    Ok(Executed {
        envelope: Envelope::new(metadata, data, errors),
        failure,
    })
}

/// Environment first, then explicit flags.
pub fn api_config(cli: &Cli) -> Result<ApiConfig, CliError> {
    let mut config = ApiConfig::from_env();
    if let Some(api_key) = &cli.api_key {
        config = config.with_api_key(api_key.clone());
    }
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }

    // Fail on a bad base URL before anything touches the network.
    config.tickers_url()?;
    Ok(config)
}

pub fn pager_options(cli: &Cli, page_size: u32) -> PagerOptions {
    PagerOptions {
        page_size,
        throttle: RequestThrottle::new(Duration::from_secs(60), cli.rate_limit),
        ..PagerOptions::default()
    }
}

/// Cancels `cancel` on Ctrl-C for as long as the guard lives.
pub struct InterruptGuard(JoinHandle<()>);

impl InterruptGuard {
    pub fn new(cancel: &CancelToken) -> Self {
        let cancel = cancel.clone();
        Self(tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("interrupt received; cancelling fetch");
                cancel.cancel();
            }
        }))
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}
