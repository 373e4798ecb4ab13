use std::time::Instant;

use serde::Serialize;
use tickerdeck_core::{
    ApiConfig, CancelToken, ErrorClass, FetchOutcome, ListTickersParams, PagerOptions, StockItem,
    TickerClient, TickerError, TickerPager,
};

use crate::cli::ListArgs;
use crate::error::CliError;

use super::{CommandResult, InterruptGuard};

#[derive(Debug, Serialize)]
struct ListResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<String>,
    stocks: Vec<StockItem>,
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    next_cursor: Option<String>,
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
}

#[derive(Debug, Default)]
struct Fetched {
    stocks: Vec<StockItem>,
    next_cursor: Option<String>,
    page_count: usize,
    cache_hit: bool,
    failure: Option<TickerError>,
}

pub async fn run(
    args: &ListArgs,
    config: ApiConfig,
    options: PagerOptions,
) -> Result<CommandResult, CliError> {
    if args.pages == 0 {
        return Err(CliError::Command(String::from(
            "--pages must be greater than zero",
        )));
    }
    let max_pages = if args.all { usize::MAX } else { args.pages };

    let client = TickerClient::try_new(config)?;
    let cancel = CancelToken::new();
    let _interrupt = InterruptGuard::new(&cancel);
    let started = Instant::now();

    let fetched = match args.cursor.as_deref() {
        Some(cursor) => {
            follow_cursor(&client, args.search.as_deref(), cursor, args.limit, max_pages, &cancel)
                .await
        }
        None => fetch_pages(client, args.search.as_deref(), max_pages, options, &cancel).await,
    };
    let latency_ms = started.elapsed().as_millis() as u64;

    let mut warnings = Vec::new();
    if let Some(error) = &fetched.failure {
        match error.class() {
            ErrorClass::Configuration | ErrorClass::Validation => {
                return Err(CliError::Ticker(error.clone()));
            }
            ErrorClass::Abort => warnings.push(format!(
                "interrupted; showing {} page(s) fetched before cancellation",
                fetched.page_count
            )),
            ErrorClass::Transport | ErrorClass::ResponseShape if fetched.page_count > 0 => {
                warnings.push(format!(
                    "stopped after {} page(s); remaining pages failed to load",
                    fetched.page_count
                ));
            }
            ErrorClass::Transport | ErrorClass::ResponseShape => {}
        }
    }

    let data = serde_json::to_value(ListResponseData {
        search: args
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned),
        has_next_page: fetched.next_cursor.is_some(),
        next_cursor: fetched.next_cursor,
        stocks: fetched.stocks,
    })?;

    let mut result = CommandResult::ok(data)
        .with_failure(fetched.failure)
        .with_latency(latency_ms)
        .with_cache_hit(fetched.cache_hit)
        .with_page_count(fetched.page_count);
    for warning in warnings {
        result = result.with_warning(warning);
    }
    Ok(result)
}

/// Pages from the first one on, through the pager's retry and throttle.
async fn fetch_pages(
    client: TickerClient,
    search: Option<&str>,
    max_pages: usize,
    options: PagerOptions,
    cancel: &CancelToken,
) -> Fetched {
    let pager = TickerPager::with_options(client, search, options);
    let mut fetched = Fetched::default();

    while pager.page_count() < max_pages {
        match pager.fetch_next_page(cancel).await {
            Ok(FetchOutcome::Appended { from_cache, .. }) => fetched.cache_hit |= from_cache,
            Ok(FetchOutcome::Exhausted | FetchOutcome::InFlight | FetchOutcome::Stale) => break,
            Err(error) => {
                fetched.failure = Some(error);
                break;
            }
        }
    }

    fetched.stocks = pager.stocks();
    fetched.page_count = pager.page_count();
    fetched.next_cursor = pager
        .pages()
        .last()
        .and_then(|page| page.next_cursor.clone());
    fetched
}

/// Pages starting at a caller-supplied cursor. Single attempt per page.
async fn follow_cursor(
    client: &TickerClient,
    search: Option<&str>,
    cursor: &str,
    limit: u32,
    max_pages: usize,
    cancel: &CancelToken,
) -> Fetched {
    let mut fetched = Fetched::default();
    let mut next = Some(cursor.to_owned());

    while fetched.page_count < max_pages {
        // A failed cursor stays in `next` so the caller can resume from it.
        let Some(cursor) = next.clone() else {
            break;
        };
        let params = ListTickersParams {
            search: search.map(str::to_owned),
            cursor: Some(cursor),
            limit: Some(limit),
        };
        match client.list_tickers(&params, cancel).await {
            Ok(page) => {
                fetched.page_count += 1;
                fetched.stocks.extend(page.stocks);
                next = page.next_cursor;
            }
            Err(error) => {
                fetched.failure = Some(error);
                break;
            }
        }
    }

    fetched.next_cursor = next;
    fetched
}
