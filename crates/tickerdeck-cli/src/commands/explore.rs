//! Line-driven explorer over a [`TickerPager`].
//!
//! Rows go to stdout, prompts and status lines to stderr.

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use tickerdeck_core::{
    CancelToken, ErrorClass, FetchOutcome, PageFetcher, StockItem, TickerClient, TickerError,
    TickerPager,
};

use crate::cli::{Cli, ExploreArgs, OutputFormat};
use crate::error::CliError;
use crate::output::write_stock_row;

use super::{api_config, pager_options, InterruptGuard};

const TICKER_WIDTH: usize = 8;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Quit,
    NextPage,
    ClearSearch,
    Search(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Self::NextPage,
            ":q" | ":quit" => Self::Quit,
            ":clear" => Self::ClearSearch,
            term => Self::Search(term.to_owned()),
        }
    }
}

pub async fn run(cli: &Cli, args: &ExploreArgs) -> Result<(), CliError> {
    let config = api_config(cli)?;
    if config.credential().is_none() {
        return Err(TickerError::MissingCredential.into());
    }

    let pager = TickerPager::with_options(
        TickerClient::try_new(config)?,
        args.search.as_deref(),
        pager_options(cli, args.limit),
    );
    let mut session = ExploreSession::new(pager, cli.format);

    session.load_next().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        session.prompt()?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match Input::parse(&line) {
            Input::Quit => break,
            Input::NextPage => session.load_next().await?,
            Input::ClearSearch => {
                session.pager.set_search(None);
                session.load_next().await?;
            }
            Input::Search(term) => {
                session.pager.set_search(Some(&term));
                session.load_next().await?;
            }
        }
    }

    debug!(pages = session.pager.page_count(), "explore session finished");
    Ok(())
}

struct ExploreSession<F> {
    pager: TickerPager<F>,
    format: OutputFormat,
}

impl<F: PageFetcher> ExploreSession<F> {
    fn new(pager: TickerPager<F>, format: OutputFormat) -> Self {
        Self { pager, format }
    }

    fn prompt(&self) -> io::Result<()> {
        let search = self.pager.search().unwrap_or_default();
        let mut err = io::stderr().lock();
        write!(
            err,
            "[{} loaded{}] search (enter = next page, :clear, :q)> ",
            self.pager.loaded_count(),
            if search.is_empty() {
                String::new()
            } else {
                format!(", search '{search}'")
            }
        )?;
        err.flush()
    }

    async fn load_next(&mut self) -> Result<(), CliError> {
        let replacing = self.pager.is_showing_previous() || self.pager.page_count() == 0;
        let cancel = CancelToken::new();
        let outcome = {
            let _interrupt = InterruptGuard::new(&cancel);
            self.pager.fetch_next_page(&cancel).await
        };

        match outcome {
            Ok(FetchOutcome::Appended { added, .. }) => {
                let stocks = self.pager.stocks();
                let fresh = &stocks[stocks.len().saturating_sub(added)..];
                if replacing {
                    self.print_heading()?;
                }
                self.print_rows(fresh)?;
                if !self.pager.has_next_page() {
                    status("end of results")?;
                }
            }
            Ok(FetchOutcome::Exhausted) => status("no more results")?,
            Ok(FetchOutcome::InFlight | FetchOutcome::Stale) => {}
            Err(error) if error.is_abort() => status("fetch cancelled")?,
            Err(error) if error.class() == ErrorClass::Configuration => return Err(error.into()),
            Err(error) => status(&format!("error: {error}"))?,
        }
        Ok(())
    }

    fn print_heading(&self) -> io::Result<()> {
        if self.format != OutputFormat::Table {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        match self.pager.search() {
            Some(search) => writeln!(out, "\n== results for '{search}' ==")?,
            None => writeln!(out, "\n== all NASDAQ tickers ==")?,
        }
        out.flush()
    }

    fn print_rows(&self, stocks: &[StockItem]) -> Result<(), CliError> {
        let mut out = io::stdout().lock();
        for stock in stocks {
            match self.format {
                OutputFormat::Table => write_stock_row(&mut out, stock, TICKER_WIDTH)?,
                OutputFormat::Json | OutputFormat::Ndjson => {
                    writeln!(out, "{}", serde_json::to_string(stock)?)?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn status(message: &str) -> io::Result<()> {
    let mut err = io::stderr().lock();
    writeln!(err, "{message}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_requests_next_page() {
        assert_eq!(Input::parse(""), Input::NextPage);
        assert_eq!(Input::parse("   \t"), Input::NextPage);
    }

    #[test]
    fn commands_and_searches_are_trimmed() {
        assert_eq!(Input::parse(" :q "), Input::Quit);
        assert_eq!(Input::parse(":clear"), Input::ClearSearch);
        assert_eq!(Input::parse("  micro soft  "), Input::Search(String::from("micro soft")));
    }
}
