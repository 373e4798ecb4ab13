//! Cursor-driven page sequencing over a [`PageFetcher`].
//!
//! The pager owns the page cache and the only mutable state in the fetch
//! path. Pages are appended strictly in the order their cursors were
//! requested; a page that lands after the search changed is cached but not
//! shown.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{PageCache, PageKey};
use crate::cancel::CancelToken;
use crate::domain::{ListTickersResponse, StockItem};
use crate::params::{normalize_search, ListTickersParams};
use crate::retry::RetryPolicy;
use crate::throttling::RequestThrottle;
use crate::tickers::TickerClient;
use crate::TickerError;

/// Page source consumed by the pager.
pub trait PageFetcher: Send + Sync {
    fn fetch_page<'a>(
        &'a self,
        params: &'a ListTickersParams,
        cancel: &'a CancelToken,
    ) -> Pin<Box<dyn Future<Output = Result<ListTickersResponse, TickerError>> + Send + 'a>>;
}

impl PageFetcher for TickerClient {
    fn fetch_page<'a>(
        &'a self,
        params: &'a ListTickersParams,
        cancel: &'a CancelToken,
    ) -> Pin<Box<dyn Future<Output = Result<ListTickersResponse, TickerError>> + Send + 'a>> {
        Box::pin(self.list_tickers(params, cancel))
    }
}

impl<F: PageFetcher + ?Sized> PageFetcher for Arc<F> {
    fn fetch_page<'a>(
        &'a self,
        params: &'a ListTickersParams,
        cancel: &'a CancelToken,
    ) -> Pin<Box<dyn Future<Output = Result<ListTickersResponse, TickerError>> + Send + 'a>> {
        (**self).fetch_page(params, cancel)
    }
}

#[derive(Clone)]
pub struct PagerOptions {
    pub page_size: u32,
    pub retry: RetryPolicy,
    pub throttle: RequestThrottle,
    pub cache_ttl: Duration,
}

impl Default for PagerOptions {
    fn default() -> Self {
        Self {
            page_size: 20,
            retry: RetryPolicy::default(),
            throttle: RequestThrottle::unlimited(),
            cache_ttl: Duration::from_secs(300),
        }
    }
}

/// Result of a successful [`TickerPager::fetch_next_page`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Appended { added: usize, from_cache: bool },
    /// The last page had no cursor.
    Exhausted,
    /// Another fetch was already running; nothing was requested.
    InFlight,
    /// The search changed while the page was loading.
    Stale,
}

#[derive(Debug, Default)]
struct PagerState {
    search: Option<String>,
    /// Search the loaded pages belong to; differs from `search` while the
    /// previous results are shown as a placeholder.
    pages_search: Option<String>,
    pages: Vec<ListTickersResponse>,
    error: Option<TickerError>,
    generation: u64,
    /// Bumped by [`TickerPager::refresh`] only; pages fetched across a
    /// refresh must not outlive it in the cache.
    refreshes: u64,
}

impl PagerState {
    fn showing_previous(&self) -> bool {
        self.pages_search != self.search
    }

    fn has_current_pages(&self) -> bool {
        !self.showing_previous() && !self.pages.is_empty()
    }
}

struct FetchingGuard<'a>(&'a AtomicBool);

impl Drop for FetchingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Infinite-scroll style pager: accumulated pages, next-page cursor,
/// in-flight flag and last error for one search at a time.
pub struct TickerPager<F> {
    fetcher: F,
    options: PagerOptions,
    cache: PageCache<ListTickersResponse>,
    state: Mutex<PagerState>,
    fetching: AtomicBool,
}

impl<F: PageFetcher> TickerPager<F> {
    pub fn new(fetcher: F, search: Option<&str>) -> Self {
        Self::with_options(fetcher, search, PagerOptions::default())
    }

    pub fn with_options(fetcher: F, search: Option<&str>, options: PagerOptions) -> Self {
        let search = normalize_search(search);
        let cache = PageCache::new(options.cache_ttl);
        Self {
            fetcher,
            options,
            cache,
            state: Mutex::new(PagerState {
                pages_search: search.clone(),
                search,
                ..PagerState::default()
            }),
            fetching: AtomicBool::new(false),
        }
    }

    /// Loads the first page for the current search, or the page after the
    /// last loaded one.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after retries are exhausted. Every error but
    /// [`TickerError::Aborted`] is also kept in [`error`](Self::error).
    pub async fn fetch_next_page(&self, cancel: &CancelToken) -> Result<FetchOutcome, TickerError> {
        if self.fetching.swap(true, Ordering::AcqRel) {
            return Ok(FetchOutcome::InFlight);
        }
        let _guard = FetchingGuard(&self.fetching);

        let (key, generation, refreshes) = {
            let state = self.lock_state();
            let cursor = if state.has_current_pages() {
                match state.pages.last().and_then(|page| page.next_cursor.clone()) {
                    Some(cursor) => Some(cursor),
                    None => return Ok(FetchOutcome::Exhausted),
                }
            } else {
                None
            };
            (
                PageKey {
                    search: state.search.clone(),
                    cursor,
                },
                state.generation,
                state.refreshes,
            )
        };

        let (page, from_cache) = match self.cache.lookup(&key).await {
            Some(page) => (page, true),
            None => match self.fetch_with_retry(&key, cancel).await {
                Ok(page) => {
                    self.cache.store(key.clone(), page.clone()).await;
                    // Checked after the store so a refresh racing either side of it wins.
                    if self.lock_state().refreshes != refreshes {
                        self.cache.forget(&key).await;
                    }
                    (page, false)
                }
                Err(error) => {
                    if !error.is_abort() {
                        let mut state = self.lock_state();
                        if state.generation == generation {
                            state.error = Some(error.clone());
                        }
                    }
                    return Err(error);
                }
            },
        };

        let mut state = self.lock_state();
        if state.generation != generation {
            debug!(search = key.search.as_deref().unwrap_or(""), "discarding page for stale search");
            return Ok(FetchOutcome::Stale);
        }
        if state.showing_previous() {
            state.pages.clear();
            state.pages_search = state.search.clone();
        }

        let added = page.stocks.len();
        state.pages.push(page);
        state.error = None;
        info!(
            search = key.search.as_deref().unwrap_or(""),
            page = state.pages.len(),
            added,
            from_cache,
            "tickers page appended"
        );

        Ok(FetchOutcome::Appended { added, from_cache })
    }

    /// Loads the first page if nothing is loaded for the current search.
    /// Failures are logged and swallowed so callers can render regardless.
    pub async fn prime(&self, cancel: &CancelToken) {
        if self.lock_state().has_current_pages() {
            return;
        }
        if let Err(error) = self.fetch_next_page(cancel).await {
            if !error.is_abort() {
                warn!(error = %error, "priming first tickers page failed");
            }
        }
    }

    /// Switches to a new search. Previous results stay visible until the
    /// first page of the new search arrives. Returns `false` when the
    /// normalized search did not change.
    pub fn set_search(&self, search: Option<&str>) -> bool {
        let search = normalize_search(search);
        let mut state = self.lock_state();
        if state.search == search {
            return false;
        }
        state.search = search;
        state.generation += 1;
        state.error = None;
        true
    }

    /// Forgets cached and loaded pages for the current search.
    pub async fn refresh(&self) {
        let search = {
            let mut state = self.lock_state();
            state.generation += 1;
            state.refreshes += 1;
            state.pages.clear();
            state.pages_search = state.search.clone();
            state.error = None;
            state.search.clone()
        };
        self.cache.forget_search(search.as_deref()).await;
    }

    pub fn search(&self) -> Option<String> {
        self.lock_state().search.clone()
    }

    /// True until at least one page of the current search has loaded, or
    /// while the last loaded page has a cursor.
    pub fn has_next_page(&self) -> bool {
        let state = self.lock_state();
        if !state.has_current_pages() {
            return true;
        }
        state
            .pages
            .last()
            .map(ListTickersResponse::has_next_page)
            .unwrap_or(false)
    }

    pub fn is_fetching_next_page(&self) -> bool {
        self.fetching.load(Ordering::Acquire)
    }

    /// Whether the visible pages belong to the previous search.
    pub fn is_showing_previous(&self) -> bool {
        let state = self.lock_state();
        state.showing_previous() && !state.pages.is_empty()
    }

    pub fn error(&self) -> Option<TickerError> {
        self.lock_state().error.clone()
    }

    /// All visible stocks, pages concatenated in request order.
    pub fn stocks(&self) -> Vec<StockItem> {
        self.lock_state()
            .pages
            .iter()
            .flat_map(|page| page.stocks.iter().cloned())
            .collect()
    }

    pub fn pages(&self) -> Vec<ListTickersResponse> {
        self.lock_state().pages.clone()
    }

    pub fn page_count(&self) -> usize {
        self.lock_state().pages.len()
    }

    pub fn loaded_count(&self) -> usize {
        self.lock_state()
            .pages
            .iter()
            .map(|page| page.stocks.len())
            .sum()
    }

    async fn fetch_with_retry(
        &self,
        key: &PageKey,
        cancel: &CancelToken,
    ) -> Result<ListTickersResponse, TickerError> {
        let params = ListTickersParams {
            search: key.search.clone(),
            cursor: key.cursor.clone(),
            limit: Some(self.options.page_size),
        };

        let mut failure_count = 0;
        loop {
            self.options.throttle.acquire(cancel).await?;

            match self.fetcher.fetch_page(&params, cancel).await {
                Ok(page) => return Ok(page),
                Err(error) if self.options.retry.should_retry(&error, failure_count) => {
                    let delay = self.options.retry.delay_for_attempt(failure_count);
                    failure_count += 1;
                    warn!(
                        error = %error,
                        attempt = failure_count,
                        delay_ms = delay.as_millis() as u64,
                        "tickers page fetch failed; retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(TickerError::Aborted),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PagerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
