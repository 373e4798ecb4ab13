use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use tracing::debug;

use crate::cancel::CancelToken;
use crate::TickerError;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Client-side request budget applied before each page fetch.
///
/// The free Polygon tier allows only a handful of calls per minute; pacing
/// locally keeps the pager from walking straight into 429s.
#[derive(Clone, Default)]
pub struct RequestThrottle {
    limiter: Option<Arc<DirectRateLimiter>>,
}

impl RequestThrottle {
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// `limit` requests per `window`, bursting up to `limit`. A zero limit
    /// disables throttling.
    pub fn new(window: Duration, limit: u32) -> Self {
        Self {
            limiter: quota_from_window(window, limit).map(|quota| Arc::new(RateLimiter::direct(quota))),
        }
    }

    pub fn per_minute(limit: u32) -> Self {
        Self::new(Duration::from_secs(60), limit)
    }

    pub fn is_limited(&self) -> bool {
        self.limiter.is_some()
    }

    /// Takes one unit of budget without waiting.
    pub fn try_acquire(&self) -> bool {
        self.limiter
            .as_ref()
            .map(|limiter| limiter.check().is_ok())
            .unwrap_or(true)
    }

    /// Waits for budget; cancellation wins over the wait.
    pub async fn acquire(&self, cancel: &CancelToken) -> Result<(), TickerError> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };
        if limiter.check().is_ok() {
            return Ok(());
        }

        debug!("request budget exhausted; waiting for throttle");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TickerError::Aborted),
            _ = limiter.until_ready() => Ok(()),
        }
    }
}

fn quota_from_window(window: Duration, limit: u32) -> Option<Quota> {
    let burst = NonZeroU32::new(limit)?;
    let seconds_per_cell = (window.as_secs_f64() / f64::from(limit)).max(0.001);
    Quota::with_period(Duration::from_secs_f64(seconds_per_cell)).map(|quota| quota.allow_burst(burst))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_means_unlimited() {
        let throttle = RequestThrottle::per_minute(0);
        assert!(!throttle.is_limited());
        for _ in 0..100 {
            assert!(throttle.try_acquire());
        }
    }

    #[test]
    fn burst_is_capped_at_limit() {
        let throttle = RequestThrottle::per_minute(2);
        assert!(throttle.is_limited());
        assert!(throttle.try_acquire());
        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());
    }

    #[tokio::test]
    async fn cancellation_interrupts_wait() {
        let throttle = RequestThrottle::per_minute(1);
        let cancel = CancelToken::new();
        throttle.acquire(&cancel).await.expect("first call is free");

        cancel.cancel();
        let result = throttle.acquire(&cancel).await;
        assert_eq!(result, Err(TickerError::Aborted));
    }
}
