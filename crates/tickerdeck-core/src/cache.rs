//! In-memory page cache owned by the pager.
//!
//! Pages are keyed by the search they were loaded for and the cursor that
//! produced them, so revisiting a search within the TTL replays its pages
//! without touching the network.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Trimmed search text plus the cursor that produced the page (`None` for
/// the first page).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub search: Option<String>,
    pub cursor: Option<String>,
}

impl PageKey {
    pub fn new(search: Option<&str>, cursor: Option<&str>) -> Self {
        Self {
            search: search.map(str::to_owned),
            cursor: cursor.map(str::to_owned),
        }
    }

    pub fn is_first_page(&self) -> bool {
        self.cursor.is_none()
    }
}

#[derive(Debug)]
struct Slot<V> {
    page: V,
    loaded_at: Instant,
}

/// Shared TTL cache of loaded pages. A zero TTL turns it off.
#[derive(Debug, Clone)]
pub struct PageCache<V> {
    slots: Arc<RwLock<HashMap<PageKey, Slot<V>>>>,
    ttl: Duration,
}

impl<V: Clone> PageCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Cached page for `key`, if one was stored less than a TTL ago.
    pub async fn lookup(&self, key: &PageKey) -> Option<V> {
        let slots = self.slots.read().await;
        let slot = slots.get(key)?;
        (slot.loaded_at.elapsed() < self.ttl).then(|| slot.page.clone())
    }

    /// Stores `page`, evicting stale pages first. Does nothing when disabled.
    pub async fn store(&self, key: PageKey, page: V) {
        if !self.is_enabled() {
            return;
        }
        let ttl = self.ttl;
        let mut slots = self.slots.write().await;
        slots.retain(|_, slot| slot.loaded_at.elapsed() < ttl);
        slots.insert(
            key,
            Slot {
                page,
                loaded_at: Instant::now(),
            },
        );
    }

    pub async fn forget(&self, key: &PageKey) {
        self.slots.write().await.remove(key);
    }

    /// Forgets every page loaded for `search`.
    pub async fn forget_search(&self, search: Option<&str>) {
        let mut slots = self.slots.write().await;
        slots.retain(|key, _| key.search.as_deref() != search);
    }

    /// Stored page count, stale pages included until the next store.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}
