use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Result;

/// Default time-to-live for cached extractions.
pub const DEFAULT_TTL_SECONDS: i64 = 60;

struct CacheEntry<T> {
    value: Arc<T>,
    refreshed_at: DateTime<Utc>,
}

/// Process-wide extraction cache keyed by data-source identity.
///
/// Each entry owns its value and refresh timestamp; the TTL is fixed for the
/// cache. Within the TTL window every reader observes the same shared value.
/// Entries are replaced wholesale on refresh, so overlapping refreshes are
/// harmless: both recompute and the last writer wins.
pub struct TtlCache<T> {
    ttl: Duration,
    entries: Mutex<HashMap<PathBuf, CacheEntry<T>>>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` while it is younger than the TTL,
    /// otherwise runs `refresh` and stores its result. A failed refresh
    /// leaves the cache untouched and surfaces the error.
    pub fn get_or_refresh<F>(&self, key: &Path, refresh: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let now = Utc::now();
        {
            let entries = self.lock();
            if let Some(entry) = entries.get(key) {
                if now.signed_duration_since(entry.refreshed_at) < self.ttl {
                    debug!("Cache hit for {}", key.display());
                    return Ok(Arc::clone(&entry.value));
                }
            }
        }

        // The lock is not held across the refresh; a slow load must not
        // block readers of other keys.
        debug!("Refreshing cache entry for {}", key.display());
        let value = Arc::new(refresh()?);

        let mut entries = self.lock();
        entries.insert(
            key.to_path_buf(),
            CacheEntry {
                value: Arc::clone(&value),
                refreshed_at: Utc::now(),
            },
        );
        Ok(value)
    }

    /// When the entry for `key` was last refreshed, if it is present.
    pub fn refreshed_at(&self, key: &Path) -> Option<DateTime<Utc>> {
        self.lock().get(key).map(|entry| entry.refreshed_at)
    }

    /// Drops the entry for `key`, forcing the next read to re-extract.
    pub fn invalidate(&self, key: &Path) {
        self.lock().remove(key);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, CacheEntry<T>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECONDS))
    }
}
