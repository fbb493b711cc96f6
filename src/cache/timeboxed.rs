// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Time-boxed cache of a remote resource with stale fallback

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn, Instrument};

use super::{CacheStats, ResourceFetcher};
use crate::config::constants::DEFAULT_DATASET_TTL;
use crate::errors::{CacheError, FetchError};
use crate::spans;
use crate::store::{self, KeyValueStore};
use crate::types::cache::{Clock, SystemClock, TimestampMillis};

/// A cached resource together with the time it was written
///
/// Data and timestamp are persisted as a single JSON value, so an entry is
/// never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// When this entry was written
    pub timestamp: TimestampMillis,
}

impl<T> CacheEntry<T> {
    /// Creates an entry stamped at `timestamp`
    pub fn new(data: T, timestamp: TimestampMillis) -> Self {
        Self { data, timestamp }
    }

    /// An entry is fresh while its age is at most `ttl`
    pub fn is_expired(&self, now: TimestampMillis, ttl: Duration) -> bool {
        self.timestamp.age_at(now) > ttl
    }
}

/// Time-boxed cache for a remote resource
///
/// Serves the resource from the store while it is fresh, refetches it when it
/// has expired, and prefers stale data over failure when the refetch fails:
///
/// 1. A fresh entry (`age <= ttl`) is returned without touching the network.
/// 2. Otherwise the fetcher runs once. Success is persisted with the current
///    time and returned.
/// 3. If the fetch fails, any stored entry is returned regardless of age.
/// 4. Only when there is nothing stored at all does
///    [`CacheError::DataUnavailable`] reach the caller.
///
/// Storage failures never escape: they are logged and treated as a miss.
///
/// # Examples
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use std::time::Duration;
/// use terravue::{HttpDatasetSource, MemoryStore, TimeBoxedCache};
///
/// let cache = TimeBoxedCache::new("apiData", Arc::new(MemoryStore::new()), Box::new(source))
///     .with_ttl(Duration::from_secs(3600));
///
/// let dataset = cache.load().await?;
/// ```
pub struct TimeBoxedCache<T> {
    key: String,
    ttl: Duration,
    store: Arc<dyn KeyValueStore>,
    fetcher: Box<dyn ResourceFetcher<T>>,
    clock: Arc<dyn Clock>,
    stats: Mutex<CacheStats>,
    _resource: PhantomData<fn() -> T>,
}

impl<T> TimeBoxedCache<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    /// Creates a cache for the resource stored under `key`
    ///
    /// Uses the default TTL of 24 hours and the system clock.
    pub fn new(
        key: impl Into<String>,
        store: Arc<dyn KeyValueStore>,
        fetcher: Box<dyn ResourceFetcher<T>>,
    ) -> Self {
        Self {
            key: key.into(),
            ttl: DEFAULT_DATASET_TTL,
            store,
            fetcher,
            clock: Arc::new(SystemClock),
            stats: Mutex::new(CacheStats::default()),
            _resource: PhantomData,
        }
    }

    /// Sets how long an entry is served without refetching
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Replaces the clock used for stamping and expiry decisions
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Storage key of the resource
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns current cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.stats.lock().await.clone()
    }

    /// Returns the resource, fresh from storage or refetched
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::DataUnavailable`] only when the live fetch failed
    /// and no entry of any age exists.
    pub async fn load(&self) -> Result<T, CacheError> {
        async move {
            let now = self.clock.now();

            match self.read_entry().await {
                Some(entry) if !entry.is_expired(now, self.ttl) => {
                    self.stats.lock().await.hits += 1;
                    debug!(written = %entry.timestamp, "Cache hit");
                    return Ok(entry.data);
                }
                Some(entry) => {
                    self.stats.lock().await.expirations += 1;
                    debug!(
                        age_secs = entry.timestamp.age_at(now).as_secs(),
                        ttl_secs = self.ttl.as_secs(),
                        "Cache entry expired"
                    );
                }
                None => {
                    self.stats.lock().await.misses += 1;
                    debug!("Cache miss");
                }
            }

            match self.fetch_and_store().await {
                Ok(data) => Ok(data),
                Err(error) => self.stale_fallback(error).await,
            }
        }
        .instrument(spans::load_resource(&self.key))
        .await
    }

    /// Refetches the resource regardless of freshness
    ///
    /// Overwrites the stored entry on success. Never fails: fetch errors are
    /// logged and reported as `false`.
    pub async fn refresh(&self) -> bool {
        async move {
            match self.fetch_and_store().await {
                Ok(_) => {
                    info!("Resource refreshed");
                    true
                }
                Err(error) => {
                    warn!(error = %error, "Refresh failed, keeping existing entry");
                    false
                }
            }
        }
        .instrument(spans::refresh_resource(&self.key))
        .await
    }

    /// Deletes the stored entry
    ///
    /// Idempotent. A storage failure is logged and otherwise ignored.
    pub async fn invalidate(&self) {
        match self.store.remove(&self.key).await {
            Ok(()) => debug!(key = %self.key, "Cache entry invalidated"),
            Err(e) => warn!(key = %self.key, error = %e, "Failed to invalidate cache entry"),
        }
    }

    /// Reads the stored entry, treating any storage failure as absent
    async fn read_entry(&self) -> Option<CacheEntry<T>> {
        match store::get_typed::<CacheEntry<T>>(self.store.as_ref(), &self.key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    key = %self.key,
                    store = self.store.name(),
                    error = %e,
                    "Failed to read cache entry, treating as miss"
                );
                None
            }
        }
    }

    /// Runs the fetcher and persists the result stamped with the current time
    ///
    /// A failed write is logged; the fresh data is still returned.
    async fn fetch_and_store(&self) -> Result<T, FetchError> {
        self.stats.lock().await.fetches += 1;

        let data = match self.fetcher.fetch().await {
            Ok(data) => data,
            Err(e) => {
                self.stats.lock().await.fetch_failures += 1;
                return Err(e);
            }
        };

        let entry = CacheEntry::new(data, self.clock.now());
        if let Err(e) = store::set_typed(self.store.as_ref(), &self.key, &entry).await {
            warn!(
                key = %self.key,
                store = self.store.name(),
                error = %e,
                "Failed to persist fetched resource"
            );
        } else {
            debug!(
                key = %self.key,
                source = self.fetcher.name(),
                written = %entry.timestamp,
                "Stored fetched resource"
            );
        }

        Ok(entry.data)
    }

    /// Serves any stored entry after a failed fetch
    async fn stale_fallback(&self, error: FetchError) -> Result<T, CacheError> {
        match self.read_entry().await {
            Some(entry) => {
                self.stats.lock().await.stale_hits += 1;
                warn!(
                    error = %error,
                    written = %entry.timestamp,
                    "Fetch failed, serving stale entry"
                );
                Ok(entry.data)
            }
            None => {
                warn!(error = %error, "Fetch failed and no cached entry exists");
                Err(CacheError::data_unavailable(&self.key, error))
            }
        }
    }
}
