// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Caching policies layered over a [`KeyValueStore`](crate::store::KeyValueStore)
//!
//! - [`TimeBoxedCache`]: serves a remote resource from storage while it is
//!   fresh, refetches when it expires, and falls back to stale data when the
//!   refetch fails
//! - [`MemoizedGenerator`]: computes a text once per `(entity, attribute)` key
//!   and keeps it forever
//!
//! The two caches are independent: each owns its own storage key and shares
//! only the store abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::FetchError;

mod memo;
mod timeboxed;

pub use memo::{placeholder, MemoMap, MemoizedGenerator};
pub use timeboxed::{CacheEntry, TimeBoxedCache};

/// Source of the live value behind a [`TimeBoxedCache`]
///
/// A fetch either produces the whole resource or fails; implementations must
/// never return a partial value.
#[async_trait]
pub trait ResourceFetcher<T>: Send + Sync {
    /// Fetches the resource
    async fn fetch(&self) -> Result<T, FetchError>;

    /// Returns a human-readable name for this source
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &'static str;
}

/// Statistics about cache behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Loads served from a fresh entry
    pub hits: u64,
    /// Loads that found no entry
    pub misses: u64,
    /// Loads that found an expired entry
    pub expirations: u64,
    /// Live fetch attempts
    pub fetches: u64,
    /// Live fetch attempts that failed
    pub fetch_failures: u64,
    /// Loads served from an expired entry after a failed fetch
    pub stale_hits: u64,
}

impl CacheStats {
    /// Calculates the fresh hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.expirations;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, expirations={}, fetches={}, fetch_failures={}, stale_hits={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.expirations,
            self.fetches,
            self.fetch_failures,
            self.stale_hits,
            self.hit_rate()
        )
    }
}
