// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Error types surfaced by the caches.

use super::FetchError;

/// Errors a [`TimeBoxedCache`](crate::cache::TimeBoxedCache) surfaces to its caller.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Neither fresh nor stale data could be served.
    ///
    /// The live fetch failed and no entry, however old, exists under `key`.
    #[error("No data available for '{key}': {source}")]
    DataUnavailable {
        /// Storage key of the resource
        key: String,
        /// The fetch failure that triggered the fallback
        #[source]
        source: FetchError,
    },
}

impl CacheError {
    /// Create a `DataUnavailable` error.
    pub fn data_unavailable(key: impl Into<String>, source: FetchError) -> Self {
        CacheError::DataUnavailable {
            key: key.into(),
            source,
        }
    }
}
