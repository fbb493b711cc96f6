// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Visit recording and retention.
//!
//! Every tab opening or navigation becomes a [`VisitRecord`] appended to the
//! `weekData` list. Browser-internal pages are skipped, and records older than
//! the retention window are pruned after each write.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn, Instrument};

use crate::config::constants::{
    storage_keys, DEFAULT_HISTORY_RETENTION, INTERNAL_URL_PREFIXES, LOADING_TITLE,
    UNKNOWN_DOMAIN,
};
use crate::errors::StoreError;
use crate::spans;
use crate::store::{self, KeyValueStore};

/// A single recorded visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    /// Full URL of the page
    pub url: String,
    /// Page title at record time
    pub title: String,
    /// When the visit was recorded
    pub timestamp: DateTime<Utc>,
    /// Hostname of the URL, or `"unknown"`
    pub domain: String,
}

impl VisitRecord {
    /// Builds a record, defaulting the title and deriving the domain
    pub fn new(url: &str, title: Option<&str>, timestamp: DateTime<Utc>) -> Self {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(LOADING_TITLE);

        Self {
            url: url.to_string(),
            title: title.to_string(),
            timestamp,
            domain: hostname_of(url),
        }
    }
}

/// Hostname of `url`, or `"unknown"` if it has none
pub fn hostname_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN_DOMAIN.to_string())
}

/// Returns `false` for empty URLs and browser-internal pages
pub fn is_trackable(url: &str) -> bool {
    !url.is_empty()
        && !INTERNAL_URL_PREFIXES
            .iter()
            .any(|prefix| url.starts_with(prefix))
}

/// Persistent list of visits
pub struct VisitLog {
    store: Arc<dyn KeyValueStore>,
    retention: Duration,
}

impl VisitLog {
    /// Creates a log keeping visits for the default two weeks
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            retention: DEFAULT_HISTORY_RETENTION,
        }
    }

    /// Sets how long visits are kept
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Records a visit now
    ///
    /// See [`record_at`](Self::record_at).
    pub async fn record(
        &self,
        url: &str,
        title: Option<&str>,
    ) -> Result<Option<VisitRecord>, StoreError> {
        self.record_at(url, title, Utc::now()).await
    }

    /// Records a visit at `now` and prunes expired records
    ///
    /// Returns `Ok(None)` without touching storage when the URL is not
    /// trackable.
    pub async fn record_at(
        &self,
        url: &str,
        title: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<VisitRecord>, StoreError> {
        if !is_trackable(url) {
            debug!(url, "Skipping internal page");
            return Ok(None);
        }

        let record = VisitRecord::new(url, title, now);
        let span = spans::record_visit(&record.domain);
        async move {
            let mut visits = self.read().await?;
            visits.push(record.clone());
            let pruned = self.retain_recent(&mut visits, now);
            store::set_typed(self.store.as_ref(), storage_keys::WEEK_DATA, &visits).await?;
            debug!(total = visits.len(), pruned, "Recorded visit");
            Ok::<_, StoreError>(Some(record))
        }
        .instrument(span)
        .await
    }

    /// All recorded visits, oldest first
    ///
    /// A storage failure is logged and yields an empty list.
    pub async fn visits(&self) -> Vec<VisitRecord> {
        match self.read().await {
            Ok(visits) => visits,
            Err(e) => {
                warn!(error = %e, "Failed to read visit history");
                Vec::new()
            }
        }
    }

    /// Removes visits older than the retention window measured from `now`
    ///
    /// Returns the number of records removed.
    pub async fn prune_at(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut visits = self.read().await?;
        let pruned = self.retain_recent(&mut visits, now);
        if pruned > 0 {
            store::set_typed(self.store.as_ref(), storage_keys::WEEK_DATA, &visits).await?;
        }
        Ok(pruned)
    }

    fn retain_recent(&self, visits: &mut Vec<VisitRecord>, now: DateTime<Utc>) -> usize {
        let window = TimeDelta::from_std(self.retention).unwrap_or(TimeDelta::MAX);
        let cutoff = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let before = visits.len();
        visits.retain(|visit| visit.timestamp >= cutoff);
        before - visits.len()
    }

    /// Reads the list, accepting the legacy JSON-string encoding
    async fn read(&self) -> Result<Vec<VisitRecord>, StoreError> {
        let value = match self.store.get(storage_keys::WEEK_DATA).await? {
            Some(Value::String(encoded)) => serde_json::from_str(&encoded).map_err(|e| {
                StoreError::serialization_error("Malformed legacy visit history", e)
            })?,
            Some(value) => value,
            None => return Ok(Vec::new()),
        };

        serde_json::from_value(value)
            .map_err(|e| StoreError::serialization_error("Malformed visit history", e))
    }
}
