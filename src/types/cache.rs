// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for cache metadata
//!
//! - [`TimestampMillis`]: Unix timestamp in milliseconds stamped on every cache write
//! - [`Clock`]: Source of the current time, injectable for tests

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Unix timestamp in milliseconds
///
/// Serialized as a bare integer so the persisted `timestamp` field stays a plain
/// JSON number.
///
/// # Examples
///
/// ```
/// use terravue::TimestampMillis;
/// use std::time::Duration;
///
/// let written = TimestampMillis::from_millis(1_000);
/// let now = TimestampMillis::from_millis(61_000);
/// assert_eq!(written.age_at(now), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampMillis(u64);

impl TimestampMillis {
    /// Creates a new timestamp representing the current wall-clock time
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        Self(u64::try_from(millis).unwrap_or(u64::MAX))
    }

    /// Creates a timestamp from a raw millisecond value
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Returns the raw millisecond value
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Age of this timestamp as observed at `now`
    ///
    /// Timestamps in the future have zero age.
    pub fn age_at(&self, now: TimestampMillis) -> Duration {
        Duration::from_millis(now.0.saturating_sub(self.0))
    }

    /// Returns a timestamp `duration` earlier, saturating at the epoch
    pub fn saturating_sub(&self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_sub(millis))
    }

    /// Returns a timestamp `duration` later, saturating at `u64::MAX`
    pub fn saturating_add(&self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }
}

impl fmt::Display for TimestampMillis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Source of the current time for TTL decisions
///
/// Caches read the time through this trait so expiry can be tested without
/// sleeping.
pub trait Clock: Send + Sync {
    /// Returns the current time
    fn now(&self) -> TimestampMillis;
}

/// [`Clock`] backed by the system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimestampMillis {
        TimestampMillis::now()
    }
}
