// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Well-known storage keys, endpoints and defaults
//!
//! This module centralizes magic constants used throughout the terravue crate.

use std::time::Duration;

/// Keys under which each component persists its state
pub mod storage_keys {
    /// Cached impact dataset: `{ data: { urlData, categoryData }, timestamp }`
    pub const API_DATA: &str = "apiData";

    /// Memoized generated text: `{ entity: { attribute: text } }`
    pub const RESPONSE_DATA: &str = "responseData";

    /// Recorded visits: `[VisitRecord, ...]`
    pub const WEEK_DATA: &str = "weekData";
}

/// Default URL of the URL-to-category mapping
pub const DEFAULT_LINKS_URL: &str =
    "https://raw.githubusercontent.com/TerraVueDev/assets/refs/heads/main/links.json";

/// Default URL of the category-to-impact mapping
pub const DEFAULT_CATEGORIES_URL: &str =
    "https://raw.githubusercontent.com/TerraVueDev/assets/refs/heads/main/categories.json";

/// File name of the bundled URL-to-category mapping
pub const BUNDLED_LINKS_FILE: &str = "links.json";

/// File name of the bundled category-to-impact mapping
pub const BUNDLED_CATEGORIES_FILE: &str = "categories.json";

/// How long a fetched dataset is served without refetching (24 hours)
pub const DEFAULT_DATASET_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on a single document fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// How long visit records are kept (two weeks)
pub const DEFAULT_HISTORY_RETENTION: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Default location of the file store
pub const DEFAULT_STORE_PATH: &str = ".terravue/store.json";

/// Title recorded for a tab that has not finished loading
pub const LOADING_TITLE: &str = "Loading...";

/// Domain recorded when a URL has no parseable host
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// URL prefixes of browser-internal pages that are never recorded
pub const INTERNAL_URL_PREFIXES: &[&str] = &["chrome://", "chrome-extension://"];

/// URL schemes of pages with no network footprint
pub const LOCAL_SCHEMES: &[&str] = &["chrome", "file"];
