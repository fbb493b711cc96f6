// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for terravue
//!
//! Controls where the impact dataset comes from, how long it is trusted, how
//! long visits are kept and where state is persisted.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use terravue::TerravueConfig;
//!
//! let config = TerravueConfig::default();
//! assert_eq!(config.dataset_ttl.as_secs(), 24 * 60 * 60);
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use terravue::TerravueConfigBuilder;
//! use std::time::Duration;
//!
//! let config = TerravueConfigBuilder::with_defaults()
//!     .dataset_ttl(Duration::from_secs(3600))
//!     .fetch_timeout(Duration::from_secs(5))
//!     .build();
//! assert_eq!(config.fetch_timeout, Duration::from_secs(5));
//! ```
//!
//! # Example: Environment
//!
//! [`TerravueConfig::from_env`] reads `TERRAVUE_*` variables (a `.env` file is
//! honored) and falls back to the defaults for anything unset.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::errors::ConfigError;

pub mod constants;

use constants::{
    DEFAULT_CATEGORIES_URL, DEFAULT_DATASET_TTL, DEFAULT_FETCH_TIMEOUT,
    DEFAULT_HISTORY_RETENTION, DEFAULT_LINKS_URL, DEFAULT_STORE_PATH,
};

/// Environment variable names read by [`TerravueConfig::from_env`]
pub mod env_vars {
    /// Dataset TTL in seconds
    pub const DATASET_TTL_SECS: &str = "TERRAVUE_DATASET_TTL_SECS";
    /// Per-document fetch timeout in seconds
    pub const FETCH_TIMEOUT_SECS: &str = "TERRAVUE_FETCH_TIMEOUT_SECS";
    /// Visit retention in days
    pub const HISTORY_RETENTION_DAYS: &str = "TERRAVUE_HISTORY_RETENTION_DAYS";
    /// URL-to-category document
    pub const LINKS_URL: &str = "TERRAVUE_LINKS_URL";
    /// Category-to-impact document
    pub const CATEGORIES_URL: &str = "TERRAVUE_CATEGORIES_URL";
    /// File store location
    pub const STORE_PATH: &str = "TERRAVUE_STORE_PATH";
    /// Directory holding bundled `links.json` and `categories.json`
    pub const DATASET_DIR: &str = "TERRAVUE_DATASET_DIR";
    /// Instructions given to every language model session
    pub const SYSTEM_PROMPT: &str = "TERRAVUE_SYSTEM_PROMPT";
}

/// Configuration for terravue
///
/// Use [`TerravueConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerravueConfig {
    /// How long a fetched dataset is served without refetching
    /// Default: 24 hours
    pub dataset_ttl: Duration,

    /// Timeout applied to each dataset document fetch
    /// Default: 30 seconds
    pub fetch_timeout: Duration,

    /// How long recorded visits are kept
    /// Default: 14 days
    pub history_retention: Duration,

    /// URL of the URL-to-category mapping
    pub links_url: String,

    /// URL of the category-to-impact mapping
    pub categories_url: String,

    /// Location of the file store
    pub store_path: PathBuf,

    /// Directory of bundled dataset files; when set, the dataset is read from
    /// disk instead of the network
    pub dataset_dir: Option<PathBuf>,

    /// Instructions given to every language model session
    pub system_prompt: Option<String>,
}

impl Default for TerravueConfig {
    fn default() -> Self {
        Self {
            dataset_ttl: DEFAULT_DATASET_TTL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            history_retention: DEFAULT_HISTORY_RETENTION,
            links_url: DEFAULT_LINKS_URL.to_string(),
            categories_url: DEFAULT_CATEGORIES_URL.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            dataset_dir: None,
            system_prompt: None,
        }
    }
}

impl TerravueConfig {
    /// Builds a configuration from `TERRAVUE_*` environment variables
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but cannot be
    /// parsed, or if a URL is not absolute.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = TerravueConfigBuilder::with_defaults();

        if let Some(raw) = lookup(env_vars::DATASET_TTL_SECS) {
            builder = builder.dataset_ttl(parse_secs(env_vars::DATASET_TTL_SECS, &raw)?);
        }
        if let Some(raw) = lookup(env_vars::FETCH_TIMEOUT_SECS) {
            let timeout = parse_secs(env_vars::FETCH_TIMEOUT_SECS, &raw)?;
            if timeout.is_zero() {
                return Err(ConfigError::invalid_value(
                    env_vars::FETCH_TIMEOUT_SECS,
                    raw,
                    "timeout must be greater than zero",
                ));
            }
            builder = builder.fetch_timeout(timeout);
        }
        if let Some(raw) = lookup(env_vars::HISTORY_RETENTION_DAYS) {
            let days = parse_u64(env_vars::HISTORY_RETENTION_DAYS, &raw)?;
            let secs = days.checked_mul(24 * 60 * 60).ok_or_else(|| {
                ConfigError::invalid_value(
                    env_vars::HISTORY_RETENTION_DAYS,
                    raw.as_str(),
                    "retention too large",
                )
            })?;
            builder = builder.history_retention(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(env_vars::LINKS_URL) {
            builder = builder.links_url(parse_url(env_vars::LINKS_URL, &raw)?);
        }
        if let Some(raw) = lookup(env_vars::CATEGORIES_URL) {
            builder = builder.categories_url(parse_url(env_vars::CATEGORIES_URL, &raw)?);
        }
        if let Some(raw) = lookup(env_vars::STORE_PATH) {
            builder = builder.store_path(raw);
        }
        if let Some(raw) = lookup(env_vars::DATASET_DIR) {
            builder = builder.dataset_dir(raw);
        }
        if let Some(raw) = lookup(env_vars::SYSTEM_PROMPT).filter(|p| !p.trim().is_empty()) {
            builder = builder.system_prompt(raw);
        }

        Ok(builder.build())
    }
}

fn parse_u64(name: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::invalid_value(name, raw, e.to_string()))
}

fn parse_secs(name: &str, raw: &str) -> Result<Duration, ConfigError> {
    parse_u64(name, raw).map(Duration::from_secs)
}

fn parse_url(name: &str, raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::invalid_value(name, raw, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        other => Err(ConfigError::invalid_value(
            name,
            raw,
            format!("unsupported scheme '{other}'"),
        )),
    }
}

/// Builder for [`TerravueConfig`]
///
/// # Example
///
/// ```rust
/// use terravue::TerravueConfigBuilder;
///
/// let config = TerravueConfigBuilder::with_defaults()
///     .store_path("/tmp/terravue.json")
///     .build();
/// assert_eq!(config.store_path.to_str(), Some("/tmp/terravue.json"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TerravueConfigBuilder {
    config: TerravueConfig,
}

impl TerravueConfigBuilder {
    /// Start from the default configuration
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Set the dataset TTL
    pub fn dataset_ttl(mut self, ttl: Duration) -> Self {
        self.config.dataset_ttl = ttl;
        self
    }

    /// Set the per-document fetch timeout
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout = timeout;
        self
    }

    /// Set how long visits are kept
    pub fn history_retention(mut self, retention: Duration) -> Self {
        self.config.history_retention = retention;
        self
    }

    /// Set the URL-to-category document URL
    pub fn links_url(mut self, url: impl Into<String>) -> Self {
        self.config.links_url = url.into();
        self
    }

    /// Set the category-to-impact document URL
    pub fn categories_url(mut self, url: impl Into<String>) -> Self {
        self.config.categories_url = url.into();
        self
    }

    /// Set the file store location
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store_path = path.into();
        self
    }

    /// Read the dataset from bundled files in `dir` instead of the network
    pub fn dataset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dataset_dir = Some(dir.into());
        self
    }

    /// Set the language model system prompt
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> TerravueConfig {
        self.config
    }
}
