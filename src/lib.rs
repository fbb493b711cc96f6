// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! # terravue
//!
//! Environmental-impact classification of the websites a user visits.
//!
//! Visits are recorded into a [`VisitLog`], visited domains are resolved by the
//! [`DomainClassifier`] and rated against a remote [`ImpactDataset`], and the
//! result is assembled into views by a [`PopupController`], optionally with
//! text from an on-device language model.
//!
//! Two caches sit at the core:
//!
//! - [`TimeBoxedCache`]: serves the dataset from storage for a TTL (24 hours
//!   by default), refetches it when expired, and falls back to stale data
//!   when the network fails.
//! - [`MemoizedGenerator`]: computes each `(entity, attribute)` text once and
//!   keeps it forever; failures return a [`placeholder`] and are retried on
//!   the next call.
//!
//! Both persist through the [`KeyValueStore`] abstraction ([`MemoryStore`] or
//! [`FileStore`]).
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use terravue::{
//!     FileStore, HttpDatasetSource, PopupController, TerravueConfig, UnavailableModel,
//! };
//!
//! let config = TerravueConfig::from_env()?;
//! let store = Arc::new(FileStore::new(&config.store_path).validate()?);
//! let source = HttpDatasetSource::from_config(&config)?;
//!
//! let popup = PopupController::open(&config, store, Box::new(source), Arc::new(UnavailableModel)).await;
//! popup.history().record("https://www.youtube.com/", Some("YouTube")).await?;
//! let view = popup.describe_site("https://www.youtube.com/").await;
//! popup.close().await;
//! ```

pub mod bootstrap;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod errors;
pub mod generation;
pub mod history;
pub mod popup;
pub mod report;
mod spans;
pub mod store;
pub mod types;

pub use cache::{
    placeholder, CacheEntry, CacheStats, MemoMap, MemoizedGenerator, ResourceFetcher,
    TimeBoxedCache,
};
pub use config::{TerravueConfig, TerravueConfigBuilder};
pub use dataset::{
    BundledDatasetSource, CategoryInfo, Classification, HttpDatasetSource, Impact, ImpactDataset,
    UrlEntry,
};
pub use domain::{DomainClassifier, DomainInfo};
pub use errors::{
    CacheError, ConfigError, FetchError, GenerationError, StoreError, TerravueError,
};
pub use generation::{
    Availability, GenerationContext, LanguageModel, ModelSession, SessionConfig, SessionState,
    UnavailableModel,
};
pub use history::{VisitLog, VisitRecord};
pub use popup::{Factor, HistoryView, PopupController, SiteDetails, SiteView};
pub use report::{ImpactCounts, ImpactReport, SiteImpact};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use types::cache::{Clock, SystemClock, TimestampMillis};
