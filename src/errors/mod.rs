// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the terravue library.
//!
//! This module provides strongly-typed errors for all public APIs in terravue.
//! It follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained error handling (`FetchError`,
//!   `StoreError`, etc.)
//! - **Unified error type** (`TerravueError`) for convenience when you don't need
//!   to distinguish between error sources
//!
//! # Architecture
//!
//! - [`FetchError`] - Network, status, parse and timeout failures while fetching
//!   the remote dataset
//! - [`StoreError`] - Read/write failures of a [`KeyValueStore`](crate::store::KeyValueStore)
//! - [`GenerationError`] - Language model capability and session failures
//! - [`CacheError`] - The only error a cache surfaces to its caller
//! - [`ConfigError`] - Invalid configuration values
//!
//! Storage failures are never propagated out of the caches: they are logged and
//! treated as a miss. Only [`CacheError::DataUnavailable`] reaches the popup layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use terravue::{CacheError, TimeBoxedCache};
//!
//! match cache.load().await {
//!     Ok(dataset) => render(dataset),
//!     Err(CacheError::DataUnavailable { key, source }) => {
//!         eprintln!("nothing cached under {key} and the fetch failed: {source}");
//!     }
//! }
//! ```

mod cache;
mod config;
mod fetch;
mod generation;
mod store;

pub use cache::CacheError;
pub use config::ConfigError;
pub use fetch::FetchError;
pub use generation::GenerationError;
pub use store::StoreError;

/// Unified error type for all terravue operations.
///
/// All module-specific error types automatically convert to `TerravueError` via
/// `From` implementations, so you can use `?` to propagate errors naturally.
#[derive(Debug, thiserror::Error)]
pub enum TerravueError {
    /// Error fetching the remote dataset.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error reading or writing durable storage.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Error from the text generation capability.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Error surfaced by a cache.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
