// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Durable key-value storage backends
//!
//! Every cache in terravue persists through the [`KeyValueStore`] trait, which
//! maps string keys to JSON values:
//!
//! - [`FileStore`]: Persistent single-file JSON store with file locking (default)
//! - [`MemoryStore`]: In-memory store that lives as long as the process
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use terravue::store::{FileStore, KeyValueStore, MemoryStore};
//!
//! // Disk store, parent directory created and checked up front
//! let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new("state/store.json").validate()?);
//!
//! // Memory store (no persistence)
//! let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::StoreError;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Trait for durable key-value store backends
///
/// Values are whole JSON documents: a `set` replaces the previous value for a
/// key in one step, so readers never observe a partially written value.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and support concurrent access. Use interior
/// mutability (e.g., `Mutex`, `RwLock`) as needed.
///
/// # Error Handling
///
/// Every operation returns a `Result`; callers decide whether to propagate or
/// swallow. The caches in this crate log failures and treat them as misses.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieves the value stored under `key`, or `None` if absent
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Removes the value stored under `key`
    ///
    /// Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Returns a human-readable name for this store backend
    ///
    /// Used for logging and debugging.
    fn name(&self) -> &'static str;
}

/// Reads `key` and deserializes it into `T`
pub(crate) async fn get_typed<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
            StoreError::serialization_error(format!("Malformed value under '{key}'"), e)
        }),
        None => Ok(None),
    }
}

/// Serializes `value` and stores it under `key`
pub(crate) async fn set_typed<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(value).map_err(|e| {
        StoreError::serialization_error(format!("Failed to serialize value for '{key}'"), e)
    })?;
    store.set(key, value).await
}
