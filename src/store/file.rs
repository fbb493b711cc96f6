// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Disk-backed key-value store with file locking and versioning

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::KeyValueStore;
use crate::errors::StoreError;

/// Current store format version
const STORE_VERSION: u32 = 1;

/// Serialized store format (versioned)
#[derive(Debug, Serialize, Deserialize)]
struct StoreData {
    /// Store format version
    version: u32,
    /// Stored values by key
    entries: BTreeMap<String, Value>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Disk-backed key-value store
///
/// All keys live in a single JSON document with:
/// - File locking for multi-process safety (advisory locks)
/// - Store format versioning; a file with a different version is ignored
/// - Atomic writes through a temp file and rename
///
/// # Examples
///
/// ```rust,ignore
/// use terravue::store::FileStore;
///
/// let store = FileStore::new("state/store.json").validate()?;
/// ```
///
/// # File Locking
///
/// Readers take a shared lock and writers an exclusive one. Writes within one
/// process are additionally serialized by an async mutex so a read-modify-write
/// of the document never interleaves with another.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store at the specified path
    ///
    /// Path validation is NOT performed until the first I/O operation. Use
    /// [`validate()`](Self::validate) to check the path immediately.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validates the store path and creates the parent directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or is not writable.
    pub fn validate(self) -> Result<Self, StoreError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !parent.exists() {
            std::fs::create_dir_all(&parent).map_err(|e| {
                StoreError::io_error(
                    parent.display().to_string(),
                    "Failed to create store directory",
                    Some(e),
                )
            })?;
            debug!(path = %parent.display(), "Created store directory");
        }

        // Validate parent is writable by attempting to create a temp file
        let test_file = parent.join(".store_write_test");
        std::fs::write(&test_file, b"test").map_err(|e| {
            StoreError::io_error(
                parent.display().to_string(),
                "Store directory is not writable",
                Some(e),
            )
        })?;
        let _ = std::fs::remove_file(&test_file);

        debug!(path = %self.path.display(), "Store path validated successfully");
        Ok(self)
    }

    fn io_error(&self, details: impl Into<String>, source: std::io::Error) -> StoreError {
        StoreError::io_error(self.path.display().to_string(), details, Some(source))
    }

    /// Loads the store document from disk with a shared lock
    fn load(&self) -> Result<StoreData, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "Store file does not exist, using empty store");
            return Ok(StoreData::default());
        }

        let file = File::open(&self.path)
            .map_err(|e| self.io_error("Failed to open store file", e))?;

        file.lock_shared()
            .map_err(|e| StoreError::lock_error(self.path.display().to_string(), e))?;

        let data: StoreData = serde_json::from_reader(&file).map_err(|e| {
            if e.is_io() {
                self.io_error("Failed to read store file", e.into())
            } else {
                StoreError::serialization_error(
                    format!("Failed to parse store file '{}'", self.path.display()),
                    e,
                )
            }
        })?;

        // Unlock by dropping the file
        drop(file);

        if data.version != STORE_VERSION {
            warn!(
                path = %self.path.display(),
                stored_version = data.version,
                current_version = STORE_VERSION,
                "Store version mismatch, ignoring stored data"
            );
            return Ok(StoreData::default());
        }

        Ok(data)
    }

    /// Loads the document for a write, starting fresh only if the file is corrupt
    fn load_for_write(&self) -> Result<StoreData, StoreError> {
        discard_if_corrupt(&self.path, self.load())
    }

    /// Saves the store document with an exclusive lock and atomic rename
    async fn save(&self, data: &StoreData) -> Result<(), StoreError> {
        // Serialize to JSON first (before acquiring lock)
        let json = serde_json::to_vec_pretty(data).map_err(|e| {
            StoreError::serialization_error("Failed to serialize store document", e)
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error("Failed to create store directory", e))?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| self.io_error("Failed to write temp store file", e))?;

        let file = File::open(&temp_path)
            .map_err(|e| self.io_error("Failed to open temp store file", e))?;
        file.lock()
            .map_err(|e| StoreError::lock_error(self.path.display().to_string(), e))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_error("Failed to rename temp store file", e))?;

        // Unlock by dropping the file
        drop(file);

        debug!(
            path = %self.path.display(),
            keys = data.entries.len(),
            "Saved store document"
        );
        Ok(())
    }
}

/// Replaces an unparseable document with an empty one
///
/// I/O and lock failures are returned so a write never clobbers keys it could
/// not read.
fn discard_if_corrupt(
    path: &Path,
    loaded: Result<StoreData, StoreError>,
) -> Result<StoreData, StoreError> {
    match loaded {
        Err(e @ StoreError::Serialization { .. }) => {
            warn!(path = %path.display(), error = %e, "Discarding unreadable store file");
            Ok(StoreData::default())
        }
        other => other,
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let data = self.load()?;
        Ok(data.entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load_for_write()?;
        debug!(key, "Writing value to file store");
        data.entries.insert(key.to_string(), value);
        self.save(&data).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load_for_write()?;
        if data.entries.remove(key).is_none() {
            return Ok(());
        }
        self.save(&data).await
    }

    fn name(&self) -> &'static str {
        "FileStore"
    }
}
