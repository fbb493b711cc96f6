// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for key-value store backends.

/// Errors that can occur while reading from or writing to a
/// [`KeyValueStore`](crate::store::KeyValueStore).
///
/// Callers inside this crate treat every variant as a cache miss; durability
/// is best-effort.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem error on a disk-backed store.
    #[error("Store I/O error at {path}: {details}")]
    Io {
        /// Path of the store file
        path: String,
        /// Details about the I/O error
        details: String,
        /// The underlying I/O error, if available
        #[source]
        source: Option<std::io::Error>,
    },

    /// An advisory lock on the store file could not be acquired.
    #[error("Failed to lock store file {path}: {source}")]
    Lock {
        /// Path of the store file
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A stored value could not be serialized or deserialized.
    #[error("Serialization error: {details}")]
    Serialization {
        /// Details about the serialization error
        details: String,
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Create an `Io` error from a path and an optional I/O error.
    pub fn io_error(
        path: impl Into<String>,
        details: impl Into<String>,
        source: Option<std::io::Error>,
    ) -> Self {
        StoreError::Io {
            path: path.into(),
            details: details.into(),
            source,
        }
    }

    /// Create a `Lock` error.
    pub fn lock_error(path: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Lock {
            path: path.into(),
            source,
        }
    }

    /// Create a `Serialization` error.
    pub fn serialization_error(details: impl Into<String>, source: serde_json::Error) -> Self {
        StoreError::Serialization {
            details: details.into(),
            source,
        }
    }
}
