// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for configuration loading.

/// Errors that can occur while building a [`TerravueConfig`](crate::TerravueConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed or is out of range.
    #[error("Invalid value for {name}: '{value}' ({reason})")]
    InvalidValue {
        /// Name of the setting or environment variable
        name: String,
        /// The offending raw value
        value: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Create an `InvalidValue` error.
    pub fn invalid_value(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidValue {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
