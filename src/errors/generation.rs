// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for on-device text generation.

/// Errors from the language model capability.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// No language model is available on this device.
    ///
    /// This is a normal condition, not a fault: the popup renders a
    /// "not available" state instead of generated text.
    #[error("Language model is not available")]
    CapabilityUnavailable,

    /// A model session could not be created.
    #[error("Failed to create model session: {details}")]
    SessionCreation {
        /// Details reported by the model
        details: String,
    },

    /// A prompt failed inside an active session.
    #[error("Prompt failed: {details}")]
    Prompt {
        /// Details reported by the model
        details: String,
    },
}

impl GenerationError {
    /// Create a `SessionCreation` error.
    pub fn session_creation(details: impl Into<String>) -> Self {
        GenerationError::SessionCreation {
            details: details.into(),
        }
    }

    /// Create a `Prompt` error.
    pub fn prompt(details: impl Into<String>) -> Self {
        GenerationError::Prompt {
            details: details.into(),
        }
    }
}
