// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! On-device text generation
//!
//! The language model itself is a host capability; this module only defines
//! the seam ([`LanguageModel`] / [`ModelSession`]) and the session lifecycle
//! around it ([`GenerationContext`]).
//!
//! # Example: Implementing LanguageModel
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use terravue::generation::{Availability, LanguageModel, ModelSession, SessionConfig};
//! use terravue::GenerationError;
//!
//! struct HostModel;
//!
//! #[async_trait]
//! impl LanguageModel for HostModel {
//!     async fn availability(&self) -> Availability {
//!         Availability::Available
//!     }
//!
//!     async fn create(&self, config: &SessionConfig) -> Result<Box<dyn ModelSession>, GenerationError> {
//!         Ok(Box::new(HostSession::start(config)?))
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

mod context;

pub use context::{GenerationContext, SessionState};

/// Whether the language model capability exists on this host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// The model can be used
    Available,
    /// The model is absent; generation is skipped
    Unavailable,
    /// Not probed yet
    Unknown,
}

impl Availability {
    /// Returns `true` only for [`Availability::Available`]
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Options passed when a session is created
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Instructions that frame every prompt in the session
    pub system_prompt: Option<String>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Top-k sampling
    pub top_k: Option<u32>,
}

/// A language model capability that can open sessions
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Probes whether the model can be used
    async fn availability(&self) -> Availability;

    /// Opens a new session
    async fn create(
        &self,
        config: &SessionConfig,
    ) -> Result<Box<dyn ModelSession>, GenerationError>;
}

/// An open language model session
#[async_trait]
pub trait ModelSession: Send + Sync {
    /// Sends a prompt and returns the model's reply
    async fn prompt(&mut self, text: &str) -> Result<String, GenerationError>;

    /// Releases the session
    async fn destroy(self: Box<Self>);
}

/// [`LanguageModel`] for hosts without any model
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableModel;

#[async_trait]
impl LanguageModel for UnavailableModel {
    async fn availability(&self) -> Availability {
        Availability::Unavailable
    }

    async fn create(
        &self,
        _config: &SessionConfig,
    ) -> Result<Box<dyn ModelSession>, GenerationError> {
        Err(GenerationError::CapabilityUnavailable)
    }
}

/// Prompt asking the model to explain one impact factor of a site
pub fn factor_prompt(site: &str, category: &str, impact_label: &str, factor: &str) -> String {
    format!(
        "In two short sentences, explain how \"{factor}\" contributes to the environmental \
         footprint of {site}, a {category} service rated {impact_label}. \
         Address the reader directly and suggest one way to reduce it."
    )
}
