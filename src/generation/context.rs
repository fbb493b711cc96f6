// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Lifecycle of the language model session

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::{Availability, LanguageModel, ModelSession, SessionConfig};
use crate::errors::GenerationError;

/// Observable state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session exists; the next prompt creates one
    Uninitialized,
    /// A session exists and is reused by every prompt
    Active,
}

/// Owns the language model session
///
/// - The capability is probed once and the answer kept for the context's
///   lifetime.
/// - The session is created on the first prompt and reused while prompts
///   succeed.
/// - Any prompt failure destroys the session, so the next prompt starts a
///   fresh one. [`teardown`](Self::teardown) does the same explicitly.
pub struct GenerationContext {
    model: Arc<dyn LanguageModel>,
    config: SessionConfig,
    availability: Mutex<Option<Availability>>,
    session: Mutex<Option<Box<dyn ModelSession>>>,
}

impl GenerationContext {
    /// Creates a context with no session and an unprobed capability
    pub fn new(model: Arc<dyn LanguageModel>, config: SessionConfig) -> Self {
        Self {
            model,
            config,
            availability: Mutex::new(None),
            session: Mutex::new(None),
        }
    }

    /// Probes the capability on first call and returns the cached answer after
    ///
    /// The first answer is kept whatever it is, `Unknown` included.
    pub async fn probe(&self) -> Availability {
        let mut cached = self.availability.lock().await;
        if let Some(availability) = *cached {
            return availability;
        }
        let availability = self.model.availability().await;
        info!(?availability, "Probed language model");
        *cached = Some(availability);
        availability
    }

    /// Cached capability answer without probing, `Unknown` before the first probe
    pub async fn availability(&self) -> Availability {
        self.availability
            .lock()
            .await
            .unwrap_or(Availability::Unknown)
    }

    /// Current session state
    pub async fn state(&self) -> SessionState {
        if self.session.lock().await.is_some() {
            SessionState::Active
        } else {
            SessionState::Uninitialized
        }
    }

    /// Sends `text` to the session, creating it if needed
    ///
    /// # Errors
    ///
    /// - [`GenerationError::CapabilityUnavailable`] if the probe says no model exists
    /// - The creation error if a session cannot be opened
    /// - The prompt error, after which the session has been destroyed
    pub async fn prompt(&self, text: &str) -> Result<String, GenerationError> {
        if !self.probe().await.is_available() {
            return Err(GenerationError::CapabilityUnavailable);
        }

        let mut slot = self.session.lock().await;
        let mut session = match slot.take() {
            Some(session) => session,
            None => {
                let created = self.model.create(&self.config).await.inspect_err(|e| {
                    warn!(error = %e, "Failed to create model session");
                })?;
                debug!("Created model session");
                created
            }
        };

        match session.prompt(text).await {
            Ok(reply) => {
                *slot = Some(session);
                Ok(reply)
            }
            Err(e) => {
                warn!(error = %e, "Prompt failed, destroying session");
                session.destroy().await;
                Err(e)
            }
        }
    }

    /// Destroys the session if one exists
    ///
    /// The capability probe result is kept.
    pub async fn teardown(&self) {
        if let Some(session) = self.session.lock().await.take() {
            session.destroy().await;
            debug!("Destroyed model session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counters {
        probes: AtomicUsize,
        created: AtomicUsize,
        destroyed: AtomicUsize,
    }

    /// Model whose sessions fail every prompt containing "fail"
    struct EchoModel {
        counters: Arc<Counters>,
        availability: Availability,
    }

    struct EchoSession {
        counters: Arc<Counters>,
    }

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn availability(&self) -> Availability {
            self.counters.probes.fetch_add(1, Ordering::SeqCst);
            self.availability
        }

        async fn create(
            &self,
            _config: &SessionConfig,
        ) -> Result<Box<dyn ModelSession>, GenerationError> {
            self.counters.created.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(EchoSession {
                counters: self.counters.clone(),
            }))
        }
    }

    #[async_trait]
    impl ModelSession for EchoSession {
        async fn prompt(&mut self, text: &str) -> Result<String, GenerationError> {
            if text.contains("fail") {
                Err(GenerationError::prompt("refused"))
            } else {
                Ok(format!("echo: {text}"))
            }
        }

        async fn destroy(self: Box<Self>) {
            self.counters.destroyed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn context(availability: Availability) -> (GenerationContext, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let model = EchoModel {
            counters: counters.clone(),
            availability,
        };
        (
            GenerationContext::new(Arc::new(model), SessionConfig::default()),
            counters,
        )
    }

    #[tokio::test]
    async fn test_session_is_created_lazily_and_reused() {
        let (ctx, counters) = context(Availability::Available);
        assert_eq!(ctx.state().await, SessionState::Uninitialized);

        assert_eq!(ctx.prompt("one").await.unwrap(), "echo: one");
        assert_eq!(ctx.prompt("two").await.unwrap(), "echo: two");

        assert_eq!(ctx.state().await, SessionState::Active);
        assert_eq!(counters.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prompt_failure_destroys_session() {
        let (ctx, counters) = context(Availability::Available);

        ctx.prompt("warm up").await.unwrap();
        assert!(ctx.prompt("please fail").await.is_err());
        assert_eq!(ctx.state().await, SessionState::Uninitialized);
        assert_eq!(counters.destroyed.load(Ordering::SeqCst), 1);

        ctx.prompt("again").await.unwrap();
        assert_eq!(counters.created.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_probe_is_cached() {
        let (ctx, counters) = context(Availability::Unavailable);
        assert_eq!(ctx.availability().await, Availability::Unknown);

        assert!(matches!(
            ctx.prompt("x").await,
            Err(GenerationError::CapabilityUnavailable)
        ));
        assert_eq!(ctx.probe().await, Availability::Unavailable);

        assert_eq!(counters.probes.load(Ordering::SeqCst), 1);
        assert_eq!(counters.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_answer_is_cached_too() {
        let (ctx, counters) = context(Availability::Unknown);

        for _ in 0..3 {
            assert!(matches!(
                ctx.prompt("x").await,
                Err(GenerationError::CapabilityUnavailable)
            ));
        }
        assert_eq!(ctx.probe().await, Availability::Unknown);

        assert_eq!(counters.probes.load(Ordering::SeqCst), 1);
        assert_eq!(counters.created.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_teardown_destroys_active_session() {
        let (ctx, counters) = context(Availability::Available);
        ctx.prompt("hello").await.unwrap();

        ctx.teardown().await;
        ctx.teardown().await;

        assert_eq!(ctx.state().await, SessionState::Uninitialized);
        assert_eq!(counters.destroyed.load(Ordering::SeqCst), 1);
    }
}
