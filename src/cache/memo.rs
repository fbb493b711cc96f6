// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Append-only memoization of generated text

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn, Instrument};

use crate::errors::GenerationError;
use crate::spans;
use crate::store::{self, KeyValueStore};

/// Persisted generated text: entity name → attribute → text
pub type MemoMap = BTreeMap<String, BTreeMap<String, String>>;

/// Text returned in place of an attribute whose generation failed
///
/// ```
/// assert_eq!(terravue::placeholder("factor1"), "Unable to generate factor1.");
/// ```
pub fn placeholder(attribute: &str) -> String {
    format!("Unable to generate {attribute}.")
}

/// Compute-once, keep-forever cache of generated text
///
/// Results are keyed by `(entity, attribute)`. Once a key holds a value it is
/// never recomputed or overwritten; there is no TTL and no invalidation.
/// Failed generations are not stored, so the next call for that key retries.
///
/// The map is read from the store on first use and kept in memory afterwards;
/// every successful generation writes the whole map back.
///
/// # Examples
///
/// ```rust,ignore
/// let memo = MemoizedGenerator::new("responseData", store);
/// let text = memo
///     .get("Example", "factor1", || async { Ok("generated".to_string()) })
///     .await;
/// ```
pub struct MemoizedGenerator {
    key: String,
    store: Arc<dyn KeyValueStore>,
    responses: Mutex<Option<MemoMap>>,
}

impl MemoizedGenerator {
    /// Creates a generator persisting under `key`
    pub fn new(key: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            key: key.into(),
            store,
            responses: Mutex::new(None),
        }
    }

    /// Returns the stored text for `(entity, attribute)`, generating it if absent
    ///
    /// `generate` runs only when the key has no stored value. On failure the
    /// [`placeholder`] for `attribute` is returned and nothing is stored.
    pub async fn get<F, Fut>(&self, entity: &str, attribute: &str, generate: F) -> String
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<String, GenerationError>> + Send,
    {
        async move {
            if let Some(text) = self.cached(entity, attribute).await {
                debug!("Serving memoized response");
                return text;
            }

            let generated = match generate().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Generation failed, returning placeholder");
                    return placeholder(attribute);
                }
            };

            let mut guard = self.responses.lock().await;
            let responses = self.ensure_loaded(&mut guard).await;

            // A value stored while we were generating wins; keys are never overwritten.
            let stored = responses
                .entry(entity.to_string())
                .or_default()
                .entry(attribute.to_string())
                .or_insert(generated)
                .clone();

            if let Err(e) = store::set_typed(self.store.as_ref(), &self.key, &*responses).await {
                warn!(
                    key = %self.key,
                    store = self.store.name(),
                    error = %e,
                    "Failed to persist memoized responses"
                );
            }

            stored
        }
        .instrument(spans::generate_response(entity, attribute))
        .await
    }

    /// Returns the stored text for `(entity, attribute)` without generating
    pub async fn cached(&self, entity: &str, attribute: &str) -> Option<String> {
        let mut guard = self.responses.lock().await;
        let responses = self.ensure_loaded(&mut guard).await;
        responses
            .get(entity)
            .and_then(|attributes| attributes.get(attribute))
            .cloned()
    }

    /// Snapshot of every stored response
    pub async fn snapshot(&self) -> MemoMap {
        let mut guard = self.responses.lock().await;
        self.ensure_loaded(&mut guard).await.clone()
    }

    /// Loads the persisted map on first use; a storage failure starts empty
    async fn ensure_loaded<'a>(&self, slot: &'a mut Option<MemoMap>) -> &'a mut MemoMap {
        if slot.is_none() {
            let loaded = match store::get_typed::<MemoMap>(self.store.as_ref(), &self.key).await {
                Ok(map) => map.unwrap_or_default(),
                Err(e) => {
                    warn!(
                        key = %self.key,
                        error = %e,
                        "Failed to read memoized responses, starting empty"
                    );
                    MemoMap::new()
                }
            };
            debug!(key = %self.key, entities = loaded.len(), "Loaded memoized responses");
            *slot = Some(loaded);
        }
        slot.get_or_insert_with(MemoMap::new)
    }
}
