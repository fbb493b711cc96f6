// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for terravue integration tests
//!
//! Provides mock implementations of the crate's seams so caches and the popup
//! controller can be driven without a network, a real clock or a language
//! model.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use terravue::generation::{Availability, LanguageModel, ModelSession, SessionConfig};
use terravue::{
    Clock, FetchError, GenerationError, ImpactDataset, KeyValueStore, ResourceFetcher,
    StoreError, TimestampMillis,
};

pub const HOUR: Duration = Duration::from_secs(60 * 60);

/// Dataset with one high, one low and one uncategorized site
pub fn sample_dataset() -> ImpactDataset {
    serde_json::from_value(json!({
        "urlData": {
            "youtube.com": { "categories": "video-streaming", "icon": "youtube" },
            "wikipedia.org": { "categories": "reference", "icon": "wikipedia" },
            "mystery.net": { "categories": "unlisted" }
        },
        "categoryData": {
            "video-streaming": {
                "impact": "high",
                "twh": "244",
                "co2": "1.6%",
                "factor1-title": "Video resolution",
                "factor1-desc": "Higher resolutions move more data.",
                "factor2-title": "Autoplay",
                "factor2-desc": "Autoplay keeps streams running."
            },
            "reference": {
                "impact": "Low",
                "factor1-title": "Text pages",
                "factor1-desc": "Text is cheap to serve."
            }
        }
    }))
    .expect("sample dataset is well formed")
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn at(millis: u64) -> Arc<Self> {
        Arc::new(Self {
            millis: AtomicU64::new(millis),
        })
    }

    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimestampMillis {
        TimestampMillis::from_millis(self.millis())
    }
}

struct SourceState {
    dataset: Mutex<Option<ImpactDataset>>,
    calls: AtomicUsize,
}

/// Dataset fetcher that counts calls and can be switched offline
///
/// Clones share state, so a test keeps one handle while the cache owns a
/// boxed clone.
#[derive(Clone)]
pub struct MockDatasetSource {
    state: Arc<SourceState>,
}

impl MockDatasetSource {
    pub fn serving(dataset: ImpactDataset) -> Self {
        Self {
            state: Arc::new(SourceState {
                dataset: Mutex::new(Some(dataset)),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    /// A source whose every fetch fails as if one document returned 503
    pub fn offline() -> Self {
        let source = Self::serving(ImpactDataset::default());
        source.set_online(None);
        source
    }

    pub fn set_online(&self, dataset: Option<ImpactDataset>) {
        *self.state.dataset.lock().unwrap() = dataset;
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn boxed(&self) -> Box<dyn ResourceFetcher<ImpactDataset>> {
        Box::new(self.clone())
    }
}

#[async_trait]
impl ResourceFetcher<ImpactDataset> for MockDatasetSource {
    async fn fetch(&self) -> Result<ImpactDataset, FetchError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .dataset
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| FetchError::status("https://assets.test/categories.json", 503))
    }

    fn name(&self) -> &'static str {
        "MockDatasetSource"
    }
}

/// Store whose every operation fails
#[derive(Debug, Default)]
pub struct FailingStore;

impl FailingStore {
    fn error() -> StoreError {
        StoreError::io_error(
            "/unwritable/store.json",
            "Simulated storage failure",
            Some(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )),
        )
    }
}

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        Err(Self::error())
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
        Err(Self::error())
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(Self::error())
    }

    fn name(&self) -> &'static str {
        "FailingStore"
    }
}

#[derive(Default)]
struct ModelState {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
    created: AtomicUsize,
    destroyed: AtomicUsize,
}

/// Language model answering prompts from a script
///
/// Each prompt pops the next scripted reply; once the script is exhausted the
/// prompt text is echoed back.
#[derive(Clone)]
pub struct ScriptedModel {
    availability: Availability,
    state: Arc<ModelState>,
}

impl ScriptedModel {
    pub fn available() -> Self {
        Self {
            availability: Availability::Available,
            state: Arc::new(ModelState::default()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            availability: Availability::Unavailable,
            state: Arc::new(ModelState::default()),
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Ok(text.to_string()))
    }

    pub fn fail(self, details: &str) -> Self {
        self.push(Err(GenerationError::prompt(details)))
    }

    fn push(self, reply: Result<String, GenerationError>) -> Self {
        self.state.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.state.prompts.lock().unwrap().clone()
    }

    pub fn sessions_created(&self) -> usize {
        self.state.created.load(Ordering::SeqCst)
    }

    pub fn sessions_destroyed(&self) -> usize {
        self.state.destroyed.load(Ordering::SeqCst)
    }
}

struct ScriptedSession {
    state: Arc<ModelState>,
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn availability(&self) -> Availability {
        self.availability
    }

    async fn create(
        &self,
        _config: &SessionConfig,
    ) -> Result<Box<dyn ModelSession>, GenerationError> {
        if !self.availability.is_available() {
            return Err(GenerationError::CapabilityUnavailable);
        }
        self.state.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            state: self.state.clone(),
        }))
    }
}

#[async_trait]
impl ModelSession for ScriptedSession {
    async fn prompt(&mut self, text: &str) -> Result<String, GenerationError> {
        self.state.prompts.lock().unwrap().push(text.to_string());
        let scripted = self.state.replies.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(format!("echo: {text}")))
    }

    async fn destroy(self: Box<Self>) {
        self.state.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Canned response served by [`spawn_http_server`]
#[derive(Debug, Clone)]
pub struct Route {
    pub path: &'static str,
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Route {
    pub fn json(path: &'static str, body: Value) -> Self {
        Self {
            path,
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(path: &'static str, status: u16) -> Self {
        Self {
            path,
            status,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn raw(path: &'static str, body: &str) -> Self {
        Self {
            path,
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Serves `routes` over HTTP/1.1 on a random local port
///
/// Returns the base URL. Unknown paths get a 404.
pub async fn spawn_http_server(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind local listener");
    let addr = listener.local_addr().expect("local address");
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request.split_whitespace().nth(1).unwrap_or("/");

                let route = routes
                    .iter()
                    .find(|r| r.path == path)
                    .cloned()
                    .unwrap_or_else(|| Route::status("", 404));
                tokio::time::sleep(route.delay).await;

                let response = format!(
                    "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    route.status,
                    route.body.len(),
                    route.body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}
