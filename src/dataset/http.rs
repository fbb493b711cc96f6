// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Dataset source backed by two HTTP endpoints

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, Instrument};

use super::ImpactDataset;
use crate::cache::ResourceFetcher;
use crate::config::TerravueConfig;
use crate::errors::FetchError;
use crate::spans;

/// Fetches the dataset documents over HTTP
///
/// Both documents are requested concurrently. The first failure (transport
/// error, non-2xx status, malformed JSON or timeout) fails the whole fetch.
///
/// # Examples
///
/// ```rust,ignore
/// use terravue::{HttpDatasetSource, TerravueConfig};
///
/// let source = HttpDatasetSource::from_config(&TerravueConfig::default())?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpDatasetSource {
    client: reqwest::Client,
    links_url: String,
    categories_url: String,
    timeout: Duration,
}

impl HttpDatasetSource {
    /// Creates a source for the given document URLs
    pub fn new(
        links_url: impl Into<String>,
        categories_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("terravue/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FetchError::Client { source })?;

        Ok(Self {
            client,
            links_url: links_url.into(),
            categories_url: categories_url.into(),
            timeout,
        })
    }

    /// Creates a source from the configured URLs and timeout
    pub fn from_config(config: &TerravueConfig) -> Result<Self, FetchError> {
        Self::new(
            config.links_url.clone(),
            config.categories_url.clone(),
            config.fetch_timeout,
        )
    }

    /// GETs `url` and parses the body as `T`, bounded by the timeout
    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tokio::time::timeout(self.timeout, self.request_json(url))
            .await
            .map_err(|_| FetchError::timeout(url, self.timeout))?
    }

    async fn request_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(url, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::request(url, e))?;
        debug!(url, bytes = body.len(), "Fetched dataset document");

        serde_json::from_slice(&body).map_err(|e| FetchError::parse(url, e))
    }
}

#[async_trait]
impl ResourceFetcher<ImpactDataset> for HttpDatasetSource {
    async fn fetch(&self) -> Result<ImpactDataset, FetchError> {
        let (url_data, category_data) = futures::future::try_join(
            self.fetch_json(&self.links_url),
            self.fetch_json(&self.categories_url),
        )
        .instrument(spans::fetch_dataset(
            self.name(),
            &self.links_url,
            &self.categories_url,
        ))
        .await?;

        Ok(ImpactDataset::new(url_data, category_data))
    }

    fn name(&self) -> &'static str {
        "HttpDatasetSource"
    }
}
