// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Dataset source backed by files shipped with the application

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, Instrument};

use super::ImpactDataset;
use crate::cache::ResourceFetcher;
use crate::config::constants::{BUNDLED_CATEGORIES_FILE, BUNDLED_LINKS_FILE};
use crate::errors::FetchError;
use crate::spans;

/// Reads the dataset documents from local files
///
/// Same contract as [`HttpDatasetSource`](super::HttpDatasetSource): both files
/// are read concurrently and either both parse or the fetch fails.
#[derive(Debug, Clone)]
pub struct BundledDatasetSource {
    links_path: PathBuf,
    categories_path: PathBuf,
}

impl BundledDatasetSource {
    /// Creates a source for two explicit file paths
    pub fn new(links_path: impl Into<PathBuf>, categories_path: impl Into<PathBuf>) -> Self {
        Self {
            links_path: links_path.into(),
            categories_path: categories_path.into(),
        }
    }

    /// Creates a source for `links.json` and `categories.json` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(BUNDLED_LINKS_FILE), dir.join(BUNDLED_CATEGORIES_FILE))
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FetchError> {
        let location = path.display().to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FetchError::io(location.as_str(), e))?;
        debug!(path = %location, bytes = bytes.len(), "Read bundled dataset document");
        serde_json::from_slice(&bytes).map_err(|e| FetchError::parse(location, e))
    }
}

#[async_trait]
impl ResourceFetcher<ImpactDataset> for BundledDatasetSource {
    async fn fetch(&self) -> Result<ImpactDataset, FetchError> {
        let links = self.links_path.display().to_string();
        let categories = self.categories_path.display().to_string();

        let (url_data, category_data) = futures::future::try_join(
            Self::read_json(&self.links_path),
            Self::read_json(&self.categories_path),
        )
        .instrument(spans::fetch_dataset(self.name(), &links, &categories))
        .await?;

        Ok(ImpactDataset::new(url_data, category_data))
    }

    fn name(&self) -> &'static str {
        "BundledDatasetSource"
    }
}
