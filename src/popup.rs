// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! View assembly for the popup surface
//!
//! [`PopupController`] owns everything that lives while the popup is open:
//! the dataset cache, the memoized responses and the language model session.
//! It is created by [`PopupController::open`] and released by
//! [`PopupController::close`]; nothing is kept in globals.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

use crate::cache::{placeholder, MemoizedGenerator, ResourceFetcher, TimeBoxedCache};
use crate::config::constants::{storage_keys, LOCAL_SCHEMES};
use crate::config::TerravueConfig;
use crate::dataset::{CategoryInfo, Impact, ImpactDataset};
use crate::domain::{DomainClassifier, DomainInfo};
use crate::generation::{
    factor_prompt, Availability, GenerationContext, LanguageModel, SessionConfig,
};
use crate::history::VisitLog;
use crate::report::ImpactReport;
use crate::spans;
use crate::store::KeyValueStore;
use crate::types::cache::{Clock, SystemClock};

/// Number of impact factors described per site
const FACTOR_COUNT: usize = 2;

/// Text shown for browser-internal and local pages
const LOCAL_LABEL: &str = "No impact";

/// State of the weekly history panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HistoryView {
    /// The dataset could not be loaded from the network or storage
    NoData,
    /// Nothing was recorded in the retention window
    NoVisits,
    /// Impact of every site visited
    Report(ImpactReport),
}

/// One impact factor of a site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Factor {
    /// Short factor name from the dataset
    pub title: String,
    /// Explanation shown under the title
    pub description: String,
    /// `true` when the description came from the language model path
    pub generated: bool,
}

/// Everything known about a classified site
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteDetails {
    /// Title-cased site name
    pub name: String,
    /// Registrable domain
    pub domain: String,
    /// Category from the URL mapping
    pub category: String,
    /// Impact level of the category
    pub impact: Impact,
    /// Display label of the impact level
    pub label: &'static str,
    /// Icon name from the URL mapping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Yearly energy use of the category, as given by the dataset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twh: Option<String>,
    /// CO2 figure of the category, as given by the dataset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2: Option<String>,
    /// Language model capability when the factors were described
    ///
    /// Anything but `Available` means the factor texts are the dataset's own.
    pub generation: Availability,
    /// Impact factors in dataset order
    pub factors: Vec<Factor>,
}

/// State of the current-site panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SiteView {
    /// A browser-internal or local page
    Local { label: &'static str },
    /// The site, its category or the whole dataset is unknown
    NoData { domain: Option<String> },
    /// The site is classified
    Known(SiteDetails),
}

/// Owns the popup's caches and generation session between `open` and `close`
pub struct PopupController {
    dataset: TimeBoxedCache<ImpactDataset>,
    responses: MemoizedGenerator,
    generation: GenerationContext,
    history: VisitLog,
}

impl PopupController {
    /// Opens the controller and probes the language model capability
    pub async fn open(
        config: &TerravueConfig,
        store: Arc<dyn KeyValueStore>,
        fetcher: Box<dyn ResourceFetcher<ImpactDataset>>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self::open_with_clock(config, store, fetcher, model, Arc::new(SystemClock)).await
    }

    /// Like [`open`](Self::open), with an explicit clock for the dataset cache
    pub async fn open_with_clock(
        config: &TerravueConfig,
        store: Arc<dyn KeyValueStore>,
        fetcher: Box<dyn ResourceFetcher<ImpactDataset>>,
        model: Arc<dyn LanguageModel>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let dataset = TimeBoxedCache::new(storage_keys::API_DATA, store.clone(), fetcher)
            .with_ttl(config.dataset_ttl)
            .with_clock(clock);
        let responses = MemoizedGenerator::new(storage_keys::RESPONSE_DATA, store.clone());
        let session = SessionConfig {
            system_prompt: config.system_prompt.clone(),
            ..SessionConfig::default()
        };
        let generation = GenerationContext::new(model, session);
        let history = VisitLog::new(store).with_retention(config.history_retention);

        let availability = generation.probe().await;
        info!(?availability, ttl_secs = config.dataset_ttl.as_secs(), "Popup opened");

        Self {
            dataset,
            responses,
            generation,
            history,
        }
    }

    /// Releases the language model session
    pub async fn close(self) {
        self.generation.teardown().await;
        debug!("Popup closed");
    }

    /// Visit log shared with the tab recorder
    pub fn history(&self) -> &VisitLog {
        &self.history
    }

    /// Dataset cache
    pub fn dataset(&self) -> &TimeBoxedCache<ImpactDataset> {
        &self.dataset
    }

    /// Cached language model capability
    pub async fn availability(&self) -> Availability {
        self.generation.availability().await
    }

    /// Builds the weekly history panel
    ///
    /// The dataset is only loaded when there is at least one visit.
    pub async fn weekly_report(&self) -> HistoryView {
        async move {
            let visits = self.history.visits().await;
            if visits.is_empty() {
                return HistoryView::NoVisits;
            }

            match self.dataset.load().await {
                Ok(dataset) => {
                    let report = ImpactReport::build(&visits, &dataset);
                    debug!(
                        visits = visits.len(),
                        sites = report.sites.len(),
                        "Built impact report"
                    );
                    HistoryView::Report(report)
                }
                Err(e) => {
                    warn!(error = %e, "Impact dataset unavailable");
                    HistoryView::NoData
                }
            }
        }
        .instrument(spans::weekly_report())
        .await
    }

    /// Builds the current-site panel for `url`
    pub async fn describe_site(&self, url: &str) -> SiteView {
        async move {
            if is_local(url) {
                return SiteView::Local {
                    label: LOCAL_LABEL,
                };
            }

            let Some(domain) = DomainClassifier::resolve(url) else {
                debug!("URL has no host");
                return SiteView::NoData { domain: None };
            };

            let dataset = match self.dataset.load().await {
                Ok(dataset) => dataset,
                Err(e) => {
                    warn!(error = %e, "Impact dataset unavailable");
                    return SiteView::NoData {
                        domain: Some(domain.registrable_domain),
                    };
                }
            };

            let class = dataset.classify(&domain);
            let (Some(category), Some(info)) = (class.category, class.info) else {
                return SiteView::NoData {
                    domain: Some(domain.registrable_domain),
                };
            };

            let generation = self.generation.probe().await;
            let factors = self
                .describe_factors(&domain, category, class.impact, info, generation)
                .await;
            SiteView::Known(SiteDetails {
                name: domain.display_name.clone(),
                domain: domain.registrable_domain.clone(),
                category: category.to_string(),
                impact: class.impact,
                label: class.impact.label(),
                icon: class.icon.map(str::to_string),
                twh: info.detail("twh"),
                co2: info.detail("co2"),
                generation,
                factors,
            })
        }
        .instrument(spans::describe_site(url))
        .await
    }

    /// Refetches the dataset; see [`TimeBoxedCache::refresh`]
    pub async fn refresh_dataset(&self) -> bool {
        self.dataset.refresh().await
    }

    /// Drops the cached dataset
    pub async fn invalidate_dataset(&self) {
        self.dataset.invalidate().await;
    }

    /// Factor texts, generated when the model is available and static otherwise
    async fn describe_factors(
        &self,
        domain: &DomainInfo,
        category: &str,
        impact: Impact,
        info: &CategoryInfo,
        availability: Availability,
    ) -> Vec<Factor> {
        let generated = availability.is_available();
        let mut factors = Vec::with_capacity(FACTOR_COUNT);

        for n in 1..=FACTOR_COUNT {
            let attribute = format!("factor{n}");
            let Some(title) = info.detail(&format!("{attribute}-title")) else {
                continue;
            };

            let description = if generated {
                let prompt = factor_prompt(&domain.display_name, category, impact.label(), &title);
                let generation = &self.generation;
                self.responses
                    .get(&domain.display_name, &attribute, move || async move {
                        generation.prompt(&prompt).await
                    })
                    .await
            } else {
                info.detail(&format!("{attribute}-desc"))
                    .unwrap_or_else(|| placeholder(&attribute))
            };

            factors.push(Factor {
                title,
                description,
                generated,
            });
        }

        factors
    }
}

/// `chrome:` and `file:` pages have no network footprint
fn is_local(url: &str) -> bool {
    url.split_once(':')
        .is_some_and(|(scheme, _)| LOCAL_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample_dataset;
    use crate::errors::FetchError;
    use crate::generation::UnavailableModel;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    struct StaticSource(Option<ImpactDataset>);

    #[async_trait]
    impl ResourceFetcher<ImpactDataset> for StaticSource {
        async fn fetch(&self) -> Result<ImpactDataset, FetchError> {
            self.0.clone().ok_or_else(|| {
                FetchError::io(
                    "links.json",
                    std::io::Error::new(std::io::ErrorKind::NotFound, "offline"),
                )
            })
        }

        fn name(&self) -> &'static str {
            "StaticSource"
        }
    }

    async fn controller(dataset: Option<ImpactDataset>) -> PopupController {
        PopupController::open(
            &TerravueConfig::default(),
            Arc::new(MemoryStore::new()),
            Box::new(StaticSource(dataset)),
            Arc::new(UnavailableModel),
        )
        .await
    }

    #[test]
    fn test_is_local() {
        assert!(is_local("chrome://extensions"));
        assert!(is_local("file:///home/user/notes.html"));
        assert!(is_local("FILE:///tmp"));
        assert!(!is_local("https://chrome.google.com/webstore"));
        assert!(!is_local("no-scheme"));
    }

    #[tokio::test]
    async fn test_local_page() {
        let popup = controller(Some(sample_dataset())).await;
        assert_eq!(
            popup.describe_site("chrome://newtab/").await,
            SiteView::Local { label: "No impact" }
        );
    }

    #[tokio::test]
    async fn test_known_site_uses_static_text_without_model() {
        let popup = controller(Some(sample_dataset())).await;
        assert_eq!(popup.availability().await, Availability::Unavailable);

        let SiteView::Known(details) = popup.describe_site("https://www.youtube.com/").await else {
            panic!("expected a known site");
        };

        assert_eq!(details.name, "Youtube");
        assert_eq!(details.impact, Impact::High);
        assert_eq!(details.co2.as_deref(), Some("0.42"));
        assert_eq!(details.generation, Availability::Unavailable);
        assert_eq!(details.factors.len(), 2);
        assert!(details.factors.iter().all(|f| !f.generated));
        assert_eq!(details.factors[1].title, "Autoplay");
        assert_eq!(details.factors[1].description, "Autoplay keeps servers busy.");
    }

    #[tokio::test]
    async fn test_unknown_site_and_missing_dataset() {
        let popup = controller(Some(sample_dataset())).await;
        assert_eq!(
            popup.describe_site("https://example.com/").await,
            SiteView::NoData {
                domain: Some("example.com".to_string())
            }
        );

        let offline = controller(None).await;
        assert!(matches!(
            offline.describe_site("https://www.youtube.com/").await,
            SiteView::NoData { .. }
        ));
    }

    #[tokio::test]
    async fn test_weekly_report_states() {
        let popup = controller(None).await;
        assert_eq!(popup.weekly_report().await, HistoryView::NoVisits);

        popup
            .history()
            .record("https://www.youtube.com/", Some("YouTube"))
            .await
            .unwrap();
        assert_eq!(popup.weekly_report().await, HistoryView::NoData);

        let popup = controller(Some(sample_dataset())).await;
        popup.history().record("https://youtube.com/", None).await.unwrap();
        let HistoryView::Report(report) = popup.weekly_report().await else {
            panic!("expected a report");
        };
        assert_eq!(report.counts.high, 1);
    }
}
