// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! The impact dataset and its sources
//!
//! The dataset is two JSON documents that are only meaningful together:
//!
//! - `links.json`: site key → `{ "categories": "<category>", "icon": "<slug>" }`
//! - `categories.json`: category → `{ "impact": "low" | "medium" | "high", ... }`
//!
//! Both sources ([`HttpDatasetSource`] and [`BundledDatasetSource`]) load the
//! pair concurrently and fail as a unit, so a half-loaded dataset is never
//! cached.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::DomainInfo;

mod bundled;
mod http;

pub use bundled::BundledDatasetSource;
pub use http::HttpDatasetSource;

/// Environmental impact level of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    /// Low impact
    Low,
    /// Medium impact
    Medium,
    /// High impact
    High,
    /// The site or its category is not in the dataset
    NoData,
}

impl Impact {
    /// Parses an impact level, ignoring case and surrounding whitespace
    ///
    /// Anything other than low/medium/high is [`Impact::NoData`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::NoData,
        }
    }

    /// Badge text shown next to a site
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low Impact",
            Self::Medium => "Medium Impact",
            Self::High => "High Impact",
            Self::NoData => "No Data",
        }
    }

    /// Lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::NoData => "no_data",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry of the URL-to-category mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlEntry {
    /// Category name, a key of the category mapping
    pub categories: String,
    /// Simple Icons slug for the site
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Entry of the category-to-impact mapping
///
/// Fields other than `impact` (`twh`, `co2`, `factor1-title`, ...) are kept
/// verbatim in `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    /// Raw impact level
    #[serde(default)]
    pub impact: String,
    /// Remaining metadata
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl CategoryInfo {
    /// Parsed impact level
    pub fn impact(&self) -> Impact {
        Impact::parse(&self.impact)
    }

    /// A metadata field rendered as text
    ///
    /// Strings are returned as-is, numbers and booleans are formatted, and
    /// anything else is `None`.
    pub fn detail(&self, name: &str) -> Option<String> {
        match self.details.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// The paired remote documents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactDataset {
    /// Site key → category
    pub url_data: BTreeMap<String, UrlEntry>,
    /// Category → impact metadata
    pub category_data: BTreeMap<String, CategoryInfo>,
}

/// What the dataset says about one domain
#[derive(Debug, Clone, PartialEq)]
pub struct Classification<'a> {
    /// Impact level; [`Impact::NoData`] when the site or category is unknown
    pub impact: Impact,
    /// Matched key of the URL mapping
    pub site_key: Option<&'a str>,
    /// Category of the site
    pub category: Option<&'a str>,
    /// Icon slug, only reported when the category resolved
    pub icon: Option<&'a str>,
    /// Category metadata
    pub info: Option<&'a CategoryInfo>,
}

impl ImpactDataset {
    /// Creates a dataset from its two documents
    pub fn new(
        url_data: BTreeMap<String, UrlEntry>,
        category_data: BTreeMap<String, CategoryInfo>,
    ) -> Self {
        Self {
            url_data,
            category_data,
        }
    }

    /// Finds the URL mapping entry for a domain
    ///
    /// An exact key match on the registrable domain or hostname wins;
    /// otherwise the first key (in key order) containing either is used.
    pub fn find_site(&self, domain: &DomainInfo) -> Option<(&str, &UrlEntry)> {
        let registrable = domain.registrable_domain.as_str();
        let hostname = domain.hostname.as_str();

        [registrable, hostname]
            .iter()
            .find_map(|key| self.url_data.get_key_value(*key))
            .or_else(|| {
                self.url_data
                    .iter()
                    .find(|(key, _)| key.contains(registrable) || key.contains(hostname))
            })
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Classifies a domain
    pub fn classify(&self, domain: &DomainInfo) -> Classification<'_> {
        let Some((site_key, entry)) = self.find_site(domain) else {
            return Classification {
                impact: Impact::NoData,
                site_key: None,
                category: None,
                icon: None,
                info: None,
            };
        };

        let info = self.category_data.get(&entry.categories);
        Classification {
            impact: info.map_or(Impact::NoData, CategoryInfo::impact),
            site_key: Some(site_key),
            category: Some(entry.categories.as_str()),
            icon: info.and(entry.icon.as_deref()),
            info,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::DomainClassifier;
    use serde_json::json;

    pub(crate) fn sample_dataset() -> ImpactDataset {
        serde_json::from_value(json!({
            "urlData": {
                "youtube.com": { "categories": "video-streaming", "icon": "youtube" },
                "wikipedia.org": { "categories": "reference" },
                "mystery.net": { "categories": "unlisted" }
            },
            "categoryData": {
                "video-streaming": {
                    "impact": "High",
                    "twh": "244",
                    "co2": 0.42,
                    "factor1-title": "Video resolution",
                    "factor1-desc": "Streaming in HD moves more data.",
                    "factor2-title": "Autoplay",
                    "factor2-desc": "Autoplay keeps servers busy."
                },
                "reference": { "impact": "low" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_impact_parse_is_case_insensitive() {
        assert_eq!(Impact::parse("HIGH"), Impact::High);
        assert_eq!(Impact::parse(" medium "), Impact::Medium);
        assert_eq!(Impact::parse("low"), Impact::Low);
        assert_eq!(Impact::parse("severe"), Impact::NoData);
        assert_eq!(Impact::Medium.label(), "Medium Impact");
        assert_eq!(Impact::NoData.label(), "No Data");
    }

    #[test]
    fn test_dataset_wire_format() {
        let dataset = sample_dataset();
        let value = serde_json::to_value(&dataset).unwrap();
        assert!(value.get("urlData").is_some());
        assert!(value.get("categoryData").is_some());
        assert_eq!(value["categoryData"]["video-streaming"]["co2"], json!(0.42));
        assert!(value["urlData"]["wikipedia.org"].get("icon").is_none());
    }

    #[test]
    fn test_classify_known_site() {
        let dataset = sample_dataset();
        let domain = DomainClassifier::resolve("https://www.youtube.com/watch").unwrap();
        let class = dataset.classify(&domain);

        assert_eq!(class.impact, Impact::High);
        assert_eq!(class.site_key, Some("youtube.com"));
        assert_eq!(class.category, Some("video-streaming"));
        assert_eq!(class.icon, Some("youtube"));
        assert_eq!(class.info.unwrap().detail("co2").as_deref(), Some("0.42"));
        assert_eq!(
            class.info.unwrap().detail("factor2-title").as_deref(),
            Some("Autoplay")
        );
    }

    #[test]
    fn test_classify_substring_match() {
        let mut dataset = sample_dataset();
        dataset.url_data.insert(
            "en.wikipedia.org/wiki".into(),
            UrlEntry {
                categories: "reference".into(),
                icon: None,
            },
        );
        dataset.url_data.remove("wikipedia.org");

        let domain = DomainClassifier::resolve_host("wikipedia.org").unwrap();
        let class = dataset.classify(&domain);
        assert_eq!(class.site_key, Some("en.wikipedia.org/wiki"));
        assert_eq!(class.impact, Impact::Low);
    }

    #[test]
    fn test_classify_unknown_category_has_no_icon() {
        let dataset = sample_dataset();
        let domain = DomainClassifier::resolve_host("mystery.net").unwrap();
        let class = dataset.classify(&domain);

        assert_eq!(class.impact, Impact::NoData);
        assert_eq!(class.category, Some("unlisted"));
        assert!(class.icon.is_none());
        assert!(class.info.is_none());
    }

    #[test]
    fn test_classify_unknown_site() {
        let dataset = sample_dataset();
        let domain = DomainClassifier::resolve_host("example.com").unwrap();
        let class = dataset.classify(&domain);
        assert_eq!(class.impact, Impact::NoData);
        assert!(class.site_key.is_none());
    }
}
