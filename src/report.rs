// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Weekly impact report over recorded visits

use serde::Serialize;
use std::collections::HashSet;

use crate::dataset::{Impact, ImpactDataset};
use crate::domain::DomainClassifier;
use crate::history::VisitRecord;

/// One row of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteImpact {
    /// Title-cased site name
    pub name: String,
    /// Registrable domain the row stands for
    pub domain: String,
    /// Impact level
    pub impact: Impact,
    /// Badge text for `impact`
    pub label: &'static str,
    /// Simple Icons slug, when the site and its category are known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Number of sites per impact level
///
/// Sites without data are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImpactCounts {
    /// Sites with low impact
    pub low: usize,
    /// Sites with medium impact
    pub medium: usize,
    /// Sites with high impact
    pub high: usize,
}

impl ImpactCounts {
    fn add(&mut self, impact: Impact) {
        match impact {
            Impact::Low => self.low += 1,
            Impact::Medium => self.medium += 1,
            Impact::High => self.high += 1,
            Impact::NoData => {}
        }
    }

    /// Total of counted sites
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

/// Impact of every distinct site visited
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImpactReport {
    /// Rows in first-visit order, one per registrable domain
    pub sites: Vec<SiteImpact>,
    /// Per-level counts over `sites`
    pub counts: ImpactCounts,
}

impl ImpactReport {
    /// Builds the report for `visits` against `dataset`
    ///
    /// Visits are reduced to their registrable domain and only the first visit
    /// of each domain is kept.
    pub fn build(visits: &[VisitRecord], dataset: &ImpactDataset) -> Self {
        let mut seen = HashSet::new();
        let mut report = Self::default();

        for visit in visits {
            let Some(domain) = DomainClassifier::resolve_host(&visit.domain) else {
                continue;
            };
            if !seen.insert(domain.registrable_domain.clone()) {
                continue;
            }

            let class = dataset.classify(&domain);
            report.counts.add(class.impact);
            report.sites.push(SiteImpact {
                name: domain.display_name,
                domain: domain.registrable_domain,
                impact: class.impact,
                label: class.impact.label(),
                icon: class.icon.map(str::to_string),
            });
        }

        report
    }

    /// Returns `true` if no site was visited
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}
