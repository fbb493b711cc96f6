// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for terravue operations.
//!
//! Telemetry concerns are kept out of business logic: each instrumented
//! operation has a span helper here, and the operation attaches it with
//! `Instrument`.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, key: &str) -> Result<T> {
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(spans::my_operation(key))
//!     .await
//! }
//! ```

use tracing::Span;

/// Create span for serving a time-boxed resource.
///
/// Parent: popup operation spans, or None
/// Children: fetch_dataset span when the cache misses
#[inline]
pub(crate) fn load_resource(key: &str) -> Span {
    tracing::debug_span!("terravue.load_resource", key = %key)
}

/// Create span for an unconditional refresh of a time-boxed resource.
#[inline]
pub(crate) fn refresh_resource(key: &str) -> Span {
    tracing::debug_span!("terravue.refresh_resource", key = %key)
}

/// Create span for fetching the paired dataset documents.
///
/// Parent: load_resource or refresh_resource
#[inline]
pub(crate) fn fetch_dataset(source: &str, links: &str, categories: &str) -> Span {
    tracing::debug_span!(
        "terravue.fetch_dataset",
        source = %source,
        links = %links,
        categories = %categories,
    )
}

/// Create span for a memoized generation lookup.
#[inline]
pub(crate) fn generate_response(entity: &str, attribute: &str) -> Span {
    tracing::debug_span!(
        "terravue.generate_response",
        entity = %entity,
        attribute = %attribute,
    )
}

/// Create span for recording a visit.
#[inline]
pub(crate) fn record_visit(domain: &str) -> Span {
    tracing::trace_span!("terravue.record_visit", domain = %domain)
}

/// Create span for describing a single site in the popup.
///
/// Parent: None (root span for this operation)
/// Children: load_resource, generate_response
#[inline]
pub(crate) fn describe_site(url: &str) -> Span {
    tracing::info_span!("terravue.describe_site", url = %url)
}

/// Create span for building the weekly impact report.
#[inline]
pub(crate) fn weekly_report() -> Span {
    tracing::info_span!("terravue.weekly_report")
}
