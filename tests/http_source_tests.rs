// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Tests for the HTTP dataset source against a local server

mod helpers;

use helpers::{spawn_http_server, Route};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use terravue::{
    CacheError, FetchError, HttpDatasetSource, Impact, MemoryStore, ResourceFetcher,
    TerravueConfigBuilder, TimeBoxedCache,
};

fn links() -> serde_json::Value {
    json!({ "github.com": { "categories": "code-hosting", "icon": "github" } })
}

fn categories() -> serde_json::Value {
    json!({ "code-hosting": { "impact": "Medium", "twh": "12" } })
}

fn source(base: &str, timeout: Duration) -> HttpDatasetSource {
    HttpDatasetSource::new(
        format!("{base}/links.json"),
        format!("{base}/categories.json"),
        timeout,
    )
    .unwrap()
}

#[tokio::test]
async fn test_fetches_both_documents() {
    let base = spawn_http_server(vec![
        Route::json("/links.json", links()),
        Route::json("/categories.json", categories()),
    ])
    .await;

    let dataset = source(&base, Duration::from_secs(5)).fetch().await.unwrap();

    assert_eq!(dataset.url_data["github.com"].icon.as_deref(), Some("github"));
    assert_eq!(dataset.category_data["code-hosting"].impact(), Impact::Medium);
    assert_eq!(
        dataset.category_data["code-hosting"].detail("twh").as_deref(),
        Some("12")
    );
}

#[tokio::test]
async fn test_non_success_status() {
    let base = spawn_http_server(vec![
        Route::json("/links.json", links()),
        Route::status("/categories.json", 503),
    ])
    .await;

    let err = source(&base, Duration::from_secs(5)).fetch().await.unwrap_err();

    match err {
        FetchError::Status { location, status } => {
            assert_eq!(status, 503);
            assert!(location.ends_with("/categories.json"));
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let base = spawn_http_server(vec![
        Route::raw("/links.json", "{ not json"),
        Route::json("/categories.json", categories()),
    ])
    .await;

    let err = source(&base, Duration::from_secs(5)).fetch().await.unwrap_err();
    assert!(err.is_parse(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_slow_document_times_out() {
    let base = spawn_http_server(vec![
        Route::json("/links.json", links()),
        Route::json("/categories.json", categories()).delayed(Duration::from_secs(2)),
    ])
    .await;

    let err = source(&base, Duration::from_millis(200))
        .fetch()
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout { .. }), "unexpected error: {err}");
}

#[tokio::test]
async fn test_half_failed_pair_leaves_cache_empty() {
    let base = spawn_http_server(vec![Route::json("/links.json", links())]).await;
    let config = TerravueConfigBuilder::with_defaults()
        .links_url(format!("{base}/links.json"))
        .categories_url(format!("{base}/categories.json"))
        .fetch_timeout(Duration::from_secs(5))
        .build();

    let store = Arc::new(MemoryStore::new());
    let cache = TimeBoxedCache::new(
        "apiData",
        store.clone(),
        Box::new(HttpDatasetSource::from_config(&config).unwrap()),
    );

    let err = cache.load().await.unwrap_err();

    let CacheError::DataUnavailable { source, .. } = err;
    assert!(matches!(source, FetchError::Status { status: 404, .. }));
    assert!(store.is_empty().await);
}
