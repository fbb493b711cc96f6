// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cache::ResourceFetcher;
use crate::cli::{Cli, Command};
use crate::config::TerravueConfig;
use crate::dataset::{BundledDatasetSource, HttpDatasetSource, ImpactDataset};
use crate::generation::UnavailableModel;
use crate::popup::PopupController;
use crate::store::{FileStore, KeyValueStore};

/// Installs the tracing subscriber, writing to stderr
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Main entry point for the application.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let mut config = TerravueConfig::from_env().context("invalid TERRAVUE_* environment")?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    if let Some(dir) = cli.dataset_dir {
        config.dataset_dir = Some(dir);
    }

    let store = FileStore::new(config.store_path.clone())
        .validate()
        .with_context(|| format!("store {} is not usable", config.store_path.display()))?;
    let store: Arc<dyn KeyValueStore> = Arc::new(store);

    let fetcher = dataset_source(&config)?;
    info!(source = fetcher.name(), store = %config.store_path.display(), "Starting terravue");

    let popup = PopupController::open(&config, store, fetcher, Arc::new(UnavailableModel)).await;
    let output = match cli.command {
        Command::Record { url, title } => {
            let record = popup.history().record(&url, title.as_deref()).await?;
            json!({ "recorded": record })
        }
        Command::Report => serde_json::to_value(popup.weekly_report().await)?,
        Command::Site { url } => serde_json::to_value(popup.describe_site(&url).await)?,
        Command::Refresh => json!({ "refreshed": popup.refresh_dataset().await }),
        Command::Invalidate => {
            popup.invalidate_dataset().await;
            json!({ "invalidated": true })
        }
    };
    popup.close().await;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn dataset_source(config: &TerravueConfig) -> anyhow::Result<Box<dyn ResourceFetcher<ImpactDataset>>> {
    Ok(match &config.dataset_dir {
        Some(dir) => Box::new(BundledDatasetSource::in_dir(dir)),
        None => Box::new(HttpDatasetSource::from_config(config)?),
    })
}
