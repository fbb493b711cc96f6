// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::process::ExitCode;

use clap::Parser;
use terravue::bootstrap::{init_tracing, run};
use terravue::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    if let Err(e) = run(cli).await {
        tracing::error!("terravue error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
