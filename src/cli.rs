// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// terravue - environmental impact of the websites you visit.
#[derive(Parser, Debug)]
#[command(name = "terravue", author, version, about)]
#[command(long_about = r#"terravue records visited sites and rates their environmental impact.

Every command prints a single JSON document to stdout; logs go to stderr
(filter with RUST_LOG).

Examples:
    terravue record https://www.youtube.com/watch --title "A video"
    terravue report
    terravue site https://en.wikipedia.org/wiki/Rust
    terravue refresh
"#)]
pub struct Cli {
    /// Location of the file store (overrides TERRAVUE_STORE_PATH).
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Read links.json and categories.json from this directory instead of the
    /// network (overrides TERRAVUE_DATASET_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    pub dataset_dir: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record a visit to a URL.
    Record {
        /// Visited URL
        url: String,

        /// Page title
        #[arg(long)]
        title: Option<String>,
    },

    /// Print the impact of every site visited in the retention window.
    Report,

    /// Describe the impact of one site.
    Site {
        /// URL of the page
        url: String,
    },

    /// Refetch the impact dataset regardless of its age.
    Refresh,

    /// Drop the cached impact dataset.
    Invalidate,
}
