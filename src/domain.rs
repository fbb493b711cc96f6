// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Hostname to registrable domain and display name resolution.
//!
//! The registrable domain is approximated by the last two hostname labels;
//! the display name is the label(s) between any subdomain and the suffix,
//! title-cased:
//!
//! | hostname          | registrable domain | display name |
//! |-------------------|--------------------|--------------|
//! | `www.example.com` | `example.com`      | `Example`    |
//! | `bitcoin.org`     | `bitcoin.org`      | `Bitcoin`    |
//! | `localhost`       | `localhost`        | `Localhost`  |

use serde::{Deserialize, Serialize};
use url::Url;

/// Result of resolving a URL or hostname
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainInfo {
    /// Lowercased hostname the domain was derived from
    pub hostname: String,
    /// Last two labels of the hostname, e.g. `example.com`
    pub registrable_domain: String,
    /// Human-readable site name, e.g. `Example`
    pub display_name: String,
}

/// Resolves URLs and hostnames to [`DomainInfo`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainClassifier;

impl DomainClassifier {
    /// Resolves a full URL
    ///
    /// Returns `None` if the URL cannot be parsed or has no host.
    ///
    /// ```
    /// use terravue::DomainClassifier;
    ///
    /// let info = DomainClassifier::resolve("https://www.example.com/page").unwrap();
    /// assert_eq!(info.registrable_domain, "example.com");
    /// assert_eq!(info.display_name, "Example");
    /// ```
    pub fn resolve(url: &str) -> Option<DomainInfo> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        Self::resolve_host(host)
    }

    /// Resolves a bare hostname
    ///
    /// Returns `None` for an empty hostname.
    pub fn resolve_host(host: &str) -> Option<DomainInfo> {
        let hostname = host.trim().trim_end_matches('.').to_ascii_lowercase();
        let labels: Vec<&str> = hostname.split('.').filter(|l| !l.is_empty()).collect();
        if labels.is_empty() {
            return None;
        }

        let (registrable_domain, name) = if labels.len() > 2 {
            (
                labels[labels.len() - 2..].join("."),
                labels[1..labels.len() - 1].join("."),
            )
        } else {
            (labels.join("."), labels[0].to_string())
        };

        Some(DomainInfo {
            registrable_domain,
            display_name: title_case(&name),
            hostname,
        })
    }
}

/// Upper-cases the first character of each whitespace-separated word and
/// lower-cases the rest
///
/// ```
/// assert_eq!(terravue::domain::title_case("bLOG.example"), "Blog.example");
/// ```
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
