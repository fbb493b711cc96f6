// SPDX-FileCopyrightText: 2025 TerraVue contributors
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for remote and bundled resource fetches.

use std::time::Duration;

/// Errors that can occur while fetching one of the dataset documents.
///
/// `location` is the URL for HTTP sources and the file path for bundled
/// sources, so log lines always name the document that failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {source}")]
    Client {
        /// The underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The request could not be sent or the body could not be read.
    #[error("Request to {location} failed: {source}")]
    Request {
        /// URL of the document
        location: String,
        /// The underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("Request to {location} returned HTTP {status}")]
    Status {
        /// URL of the document
        location: String,
        /// HTTP status code
        status: u16,
    },

    /// The document body was not valid JSON for the expected shape.
    #[error("Failed to parse {location}: {source}")]
    Parse {
        /// URL or path of the document
        location: String,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The fetch did not complete within the configured timeout.
    #[error("Fetching {location} timed out after {timeout:?}")]
    Timeout {
        /// URL of the document
        location: String,
        /// The timeout that elapsed
        timeout: Duration,
    },

    /// A bundled document could not be read from disk.
    #[error("Failed to read {location}: {source}")]
    Io {
        /// Path of the document
        location: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Create a `Request` error for a document.
    pub fn request(location: impl Into<String>, source: reqwest::Error) -> Self {
        FetchError::Request {
            location: location.into(),
            source,
        }
    }

    /// Create a `Status` error for a non-2xx response.
    pub fn status(location: impl Into<String>, status: u16) -> Self {
        FetchError::Status {
            location: location.into(),
            status,
        }
    }

    /// Create a `Parse` error for a malformed document.
    pub fn parse(location: impl Into<String>, source: serde_json::Error) -> Self {
        FetchError::Parse {
            location: location.into(),
            source,
        }
    }

    /// Create a `Timeout` error.
    pub fn timeout(location: impl Into<String>, timeout: Duration) -> Self {
        FetchError::Timeout {
            location: location.into(),
            timeout,
        }
    }

    /// Create an `Io` error for a bundled document.
    pub fn io(location: impl Into<String>, source: std::io::Error) -> Self {
        FetchError::Io {
            location: location.into(),
            source,
        }
    }

    /// Returns `true` if the document was received but could not be parsed.
    pub fn is_parse(&self) -> bool {
        matches!(self, FetchError::Parse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_location_and_code() {
        let err = FetchError::status("https://example.org/links.json", 503);
        assert_eq!(
            err.to_string(),
            "Request to https://example.org/links.json returned HTTP 503"
        );
        assert!(!err.is_parse());
    }

    #[test]
    fn parse_error_is_flagged() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = FetchError::parse("links.json", source);
        assert!(err.is_parse());
        assert!(err.to_string().starts_with("Failed to parse links.json"));
    }
}
