//! HTTP document fetcher for torrent site mirrors
//!
//! One GET per call, bounded by a per-request timeout, decoded and parsed
//! into a [`ParsedDocument`]. No retries: a failed fetch is reported to the
//! caller, which treats the document as absent.

use std::time::Duration;

use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::error::{FetchFailure, Result};
use crate::parser::ParsedDocument;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Accept-Language header sent with every request (default: "en-US,en;q=0.8")
    pub accept_language: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.8".to_string(),
        }
    }
}

/// Fetches and parses documents from arbitrary mirror URLs
///
/// Cheap to clone: clones share the underlying connection pool, so one
/// fetcher can be handed to every concurrent validation worker.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: reqwest::Client,
}

impl DocumentFetcher {
    /// Create a new fetcher with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new fetcher with custom configuration
    ///
    /// # Errors
    /// Returns `HttpClient` if the underlying client cannot be built
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&config.accept_language) {
            headers.insert(ACCEPT_LANGUAGE, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch `url` and parse the body into a document
    ///
    /// # Arguments
    /// * `url` - Absolute URL to fetch
    /// * `timeout` - Upper bound for connecting, sending and reading the body
    ///
    /// # Errors
    /// - `FetchFailure::Http` - connection error, timeout or unreadable body
    /// - `FetchFailure::Status` - non-success HTTP status
    /// - `FetchFailure::Decode` - empty body
    pub async fn fetch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> std::result::Result<ParsedDocument, FetchFailure> {
        let response = self.client.get(url).timeout(timeout).send().await?;

        let status = response.status();
        debug!(%status, url, "fetched document");

        if !status.is_success() {
            return Err(FetchFailure::Status {
                status,
                url: url.to_string(),
            });
        }

        // text() honours the charset of the Content-Type header
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(FetchFailure::Decode(url.to_string()));
        }

        Ok(ParsedDocument::parse(&body))
    }
}
