//! Scraper contract and the mirror-backed engine shared by all sites
//!
//! A [`MirrorScraper`] validates its mirror candidates once, at construction,
//! and then either holds a live mirror (`Ready`) or none (`Unusable`) for the
//! rest of its life. Sites only differ in the data supplied by their
//! [`SiteProfile`].

use std::fmt::Debug;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::client::DocumentFetcher;
use crate::error::{Result, ScrapeError};
use crate::parser::{ParsedDocument, ParsedPage};
use crate::proxy::{MirrorPredicate, ProxyValidator};
use crate::types::{Listing, Site};
use crate::url::{normalize_mirror, render_template};

/// Timeouts and mirror candidates for one scraper instance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Mirror base URLs, most preferred first
    pub mirrors: Vec<String>,
    /// Per-candidate timeout while validating mirrors (default: 15)
    pub proxy_timeout_secs: u64,
    /// Per-page timeout while fetching results (default: 15)
    pub fetch_timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            mirrors: Vec::new(),
            proxy_timeout_secs: 15,
            fetch_timeout_secs: 15,
        }
    }
}

impl ScraperConfig {
    /// Default timeouts with the given mirror candidates
    pub fn with_mirrors<I, S>(mirrors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mirrors: mirrors.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

/// Outcome of mirror validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScraperState {
    /// A validated mirror is held and searches may proceed
    Ready { mirror: String },
    /// No candidate passed validation; every search fails fast
    Unusable,
}

/// Common interface of all torrent site scrapers
#[async_trait]
pub trait TorrentScraper: Send + Sync + Debug {
    /// Site this scraper talks to
    fn site(&self) -> Site;

    /// True when a validated mirror is held. Performs no network I/O.
    fn can_search(&self) -> bool;

    /// Search the first `page_limit` result pages for `query`
    ///
    /// Records come back page by page, each page in document order.
    /// An empty vector means no matches.
    ///
    /// # Errors
    /// - `NoMirrorAvailable` if no mirror passed validation
    /// - `InvalidQuery` if the query is empty or whitespace only
    /// - `InvalidPageLimit` if `page_limit` is zero
    async fn search(&self, query: &str, page_limit: u32) -> Result<Vec<Listing>>;
}

/// Per-site data plugged into [`MirrorScraper`]
pub trait SiteProfile: Send + Sync + Debug + 'static {
    const SITE: Site;

    /// Search path template with `{query}` and `{page}` placeholders
    const SEARCH_TEMPLATE: &'static str;

    /// Number substituted for `{page}` on the first results page
    const FIRST_PAGE: u32;

    /// Checks that `mirror`'s landing page is really this site
    fn is_valid_mirror(doc: &ParsedDocument, mirror: &str) -> bool;

    /// Maps one results page onto records
    fn parse_page(doc: &ParsedDocument, mirror: &str) -> ParsedPage<Listing>;
}

/// Scraper for any site described by a [`SiteProfile`]
#[derive(Debug)]
pub struct MirrorScraper<P: SiteProfile> {
    fetcher: DocumentFetcher,
    fetch_timeout: Duration,
    state: ScraperState,
    _profile: PhantomData<P>,
}

impl<P: SiteProfile> MirrorScraper<P> {
    /// Validate the configured mirrors and keep the first live one
    ///
    /// Never fails: when no candidate survives the scraper is `Unusable`
    /// and its searches return `NoMirrorAvailable`.
    pub async fn connect(fetcher: DocumentFetcher, config: &ScraperConfig) -> Self {
        let candidates: Vec<String> = config
            .mirrors
            .iter()
            .map(|m| normalize_mirror(m))
            .filter(|m| !m.is_empty())
            .collect();

        let validator = ProxyValidator::new(
            fetcher.clone(),
            Duration::from_secs(config.proxy_timeout_secs),
        );
        let predicate: MirrorPredicate = Arc::new(P::is_valid_mirror);
        let valid = validator.validate(&candidates, predicate).await;

        let state = match valid.into_iter().next() {
            Some(mirror) => {
                info!(site = %P::SITE, %mirror, "using mirror");
                ScraperState::Ready { mirror }
            }
            None => {
                warn!(site = %P::SITE, candidates = candidates.len(), "no usable mirror");
                ScraperState::Unusable
            }
        };

        Self::with_state(fetcher, config, state)
    }

    /// Build a scraper with a known state, skipping validation
    pub fn with_state(fetcher: DocumentFetcher, config: &ScraperConfig, state: ScraperState) -> Self {
        Self {
            fetcher,
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            state,
            _profile: PhantomData,
        }
    }

    pub fn state(&self) -> &ScraperState {
        &self.state
    }

    /// The validated mirror, if any
    pub fn mirror(&self) -> Option<&str> {
        match &self.state {
            ScraperState::Ready { mirror } => Some(mirror),
            ScraperState::Unusable => None,
        }
    }

    fn require_mirror(&self) -> Result<&str> {
        self.mirror()
            .ok_or(ScrapeError::NoMirrorAvailable { site: P::SITE })
    }

    /// Fetch the given site-relative paths in order and concatenate their records
    ///
    /// Paths are pulled one at a time, so a long path sequence is never
    /// materialised up front. Pages that fail to load or lack a results
    /// container contribute nothing; the remaining pages are still mapped.
    ///
    /// # Errors
    /// - `NoMirrorAvailable` if no mirror passed validation
    pub async fn fetch_listings<I>(&self, paths: I) -> Result<Vec<Listing>>
    where
        I: IntoIterator<Item = String>,
    {
        let mirror = self.require_mirror()?;
        let mut listings = Vec::new();
        let mut pages = 0usize;

        for path in paths {
            pages += 1;
            let url = format!("{}{}", mirror, path);
            match self.fetcher.fetch(&url, self.fetch_timeout).await {
                Ok(doc) => {
                    let page = P::parse_page(&doc, mirror);
                    if page.malformed > 0 {
                        warn!(
                            site = %P::SITE,
                            %url,
                            skipped = page.malformed,
                            "skipped malformed entries"
                        );
                    }
                    debug!(site = %P::SITE, %url, records = page.records.len(), "page mapped");
                    listings.extend(page.records);
                }
                Err(failure) => {
                    warn!(site = %P::SITE, %url, error = %failure, "page fetch failed");
                }
            }
        }

        info!(site = %P::SITE, pages, results = listings.len(), "fetch finished");
        Ok(listings)
    }

    /// Site-relative paths of the first `page_limit` search pages, rendered lazily
    pub fn search_paths(query: &str, page_limit: u32) -> impl Iterator<Item = String> + Send + '_ {
        (0..page_limit)
            .map(move |i| render_template(P::SEARCH_TEMPLATE, query, P::FIRST_PAGE.saturating_add(i)))
    }
}

#[async_trait]
impl<P: SiteProfile> TorrentScraper for MirrorScraper<P> {
    fn site(&self) -> Site {
        P::SITE
    }

    fn can_search(&self) -> bool {
        matches!(self.state, ScraperState::Ready { .. })
    }

    async fn search(&self, query: &str, page_limit: u32) -> Result<Vec<Listing>> {
        self.require_mirror()?;

        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ScrapeError::InvalidQuery(
                "Search query cannot be empty".to_string(),
            ));
        }
        if page_limit == 0 {
            return Err(ScrapeError::InvalidPageLimit(page_limit));
        }

        self.fetch_listings(Self::search_paths(trimmed, page_limit))
            .await
    }
}
