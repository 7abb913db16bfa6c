//! Error types for torrent site scrapers
//!
//! Two layers: [`FetchFailure`] describes why a single document could not be
//! retrieved and never crosses the scraper contract, while [`ScrapeError`] is
//! what callers of a scraper actually see.

use reqwest::StatusCode;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::types::Site;

/// Error type for all scraper operations
///
/// Implements Display for human-readable messages and Serialize
/// so it can be handed to presentation layers as a plain string.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Every mirror candidate failed validation
    #[error("No usable mirror available for {site}")]
    NoMirrorAvailable { site: Site },

    /// Search query was empty or whitespace only
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Page limit must be at least one
    #[error("Invalid page limit: {0}")]
    InvalidPageLimit(u32),

    /// Site identifier did not match any known variant
    #[error("Unknown site: {0}")]
    UnknownSite(String),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl Serialize for ScrapeError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Reason a single document fetch produced nothing
///
/// Absorbed by the caller: a failed mirror candidate is dropped, a failed
/// results page contributes zero records.
#[derive(Error, Debug)]
pub enum FetchFailure {
    /// Connection error, timeout or body read failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },

    /// Body was empty or could not be decoded into a document
    #[error("undecodable body from {0}")]
    Decode(String),
}

impl FetchFailure {
    /// True when the failure was caused by the request timeout elapsing
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchFailure::Http(e) if e.is_timeout())
    }
}
