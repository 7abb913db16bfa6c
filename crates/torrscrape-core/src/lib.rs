//! Torrent Search Scraper Core Library
//!
//! Provides one async search interface over several torrent sites whose
//! mirrors come and go.
//!
//! # Overview
//!
//! This crate provides:
//! - A document fetcher that turns a URL into a parsed HTML page or a failure
//! - A mirror validator that checks candidate mirrors concurrently and keeps
//!   the ones that are alive and really serve the expected site
//! - Per-site parsers mapping results pages onto a common [`SearchResult`]
//!   plus site-specific extensions
//! - The [`TorrentScraper`] contract, implemented once for every site by
//!   [`MirrorScraper`]
//!
//! # Example
//!
//! ```no_run
//! use torrscrape_core::{DocumentFetcher, PirateBay, Result, ScraperConfig, TorrentScraper};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ScraperConfig::with_mirrors([
//!         "https://thepiratebay.example",
//!         "https://tpb-mirror.example",
//!     ]);
//!     let scraper = PirateBay::connect(DocumentFetcher::new()?, &config).await;
//!
//!     for listing in scraper.search("ubuntu", 2).await? {
//!         let result = listing.result();
//!         println!("{:?} {:?}/{:?} {}", result.name, result.seeders, result.leechers, result.link);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Mirrors
//!
//! Validation happens once, when a scraper is built. A scraper whose
//! candidates all failed stays unusable: every search returns
//! [`ScrapeError::NoMirrorAvailable`] without touching the network. Build a
//! new scraper to try again.

mod client;
mod error;
pub mod parser;
pub mod proxy;
mod scraper;
pub mod sites;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, DocumentFetcher};

// Re-export error types
pub use error::{FetchFailure, Result, ScrapeError};

// Re-export parser types
pub use parser::{ParsedDocument, ParsedPage};

// Re-export mirror validation
pub use proxy::{MirrorPredicate, ProxyValidator};

// Re-export scraper contract
pub use crate::scraper::{MirrorScraper, ScraperConfig, ScraperState, SiteProfile, TorrentScraper};

// Re-export site scrapers and registry
pub use sites::{Kickass, Nyaa, PirateBay, connect, connect_by_code};

// Re-export data types
pub use types::{KickassResult, Listing, NyaaResult, PirateBayResult, SearchResult, Site};
