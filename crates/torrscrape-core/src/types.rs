//! Core data types for torrent site scrapers
//!
//! [`SearchResult`] is the record every site produces. Sites that expose more
//! metadata wrap it in an extended record ([`PirateBayResult`],
//! [`KickassResult`], [`NyaaResult`]) and [`Listing`] carries whichever one a
//! scraper returned.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Supported torrent sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    PirateBay,
    Kickass,
    Nyaa,
}

impl Site {
    /// All supported sites, in registry order
    pub const ALL: [Site; 3] = [Site::PirateBay, Site::Kickass, Site::Nyaa];

    /// Short code used on the command line and in configuration
    pub fn code(self) -> &'static str {
        match self {
            Site::PirateBay => "tpb",
            Site::Kickass => "kat",
            Site::Nyaa => "nyaa",
        }
    }

    /// Human-readable site name
    pub fn name(self) -> &'static str {
        match self {
            Site::PirateBay => "The Pirate Bay",
            Site::Kickass => "KickassTorrents",
            Site::Nyaa => "Nyaa",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Site {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Site::ALL
            .into_iter()
            .find(|site| {
                site.code().eq_ignore_ascii_case(wanted) || site.name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ScrapeError::UnknownSite(wanted.to_string()))
    }
}

/// A torrent listing as reported by any site
///
/// Value object: holds no reference to the page or mirror it came from.
/// `seeders` and `leechers` are either both set or both absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Site the listing was scraped from
    pub site: Site,

    /// Torrent title
    pub name: Option<String>,

    /// Uploader name, absent on sites without uploader metadata
    pub uploader: Option<String>,

    /// Absolute URL of the torrent's detail page on the validated mirror
    pub link: String,

    /// Magnet URI, absent when the page only links a `.torrent` file
    pub magnet_link: Option<String>,

    pub seeders: Option<u32>,

    pub leechers: Option<u32>,
}

impl SearchResult {
    /// Create a result with only the required fields set
    pub fn new(site: Site, name: Option<String>, link: impl Into<String>) -> Self {
        Self {
            site,
            name,
            uploader: None,
            link: link.into(),
            magnet_link: None,
            seeders: None,
            leechers: None,
        }
    }

    pub fn with_uploader(mut self, uploader: Option<String>) -> Self {
        self.uploader = uploader;
        self
    }

    pub fn with_magnet(mut self, magnet_link: Option<String>) -> Self {
        self.magnet_link = magnet_link;
        self
    }

    /// Set swarm health as a pair so seeders never appear without leechers
    pub fn with_swarm(mut self, swarm: Option<(u32, u32)>) -> Self {
        self.seeders = swarm.map(|(s, _)| s);
        self.leechers = swarm.map(|(_, l)| l);
        self
    }
}

/// The Pirate Bay listing with uploader status and table metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PirateBayResult {
    #[serde(flatten)]
    pub base: SearchResult,

    /// Number of comments, zero when the comment icon is missing
    pub comments: u32,

    /// Uploader carries the "Trusted" badge
    pub is_trusted: bool,

    /// Uploader carries the "VIP" badge
    pub is_vip: bool,

    pub category: Option<String>,

    pub subcategory: Option<String>,

    /// Upload date as displayed by the site (e.g., "03-14 2019")
    pub date: Option<String>,

    /// Size as displayed by the site (e.g., "1.4 GiB")
    pub size: Option<String>,
}

/// KickassTorrents listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickassResult {
    #[serde(flatten)]
    pub base: SearchResult,

    pub comments: u32,

    /// Torrent carries the "Verified Torrent" badge
    pub is_verified: bool,

    pub category: Option<String>,

    pub date: Option<String>,

    pub size: Option<String>,
}

/// Nyaa listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NyaaResult {
    #[serde(flatten)]
    pub base: SearchResult,

    pub comments: u32,

    pub category: Option<String>,

    pub date: Option<String>,

    pub size: Option<String>,

    /// Completed download count
    pub downloads: Option<u32>,

    /// Absolute URL of the `.torrent` file
    pub torrent_url: Option<String>,
}

/// Record returned by any scraper: the base result plus site extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing {
    PirateBay(PirateBayResult),
    Kickass(KickassResult),
    Nyaa(NyaaResult),
}

impl Listing {
    /// Borrow the common part of the record
    pub fn result(&self) -> &SearchResult {
        match self {
            Listing::PirateBay(r) => &r.base,
            Listing::Kickass(r) => &r.base,
            Listing::Nyaa(r) => &r.base,
        }
    }

    /// Drop the site extensions and keep the common record
    pub fn into_result(self) -> SearchResult {
        match self {
            Listing::PirateBay(r) => r.base,
            Listing::Kickass(r) => r.base,
            Listing::Nyaa(r) => r.base,
        }
    }

    pub fn site(&self) -> Site {
        self.result().site
    }
}

impl From<PirateBayResult> for Listing {
    fn from(result: PirateBayResult) -> Self {
        Listing::PirateBay(result)
    }
}

impl From<KickassResult> for Listing {
    fn from(result: KickassResult) -> Self {
        Listing::Kickass(result)
    }
}

impl From<NyaaResult> for Listing {
    fn from(result: NyaaResult) -> Self {
        Listing::Nyaa(result)
    }
}
