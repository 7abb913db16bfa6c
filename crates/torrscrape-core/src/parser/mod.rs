//! HTML parsers for torrent sites
//!
//! [`ParsedDocument`] wraps a parsed page; each site module maps the entry
//! nodes of a results page onto result records.

pub mod kickass;
pub mod nyaa;
pub mod pirate_bay;

pub use kickass::parse_kickass_page;
pub use nyaa::parse_nyaa_page;
pub use pirate_bay::parse_pirate_bay_page;

use scraper::{ElementRef, Html, Selector};

/// A fetched page, parsed and ready for selector queries
///
/// Created per fetch and consumed by the owning site's mapping; never
/// shared between requests.
#[derive(Debug)]
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    /// Parse a full HTML document
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// The underlying `scraper` document
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Trimmed text of the `<title>` element, if any
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| element_text(&el))
            .filter(|t| !t.is_empty())
    }

    /// First element matching a CSS selector
    pub fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(css).ok()?;
        self.html.select(&selector).next()
    }

    /// True when at least one element matches a CSS selector
    pub fn contains(&self, css: &str) -> bool {
        self.select_first(css).is_some()
    }
}

/// Records mapped from one results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage<T> {
    /// Records in the order their entries appear on the page
    pub records: Vec<T>,
    /// Entries skipped because a required node was missing
    pub malformed: usize,
}

impl<T> ParsedPage<T> {
    /// A page whose results container was not found
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            malformed: 0,
        }
    }

    /// Map each entry with `parse_entry`, counting the ones it rejects
    pub(crate) fn collect<'a, I, F>(entries: I, mut parse_entry: F) -> Self
    where
        I: IntoIterator<Item = ElementRef<'a>>,
        F: FnMut(ElementRef<'a>) -> Option<T>,
    {
        let mut page = Self::empty();
        for entry in entries {
            match parse_entry(entry) {
                Some(record) => page.records.push(record),
                None => page.malformed += 1,
            }
        }
        page
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ParsedPage<U> {
        ParsedPage {
            records: self.records.into_iter().map(f).collect(),
            malformed: self.malformed,
        }
    }
}

/// All text below an element with whitespace (including `&nbsp;`) collapsed
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`element_text`] but `None` for blank text
pub(crate) fn non_empty_text(element: &ElementRef) -> Option<String> {
    let text = element_text(element);
    if text.is_empty() { None } else { Some(text) }
}

/// Parse a displayed count such as "1,024" or " 17 "
pub(crate) fn parse_count(text: &str) -> Option<u32> {
    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Both halves of a seeders/leechers pair, or neither
pub(crate) fn swarm_pair(seeders: Option<u32>, leechers: Option<u32>) -> Option<(u32, u32)> {
    seeders.zip(leechers)
}
