//! Results page parser for Nyaa mirrors

use scraper::{ElementRef, Selector};

use super::{ParsedDocument, ParsedPage, element_text, non_empty_text, parse_count, swarm_pair};
use crate::types::{NyaaResult, SearchResult, Site};
use crate::url::join_mirror;

struct EntryRules {
    container: Selector,
    row: Selector,
    first_cell_link: Selector,
    view_link: Selector,
    comments: Selector,
    download: Selector,
    magnet: Selector,
    center_cell: Selector,
}

impl EntryRules {
    fn new() -> Option<Self> {
        Some(Self {
            container: Selector::parse("table.torrent-list").ok()?,
            row: Selector::parse("tbody tr").ok()?,
            first_cell_link: Selector::parse("td:first-child a").ok()?,
            view_link: Selector::parse(r#"td[colspan="2"] a[href^="/view/"]"#).ok()?,
            comments: Selector::parse("a.comments").ok()?,
            download: Selector::parse(r#"a[href^="/download/"]"#).ok()?,
            magnet: Selector::parse(r#"a[href^="magnet:"]"#).ok()?,
            center_cell: Selector::parse("td.text-center").ok()?,
        })
    }
}

/// Maps a Nyaa results page onto records
///
/// Nyaa has no uploader column, so `uploader` is always absent. A page
/// without `table.torrent-list` yields no records.
pub fn parse_nyaa_page(doc: &ParsedDocument, mirror: &str) -> ParsedPage<NyaaResult> {
    let Some(rules) = EntryRules::new() else {
        return ParsedPage::empty();
    };
    let Some(table) = doc.html().select(&rules.container).next() else {
        return ParsedPage::empty();
    };

    ParsedPage::collect(table.select(&rules.row), |row| parse_entry(row, mirror, &rules))
}

/// Checks that a landing page is a Nyaa listing
pub fn is_nyaa_page(doc: &ParsedDocument) -> bool {
    doc.contains(r#"td[colspan="2"]"#)
}

fn parse_entry(row: ElementRef, mirror: &str, rules: &EntryRules) -> Option<NyaaResult> {
    // The title link is the last /view/ anchor; the comment counter links there too
    let title_link = row
        .select(&rules.view_link)
        .filter(|a| !a.value().classes().any(|c| c == "comments"))
        .last()?;
    let href = title_link.value().attr("href")?;

    let name = title_link
        .value()
        .attr("title")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| non_empty_text(&title_link));

    let category = row
        .select(&rules.first_cell_link)
        .next()
        .and_then(|a| a.value().attr("title"))
        .map(str::to_string);

    let comments = row
        .select(&rules.comments)
        .next()
        .and_then(|a| parse_count(&element_text(&a)))
        .unwrap_or(0);

    let magnet = row
        .select(&rules.magnet)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    let torrent_url = row
        .select(&rules.download)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| join_mirror(mirror, href));

    // Columns: links, size, date, seeders, leechers, completed
    let cells: Vec<String> = row
        .select(&rules.center_cell)
        .map(|td| element_text(&td))
        .collect();
    let cell = |i: usize| cells.get(i).filter(|t| !t.is_empty()).cloned();
    let count = |i: usize| cells.get(i).and_then(|t| parse_count(t));

    Some(NyaaResult {
        base: SearchResult::new(Site::Nyaa, name, join_mirror(mirror, href))
            .with_magnet(magnet)
            .with_swarm(swarm_pair(count(3), count(4))),
        comments,
        category,
        date: cell(2),
        size: cell(1),
        downloads: count(5),
        torrent_url,
    })
}
