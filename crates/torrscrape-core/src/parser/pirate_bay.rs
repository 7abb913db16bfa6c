//! Results page parser for The Pirate Bay
//!
//! Each row of `table#searchResult` that has data cells is one entry.

use regex::Regex;
use scraper::{ElementRef, Selector};

use super::{ParsedDocument, ParsedPage, element_text, non_empty_text, parse_count, swarm_pair};
use crate::types::{PirateBayResult, SearchResult, Site};
use crate::url::path_segment;

/// Selectors and patterns used to map one results row
struct EntryRules {
    container: Selector,
    row: Selector,
    cell: Selector,
    det_link: Selector,
    desc: Selector,
    desc_link: Selector,
    desc_anonymous: Selector,
    magnet: Selector,
    any_magnet: Selector,
    titled_img: Selector,
    vip: Selector,
    trusted: Selector,
    category: Selector,
    count_cell: Selector,
    comments: Regex,
    uploaded: Regex,
}

impl EntryRules {
    fn new() -> Option<Self> {
        Some(Self {
            container: Selector::parse("table#searchResult").ok()?,
            row: Selector::parse("tr").ok()?,
            cell: Selector::parse("td").ok()?,
            det_link: Selector::parse("a.detLink").ok()?,
            desc: Selector::parse("font.detDesc").ok()?,
            desc_link: Selector::parse("font.detDesc a").ok()?,
            desc_anonymous: Selector::parse("font.detDesc i").ok()?,
            magnet: Selector::parse(r#"a[title="Download this torrent using magnet"]"#).ok()?,
            any_magnet: Selector::parse(r#"a[href^="magnet:"]"#).ok()?,
            titled_img: Selector::parse("img[title]").ok()?,
            vip: Selector::parse(r#"img[title="VIP"]"#).ok()?,
            trusted: Selector::parse(r#"img[title="Trusted"]"#).ok()?,
            category: Selector::parse("td.vertTh a").ok()?,
            count_cell: Selector::parse(r#"td[align="right"]"#).ok()?,
            comments: Regex::new(r"This torrent has (\d+) comments?\.").ok()?,
            uploaded: Regex::new(r"Uploaded\s+(.+?),\s*Size\s+([^,]+)").ok()?,
        })
    }
}

/// Maps a Pirate Bay results page onto records
///
/// # Arguments
/// * `doc` - Parsed results page (search or top list)
/// * `mirror` - Normalised mirror base URL the page was fetched from
///
/// # Returns
/// Records in page order plus the number of rows skipped as malformed.
/// A page without `table#searchResult` yields no records.
pub fn parse_pirate_bay_page(doc: &ParsedDocument, mirror: &str) -> ParsedPage<PirateBayResult> {
    let Some(rules) = EntryRules::new() else {
        return ParsedPage::empty();
    };
    let Some(table) = doc.html().select(&rules.container).next() else {
        return ParsedPage::empty();
    };

    // Header rows carry only <th> cells
    let rows = table
        .select(&rules.row)
        .filter(|row| row.select(&rules.cell).next().is_some());

    ParsedPage::collect(rows, |row| parse_entry(row, mirror, &rules))
}

/// Checks that a landing page belongs to The Pirate Bay
pub fn is_pirate_bay_page(doc: &ParsedDocument) -> bool {
    doc.title()
        .map(|title| title.contains("Pirate Bay"))
        .unwrap_or(false)
}

fn parse_entry(row: ElementRef, mirror: &str, rules: &EntryRules) -> Option<PirateBayResult> {
    let det_link = row.select(&rules.det_link).next()?;

    // Fallback: title attribute reads "Details for <name>"
    let name = non_empty_text(&det_link)
        .or_else(|| name_from_details_title(det_link.value().attr("title")?))?;

    let id = det_link
        .value()
        .attr("href")
        .and_then(|href| path_segment(href, 1))?;
    let link = format!("{}/torrent/{}", mirror, id);

    let uploader = row
        .select(&rules.desc_link)
        .next()
        .or_else(|| row.select(&rules.desc_anonymous).next())
        .and_then(|el| non_empty_text(&el));

    let magnet = row
        .select(&rules.magnet)
        .next()
        .or_else(|| row.select(&rules.any_magnet).next())
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    let counts: Vec<Option<u32>> = row
        .select(&rules.count_cell)
        .take(2)
        .map(|td| parse_count(&element_text(&td)))
        .collect();
    let swarm = match counts.as_slice() {
        [seeders, leechers] => swarm_pair(*seeders, *leechers),
        _ => None,
    };

    let comments = row
        .select(&rules.titled_img)
        .filter_map(|img| {
            let title = img.value().attr("title")?;
            let caps = rules.comments.captures(title)?;
            parse_count(caps.get(1)?.as_str())
        })
        .next()
        .unwrap_or(0);

    let mut categories = row.select(&rules.category).map(|a| non_empty_text(&a));
    let category = categories.next().flatten();
    let subcategory = categories.next().flatten();

    let (date, size) = row
        .select(&rules.desc)
        .next()
        .and_then(|font| {
            let text = element_text(&font);
            let caps = rules.uploaded.captures(&text)?;
            Some((
                caps.get(1).map(|m| m.as_str().to_string()),
                caps.get(2).map(|m| m.as_str().trim().to_string()),
            ))
        })
        .unwrap_or((None, None));

    Some(PirateBayResult {
        base: SearchResult::new(Site::PirateBay, Some(name), link)
            .with_uploader(uploader)
            .with_magnet(magnet)
            .with_swarm(swarm),
        comments,
        is_trusted: row.select(&rules.trusted).next().is_some(),
        is_vip: row.select(&rules.vip).next().is_some(),
        category,
        subcategory,
        date,
        size,
    })
}

/// "Details for Ubuntu 22.04" -> "Ubuntu 22.04"
fn name_from_details_title(title: &str) -> Option<String> {
    let name = title.split_whitespace().skip(2).collect::<Vec<_>>().join(" ");
    if name.is_empty() { None } else { Some(name) }
}
