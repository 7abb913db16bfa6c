//! Results page parser for KickassTorrents mirrors

use regex::Regex;
use scraper::{ElementRef, Selector};

use super::{ParsedDocument, ParsedPage, element_text, non_empty_text, parse_count, swarm_pair};
use crate::types::{KickassResult, SearchResult, Site};
use crate::url::join_mirror;

struct EntryRules {
    container: Selector,
    row: Selector,
    main_link: Selector,
    posted: Selector,
    verified: Selector,
    comments: Selector,
    magnet: Selector,
    center_cell: Selector,
    posted_by: Regex,
}

impl EntryRules {
    fn new() -> Option<Self> {
        Some(Self {
            container: Selector::parse("table.data").ok()?,
            row: Selector::parse("tr.odd, tr.even").ok()?,
            main_link: Selector::parse("a.cellMainLink").ok()?,
            posted: Selector::parse("span.lightgrey").ok()?,
            verified: Selector::parse(r#"a[title="Verified Torrent"]"#).ok()?,
            comments: Selector::parse("a.icommentjs").ok()?,
            magnet: Selector::parse(r#"a[title="Torrent magnet link"]"#).ok()?,
            center_cell: Selector::parse("td.center").ok()?,
            posted_by: Regex::new(r"(?:by\s+(\S+)\s+)?in\s+(.+)$").ok()?,
        })
    }
}

/// Maps a KickassTorrents results page onto records
///
/// A page without `table.data` yields no records.
pub fn parse_kickass_page(doc: &ParsedDocument, mirror: &str) -> ParsedPage<KickassResult> {
    let Some(rules) = EntryRules::new() else {
        return ParsedPage::empty();
    };
    let Some(table) = doc.html().select(&rules.container).next() else {
        return ParsedPage::empty();
    };

    ParsedPage::collect(table.select(&rules.row), |row| parse_entry(row, mirror, &rules))
}

/// Checks that a landing page belongs to the KickassTorrents mirror at `mirror`
///
/// The mirror's first anchor is its logo, linking to the mirror's own
/// "/full/" listing. A logo pointing at another host is rejected.
pub fn is_kickass_page(doc: &ParsedDocument, mirror: &str) -> bool {
    let base = format!("{}/", mirror.trim_end_matches('/'));
    doc.select_first("a[href]")
        .and_then(|a| a.value().attr("href"))
        .map(|href| join_mirror(mirror, href))
        .map(|url| url.starts_with(&base) && url.trim_end_matches('/').ends_with("/full"))
        .unwrap_or(false)
}

fn parse_entry(row: ElementRef, mirror: &str, rules: &EntryRules) -> Option<KickassResult> {
    let main_link = row.select(&rules.main_link).next()?;
    let href = main_link.value().attr("href")?;

    // Highlighted names carry a "[[...]]" suffix after the title
    let name = non_empty_text(&main_link)
        .and_then(|text| {
            let head = text.split("[[").next().unwrap_or_default().trim();
            if head.is_empty() { None } else { Some(head.to_string()) }
        })
        .or_else(|| main_link.value().attr("title").map(str::to_string))?;

    let (uploader, category) = row
        .select(&rules.posted)
        .next()
        .and_then(|span| {
            let text = element_text(&span);
            let caps = rules.posted_by.captures(&text)?;
            Some((
                caps.get(1).map(|m| m.as_str().to_string()),
                caps.get(2).map(|m| m.as_str().trim().to_string()),
            ))
        })
        .unwrap_or((None, None));

    let magnet = row
        .select(&rules.magnet)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    let cells: Vec<String> = row
        .select(&rules.center_cell)
        .map(|td| element_text(&td))
        .collect();
    let cell = |i: usize| cells.get(i).filter(|t| !t.is_empty()).cloned();
    let swarm = swarm_pair(
        cells.get(2).and_then(|t| parse_count(t)),
        cells.get(3).and_then(|t| parse_count(t)),
    );

    let comments = row
        .select(&rules.comments)
        .next()
        .and_then(|a| parse_count(&element_text(&a)))
        .unwrap_or(0);

    Some(KickassResult {
        base: SearchResult::new(Site::Kickass, Some(name), join_mirror(mirror, href))
            .with_uploader(uploader)
            .with_magnet(magnet)
            .with_swarm(swarm),
        comments,
        is_verified: row.select(&rules.verified).next().is_some(),
        category,
        date: cell(1),
        size: cell(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIRROR: &str = "https://kat.example";

    const ENTRY: &str = r##"
        <tr class="odd" id="torrent_ubuntu">
            <td>
                <div class="iaconbox">
                    <a class="icommentjs" href="/ubuntu-t123.html#comment">3</a>
                    <a title="Verified Torrent" href="#"><i class="ka ka-verify"></i></a>
                    <a title="Torrent magnet link" href="magnet:?xt=urn:btih:kat1"><i class="ka ka-magnet"></i></a>
                </div>
                <div class="torrentname">
                    <a href="/ubuntu-22-04-t123.html" class="cellMainLink">Ubuntu 22.04 LTS</a>
                    <span class="font11px lightgrey block">Posted by <a href="/user/canonical/">canonical</a> in <span><a href="/applications/">Applications</a></span></span>
                </div>
            </td>
            <td class="nobr center">1.4 GB</td>
            <td class="center">2&nbsp;years</td>
            <td class="green center">120</td>
            <td class="red lasttd center">8</td>
        </tr>
    "##;

    fn page(rows: &[String]) -> ParsedDocument {
        ParsedDocument::parse(&format!(
            r#"<html><body><table class="data">
                <tr class="firstr"><th>torrent name</th><th>size</th><th>age</th><th>seed</th><th>leech</th></tr>
                {}
            </table></body></html>"#,
            rows.join("\n")
        ))
    }

    #[test]
    fn test_parse_full_entry() {
        let parsed = parse_kickass_page(&page(&[ENTRY.to_string()]), MIRROR);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.malformed, 0);

        let result = &parsed.records[0];
        assert_eq!(result.base.site, Site::Kickass);
        assert_eq!(result.base.name.as_deref(), Some("Ubuntu 22.04 LTS"));
        assert_eq!(result.base.link, "https://kat.example/ubuntu-22-04-t123.html");
        assert_eq!(result.base.uploader.as_deref(), Some("canonical"));
        assert_eq!(result.base.magnet_link.as_deref(), Some("magnet:?xt=urn:btih:kat1"));
        assert_eq!(result.base.seeders, Some(120));
        assert_eq!(result.base.leechers, Some(8));
        assert_eq!(result.comments, 3);
        assert!(result.is_verified);
        assert_eq!(result.category.as_deref(), Some("Applications"));
        assert_eq!(result.size.as_deref(), Some("1.4 GB"));
        assert_eq!(result.date.as_deref(), Some("2 years"));
    }

    #[test]
    fn test_even_rows_and_order() {
        let second = ENTRY
            .replace("class=\"odd\"", "class=\"even\"")
            .replace("ubuntu-22-04-t123", "debian-12-t456")
            .replace("Ubuntu 22.04 LTS", "Debian 12");
        let parsed = parse_kickass_page(&page(&[ENTRY.to_string(), second]), MIRROR);

        let names: Vec<_> = parsed
            .records
            .iter()
            .map(|r| r.base.name.clone().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["Ubuntu 22.04 LTS", "Debian 12"]);
    }

    #[test]
    fn test_highlighted_name_is_cut() {
        let highlighted = ENTRY.replace(
            ">Ubuntu 22.04 LTS</a>",
            "><strong>Ubuntu</strong> 22.04 LTS [[ubuntu]]</a>",
        );
        let parsed = parse_kickass_page(&page(&[highlighted]), MIRROR);
        assert_eq!(parsed.records[0].base.name.as_deref(), Some("Ubuntu 22.04 LTS"));
    }

    #[test]
    fn test_missing_badges_and_comments() {
        let plain = ENTRY
            .replace(r#"<a class="icommentjs" href="/ubuntu-t123.html#comment">3</a>"#, "")
            .replace(r##"<a title="Verified Torrent" href="#"><i class="ka ka-verify"></i></a>"##, "");
        let parsed = parse_kickass_page(&page(&[plain]), MIRROR);

        let result = &parsed.records[0];
        assert!(!result.is_verified);
        assert_eq!(result.comments, 0);
        assert_eq!(result.base.seeders, Some(120));
        assert_eq!(result.base.uploader.as_deref(), Some("canonical"));
    }

    #[test]
    fn test_entry_without_main_link_is_skipped() {
        let broken = ENTRY.replace("class=\"cellMainLink\"", "class=\"renamed\"");
        let parsed = parse_kickass_page(&page(&[broken, ENTRY.to_string()]), MIRROR);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.malformed, 1);
    }

    #[test]
    fn test_missing_table() {
        let doc = ParsedDocument::parse("<html><body><p>Nothing found!</p></body></html>");
        assert_eq!(parse_kickass_page(&doc, MIRROR), ParsedPage::empty());
    }

    #[test]
    fn test_is_kickass_page() {
        let real = ParsedDocument::parse(
            r#"<html><body><a href="https://kat.example/full/"><img alt="logo"></a><a href="/other">x</a></body></html>"#,
        );
        let relative = ParsedDocument::parse(r#"<html><body><a href="/full/">KAT</a></body></html>"#);
        let parked = ParsedDocument::parse(r#"<html><body><a href="/buy-this-domain">Buy</a></body></html>"#);
        assert!(is_kickass_page(&real, MIRROR));
        assert!(is_kickass_page(&relative, MIRROR));
        assert!(!is_kickass_page(&parked, MIRROR));
    }

    #[test]
    fn test_logo_linking_elsewhere_is_rejected() {
        let foreign = ParsedDocument::parse(
            r#"<html><body><a href="https://unrelated.example/full/"><img alt="logo"></a></body></html>"#,
        );
        let lookalike = ParsedDocument::parse(
            r#"<html><body><a href="https://kat.example.parked.example/full/">x</a></body></html>"#,
        );
        let protocol_relative = ParsedDocument::parse(
            r#"<html><body><a href="//unrelated.example/full/">x</a></body></html>"#,
        );
        assert!(!is_kickass_page(&foreign, MIRROR));
        assert!(!is_kickass_page(&lookalike, MIRROR));
        assert!(!is_kickass_page(&protocol_relative, MIRROR));
    }
}
