//! Supported sites and the registry that builds their scrapers

use crate::client::DocumentFetcher;
use crate::error::Result;
use crate::parser::kickass::is_kickass_page;
use crate::parser::nyaa::is_nyaa_page;
use crate::parser::pirate_bay::is_pirate_bay_page;
use crate::parser::{
    ParsedDocument, ParsedPage, parse_kickass_page, parse_nyaa_page, parse_pirate_bay_page,
};
use crate::scraper::{MirrorScraper, ScraperConfig, SiteProfile, TorrentScraper};
use crate::types::{Listing, Site};

/// The Pirate Bay: `/search/<query>/<page>/99/0`, pages counted from 0
#[derive(Debug)]
pub struct PirateBayProfile;

impl SiteProfile for PirateBayProfile {
    const SITE: Site = Site::PirateBay;
    const SEARCH_TEMPLATE: &'static str = "/search/{query}/{page}/99/0";
    const FIRST_PAGE: u32 = 0;

    fn is_valid_mirror(doc: &ParsedDocument, _mirror: &str) -> bool {
        is_pirate_bay_page(doc)
    }

    fn parse_page(doc: &ParsedDocument, mirror: &str) -> ParsedPage<Listing> {
        parse_pirate_bay_page(doc, mirror).map(Listing::from)
    }
}

/// KickassTorrents: `/usearch/<query>/<page>/`, pages counted from 1
#[derive(Debug)]
pub struct KickassProfile;

impl SiteProfile for KickassProfile {
    const SITE: Site = Site::Kickass;
    const SEARCH_TEMPLATE: &'static str = "/usearch/{query}/{page}/";
    const FIRST_PAGE: u32 = 1;

    fn is_valid_mirror(doc: &ParsedDocument, mirror: &str) -> bool {
        is_kickass_page(doc, mirror)
    }

    fn parse_page(doc: &ParsedDocument, mirror: &str) -> ParsedPage<Listing> {
        parse_kickass_page(doc, mirror).map(Listing::from)
    }
}

/// Nyaa: results sorted by seeders, pages counted from 1
#[derive(Debug)]
pub struct NyaaProfile;

impl SiteProfile for NyaaProfile {
    const SITE: Site = Site::Nyaa;
    const SEARCH_TEMPLATE: &'static str = "/?f=0&c=0_0&q={query}&s=seeders&o=desc&p={page}";
    const FIRST_PAGE: u32 = 1;

    fn is_valid_mirror(doc: &ParsedDocument, _mirror: &str) -> bool {
        is_nyaa_page(doc)
    }

    fn parse_page(doc: &ParsedDocument, mirror: &str) -> ParsedPage<Listing> {
        parse_nyaa_page(doc, mirror).map(Listing::from)
    }
}

pub type PirateBay = MirrorScraper<PirateBayProfile>;
pub type Kickass = MirrorScraper<KickassProfile>;
pub type Nyaa = MirrorScraper<NyaaProfile>;

const TOP_48H_PATH: &str = "/top/48hall";
const TOP_100_PATH: &str = "/top/all";

impl MirrorScraper<PirateBayProfile> {
    /// Most popular torrents of the last 48 hours
    ///
    /// # Errors
    /// - `NoMirrorAvailable` if no mirror passed validation
    pub async fn top_48h(&self) -> Result<Vec<Listing>> {
        self.fetch_listings([TOP_48H_PATH.to_string()]).await
    }

    /// Top 100 torrents of all time
    ///
    /// # Errors
    /// - `NoMirrorAvailable` if no mirror passed validation
    pub async fn top_100(&self) -> Result<Vec<Listing>> {
        self.fetch_listings([TOP_100_PATH.to_string()]).await
    }
}

/// Build and validate the scraper for `site`
///
/// Mirror validation runs here; the returned scraper may be unusable, which
/// callers detect through [`TorrentScraper::can_search`].
///
/// # Example
/// ```no_run
/// # async fn example() -> torrscrape_core::Result<()> {
/// use torrscrape_core::{DocumentFetcher, ScraperConfig, Site, TorrentScraper, connect};
///
/// let config = ScraperConfig::with_mirrors(["https://nyaa.si"]);
/// let scraper = connect(Site::Nyaa, DocumentFetcher::new()?, &config).await;
/// if scraper.can_search() {
///     for listing in scraper.search("ubuntu", 1).await? {
///         println!("{:?}", listing.result().name);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub async fn connect(
    site: Site,
    fetcher: DocumentFetcher,
    config: &ScraperConfig,
) -> Box<dyn TorrentScraper> {
    match site {
        Site::PirateBay => Box::new(PirateBay::connect(fetcher, config).await),
        Site::Kickass => Box::new(Kickass::connect(fetcher, config).await),
        Site::Nyaa => Box::new(Nyaa::connect(fetcher, config).await),
    }
}

/// Like [`connect`], resolving the site from its short code or name
///
/// # Errors
/// - `UnknownSite` if `code` names no supported site
pub async fn connect_by_code(
    code: &str,
    fetcher: DocumentFetcher,
    config: &ScraperConfig,
) -> Result<Box<dyn TorrentScraper>> {
    let site: Site = code.parse()?;
    Ok(connect(site, fetcher, config).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::scraper::ScraperState;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(mirrors: Vec<String>) -> ScraperConfig {
        ScraperConfig {
            mirrors,
            proxy_timeout_secs: 2,
            fetch_timeout_secs: 2,
        }
    }

    async fn mount(server: &MockServer, at: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    fn tpb_row(id: u32, name: Option<&str>) -> String {
        let link = match name {
            Some(name) => format!(
                r#"<div class="detName"><a href="/torrent/{id}/{name}" class="detLink" title="Details for {name}">{name}</a></div>"#
            ),
            None => String::new(),
        };
        format!(
            r#"<tr>
                <td class="vertTh"><a href="/browse/300">Applications</a><a href="/browse/303">UNIX</a></td>
                <td>{link}
                    <a href="magnet:?xt=urn:btih:{id}" title="Download this torrent using magnet">m</a>
                    <font class="detDesc">Uploaded 01-02&nbsp;2024, Size 3.1&nbsp;GiB, ULed by <a href="/user/u/">u</a></font>
                </td>
                <td align="right">10</td>
                <td align="right">2</td>
            </tr>"#
        )
    }

    fn tpb_page(rows: &[String]) -> String {
        format!(
            r#"<html><head><title>The Pirate Bay</title></head><body>
                <table id="searchResult">
                    <thead id="tableHead"><tr class="header"><th>Type</th><th>Name</th><th>SE</th><th>LE</th></tr></thead>
                    {}
                </table></body></html>"#,
            rows.join("\n")
        )
    }

    async fn tpb_mirror() -> MockServer {
        let server = MockServer::start().await;
        mount(
            &server,
            "/",
            "<html><head><title>The Pirate Bay - The galaxy's most resilient bittorrent site</title></head></html>"
                .to_string(),
        )
        .await;
        server
    }

    #[tokio::test]
    async fn test_tpb_search_skips_nameless_entry() {
        let server = tpb_mirror().await;
        mount(
            &server,
            "/search/ubuntu/0/99/0",
            tpb_page(&[
                tpb_row(1, Some("Ubuntu_22.04")),
                tpb_row(2, None),
                tpb_row(3, Some("Ubuntu_24.04")),
            ]),
        )
        .await;

        let scraper = PirateBay::connect(DocumentFetcher::new().unwrap(), &config(vec![server.uri()])).await;
        let results = scraper.search("ubuntu", 1).await.expect("search should succeed");

        assert_eq!(results.len(), 2);
        let names: Vec<_> = results
            .iter()
            .map(|l| l.result().name.clone().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["Ubuntu_22.04", "Ubuntu_24.04"]);
        assert_eq!(results[0].result().link, format!("{}/torrent/1", server.uri()));
        match &results[1] {
            Listing::PirateBay(r) => {
                assert_eq!(r.size.as_deref(), Some("3.1 GiB"));
                assert_eq!(r.category.as_deref(), Some("Applications"));
            }
            other => panic!("Expected Pirate Bay listing, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tpb_top_lists() {
        let server = tpb_mirror().await;
        mount(&server, "/top/48hall", tpb_page(&[tpb_row(48, Some("Recent"))])).await;
        mount(&server, "/top/all", tpb_page(&[tpb_row(100, Some("AllTime"))])).await;

        let scraper = PirateBay::connect(DocumentFetcher::new().unwrap(), &config(vec![server.uri()])).await;

        let recent = scraper.top_48h().await.unwrap();
        assert_eq!(recent[0].result().name.as_deref(), Some("Recent"));
        let all_time = scraper.top_100().await.unwrap();
        assert_eq!(all_time[0].result().name.as_deref(), Some("AllTime"));
    }

    #[tokio::test]
    async fn test_tpb_top_list_requires_mirror() {
        let scraper = PirateBay::connect(DocumentFetcher::new().unwrap(), &config(vec![])).await;
        assert!(matches!(
            scraper.top_48h().await,
            Err(ScrapeError::NoMirrorAvailable { site: Site::PirateBay })
        ));
    }

    #[tokio::test]
    async fn test_kickass_search_uses_one_based_pages() {
        let server = MockServer::start().await;
        let landing = format!(
            r#"<html><body><a href="{}/full/">logo</a></body></html>"#,
            server.uri()
        );
        mount(&server, "/", landing).await;
        mount(
            &server,
            "/usearch/debian/1/",
            r#"<html><body><table class="data">
                <tr class="odd">
                    <td><a href="/debian-12-t9.html" class="cellMainLink">Debian 12</a>
                        <span class="lightgrey">Posted by debian in Applications</span></td>
                    <td class="center">600 MB</td><td class="center">1 year</td>
                    <td class="center">40</td><td class="center">3</td>
                </tr>
            </table></body></html>"#
                .to_string(),
        )
        .await;

        let scraper = Kickass::connect(DocumentFetcher::new().unwrap(), &config(vec![server.uri()])).await;
        let results = scraper.search("debian", 1).await.unwrap();

        assert_eq!(results.len(), 1);
        let result = results[0].result();
        assert_eq!(result.site, Site::Kickass);
        assert_eq!(result.link, format!("{}/debian-12-t9.html", server.uri()));
        assert_eq!(result.uploader.as_deref(), Some("debian"));
        assert_eq!(result.seeders, Some(40));
    }

    #[tokio::test]
    async fn test_nyaa_search() {
        let server = MockServer::start().await;
        let page = r#"<html><body><table class="table torrent-list"><tbody>
            <tr class="default">
                <td><a href="/?c=1_2" title="Anime"></a></td>
                <td colspan="2"><a href="/view/55" title="Show - 01">Show - 01</a></td>
                <td class="text-center"><a href="magnet:?xt=urn:btih:55">m</a></td>
                <td class="text-center">700 MiB</td>
                <td class="text-center">2024-01-01 10:00</td>
                <td class="text-center">9</td>
                <td class="text-center">1</td>
                <td class="text-center">80</td>
            </tr>
        </tbody></table></body></html>"#;
        // Validation hits the mirror root, searches hit "/nyaa/" with a query string
        let mirror = format!("{}/nyaa", server.uri());
        mount(&server, "/nyaa", page.to_string()).await;
        Mock::given(method("GET"))
            .and(path("/nyaa/"))
            .and(query_param("q", "show"))
            .and(query_param("p", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page))
            .mount(&server)
            .await;

        let scraper = Nyaa::connect(DocumentFetcher::new().unwrap(), &config(vec![mirror.clone()])).await;
        let results = scraper.search("show", 1).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].result().link, format!("{}/view/55", mirror));
        assert_eq!(results[0].result().uploader, None);
    }

    #[tokio::test]
    async fn test_registry_builds_requested_site() {
        let scraper = connect(Site::Kickass, DocumentFetcher::new().unwrap(), &config(vec![])).await;
        assert_eq!(scraper.site(), Site::Kickass);
        assert!(!scraper.can_search());
    }

    #[tokio::test]
    async fn test_registry_rejects_unknown_code() {
        let result = connect_by_code("rarbg", DocumentFetcher::new().unwrap(), &config(vec![])).await;
        assert!(matches!(result, Err(ScrapeError::UnknownSite(_))));
    }

    #[tokio::test]
    async fn test_registry_by_code_validates_mirrors() {
        let server = tpb_mirror().await;
        let scraper = connect_by_code("tpb", DocumentFetcher::new().unwrap(), &config(vec![server.uri()]))
            .await
            .unwrap();
        assert!(scraper.can_search());
    }

    #[test]
    fn test_profiles_render_expected_paths() {
        assert_eq!(PirateBay::search_paths("a b", 2).collect::<Vec<_>>(), vec!["/search/a%20b/0/99/0", "/search/a%20b/1/99/0"]);
        assert_eq!(Kickass::search_paths("x", 1).collect::<Vec<_>>(), vec!["/usearch/x/1/"]);
        assert_eq!(Nyaa::search_paths("x", 1).collect::<Vec<_>>(), vec!["/?f=0&c=0_0&q=x&s=seeders&o=desc&p=1"]);
    }

    #[test]
    fn test_with_state_ready() {
        let scraper = Nyaa::with_state(
            DocumentFetcher::new().unwrap(),
            &ScraperConfig::default(),
            ScraperState::Ready {
                mirror: "https://nyaa.example".to_string(),
            },
        );
        assert!(scraper.can_search());
        assert_eq!(scraper.site(), Site::Nyaa);
    }
}
