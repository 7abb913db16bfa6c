//! URL helper functions for mirror-based sites
//!
//! Mirrors are plain base URLs; page URLs are built by appending a rendered
//! path template to the validated mirror.

/// Normalises a mirror base URL by trimming whitespace and trailing slashes
///
/// # Example
/// ```
/// use torrscrape_core::url::normalize_mirror;
/// assert_eq!(normalize_mirror(" https://tpb.example/ "), "https://tpb.example");
/// ```
pub fn normalize_mirror(mirror: &str) -> String {
    mirror.trim().trim_end_matches('/').to_string()
}

/// Renders a path template, substituting `{query}` and `{page}`
///
/// The query is percent-encoded before substitution.
///
/// # Example
/// ```
/// use torrscrape_core::url::render_template;
/// let path = render_template("/search/{query}/{page}/99/0", "ubuntu server", 2);
/// assert_eq!(path, "/search/ubuntu%20server/2/99/0");
/// ```
pub fn render_template(template: &str, query: &str, page: u32) -> String {
    let encoded = urlencoding::encode(query);
    template
        .replace("{query}", &encoded)
        .replace("{page}", &page.to_string())
}

/// Builds an absolute URL from a mirror base and a site-relative path
///
/// Paths that are already absolute are returned unchanged. Protocol-relative
/// paths (`//host/...`) take the mirror's scheme.
///
/// # Example
/// ```
/// use torrscrape_core::url::join_mirror;
/// assert_eq!(join_mirror("https://kat.example", "/ubuntu-t1.html"), "https://kat.example/ubuntu-t1.html");
/// assert_eq!(join_mirror("https://kat.example", "ubuntu-t1.html"), "https://kat.example/ubuntu-t1.html");
/// assert_eq!(join_mirror("https://kat.example", "//cdn.example/x.torrent"), "https://cdn.example/x.torrent");
/// ```
pub fn join_mirror(mirror: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if path.starts_with("//") {
        let scheme = mirror
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .unwrap_or("https");
        return format!("{}:{}", scheme, path);
    }
    let base = mirror.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Returns the `index`-th non-empty segment of a URL path
///
/// Query strings and fragments are ignored.
///
/// # Example
/// ```
/// use torrscrape_core::url::path_segment;
/// assert_eq!(path_segment("/torrent/6152351/Ubuntu_22.04", 1), Some("6152351"));
/// ```
pub fn path_segment(href: &str, index: usize) -> Option<&str> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.split('/').filter(|s| !s.is_empty()).nth(index)
}
