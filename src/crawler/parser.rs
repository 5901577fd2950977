//! HTML link extraction
//!
//! Pulls `<a href>` targets out of a page and resolves them to absolute
//! URLs against the page's final URL. Document order is preserved.

use scraper::{Html, Selector};
use url::Url;

/// Extracts all hyperlink URLs from an HTML document
///
/// Relative hrefs are resolved against `base_url`; anchors, `mailto:`,
/// `tel:`, and `javascript:` targets are skipped. Returned URLs are
/// absolute but otherwise unvalidated — scheme and scope filtering is the
/// engine's job.
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute) = resolve_link(href, base_url) {
                    links.push(absolute);
                }
            }
        }
    }

    links
}

/// Resolves one href to an absolute URL, or None if it should be skipped
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    if href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    base_url.join(href).ok().map(|u| u.to_string())
}
