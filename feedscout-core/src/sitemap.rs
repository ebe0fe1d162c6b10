// Sitemap pivot: find feed-like URLs listed in a site's sitemap

use crate::xml::XmlDocument;
use feedscout_scanner::Fetcher;
use tracing::debug;

/// Fetches `sitemap_url` and returns the `<loc>` entries that look like feeds.
/// Any failure (transport, non-200, malformed XML) yields an empty list.
pub async fn discover_from_sitemap(
    fetcher: &Fetcher,
    sitemap_url: &str,
    keywords: &[String],
) -> Vec<String> {
    let response = match fetcher.fetch(sitemap_url).await {
        Ok(response) => response,
        Err(e) => {
            debug!("Sitemap {} unavailable: {}", sitemap_url, e);
            return Vec::new();
        }
    };

    if !response.is_ok() {
        debug!("Sitemap {} returned HTTP {}", sitemap_url, response.status_code);
        return Vec::new();
    }

    match XmlDocument::parse(&response.body) {
        Ok(doc) => {
            let urls = extract_feed_locations(&doc, keywords);
            debug!("Sitemap {} lists {} feed-like URLs", sitemap_url, urls.len());
            urls
        }
        Err(e) => {
            debug!("Sitemap {} is not valid XML: {}", sitemap_url, e);
            Vec::new()
        }
    }
}

/// `<loc>` texts (any namespace, below the root) that pass [`is_feed_like`].
pub fn extract_feed_locations(doc: &XmlDocument, keywords: &[String]) -> Vec<String> {
    doc.descendants()
        .filter(|element| element.local_name == "loc")
        .map(|element| element.text.as_str())
        .filter(|url| !url.is_empty() && is_feed_like(url, keywords))
        .map(String::from)
        .collect()
}

/// A keyword must appear (case-insensitive), and then the URL must end in
/// `.xml` or contain `/feed` or `/api`. URLs matching only a keyword such as
/// "export" are dropped.
pub fn is_feed_like(url: &str, keywords: &[String]) -> bool {
    let lowered = url.to_lowercase();
    let has_keyword = keywords.iter().any(|k| lowered.contains(k.as_str()));
    has_keyword && (url.ends_with(".xml") || url.contains("/feed") || url.contains("/api"))
}
