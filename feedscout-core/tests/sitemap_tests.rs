// Tests for sitemap pivoting

use feedscout_core::config::DEFAULT_PIVOT_KEYWORDS;
use feedscout_core::sitemap::{discover_from_sitemap, is_feed_like};
use feedscout_scanner::{Fetcher, FetcherConfig};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn keywords() -> Vec<String> {
    DEFAULT_PIVOT_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

fn quick_fetcher() -> Fetcher {
    Fetcher::new(FetcherConfig::default().with_request_delay(Duration::ZERO)).unwrap()
}

#[test]
fn test_keyword_alone_is_not_enough() {
    let k = keywords();
    assert!(!is_feed_like("https://x.example/export-centre", &k));
    assert!(!is_feed_like("https://x.example/listings/villa-123", &k));
}

#[test]
fn test_suffix_alone_is_not_enough() {
    assert!(!is_feed_like("https://x.example/page.xml", &["feed".to_string()]));
    assert!(is_feed_like("https://x.example/feed.xml", &["feed".to_string()]));
}

#[test]
fn test_keyword_match_is_case_insensitive() {
    assert!(is_feed_like("https://x.example/LISTINGS/feed", &keywords()));
    assert!(is_feed_like("https://x.example/Export/api/all", &keywords()));
}

#[tokio::test]
async fn test_discover_from_sitemap_index() {
    let mock_server = MockServer::start().await;
    let body = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://x.example/post-sitemap.xml</loc></sitemap>
  <sitemap><loc> https://x.example/feeds/properties.xml </loc></sitemap>
  <sitemap><loc>https://x.example/contact</loc></sitemap>
</sitemapindex>"#;

    Mock::given(method("GET"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;

    let fetcher = quick_fetcher();
    let urls = discover_from_sitemap(
        &fetcher,
        &format!("{}/sitemap_index.xml", mock_server.uri()),
        &keywords(),
    )
    .await;

    assert_eq!(
        urls,
        vec![
            "https://x.example/post-sitemap.xml".to_string(),
            "https://x.example/feeds/properties.xml".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_discover_from_missing_sitemap() {
    let mock_server = MockServer::start().await;
    let fetcher = quick_fetcher();
    let urls = discover_from_sitemap(
        &fetcher,
        &format!("{}/sitemap.xml", mock_server.uri()),
        &keywords(),
    )
    .await;
    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_discover_from_html_sitemap() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>Sitemap<br></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let fetcher = quick_fetcher();
    let urls = discover_from_sitemap(
        &fetcher,
        &format!("{}/sitemap.xml", mock_server.uri()),
        &keywords(),
    )
    .await;
    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_discover_from_unreachable_sitemap() {
    let fetcher = quick_fetcher();
    let urls = discover_from_sitemap(&fetcher, "http://127.0.0.1:1/sitemap.xml", &keywords()).await;
    assert!(urls.is_empty());
}
