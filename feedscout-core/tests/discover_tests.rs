// Tests for per-domain discovery against a mock agency site

use feedscout_core::config::DiscoveryConfig;
use feedscout_core::discover::{FeedDiscovery, apply_response, classify_body};
use feedscout_core::model::{FeedCandidate, FeedType};
use feedscout_scanner::{FetchResponse, Fetcher, FetcherConfig};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTINGS_FEED: &str = "<properties>\
    <property><price>1</price><bedrooms>2</bedrooms><location>A</location></property>\
    <property><price>1</price><bedrooms>2</bedrooms><location>A</location></property>\
    <property><price>1</price><bedrooms>2</bedrooms><location>A</location></property>\
    </properties>";

fn discovery(patterns: &[&str], sitemaps: &[&str]) -> FeedDiscovery {
    let fetcher = Fetcher::new(
        FetcherConfig::default()
            .with_request_delay(Duration::ZERO)
            .with_timeout(Duration::from_secs(2)),
    )
    .unwrap();
    let config = DiscoveryConfig::default()
        .with_scheme("http")
        .with_feed_patterns(patterns)
        .with_sitemap_paths(sitemaps);
    FeedDiscovery::new(fetcher, config)
}

fn domain_of(server: &MockServer) -> String {
    server.address().to_string()
}

fn xml(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/xml")
        .set_body_string(body)
}

// ============================================================================
// Single URL inspection
// ============================================================================

#[tokio::test]
async fn test_inspect_not_found() {
    let mock_server = MockServer::start().await;
    let discovery = discovery(&[], &[]);
    let url = format!("{}/feed.xml", mock_server.uri());

    let candidate = discovery.inspect(&url, "agency.example").await;

    assert_eq!(candidate.status_code, Some(404));
    assert_eq!(candidate.error.as_deref(), Some("HTTP 404"));
    assert!(!candidate.is_valid_xml);
    assert_eq!(candidate.confidence_score, 0);
}

#[tokio::test]
async fn test_inspect_html_page_is_invalid_xml() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html><body><p>Page not found<br></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let discovery = discovery(&[], &[]);
    let candidate = discovery
        .inspect(&format!("{}/xml", mock_server.uri()), "agency.example")
        .await;

    assert_eq!(candidate.status_code, Some(200));
    assert_eq!(candidate.content_type.as_deref(), Some("text/html"));
    assert_eq!(candidate.error.as_deref(), Some("Invalid XML"));
    assert!(!candidate.is_valid_xml);
    assert!(candidate.root_tag.is_none());
}

#[tokio::test]
async fn test_inspect_transport_failure() {
    let discovery = discovery(&[], &[]);
    let candidate = discovery
        .inspect("http://127.0.0.1:1/feed.xml", "127.0.0.1:1")
        .await;

    assert!(candidate.status_code.is_none());
    assert!(candidate.error.is_some());
    assert!(!candidate.is_valid_xml);
}

#[tokio::test]
async fn test_inspect_listings_feed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/properties.xml"))
        .respond_with(xml(LISTINGS_FEED))
        .mount(&mock_server)
        .await;

    let discovery = discovery(&[], &[]);
    let candidate = discovery
        .inspect(&format!("{}/properties.xml", mock_server.uri()), "agency.example")
        .await;

    assert!(candidate.is_valid_xml);
    assert!(candidate.error.is_none());
    assert_eq!(candidate.root_tag.as_deref(), Some("properties"));
    assert_eq!(candidate.listing_count, 6);
    assert_eq!(candidate.feed_type, FeedType::ListingsXmlFeed);
    // 70 + 2*6 + 3*3
    assert_eq!(candidate.confidence_score, 91);
}

// ============================================================================
// Domain probing
// ============================================================================

#[tokio::test]
async fn test_probe_stops_after_high_confidence_feed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/properties.xml"))
        .respond_with(xml(LISTINGS_FEED))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/listings.xml"))
        .respond_with(xml(LISTINGS_FEED))
        .expect(0)
        .mount(&mock_server)
        .await;

    let discovery = discovery(&["/missing.xml", "/properties.xml", "/listings.xml"], &[]);
    let found = discovery.probe_domain(&domain_of(&mock_server)).await.unwrap();

    assert_eq!(found.len(), 1);
    assert!(found[0].url.ends_with("/properties.xml"));
    assert_eq!(found[0].domain, domain_of(&mock_server));
}

#[tokio::test]
async fn test_sitemap_pivot_runs_after_early_exit() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let sitemap = format!(
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/export/listings.xml</loc></url>
</urlset>"#
    );

    Mock::given(method("GET"))
        .and(path("/properties.xml"))
        .respond_with(xml(LISTINGS_FEED))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/listings.xml"))
        .respond_with(xml(LISTINGS_FEED))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(&sitemap))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/export/listings.xml"))
        .respond_with(xml("<data><ad><price>1</price></ad></data>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let discovery = discovery(&["/properties.xml", "/listings.xml"], &["/sitemap.xml"]);
    let found = discovery.probe_domain(&domain_of(&mock_server)).await.unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].url, format!("{}/properties.xml", base));
    assert_eq!(found[1].url, format!("{}/export/listings.xml", base));
    assert_eq!(found[1].feed_type, FeedType::PossibleListingsFeed);
    assert_eq!(found[1].confidence_score, 50);
}

#[tokio::test]
async fn test_probe_keeps_low_scores_from_patterns() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/export.xml"))
        .respond_with(xml("<config><name/></config>"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/xml"))
        .respond_with(xml("<record><price/><area/><title/></record>"))
        .mount(&mock_server)
        .await;

    let discovery = discovery(&["/export.xml", "/feed.xml", "/xml"], &[]);
    let found = discovery.probe_domain(&domain_of(&mock_server)).await.unwrap();

    let types: Vec<FeedType> = found.iter().map(|c| c.feed_type).collect();
    assert_eq!(types, vec![FeedType::UnknownXml, FeedType::PropertyDataXml]);
}

#[tokio::test]
async fn test_sitemap_pivot_dedupes_and_filters() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();
    let sitemap = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>{base}/sitemap.xml</loc></url>
  <url><loc>{base}/feeds/properties.xml</loc></url>
  <url><loc>{base}/api/tiny.xml</loc></url>
  <url><loc>{base}/about-us</loc></url>
</urlset>"#
    );

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml(&sitemap))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/feeds/properties.xml"))
        .respond_with(xml(LISTINGS_FEED))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/tiny.xml"))
        .respond_with(xml("<status><ok/></status>"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about-us"))
        .respond_with(xml("<page/>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let discovery = discovery(&["/sitemap.xml"], &["/sitemap.xml"]);
    let found = discovery.probe_domain(&domain_of(&mock_server)).await.unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].feed_type, FeedType::Sitemap);
    assert_eq!(found[1].url, format!("{}/feeds/properties.xml", base));
    assert_eq!(found[1].feed_type, FeedType::ListingsXmlFeed);
}

#[tokio::test]
async fn test_sitemap_pivot_tolerates_broken_sitemap() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<urlset><url>"))
        .mount(&mock_server)
        .await;

    let discovery = discovery(&[], &["/sitemap.xml", "/sitemap_index.xml"]);
    let found = discovery.probe_domain(&domain_of(&mock_server)).await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn test_invalid_domain_is_an_error() {
    let discovery = discovery(&["/feed.xml"], &[]);
    assert!(discovery.probe_domain("").await.is_err());
    assert!(discovery.probe_domain("bad domain").await.is_err());
}

// ============================================================================
// Full runs
// ============================================================================

#[tokio::test]
async fn test_run_continues_past_failing_domains() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/properties.xml"))
        .respond_with(xml(LISTINGS_FEED))
        .mount(&mock_server)
        .await;

    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = messages.clone();
    let discovery = discovery(&["/properties.xml"], &[]).with_progress_callback(Arc::new(
        move |msg: String| {
            sink.lock().unwrap().push(msg);
        },
    ));

    let domains = vec![
        "bad domain".to_string(),
        "127.0.0.1:1".to_string(),
        domain_of(&mock_server),
    ];
    let run = discovery.run_discovery(&domains).await;

    assert_eq!(run.domains_tested, 3);
    assert_eq!(run.candidates.len(), 1);
    assert_eq!(run.candidates[0].domain, domain_of(&mock_server));

    let messages = messages.lock().unwrap();
    assert!(messages.iter().any(|m| m.starts_with("🔍 Testing domain 1/3")));
    assert!(messages.iter().any(|m| m.contains("Error testing bad domain")));
    assert!(messages.iter().any(|m| m.contains("Found XML")));
}

#[tokio::test]
async fn test_run_with_no_domains() {
    let discovery = discovery(&["/feed.xml"], &[]);
    let run = discovery.run_discovery(&[]).await;
    assert_eq!(run.domains_tested, 0);
    assert!(run.candidates.is_empty());
}

// ============================================================================
// Response handling without a network
// ============================================================================

#[test]
fn test_apply_response_records_status_for_errors() {
    let mut candidate = FeedCandidate::new("https://x.example/feed.xml", "x.example");
    let response = FetchResponse {
        url: candidate.url.clone(),
        status_code: 503,
        content_type: Some("text/plain".to_string()),
        location: None,
        body: "<properties/>".to_string(),
    };

    apply_response(&mut candidate, &response, &DiscoveryConfig::default().analyzer);

    assert_eq!(candidate.status_code, Some(503));
    assert_eq!(candidate.content_type.as_deref(), Some("text/plain"));
    assert_eq!(candidate.error.as_deref(), Some("HTTP 503"));
    assert!(!candidate.is_valid_xml);
}

#[test]
fn test_classify_body_fills_candidate() {
    let mut candidate = FeedCandidate::new("https://x.example/blog/feed/", "x.example");
    classify_body(
        &mut candidate,
        "<rss><channel><item><title/></item></channel></rss>",
        &DiscoveryConfig::default().analyzer,
    );

    assert!(candidate.is_valid_xml);
    assert_eq!(candidate.root_tag.as_deref(), Some("rss"));
    assert_eq!(candidate.feed_type, FeedType::BlogRss);
    assert_eq!(candidate.confidence_score, 10);
}
