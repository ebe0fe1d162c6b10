// Quick URL-only feed check: GET a fixed path list and sniff the first bytes

use feedscout_scanner::{CHROME_USER_AGENT, Fetcher, FetcherConfig};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_CHECK_BASE_URLS: &[&str] = &[
    "https://altia.com.cy",
    "https://www.altia.com.cy",
    "https://marketplace.altia.com.cy",
];

pub const DEFAULT_CHECK_PATHS: &[&str] = &[
    "/feed.xml",
    "/feed",
    "/rss.xml",
    "/rss",
    "/xml",
    "/xml-feed",
    "/xmlfeed",
    "/xml/export",
    "/xml/properties",
    "/properties.xml",
    "/propertyfeed.xml",
    "/property-feed.xml",
    "/listings.xml",
    "/listings-feed.xml",
    "/feeds/properties.xml",
    "/data/properties.xml",
    "/xml/listings.xml",
    "/export.xml",
    "/export/feed.xml",
    "/export/properties.xml",
    "/export/property-feed.xml",
    "/import/xml",
    "/api/xml",
    "/api/feed/xml",
    "/api/properties.xml",
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap-properties.xml",
    "/sitemap-listings.xml",
];

/// Only this much of each body is read.
pub const PREFIX_BYTES: usize = 500;

const XML_MARKERS: &[&str] = &["<?xml", "<rss", "<feed", "<urlset"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFinding {
    FoundXml {
        url: String,
        content_type: String,
    },
    Redirect {
        url: String,
        status_code: u16,
        location: Option<String>,
    },
}

/// Callback for reporting each finding as it comes in
pub type CheckProgressCallback = Arc<dyn Fn(&CheckFinding) + Send + Sync>;

/// Chrome identity, short timeout, no delay, redirects reported rather than followed.
pub fn checker_fetcher_config(timeout: Duration, accept_invalid_certs: bool) -> FetcherConfig {
    FetcherConfig::default()
        .with_user_agent(CHROME_USER_AGENT)
        .with_timeout(timeout)
        .with_request_delay(Duration::ZERO)
        .with_max_redirects(None)
        .with_accept_invalid_certs(accept_invalid_certs)
}

/// Every base URL crossed with every path, base-major.
pub fn build_check_urls(base_urls: &[String], paths: &[String]) -> Result<Vec<String>, String> {
    let mut urls = Vec::with_capacity(base_urls.len() * paths.len());
    for base in base_urls {
        for path in paths {
            urls.push(build_test_url(base, path)?);
        }
    }
    Ok(urls)
}

/// Appends `path` to the base URL's path.
pub fn build_test_url(base_url: &str, path: &str) -> Result<String, String> {
    let mut url =
        Url::parse(base_url).map_err(|e| format!("Invalid base URL '{}': {}", base_url, e))?;

    let current_path = url.path().to_string();
    let path_base = if current_path.ends_with('/') {
        current_path
    } else {
        format!("{}/", current_path)
    };
    url.set_path(&format!("{}{}", path_base, path.trim_start_matches('/')));

    Ok(url.to_string())
}

pub fn looks_like_xml(prefix: &str) -> bool {
    XML_MARKERS.iter().any(|marker| prefix.contains(marker))
}

/// Probes each URL in order. Errors and soft-404 HTML pages are skipped silently.
pub async fn execute_check(
    fetcher: &Fetcher,
    urls: &[String],
    progress_callback: Option<CheckProgressCallback>,
) -> Vec<CheckFinding> {
    let mut findings = Vec::new();

    for url in urls {
        let response = match fetcher.fetch_prefix(url, PREFIX_BYTES).await {
            Ok(response) => response,
            Err(e) => {
                debug!("{} skipped: {}", url, e);
                continue;
            }
        };

        let finding = match response.status_code {
            200 if looks_like_xml(&response.body) => CheckFinding::FoundXml {
                url: url.clone(),
                content_type: response.content_type.unwrap_or_default().to_lowercase(),
            },
            301 | 302 => CheckFinding::Redirect {
                url: url.clone(),
                status_code: response.status_code,
                location: response.location,
            },
            _ => continue,
        };

        if let Some(ref callback) = progress_callback {
            callback(&finding);
        }
        findings.push(finding);
    }

    findings
}

pub fn format_finding(finding: &CheckFinding) -> String {
    match finding {
        CheckFinding::FoundXml { url, content_type } => {
            format!("[FOUND XML] {} - {}", url, content_type)
        }
        CheckFinding::Redirect {
            url,
            status_code,
            location,
        } => format!(
            "[{}] {} -> {}",
            status_code,
            url,
            location.as_deref().unwrap_or("?")
        ),
    }
}

pub fn generate_check_report(findings: &[CheckFinding]) -> String {
    let mut report = String::from("\n--- Summary of Potential XML Feeds ---\n");
    for finding in findings {
        if let CheckFinding::FoundXml { url, content_type } = finding {
            report.push_str(&format!("FOUND: {} ({})\n", url, content_type));
        }
    }
    report
}
