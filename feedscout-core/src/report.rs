// Report generation from discovery results

use crate::discover::DiscoveryRun;
use crate::model::FeedCandidate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Listings feeds at or above this score count as a successful run.
pub const HIGH_CONFIDENCE: u8 = 70;

const HEAVY_RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const LIGHT_RULE: &str =
    "────────────────────────────────────────────────────────────────────────────────\n";

/// The JSON export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryExport {
    pub discovery_timestamp: String,
    pub domains_tested: usize,
    pub total_feeds_found: usize,
    pub results: Vec<FeedCandidate>,
}

impl DiscoveryExport {
    pub fn from_run(run: &DiscoveryRun, discovery_timestamp: String) -> Self {
        Self {
            discovery_timestamp,
            domains_tested: run.domains_tested,
            total_feeds_found: run.candidates.len(),
            results: sort_by_confidence(&run.candidates),
        }
    }

    /// Stamped with the current local time.
    pub fn now(run: &DiscoveryRun) -> Self {
        Self::from_run(run, chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

/// The three disjoint display groups, each sorted by descending confidence.
#[derive(Debug, Clone, Default)]
pub struct ReportGroups<'a> {
    pub listings: Vec<&'a FeedCandidate>,
    pub sitemaps: Vec<&'a FeedCandidate>,
    pub other: Vec<&'a FeedCandidate>,
}

/// Descending by confidence; ties keep discovery order.
pub fn sort_by_confidence(candidates: &[FeedCandidate]) -> Vec<FeedCandidate> {
    let mut sorted = candidates.to_vec();
    sorted.sort_by(|a, b| b.confidence_score.cmp(&a.confidence_score));
    sorted
}

pub fn group_candidates(sorted: &[FeedCandidate]) -> ReportGroups<'_> {
    let mut groups = ReportGroups::default();
    for candidate in sorted {
        if candidate.feed_type.is_listings_feed() {
            groups.listings.push(candidate);
        } else if candidate.feed_type.is_sitemap() {
            groups.sitemaps.push(candidate);
        } else {
            groups.other.push(candidate);
        }
    }
    groups
}

pub fn count_high_confidence(candidates: &[FeedCandidate]) -> usize {
    candidates
        .iter()
        .filter(|c| c.is_high_confidence_listings(HIGH_CONFIDENCE))
        .count()
}

/// 0 when at least one high-confidence listings feed was found, 1 otherwise.
pub fn exit_code(run: &DiscoveryRun) -> i32 {
    if count_high_confidence(&run.candidates) > 0 { 0 } else { 1 }
}

/// One-line verdict printed after the report.
pub fn outcome_message(run: &DiscoveryRun) -> String {
    let high = count_high_confidence(&run.candidates);
    if high > 0 {
        format!("🎉 SUCCESS: Found {} high-confidence listings feed(s)!", high)
    } else if run.candidates.is_empty() {
        "⚠️  No high-confidence listings feeds found. No XML endpoints found at all.".to_string()
    } else {
        format!(
            "⚠️  No high-confidence listings feeds found. Found {} XML endpoints total.",
            run.candidates.len()
        )
    }
}

pub fn generate_text_report(run: &DiscoveryRun) -> String {
    let sorted = sort_by_confidence(&run.candidates);
    let groups = group_candidates(&sorted);
    let mut report = String::new();

    report.push_str(HEAVY_RULE);
    report.push_str("                          FEED DISCOVERY REPORT\n");
    report.push_str(HEAVY_RULE);

    report.push_str(&format!("\nCONFIRMED LISTINGS FEEDS: {}\n", groups.listings.len()));
    report.push_str(LIGHT_RULE);
    for (idx, result) in groups.listings.iter().enumerate() {
        report.push_str(&format!("\n{}. {}\n", idx + 1, result.domain));
        report.push_str(&format!("   URL: {}\n", result.url));
        report.push_str(&format!("   Type: {}\n", result.feed_type));
        report.push_str(&format!("   Confidence: {}/100\n", result.confidence_score));
        report.push_str(&format!("   Status: {}\n", display_opt(result.status_code)));
        report.push_str(&format!(
            "   Root tag: <{}>\n",
            result.root_tag.as_deref().unwrap_or("?")
        ));
        report.push_str(&format!("   Listing nodes: {}\n", result.listing_count));
        let fields: Vec<&str> = result.sample_fields.iter().take(5).map(String::as_str).collect();
        report.push_str(&format!("   Sample fields: {}\n", fields.join(", ")));
    }
    if groups.listings.is_empty() {
        report.push_str("   No confirmed listings feeds found.\n");
    }

    report.push_str(&format!("\nSITEMAPS FOUND: {}\n", groups.sitemaps.len()));
    report.push_str(LIGHT_RULE);
    for result in groups.sitemaps.iter().take(5) {
        report.push_str(&format!(
            "   • {} (score: {})\n",
            result.url, result.confidence_score
        ));
    }

    report.push_str(&format!("\nOTHER XML FOUND: {}\n", groups.other.len()));
    report.push_str(LIGHT_RULE);
    for result in groups.other.iter().take(5) {
        report.push_str(&format!(
            "   • {} - {} (score: {})\n",
            result.url, result.feed_type, result.confidence_score
        ));
    }

    report.push('\n');
    report.push_str(HEAVY_RULE);
    report.push_str("SUMMARY\n");
    report.push_str(HEAVY_RULE);
    report.push_str(&format!("Total domains tested: {}\n", run.domains_tested));
    report.push_str(&format!("Total XML endpoints found: {}\n", run.candidates.len()));
    report.push_str(&format!("Confirmed listings feeds: {}\n", groups.listings.len()));
    report.push_str(&format!(
        "High-confidence feeds (≥{}): {}\n",
        HIGH_CONFIDENCE,
        groups
            .listings
            .iter()
            .filter(|r| r.confidence_score >= HIGH_CONFIDENCE)
            .count()
    ));
    report.push_str(HEAVY_RULE);

    report
}

pub fn generate_json_report(export: &DiscoveryExport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(export)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn display_opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
