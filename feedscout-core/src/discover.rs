// Per-domain discovery and the sequential run driver

use crate::analyze::analyze;
use crate::classify::{Evidence, classify};
use crate::config::{AnalyzerConfig, DiscoveryConfig};
use crate::error::{DiscoveryError, ProbeError, Result};
use crate::model::FeedCandidate;
use crate::sitemap::discover_from_sitemap;
use crate::xml::XmlDocument;
use feedscout_scanner::{FetchResponse, Fetcher};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Callback for human-readable progress messages
pub type DiscoveryProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Per-domain state machine: `PatternProbing -> SitemapPivoting -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbePhase {
    PatternProbing,
    SitemapPivoting,
    Done,
}

impl ProbePhase {
    pub fn next(self) -> Self {
        match self {
            ProbePhase::PatternProbing => ProbePhase::SitemapPivoting,
            ProbePhase::SitemapPivoting | ProbePhase::Done => ProbePhase::Done,
        }
    }
}

/// Guard for leaving pattern probing early: a retained candidate already
/// reached the high-confidence bar, so remaining patterns are skipped.
pub fn should_stop_pattern_probing(best_score: Option<u8>, threshold: u8) -> bool {
    best_score.is_some_and(|score| score >= threshold)
}

/// Outcome of a whole run, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryRun {
    pub domains_tested: usize,
    pub candidates: Vec<FeedCandidate>,
}

struct DomainProbe {
    domain: String,
    base: Url,
    retained: Vec<FeedCandidate>,
    probed: HashSet<String>,
}

impl DomainProbe {
    fn best_score(&self) -> Option<u8> {
        self.retained.iter().map(|c| c.confidence_score).max()
    }

    fn join(&self, path: &str) -> Result<String> {
        self.base
            .join(path)
            .map(|u| u.to_string())
            .map_err(|e| DiscoveryError::InvalidDomain {
                domain: self.domain.clone(),
                reason: format!("cannot join '{}': {}", path, e),
            })
    }
}

pub struct FeedDiscovery {
    fetcher: Fetcher,
    config: DiscoveryConfig,
    progress_callback: Option<DiscoveryProgressCallback>,
}

impl FeedDiscovery {
    pub fn new(fetcher: Fetcher, config: DiscoveryConfig) -> Self {
        Self {
            fetcher,
            config,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: DiscoveryProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    fn report(&self, message: String) {
        if let Some(ref callback) = self.progress_callback {
            callback(message);
        }
    }

    pub fn base_url(&self, domain: &str) -> Result<Url> {
        let raw = format!("{}://{}", self.config.scheme, domain.trim());
        let url = Url::parse(&raw).map_err(|e| DiscoveryError::InvalidDomain {
            domain: domain.to_string(),
            reason: e.to_string(),
        })?;
        if url.host_str().is_none_or(|h| h.is_empty()) {
            return Err(DiscoveryError::InvalidDomain {
                domain: domain.to_string(),
                reason: "no host".to_string(),
            });
        }
        Ok(url)
    }

    /// Fetches one URL and fills in everything learned about it.
    pub async fn inspect(&self, url: &str, domain: &str) -> FeedCandidate {
        let mut candidate = FeedCandidate::new(url, domain);
        match self.fetcher.fetch(url).await {
            Ok(response) => apply_response(&mut candidate, &response, &self.config.analyzer),
            Err(e) => {
                debug!("{} failed: {}", url, e);
                candidate.error = Some(ProbeError::Transport(e.to_string()).to_string());
            }
        }
        candidate
    }

    /// Runs the pattern and sitemap phases for one domain and returns the
    /// retained candidates.
    pub async fn probe_domain(&self, domain: &str) -> Result<Vec<FeedCandidate>> {
        let mut probe = DomainProbe {
            domain: domain.to_string(),
            base: self.base_url(domain)?,
            retained: Vec::new(),
            probed: HashSet::new(),
        };

        let mut phase = ProbePhase::PatternProbing;
        while phase != ProbePhase::Done {
            match phase {
                ProbePhase::PatternProbing => self.probe_patterns(&mut probe).await?,
                ProbePhase::SitemapPivoting => self.pivot_sitemaps(&mut probe).await?,
                ProbePhase::Done => {}
            }
            phase = phase.next();
        }

        info!("{}: {} candidate(s) retained", domain, probe.retained.len());
        Ok(probe.retained)
    }

    async fn probe_patterns(&self, probe: &mut DomainProbe) -> Result<()> {
        for pattern in &self.config.feed_patterns {
            let url = probe.join(pattern)?;
            probe.probed.insert(url.clone());

            let candidate = self.inspect(&url, &probe.domain).await;
            if !candidate.is_valid_xml {
                debug!("Rejected {}: {:?}", url, candidate.error);
                continue;
            }

            info!(
                "Found XML {} ({}, score {})",
                url, candidate.feed_type, candidate.confidence_score
            );
            self.report(format!(
                "  ✓ Found XML: {} ({}, score: {})",
                url, candidate.feed_type, candidate.confidence_score
            ));
            probe.retained.push(candidate);

            if should_stop_pattern_probing(probe.best_score(), self.config.high_confidence) {
                info!("{}: high-confidence feed found, skipping remaining patterns", probe.domain);
                self.report("  🎯 High-confidence feed found, stopping domain scan".to_string());
                break;
            }
        }
        Ok(())
    }

    async fn pivot_sitemaps(&self, probe: &mut DomainProbe) -> Result<()> {
        for path in &self.config.sitemap_paths {
            let sitemap_url = probe.join(path)?;
            let discovered =
                discover_from_sitemap(&self.fetcher, &sitemap_url, &self.config.pivot_keywords)
                    .await;

            for url in discovered {
                if !probe.probed.insert(url.clone()) {
                    debug!("Already probed {}", url);
                    continue;
                }

                let candidate = self.inspect(&url, &probe.domain).await;
                if candidate.is_valid_xml
                    && candidate.confidence_score >= self.config.pivot_min_confidence
                {
                    info!(
                        "Found via sitemap {} ({}, score {})",
                        url, candidate.feed_type, candidate.confidence_score
                    );
                    self.report(format!(
                        "  ✓ Found via sitemap: {} ({}, score: {})",
                        url, candidate.feed_type, candidate.confidence_score
                    ));
                    probe.retained.push(candidate);
                }
            }
        }
        Ok(())
    }

    /// Probes each domain in order. A failing domain is logged and contributes
    /// nothing; the run always continues.
    pub async fn run_discovery(&self, domains: &[String]) -> DiscoveryRun {
        info!(
            "Starting discovery of {} domains with {} patterns each",
            domains.len(),
            self.config.feed_patterns.len()
        );

        let mut candidates = Vec::new();
        for (idx, domain) in domains.iter().enumerate() {
            self.report(format!(
                "🔍 Testing domain {}/{}: {}",
                idx + 1,
                domains.len(),
                domain
            ));

            match self.probe_domain(domain).await {
                Ok(found) => candidates.extend(found),
                Err(e) => {
                    warn!("Error testing {}: {}", domain, e);
                    self.report(format!("  ✗ Error testing {}: {}", domain, e));
                }
            }
        }

        DiscoveryRun {
            domains_tested: domains.len(),
            candidates,
        }
    }
}

/// Records status and content type, then classifies a 200 body.
pub fn apply_response(
    candidate: &mut FeedCandidate,
    response: &FetchResponse,
    analyzer: &AnalyzerConfig,
) {
    candidate.status_code = Some(response.status_code);
    candidate.content_type = response.content_type.clone();

    if !response.is_ok() {
        candidate.error = Some(ProbeError::NonSuccessStatus(response.status_code).to_string());
        return;
    }

    classify_body(candidate, &response.body, analyzer);
}

/// Parses, analyzes and classifies `body`. Malformed XML leaves the
/// candidate unclassified with `error = "Invalid XML"`.
pub fn classify_body(candidate: &mut FeedCandidate, body: &str, analyzer: &AnalyzerConfig) {
    let doc = match XmlDocument::parse(body) {
        Ok(doc) => doc,
        Err(e) => {
            debug!("{} is not XML: {}", candidate.url, e);
            candidate.error = Some(ProbeError::InvalidXml.to_string());
            return;
        }
    };

    let analysis = analyze(&doc, analyzer);
    let verdict = classify(&Evidence::from_analysis(&analysis, &candidate.url));

    candidate.is_valid_xml = true;
    candidate.error = None;
    candidate.root_tag = Some(analysis.root_tag);
    candidate.listing_count = analysis.listing_count;
    candidate.sample_fields = analysis.sample_fields;
    candidate.feed_type = verdict.feed_type;
    candidate.confidence_score = verdict.confidence_score;
}
