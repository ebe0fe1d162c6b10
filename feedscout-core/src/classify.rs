// Heuristic feed classification

use crate::analyze::XmlAnalysis;
use crate::model::FeedType;
use std::collections::BTreeSet;

pub const SITEMAP_WITH_PROPERTY_DATA_SCORE: u8 = 60;
pub const SITEMAP_SCORE: u8 = 20;
pub const BLOG_RSS_SCORE: u8 = 10;
pub const POSSIBLE_LISTINGS_SCORE: u8 = 50;
pub const PROPERTY_DATA_SCORE: u8 = 40;
pub const UNKNOWN_XML_SCORE: u8 = 20;

// Listings score = min(100, BASE + PER_LISTING * listings + PER_FIELD * fields).
const LISTINGS_BASE_SCORE: u64 = 70;
const LISTINGS_PER_NODE: u64 = 2;
const LISTINGS_PER_FIELD: u64 = 3;
const MAX_SCORE: u64 = 100;

/// Inputs to [`classify`]. Borrowed so the classifier has no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct Evidence<'a> {
    pub root_tag: &'a str,
    pub tags: &'a BTreeSet<String>,
    pub listing_count: usize,
    pub sample_fields: &'a [String],
    pub url: &'a str,
}

impl<'a> Evidence<'a> {
    pub fn from_analysis(analysis: &'a XmlAnalysis, url: &'a str) -> Self {
        Self {
            root_tag: &analysis.root_tag,
            tags: &analysis.tags,
            listing_count: analysis.listing_count,
            sample_fields: &analysis.sample_fields,
            url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub feed_type: FeedType,
    pub confidence_score: u8,
}

impl Classification {
    fn new(feed_type: FeedType, confidence_score: u8) -> Self {
        Self {
            feed_type,
            confidence_score,
        }
    }
}

/// First matching rule wins. Sitemap-shaped documents are demoted even when
/// they carry property-like fields.
pub fn classify(evidence: &Evidence<'_>) -> Classification {
    let root = evidence.root_tag.to_lowercase();
    let url = evidence.url.to_lowercase();
    let listings = evidence.listing_count;
    let fields = evidence.sample_fields.len();

    if root == "urlset" || root == "sitemapindex" || url.contains("sitemap") {
        if fields >= 2 && listings > 0 {
            return Classification::new(
                FeedType::SitemapWithPropertyData,
                SITEMAP_WITH_PROPERTY_DATA_SCORE,
            );
        }
        return Classification::new(FeedType::Sitemap, SITEMAP_SCORE);
    }

    if (root == "rss" || root == "feed") && url.contains("blog") {
        return Classification::new(FeedType::BlogRss, BLOG_RSS_SCORE);
    }

    if listings >= 3 && fields >= 2 {
        return Classification::new(FeedType::ListingsXmlFeed, listings_score(listings, fields));
    }

    if listings >= 1 && fields >= 1 {
        return Classification::new(FeedType::PossibleListingsFeed, POSSIBLE_LISTINGS_SCORE);
    }

    if fields >= 3 {
        return Classification::new(FeedType::PropertyDataXml, PROPERTY_DATA_SCORE);
    }

    Classification::new(FeedType::UnknownXml, UNKNOWN_XML_SCORE)
}

pub fn listings_score(listing_count: usize, field_count: usize) -> u8 {
    let raw = LISTINGS_BASE_SCORE
        .saturating_add(LISTINGS_PER_NODE.saturating_mul(listing_count as u64))
        .saturating_add(LISTINGS_PER_FIELD.saturating_mul(field_count as u64));
    raw.min(MAX_SCORE) as u8
}
