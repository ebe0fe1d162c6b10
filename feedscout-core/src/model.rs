use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict labels. Serialized as the human-readable labels downstream
/// consumers of the JSON export already know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FeedType {
    #[serde(rename = "Listings XML feed")]
    ListingsXmlFeed,
    #[serde(rename = "Possible listings feed")]
    PossibleListingsFeed,
    #[serde(rename = "Property data XML")]
    PropertyDataXml,
    #[serde(rename = "Sitemap")]
    Sitemap,
    #[serde(rename = "Sitemap with property data")]
    SitemapWithPropertyData,
    #[serde(rename = "Blog RSS")]
    BlogRss,
    #[default]
    #[serde(rename = "Unknown XML")]
    UnknownXml,
}

impl FeedType {
    pub fn label(&self) -> &'static str {
        match self {
            FeedType::ListingsXmlFeed => "Listings XML feed",
            FeedType::PossibleListingsFeed => "Possible listings feed",
            FeedType::PropertyDataXml => "Property data XML",
            FeedType::Sitemap => "Sitemap",
            FeedType::SitemapWithPropertyData => "Sitemap with property data",
            FeedType::BlogRss => "Blog RSS",
            FeedType::UnknownXml => "Unknown XML",
        }
    }

    /// Report group "listings feeds": labels containing "Listings".
    /// "Possible listings feed" is lower-case and falls into "other".
    pub fn is_listings_feed(&self) -> bool {
        self.label().contains("Listings")
    }

    pub fn is_sitemap(&self) -> bool {
        self.label().contains("Sitemap")
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One probed URL and everything learned about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCandidate {
    pub url: String,
    pub domain: String,
    pub feed_type: FeedType,
    pub confidence_score: u8,
    pub status_code: Option<u16>,
    pub content_type: Option<String>,
    pub root_tag: Option<String>,
    pub is_valid_xml: bool,
    pub listing_count: usize,
    pub sample_fields: Vec<String>,
    pub error: Option<String>,
}

impl FeedCandidate {
    pub fn new(url: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            domain: domain.into(),
            feed_type: FeedType::default(),
            confidence_score: 0,
            status_code: None,
            content_type: None,
            root_tag: None,
            is_valid_xml: false,
            listing_count: 0,
            sample_fields: Vec::new(),
            error: None,
        }
    }

    pub fn is_high_confidence_listings(&self, threshold: u8) -> bool {
        self.feed_type == FeedType::ListingsXmlFeed && self.confidence_score >= threshold
    }
}
