// Immutable discovery settings and their defaults

/// Cyprus real-estate agencies and developers probed when no domains are given.
pub const DEFAULT_DOMAINS: &[&str] = &[
    "pafilia.com",
    "imperioproperties.com",
    "cyprusestateagency.com",
    "cyprusestateagents.com",
    "cyprus101.com",
    "galaxiaestates.com",
    "mresidence.com",
    "livadhiotisdevelopers.com",
    "cyprusproperties.com.cy",
    "gplazarou.com",
    "mayfaircyprus.com",
    "giovani.cy",
    "oikos-cy.com",
    "photiouestates.com",
    "karmadevelopers.com.cy",
    "chris-michael.com.cy",
    "home.cy",
];

/// Endpoint paths tried in order against every domain.
pub const DEFAULT_FEED_PATTERNS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/feed.xml",
    "/feeds.xml",
    "/feeds/properties.xml",
    "/properties.xml",
    "/listings.xml",
    "/export.xml",
    "/xml",
    "/xml/",
    "/property-feed.xml",
    "/api/feed",
    "/api/feed.xml",
    "/api/xml",
    "/wp-sitemap.xml",
    "/feed/",
    "/?feed=rss",
    "/?feed=xml",
    "/?feed=properties",
    "/?format=xml",
    "/?output=xml",
];

pub const DEFAULT_SITEMAP_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml"];

/// Element names that usually wrap a single property record.
pub const DEFAULT_LISTING_TAGS: &[&str] = &[
    "property",
    "listing",
    "item",
    "offer",
    "unit",
    "estate",
    "accommodation",
    "ad",
    "advert",
];

/// Substrings that mark a tag name as a real-estate attribute.
pub const DEFAULT_PROPERTY_FIELDS: &[&str] = &[
    "price",
    "currency",
    "bedrooms",
    "bathrooms",
    "area",
    "location",
    "reference",
    "ref",
    "id",
    "description",
    "image",
    "images",
    "photo",
    "photos",
    "latitude",
    "longitude",
    "coordinates",
    "address",
    "title",
    "type",
];

/// A sitemap `<loc>` must contain one of these before the suffix checks apply.
pub const DEFAULT_PIVOT_KEYWORDS: &[&str] =
    &["feed", "export", "api", "xml", "properties", "listings"];

pub const DEFAULT_EXPORT_FILE: &str = "cyprus_feeds_results.json";

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub listing_tags: Vec<String>,
    pub property_fields: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            listing_tags: owned(DEFAULT_LISTING_TAGS),
            property_fields: owned(DEFAULT_PROPERTY_FIELDS),
        }
    }
}

impl Vocabulary {
    pub fn new(listing_tags: &[&str], property_fields: &[&str]) -> Self {
        Self {
            listing_tags: owned(listing_tags),
            property_fields: owned(property_fields),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Elements deeper than this (root is depth 0) are left out of the tag set.
    pub max_tag_depth: usize,
    pub sample_field_limit: usize,
    pub vocabulary: Vocabulary,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_tag_depth: 5,
            sample_field_limit: 10,
            vocabulary: Vocabulary::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryConfig {
    /// Scheme used to build a domain's base URL.
    pub scheme: String,
    pub feed_patterns: Vec<String>,
    pub sitemap_paths: Vec<String>,
    pub pivot_keywords: Vec<String>,
    /// Pattern probing stops once a retained candidate reaches this score.
    pub high_confidence: u8,
    /// Minimum score for a sitemap-discovered candidate to be kept.
    pub pivot_min_confidence: u8,
    pub analyzer: AnalyzerConfig,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            feed_patterns: owned(DEFAULT_FEED_PATTERNS),
            sitemap_paths: owned(DEFAULT_SITEMAP_PATHS),
            pivot_keywords: owned(DEFAULT_PIVOT_KEYWORDS),
            high_confidence: 70,
            pivot_min_confidence: 40,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl DiscoveryConfig {
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_feed_patterns(mut self, patterns: &[&str]) -> Self {
        self.feed_patterns = owned(patterns);
        self
    }

    pub fn with_sitemap_paths(mut self, paths: &[&str]) -> Self {
        self.sitemap_paths = owned(paths);
        self
    }

    pub fn with_max_tag_depth(mut self, depth: usize) -> Self {
        self.analyzer.max_tag_depth = depth;
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.analyzer.vocabulary = vocabulary;
        self
    }
}

pub fn default_domains() -> Vec<String> {
    owned(DEFAULT_DOMAINS)
}
