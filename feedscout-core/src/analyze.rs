// Structural inspection of a parsed XML document

use crate::config::{AnalyzerConfig, Vocabulary};
use crate::xml::XmlDocument;
use std::collections::BTreeSet;

/// Everything the classifier needs to know about a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAnalysis {
    /// Root local name as it appears in the document.
    pub root_tag: String,
    /// Lower-cased local names down to the configured depth.
    pub tags: BTreeSet<String>,
    pub listing_count: usize,
    /// Sorted, deduplicated, bounded.
    pub sample_fields: Vec<String>,
}

pub fn analyze(doc: &XmlDocument, config: &AnalyzerConfig) -> XmlAnalysis {
    let tags = extract_tags(doc, config.max_tag_depth);
    let listing_count = count_listing_nodes(doc, &config.vocabulary);
    let sample_fields = sample_property_fields(&tags, &config.vocabulary, config.sample_field_limit);

    XmlAnalysis {
        root_tag: doc.root_tag().to_string(),
        tags,
        listing_count,
        sample_fields,
    }
}

/// Distinct lower-cased local names, namespace prefixes stripped.
pub fn extract_tags(doc: &XmlDocument, max_depth: usize) -> BTreeSet<String> {
    doc.walk(max_depth)
        .into_iter()
        .map(|(element, _)| element.local_name.to_lowercase())
        .collect()
}

/// Counts descendants of the root whose local name is a listing tag.
///
/// Each vocabulary term is matched twice, once against un-namespaced elements
/// and once against any namespace, so an un-namespaced `<item>` counts 2 and
/// a namespaced one counts 1. Matching is case-sensitive.
pub fn count_listing_nodes(doc: &XmlDocument, vocabulary: &Vocabulary) -> usize {
    vocabulary
        .listing_tags
        .iter()
        .map(|tag| {
            doc.descendants()
                .filter(|element| &element.local_name == tag)
                .map(|element| if element.namespaced { 1 } else { 2 })
                .sum::<usize>()
        })
        .sum()
}

/// Tags containing any property-field substring, first `limit` in lexicographic order.
pub fn sample_property_fields(
    tags: &BTreeSet<String>,
    vocabulary: &Vocabulary,
    limit: usize,
) -> Vec<String> {
    tags.iter()
        .filter(|tag| {
            vocabulary
                .property_fields
                .iter()
                .any(|field| tag.contains(field.as_str()))
        })
        .take(limit)
        .cloned()
        .collect()
}
