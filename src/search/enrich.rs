//! Turning raw index hits into displayable results.

use super::heading::resolve_heading;
use super::index::{Field, IndexSet, Partition};
use super::locate::locate;
use super::normalize_string;
use super::query::RawHit;
use super::scoring::rank_results;
use super::snippet::snippet_at;
use serde::Serialize;

/// A search result as handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedResult {
    pub path: String,
    pub title: String,
    pub partition: Partition,
    pub field: Field,
    pub score: f32,
    /// Page title, or the breadcrumb of the section holding the match.
    pub heading_str: String,
    pub heading_highlight: Option<[usize; 2]>,
    /// `#anchor` of that section, empty for the page top.
    pub slug: String,
    /// Excerpt of the matching line; `None` for header matches.
    pub content_str: Option<String>,
    pub content_highlight: Option<[usize; 2]>,
    pub parent_page_title: String,
    /// Set by ranking; lower is more relevant.
    pub priority: u8,
}

/// Locates the query in the hit's page and fills in heading, slug and snippet.
pub fn enrich(
    index: &IndexSet,
    hit: &RawHit,
    normalized_query: &str,
    terms: &[String],
) -> EnrichedResult {
    let page = &*hit.page;
    let mut result = EnrichedResult {
        path: page.path.clone(),
        title: page.title.clone(),
        partition: hit.partition,
        field: hit.field,
        score: hit.score,
        heading_str: page.title.clone(),
        heading_highlight: None,
        slug: String::new(),
        content_str: None,
        content_highlight: None,
        parent_page_title: index.parent_page_title(page).to_string(),
        priority: 0,
    };

    let Some(matched) = locate(page, normalized_query, terms) else {
        return result;
    };

    if let Some(header_index) = matched.header_index {
        let heading = resolve_heading(page, Some(header_index), Some(&matched));
        result.heading_str = heading.heading_str;
        result.heading_highlight = heading.heading_highlight;
        result.slug = anchor(&page.headers[header_index].slug);
        return result;
    }

    // Header offsets count chars of the original content
    let span = page.content_span(matched.char_index, matched.term_length);

    // Section of a content match: last header starting before it
    let section = page
        .headers
        .iter()
        .rposition(|h| h.char_index.is_some_and(|ci| ci < span[0]));
    let heading = resolve_heading(page, section, None);
    let snippet = snippet_at(page, span);

    result.heading_str = heading.heading_str;
    result.slug = section.map_or_else(String::new, |i| anchor(&page.headers[i].slug));
    result.content_str = Some(snippet.content_str);
    result.content_highlight = Some(snippet.content_highlight);
    result
}

fn anchor(slug: &str) -> String {
    format!("#{}", slug)
}

impl IndexSet {
    /// Full query pipeline: dispatch, enrich, rank and deduplicate.
    ///
    /// `terms` are the words of `query` used to locate matches; ranking uses
    /// `query` as typed.
    pub fn match_query(&self, query: &str, terms: &[String], limit: usize) -> Vec<EnrichedResult> {
        let hits = self.search(query, limit);
        self.enrich_hits(&hits, query, terms)
    }

    pub(crate) fn enrich_hits(
        &self,
        hits: &[RawHit],
        query: &str,
        terms: &[String],
    ) -> Vec<EnrichedResult> {
        let normalized_query = normalize_string(query);
        // Idempotent, so terms that were already normalized are unchanged
        let terms: Vec<String> = terms.iter().map(|t| normalize_string(t)).collect();
        let enriched = hits
            .iter()
            .map(|hit| enrich(self, hit, &normalized_query, &terms))
            .collect();
        rank_results(enriched, query)
    }
}
