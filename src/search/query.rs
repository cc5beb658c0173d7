//! Weighted multi-field query dispatch across the partition indexes.

use super::index::{Field, IndexSet, Partition, PartitionIndex};
use crate::page::Page;
use std::sync::Arc;

/// Fields queried by [`IndexSet::search`] and their boosts, in result order.
pub const QUERY_FIELDS: [(Field, f32); 3] = [
    (Field::Title, 10.0),
    (Field::HeadersStr, 7.0),
    (Field::Content, 6.0),
];

/// A page returned by one partition for one field, before enrichment.
#[derive(Debug, Clone)]
pub struct RawHit {
    pub page: Arc<Page>,
    pub partition: Partition,
    pub field: Field,
    /// Boosted field score; only comparable within the same field.
    pub score: f32,
}

impl PartitionIndex {
    /// Runs the boosted query over title, headersStr and content.
    ///
    /// Each field contributes at most `limit` hits; a page matching several
    /// fields appears once per field.
    pub fn search(&self, query: &str, limit: usize) -> Vec<RawHit> {
        let tokens = self.tokenizer().query_tokens(query);
        if tokens.is_empty() {
            return vec![];
        }

        QUERY_FIELDS
            .iter()
            .flat_map(|&(field, boost)| self.field_hits(&tokens, field, boost, limit))
            .collect()
    }

    /// Single-field query without boost.
    pub fn search_field(&self, query: &str, field: Field, limit: usize) -> Vec<RawHit> {
        let tokens = self.tokenizer().query_tokens(query);
        self.field_hits(&tokens, field, 1.0, limit)
    }

    fn field_hits(&self, tokens: &[String], field: Field, boost: f32, limit: usize) -> Vec<RawHit> {
        self.field(field)
            .search(tokens, limit)
            .into_iter()
            .map(|(slot, score)| RawHit {
                page: Arc::clone(self.page(slot)),
                partition: self.partition(),
                field,
                score: score * boost,
            })
            .collect()
    }
}

impl IndexSet {
    /// Queries every partition in build order and concatenates the hits.
    ///
    /// Duplicates across fields and partitions are kept; ranking removes them.
    pub fn search(&self, query: &str, limit: usize) -> Vec<RawHit> {
        let hits: Vec<RawHit> = self
            .partitions()
            .iter()
            .flat_map(|partition| partition.search(query, limit))
            .collect();
        tracing::debug!("Query '{}' produced {} raw hits", query, hits.len());
        hits
    }

    /// Queries a single field in every partition.
    pub fn search_field(&self, query: &str, field: Field, limit: usize) -> Vec<RawHit> {
        self.partitions()
            .iter()
            .flat_map(|partition| partition.search_field(query, field, limit))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildOptions;
    use crate::page::Header;
    use assert2::check;

    fn index() -> IndexSet {
        IndexSet::build(
            vec![
                Page::new("/", "Home", "Configure the search plugin here"),
                Page::new("/config/", "Config", "Every option has a default").with_headers(vec![
                    Header::new(1, "Config", "config").at(0),
                    Header::new(2, "Search options", "search-options").at(7),
                ]),
                Page::new("/ru/", "Поиск", "Поиск по документации"),
                Page::new("/ja/", "検索", "検索の設定"),
            ],
            &BuildOptions::default(),
        )
        .unwrap()
    }

    fn paths(hits: &[RawHit]) -> Vec<(&str, Field)> {
        hits.iter().map(|h| (h.page.path.as_str(), h.field)).collect()
    }

    #[test]
    fn test_fields_in_boost_order() {
        let hits = index().search("config", 7);
        check!(
            paths(&hits)
                == [
                    ("/config/", Field::Title),
                    ("/config/", Field::HeadersStr),
                    ("/", Field::Content),
                ]
        );
    }

    #[test]
    fn test_prefix_query_matches() {
        let hits = index().search("sear", 7);
        check!(paths(&hits) == [("/config/", Field::HeadersStr), ("/", Field::Content)]);
    }

    #[test]
    fn test_limit_applies_per_field() {
        let hits = index().search("config", 1);
        check!(hits.len() == 3);
        let hits = index().search("config", 0);
        check!(hits.is_empty());
    }

    #[test]
    fn test_cyrillic_partition_answers_cyrillic_queries() {
        let hits = index().search("поиск", 7);
        check!(hits.iter().all(|h| h.partition == Partition::Cyrillic));
        check!(paths(&hits) == [("/ru/", Field::Title), ("/ru/", Field::Content)]);
    }

    #[test]
    fn test_cjk_partition_answers_cjk_queries() {
        let hits = index().search("検索", 7);
        check!(hits.iter().all(|h| h.partition == Partition::Cjk));
        check!(paths(&hits) == [("/ja/", Field::Title), ("/ja/", Field::Content)]);
    }

    #[test]
    fn test_boost_scales_scores() {
        let index = index();
        let boosted = index.search("config", 7);
        let plain = index.search_field("config", Field::Title, 7);
        check!((boosted[0].score - plain[0].score * 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_header_field_is_queryable_alone() {
        let hits = index().search_field("options", Field::Header, 7);
        check!(paths(&hits) == [("/config/", Field::Header)]);
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        check!(index().search("", 7).is_empty());
        check!(index().search("   ", 7).is_empty());
    }
}
