//! Script-partitioned inverted indexes over the page corpus.

use super::tokenize::{TermBuilder, Tokenizer};
use crate::config::BuildOptions;
use crate::error::SearchError;
use crate::page::Page;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;

/// One script-specific index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Default,
    Cyrillic,
    Cjk,
}

impl Partition {
    /// Build and query order.
    pub const ALL: [Self; 3] = [Self::Default, Self::Cyrillic, Self::Cjk];

    fn admits(self, page: &Page) -> bool {
        match self {
            Self::Default => true,
            Self::Cyrillic => page.charsets.cyrillic,
            Self::Cjk => page.charsets.cjk,
        }
    }

    fn tokenizer(self, options: &BuildOptions) -> Result<Tokenizer, SearchError> {
        match self {
            Self::Default => {
                Tokenizer::default_script(options.encode, options.tokenize, &options.split)
            }
            Self::Cyrillic => Ok(Tokenizer::cyrillic()),
            Self::Cjk => Ok(Tokenizer::Cjk),
        }
    }
}

/// Page field indexed on its own so queries can target it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    /// Header titles concatenated from the parsed headers.
    Header,
    /// The `headersStr` value supplied with the page.
    HeadersStr,
    Content,
}

impl Field {
    pub const ALL: [Self; 4] = [Self::Title, Self::Header, Self::HeadersStr, Self::Content];

    const fn slot(self) -> usize {
        match self {
            Self::Title => 0,
            Self::Header => 1,
            Self::HeadersStr => 2,
            Self::Content => 3,
        }
    }

    fn text(self, page: &Page) -> Cow<'_, str> {
        match self {
            Self::Title => Cow::Borrowed(&page.title),
            Self::Header => Cow::Owned(
                page.headers
                    .iter()
                    .map(|h| h.title.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Self::HeadersStr => Cow::Borrowed(&page.headers_str),
            Self::Content => Cow::Borrowed(&page.content),
        }
    }
}

/// Inverted index for a single field of a partition.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    /// Map from token to (page slot, score) pairs, sorted by score descending
    terms: AHashMap<String, Vec<(usize, f32)>>,
    documents: usize,
}

impl FieldIndex {
    pub(super) fn new(terms: AHashMap<String, Vec<(usize, f32)>>, documents: usize) -> Self {
        Self { terms, documents }
    }

    /// Page slots containing every token, best first, at most `limit`.
    pub(crate) fn search(&self, tokens: &[String], limit: usize) -> Vec<(usize, f32)> {
        if tokens.is_empty() || limit == 0 {
            return vec![];
        }

        let mut combined: AHashMap<usize, (f32, usize)> = AHashMap::new();
        for token in tokens {
            let Some(postings) = self.terms.get(token) else {
                return vec![];
            };
            for &(slot, score) in postings {
                let entry = combined.entry(slot).or_insert((0.0, 0));
                entry.0 += score;
                entry.1 += 1;
            }
        }

        let mut results: Vec<(usize, f32)> = combined
            .into_iter()
            .filter(|(_, (_, matched))| *matched == tokens.len())
            .map(|(slot, (score, _))| (slot, score))
            .collect();
        results.sort_by(|(a_slot, a), (b_slot, b)| b.total_cmp(a).then(a_slot.cmp(b_slot)));
        results.truncate(limit);
        results
    }

    /// Get the number of unique terms in the index
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Get the number of documents with at least one token in this field
    pub const fn document_count(&self) -> usize {
        self.documents
    }
}

/// The indexes of one script partition.
#[derive(Debug, Clone)]
pub struct PartitionIndex {
    partition: Partition,
    tokenizer: Tokenizer,
    /// Slot → page
    pages: Vec<Arc<Page>>,
    fields: [FieldIndex; 4],
}

impl PartitionIndex {
    fn build(partition: Partition, tokenizer: Tokenizer, pages: Vec<Arc<Page>>) -> Self {
        let start = std::time::Instant::now();
        let fields = Field::ALL.map(|field| {
            let mut builder = TermBuilder::default();
            for (slot, page) in pages.iter().enumerate() {
                builder.add_terms(&field.text(page), slot, &tokenizer);
            }
            builder.finalize()
        });

        let index = Self {
            partition,
            tokenizer,
            pages,
            fields,
        };
        tracing::info!(
            "Built {:?} search partition: {} pages, {} content terms in {:?}",
            partition,
            index.pages.len(),
            index.field(Field::Content).term_count(),
            start.elapsed()
        );
        index
    }

    pub const fn partition(&self) -> Partition {
        self.partition
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn field(&self, field: Field) -> &FieldIndex {
        &self.fields[field.slot()]
    }

    pub(crate) const fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub(crate) fn page(&self, slot: usize) -> &Arc<Page> {
        &self.pages[slot]
    }
}

/// One immutable generation of the search index.
///
/// Built in one go from a corpus snapshot; a rebuild produces a new value
/// rather than mutating this one.
#[derive(Debug, Clone)]
pub struct IndexSet {
    pages: Vec<Arc<Page>>,
    partitions: Vec<PartitionIndex>,
    /// Top-level page path (`/` or `/section/`) → title
    parent_titles: AHashMap<String, String>,
}

impl IndexSet {
    /// Indexes every searchable page. Partitions without pages are left out.
    pub fn build(
        pages: impl IntoIterator<Item = Page>,
        options: &BuildOptions,
    ) -> Result<Self, SearchError> {
        let start = std::time::Instant::now();
        let mut seen = AHashSet::new();
        let pages: Vec<Arc<Page>> = pages
            .into_iter()
            .filter(|page| {
                if !page.is_searchable() {
                    tracing::debug!("Skipping {} (search disabled in frontmatter)", page.path);
                    return false;
                }
                if !seen.insert(page.path.clone()) {
                    tracing::warn!("Dropping duplicate page path {}", page.path);
                    return false;
                }
                true
            })
            .map(Arc::new)
            .collect();

        let mut partitions = Vec::with_capacity(Partition::ALL.len());
        for partition in Partition::ALL {
            let members: Vec<Arc<Page>> = pages
                .iter()
                .filter(|page| partition.admits(page))
                .cloned()
                .collect();
            if members.is_empty() {
                tracing::debug!("No pages for {:?} partition, skipping", partition);
                continue;
            }
            let tokenizer = partition.tokenizer(options)?;
            partitions.push(PartitionIndex::build(partition, tokenizer, members));
        }

        let parent_titles = pages
            .iter()
            .filter(|page| is_top_level(&page.path))
            .map(|page| (page.path.clone(), page.title.clone()))
            .collect();

        tracing::info!(
            "Built search index: {} pages across {} partitions in {:?}",
            pages.len(),
            partitions.len(),
            start.elapsed()
        );

        Ok(Self {
            pages,
            partitions,
            parent_titles,
        })
    }

    pub fn pages(&self) -> &[Arc<Page>] {
        &self.pages
    }

    pub fn partitions(&self) -> &[PartitionIndex] {
        &self.partitions
    }

    pub fn partition(&self, partition: Partition) -> Option<&PartitionIndex> {
        self.partitions.iter().find(|p| p.partition == partition)
    }

    pub fn page(&self, path: &str) -> Option<&Arc<Page>> {
        self.pages.iter().find(|page| page.path == path)
    }

    /// Title of the section a page lives in: the page at `/<first segment>/`,
    /// or `/` for root-level pages, falling back to the page's own title.
    pub fn parent_page_title<'a>(&'a self, page: &'a Page) -> &'a str {
        let section = page.path.split('/').nth(1).unwrap_or_default();
        let parent_path = if section.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", section)
        };

        self.parent_titles
            .get(&parent_path)
            .map_or(page.title.as_str(), String::as_str)
    }
}

/// `/` or `/segment/`.
fn is_top_level(path: &str) -> bool {
    path == "/"
        || path
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
            .is_some_and(|segment| !segment.is_empty() && !segment.contains('/'))
}
