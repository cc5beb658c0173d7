//! Full-text search over documentation pages.
//!
//! Pages are indexed into script partitions (default, Cyrillic, CJK), queried
//! with boosted title/headers/content fields, then each hit is located in its
//! page to produce a breadcrumb heading and a highlighted snippet before the
//! results are ranked and deduplicated.

// Module declarations
pub(crate) mod enrich;
pub(crate) mod heading;
pub(crate) mod index;
pub(crate) mod locate;
pub(crate) mod normalize;
pub(crate) mod query;
pub(crate) mod scoring;
pub(crate) mod snippet;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use enrich::{EnrichedResult, enrich};
pub use heading::{Heading, resolve_heading};
pub use index::{Field, FieldIndex, IndexSet, Partition, PartitionIndex};
pub use locate::{Match, content_match, header_match, locate};
pub use normalize::{NormalizedText, normalize_string};
pub use query::{QUERY_FIELDS, RawHit};
pub use scoring::{Ranker, dedup_by_path, rank_results};
pub use snippet::{SNIPPET_LENGTH, Snippet, extract_snippet};
pub use tokenize::{DEFAULT_SPLIT, Encoding, TokenizeMode};
