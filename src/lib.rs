pub mod config;
pub mod error;
pub mod page;
pub mod search;
pub mod service;
pub mod tracing;

pub use config::{BuildOptions, DEFAULT_LIMIT, SearchConfig};
pub use error::SearchError;
pub use page::{Charsets, Frontmatter, Header, Page, load_pages_json, read_pages_file};
pub use search::{
    EnrichedResult, Field, IndexSet, Match, Partition, RawHit, normalize_string, rank_results,
};
pub use service::SearchService;
