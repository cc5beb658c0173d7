//! Error handling types and utilities.

/// A specialized Result type for docsearch I/O operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods when loading configuration and corpus files.
pub type Result<T> = anyhow::Result<T>;

/// Errors raised by index construction and the search service.
///
/// Malformed page data never produces one of these: missing content, headers or
/// query terms degrade to empty results instead.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A query reached the service before any index generation was built.
    #[error("search index has not been built yet")]
    IndexNotBuilt,
    /// The configured word-boundary pattern is not a valid regex.
    #[error("invalid split pattern '{pattern}': {source}")]
    InvalidSplitPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    /// A partition query running on the blocking pool panicked.
    #[error("partition query task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
