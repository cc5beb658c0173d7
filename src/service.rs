//! Search service owning the current index generation.
//!
//! The service is the coordination point between corpus updates and live
//! queries:
//! - Rebuilds produce a fresh [`IndexSet`] and swap it in whole
//! - Queries fan out to the partitions on the blocking pool
//! - A newer query supersedes any query still in flight (last query wins)

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::page::Page;
use crate::search::{EnrichedResult, IndexSet, RawHit};
use futures::future::join_all;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

pub struct SearchService {
    config: SearchConfig,

    /// Current index generation, replaced atomically on rebuild
    index: RwLock<Option<Arc<IndexSet>>>,

    /// Ticket of the most recently started query
    generation: AtomicU64,

    /// Cancellation handle of the most recently started query
    in_flight: Mutex<CancellationToken>,
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("config", &self.config)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl SearchService {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            index: RwLock::new(None),
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(CancellationToken::new()),
        }
    }

    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The index generation currently served, if one was built.
    pub async fn index(&self) -> Option<Arc<IndexSet>> {
        self.index.read().await.clone()
    }

    /// Builds a new index generation from `pages` and makes it current.
    ///
    /// Queries already running keep the generation they started with.
    pub async fn rebuild(&self, pages: Vec<Page>) -> Result<Arc<IndexSet>, SearchError> {
        let options = self.config.build.clone();
        // Index construction is CPU bound
        let built = tokio::task::spawn_blocking(move || IndexSet::build(pages, &options)).await??;
        let built = Arc::new(built);

        *self.index.write().await = Some(Arc::clone(&built));
        tracing::debug!("Search index generation replaced");
        Ok(built)
    }

    /// Runs a query with the configured per-field limit.
    ///
    /// Returns `Ok(None)` when a newer query started before this one finished.
    pub async fn search(
        &self,
        query: &str,
        terms: &[String],
    ) -> Result<Option<Vec<EnrichedResult>>, SearchError> {
        self.search_with_limit(query, terms, self.config.limit).await
    }

    pub async fn search_with_limit(
        &self,
        query: &str,
        terms: &[String],
        limit: usize,
    ) -> Result<Option<Vec<EnrichedResult>>, SearchError> {
        let (ticket, token) = self.begin_query().await;
        let index = self.index().await.ok_or(SearchError::IndexNotBuilt)?;

        let tasks = (0..index.partitions().len()).map(|slot| {
            let index = Arc::clone(&index);
            let query = query.to_string();
            tokio::task::spawn_blocking(move || index.partitions()[slot].search(&query, limit))
        });

        let joined = tokio::select! {
            biased;
            () = token.cancelled() => {
                tracing::debug!("Query '{}' (#{}) superseded during dispatch", query, ticket);
                return Ok(None);
            }
            joined = join_all(tasks) => joined,
        };

        // Partition order is preserved by join_all
        let mut hits: Vec<RawHit> = Vec::new();
        for partition_hits in joined {
            hits.extend(partition_hits?);
        }

        let results = index.enrich_hits(&hits, query, terms);

        if self.generation.load(Ordering::Acquire) != ticket {
            tracing::debug!("Query '{}' (#{}) superseded, discarding results", query, ticket);
            return Ok(None);
        }
        Ok(Some(results))
    }

    /// Issues a new query ticket and cancels the previous query.
    ///
    /// Ticket and token are swapped under the same lock, so the newest
    /// ticket always owns the live token.
    async fn begin_query(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let mut in_flight = self.in_flight.lock().await;
        let ticket = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let previous = std::mem::replace(&mut *in_flight, token.clone());
        drop(in_flight);

        previous.cancel();
        (ticket, token)
    }
}
