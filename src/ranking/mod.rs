//! Query-time ranking over the job corpus.
//!
//! Both components are pure functions over a snapshot of stored records:
//! the BM25 relevance scorer for free-text search and the category-affinity
//! ranker behind the candidate job listing. Neither keeps any index or cache
//! between calls; every invocation re-derives its statistics from the
//! snapshot it is handed.

mod bm25;
mod recommend;

pub use bm25::{search, ScoredJob, SEARCH_RESULT_LIMIT};
pub use recommend::{recommend, RecommendSource};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankingError {
    /// The search query was empty or whitespace-only.
    #[error("Search query is required")]
    InvalidQuery,

    /// Fetching the underlying records failed. Not retried here; retry
    /// policy, if any, belongs to the store.
    #[error("Failed to load records: {0}")]
    Retrieval(#[from] anyhow::Error),
}
