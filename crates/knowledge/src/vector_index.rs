//! Search abstraction the retriever depends on.

use crate::types::ScoredFragment;
use docqa_core::AppResult;

/// Anything that can rank fragments against a query text.
///
/// Implementations must:
/// - return at most `k` results
/// - order results by ascending score (best match first)
/// - return an empty list, not an error, when they hold no fragments
#[async_trait::async_trait]
pub trait FragmentIndex: Send + Sync {
    /// Top-`k` fragments closest to `query`.
    async fn search(&self, query: &str, k: usize) -> AppResult<Vec<ScoredFragment>>;

    /// Number of fragments held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
