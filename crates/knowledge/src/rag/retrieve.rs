//! Candidate retrieval and intent-dependent selection.

use crate::types::{Fragment, ScoredFragment};
use crate::vector_index::FragmentIndex;
use docqa_core::config::AppConfig;
use docqa_core::{AppResult, Intent};

/// Selection policy applied to the index's candidates.
///
/// Summaries take the best `summary_limit` candidates whatever their score;
/// targeted questions keep only candidates scoring strictly below
/// `threshold`, then take at most `question_limit` of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Retriever {
    pub fan_out: usize,
    pub summary_limit: usize,
    pub question_limit: usize,
    pub threshold: f32,
}

impl Default for Retriever {
    fn default() -> Self {
        Self {
            fan_out: 8,
            summary_limit: 6,
            question_limit: 3,
            threshold: docqa_core::config::SEMANTIC_DISTANCE_THRESHOLD,
        }
    }
}

impl Retriever {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            fan_out: config.retrieval.fan_out,
            summary_limit: config.retrieval.summary_limit,
            question_limit: config.retrieval.question_limit,
            threshold: config.distance_threshold(),
        }
    }

    /// Fetch `fan_out` candidates for `question` and apply the policy.
    pub async fn retrieve(
        &self,
        index: &dyn FragmentIndex,
        question: &str,
        intent: Intent,
    ) -> AppResult<Vec<Fragment>> {
        let candidates = index.search(question, self.fan_out).await?;
        let selected = self.select(candidates, intent);

        tracing::debug!(
            intent = %intent,
            selected = selected.len(),
            threshold = self.threshold,
            "Selected fragments"
        );

        Ok(selected)
    }

    /// Apply the selection policy to candidates ordered best first.
    pub fn select(&self, candidates: Vec<ScoredFragment>, intent: Intent) -> Vec<Fragment> {
        match intent {
            Intent::Summary => candidates
                .into_iter()
                .take(self.summary_limit)
                .map(|c| c.fragment)
                .collect(),
            Intent::Question => candidates
                .into_iter()
                .filter(|c| c.score < self.threshold)
                .take(self.question_limit)
                .map(|c| c.fragment)
                .collect(),
        }
    }
}
