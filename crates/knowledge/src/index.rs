//! In-memory similarity index over embedded fragments.

use crate::embeddings::EmbeddingProvider;
use crate::types::{Fragment, ScoredFragment};
use crate::vector_index::FragmentIndex;
use docqa_core::{AppError, AppResult};
use std::sync::Arc;

/// Flat index of `(fragment, unit vector)` pairs for one ingestion batch.
///
/// Built once, read-only afterwards. Scores are squared Euclidean distances
/// between unit vectors, i.e. `2 - 2 * cosine`, in `0.0..=4.0`. A zero vector
/// has no direction and scores 2.0 against everything.
pub struct SimilarityIndex {
    provider: Arc<dyn EmbeddingProvider>,
    entries: Vec<(Fragment, Vec<f32>)>,
}

impl SimilarityIndex {
    /// An index with no fragments. Every search returns nothing.
    pub fn empty(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            entries: Vec::new(),
        }
    }

    /// Embed `fragments` in batches and build the index.
    pub async fn build(
        provider: Arc<dyn EmbeddingProvider>,
        fragments: Vec<Fragment>,
        batch_size: usize,
    ) -> AppResult<Self> {
        let batch_size = batch_size.max(1);
        let mut entries = Vec::with_capacity(fragments.len());

        tracing::info!(
            "Embedding {} fragments using provider '{}' (model: {})",
            fragments.len(),
            provider.provider_name(),
            provider.model_name()
        );

        for batch in fragments.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|f| f.content().to_string()).collect();
            let vectors = provider.embed_batch(&texts).await?;

            if vectors.len() != batch.len() {
                return Err(AppError::Knowledge(format!(
                    "Embedding provider returned {} vectors for {} texts",
                    vectors.len(),
                    batch.len()
                )));
            }

            for (fragment, vector) in batch.iter().zip(vectors) {
                entries.push((fragment.clone(), normalize(vector)));
            }
        }

        tracing::debug!("Built similarity index with {} entries", entries.len());

        Ok(Self { provider, entries })
    }

    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.entries.iter().map(|(f, _)| f)
    }
}

#[async_trait::async_trait]
impl FragmentIndex for SimilarityIndex {
    async fn search(&self, query: &str, k: usize) -> AppResult<Vec<ScoredFragment>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = normalize(self.provider.embed(query).await?);

        let mut scored: Vec<ScoredFragment> = self
            .entries
            .iter()
            .map(|(fragment, vector)| ScoredFragment {
                fragment: fragment.clone(),
                score: distance(&query_vector, vector),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| a.score.total_cmp(&b.score));
        scored.truncate(k);

        if tracing::enabled!(tracing::Level::DEBUG) {
            let scores: Vec<f32> = scored.iter().map(|s| s.score).collect();
            tracing::debug!("Top {} scores: {:?}", scored.len(), scores);
        }

        Ok(scored)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Scale to unit length. Zero vectors stay zero.
fn normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut vector {
            *v /= norm;
        }
    }
    vector
}

/// Distance between two unit (or zero) vectors.
fn distance(a: &[f32], b: &[f32]) -> f32 {
    let is_zero = |v: &[f32]| v.iter().all(|x| *x == 0.0);
    if is_zero(a) || is_zero(b) {
        return 2.0;
    }

    let cosine: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    (2.0 - 2.0 * cosine).clamp(0.0, 4.0)
}
