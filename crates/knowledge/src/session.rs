//! Session-scoped document index.
//!
//! A session holds the index for the current document batch. Loading a new
//! batch builds a complete index off to the side and then swaps it in, so a
//! search in progress keeps its snapshot and never sees a half-built index.

use crate::chunker::Chunker;
use crate::embeddings::{create_provider, EmbeddingProvider};
use crate::index::SimilarityIndex;
use crate::parser;
use crate::types::{IngestStats, ScoredFragment, TextUnit};
use crate::vector_index::FragmentIndex;
use docqa_core::{config::AppConfig, AppResult};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

pub struct Session {
    provider: Arc<dyn EmbeddingProvider>,
    chunker: Chunker,
    batch_size: usize,
    current: RwLock<Arc<SimilarityIndex>>,
}

impl Session {
    /// Create a session with an empty index.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, chunker: Chunker, batch_size: usize) -> Self {
        let empty = Arc::new(SimilarityIndex::empty(provider.clone()));
        Self {
            provider,
            chunker,
            batch_size,
            current: RwLock::new(empty),
        }
    }

    /// Create a session from the application configuration.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let provider = create_provider(&config.embedding, &config.llm.endpoint)?;
        let chunker = Chunker::new(&config.chunking)?;

        tracing::debug!(
            "Session using embedding provider '{}' (model: {}, dimensions: {})",
            provider.provider_name(),
            provider.model_name(),
            provider.dimensions()
        );

        Ok(Self::new(provider, chunker, config.embedding.batch_size))
    }

    /// The index searches currently run against.
    pub fn snapshot(&self) -> Arc<SimilarityIndex> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Read documents from files and directories and replace the index.
    ///
    /// Files that cannot be extracted are skipped and reported in the stats.
    /// The previous index stays active if building the new one fails.
    pub async fn ingest(&self, paths: &[PathBuf]) -> AppResult<IngestStats> {
        let start = Instant::now();
        let documents = parser::collect_documents(paths)?;

        let mut units = Vec::new();
        let mut stats = IngestStats::default();

        for path in &documents {
            match parser::extract_file(path) {
                Ok(extracted) if extracted.is_empty() => {
                    tracing::warn!("No text extracted from {:?}", path);
                    stats.skipped.push(path.display().to_string());
                }
                Ok(extracted) => {
                    stats.documents += 1;
                    units.extend(extracted);
                }
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                    stats.skipped.push(path.display().to_string());
                }
            }
        }

        let mut stats = self.ingest_units_with(units, stats).await?;
        stats.duration_secs = start.elapsed().as_secs_f64();

        tracing::info!(
            "Ingested {} documents: {} units, {} fragments, {} skipped in {:.2}s",
            stats.documents,
            stats.units,
            stats.fragments,
            stats.skipped.len(),
            stats.duration_secs
        );

        Ok(stats)
    }

    /// Replace the index with one built from already extracted units.
    pub async fn ingest_units(&self, units: Vec<TextUnit>) -> AppResult<IngestStats> {
        let start = Instant::now();
        let documents = units
            .iter()
            .map(|u| u.source_document.as_str())
            .collect::<std::collections::BTreeSet<_>>()
            .len();

        let mut stats = self
            .ingest_units_with(
                units,
                IngestStats {
                    documents,
                    ..Default::default()
                },
            )
            .await?;
        stats.duration_secs = start.elapsed().as_secs_f64();
        Ok(stats)
    }

    async fn ingest_units_with(
        &self,
        units: Vec<TextUnit>,
        mut stats: IngestStats,
    ) -> AppResult<IngestStats> {
        stats.units = units.iter().filter(|u| !u.text.trim().is_empty()).count();

        let fragments = self.chunker.chunk(&units);
        stats.fragments = fragments.len();

        let index =
            SimilarityIndex::build(self.provider.clone(), fragments, self.batch_size).await?;
        self.swap(index);

        Ok(stats)
    }

    fn swap(&self, index: SimilarityIndex) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(index);
    }
}

#[async_trait::async_trait]
impl FragmentIndex for Session {
    async fn search(&self, query: &str, k: usize) -> AppResult<Vec<ScoredFragment>> {
        let index = self.snapshot();
        index.search(query, k).await
    }

    fn len(&self) -> usize {
        self.snapshot().len()
    }
}
