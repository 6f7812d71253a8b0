//! Embedding provider trait and factory.

use super::providers::{HashingProvider, OllamaProvider};
use docqa_core::config::EmbeddingSettings;
use docqa_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "hashing", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Knowledge("No embedding returned".to_string()))
    }
}

/// Create an embedding provider from settings.
///
/// `endpoint` is the Ollama base URL shared with the generation client.
pub fn create_provider(
    settings: &EmbeddingSettings,
    endpoint: &str,
) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match settings.provider.as_str() {
        "hashing" => Ok(Arc::new(HashingProvider::new(settings.dimensions()))),

        "ollama" => {
            let provider = OllamaProvider::new(endpoint, settings.model(), settings.dimensions())?;
            Ok(Arc::new(provider))
        }

        other => Err(AppError::Knowledge(format!(
            "Unknown embedding provider: '{}'. Supported providers: hashing, ollama",
            other
        ))),
    }
}
