//! Document question answering over an in-memory index.
//!
//! Documents are extracted into page or section text units, split into
//! overlapping fragments, embedded and held by a [`Session`]. An
//! [`Assistant`] answers questions against any [`FragmentIndex`], composing
//! prompts from the closest fragments and falling back to raw excerpts when
//! the model is unavailable.

pub mod chunker;
pub mod embeddings;
pub mod index;
pub mod parser;
pub mod rag;
pub mod session;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use chunker::Chunker;
pub use embeddings::{create_provider, EmbeddingProvider};
pub use index::SimilarityIndex;
pub use rag::{AnswerKind, AnswerPacket, AnswerSettings, Assistant};
pub use session::Session;
pub use types::{Fragment, IngestStats, Locator, ScoredFragment, TextUnit};
pub use vector_index::FragmentIndex;
