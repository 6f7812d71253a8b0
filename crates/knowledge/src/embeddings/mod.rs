//! Embedding providers for fragment and query vectors.
//!
//! `hashing` works offline and is the default; `ollama` calls a local
//! embedding model.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
