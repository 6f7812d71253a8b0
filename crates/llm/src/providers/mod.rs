//! Generation backends.

mod ollama;

pub use ollama::{OllamaClient, DEFAULT_OLLAMA_URL};
