//! LLM integration crate for DocQA.
//!
//! This crate is the generation collaborator of the answer pipeline. It
//! exposes a provider-agnostic [`LlmClient`] trait, an Ollama implementation,
//! and [`generate`], which bounds a completion by a deadline and folds every
//! failure into [`Generation::Unavailable`].
//!
//! # Example
//! ```no_run
//! use docqa_llm::{generate, Generation, LlmRequest, OllamaClient};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Summarize the excerpts.", "phi3:mini").with_temperature(0.2);
//! match generate(&client, &request, Duration::from_secs(300)).await {
//!     Generation::Text(text) => println!("{}", text),
//!     Generation::Unavailable(reason) => eprintln!("{}", reason.message()),
//! }
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod generate;
pub mod providers;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use generate::{generate, Generation, Unavailable};
pub use providers::OllamaClient;
