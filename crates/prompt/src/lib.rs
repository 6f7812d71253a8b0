//! Prompt system for DocQA.
//!
//! This crate composes the single instruction block sent to the model:
//! - YAML-based prompt definitions (built-in default, workspace override)
//! - Handlebars template rendering
//! - Intent- and mode-specific directives
//! - Excerpt joining under a character budget

pub mod builder;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{truncate_chars, PromptComposer};
pub use loader::{builtin_prompt, load_prompt, DEFAULT_PROMPT_ID};
pub use types::{
    BuiltPrompt, BuiltPromptMetadata, ComposeRequest, ContextBudget, PromptDefinition,
    PromptDirectives,
};
