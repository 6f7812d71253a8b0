//! Prompt types for DocQA.
//!
//! This module defines the domain entities for the prompt system.

use docqa_core::{Intent, ResponseMode};
use serde::{Deserialize, Serialize};

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Instruction text selected by intent and response mode
    pub directives: PromptDirectives,

    /// Excerpt context budgets
    #[serde(default)]
    pub budget: ContextBudget,

    /// Line placed between consecutive excerpts
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Template string with Handlebars syntax.
    ///
    /// Variables: `task`, `refusal`, `style`, `question`, `excerpts`.
    pub template: String,
}

fn default_separator() -> String {
    "\n\n---\n\n".to_string()
}

/// The fixed instruction parts of the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptDirectives {
    pub summary_task: String,
    pub question_task: String,
    pub summary_refusal: String,
    pub question_refusal: String,
    pub plain_style: String,
    pub comprehensive_style: String,
}

impl PromptDirectives {
    /// Task framing for the given intent.
    pub fn task(&self, intent: Intent) -> &str {
        match intent {
            Intent::Summary => &self.summary_task,
            Intent::Question => &self.question_task,
        }
    }

    /// "Not found" contract for the given intent.
    pub fn refusal(&self, intent: Intent) -> &str {
        match intent {
            Intent::Summary => &self.summary_refusal,
            Intent::Question => &self.question_refusal,
        }
    }

    /// Style framing for the given response mode.
    pub fn style(&self, mode: ResponseMode) -> &str {
        match mode {
            ResponseMode::Plain => &self.plain_style,
            ResponseMode::Comprehensive => &self.comprehensive_style,
        }
    }
}

/// Character budgets for the joined excerpt block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextBudget {
    pub summary_chars: usize,
    pub question_chars: usize,
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self {
            summary_chars: 3500,
            question_chars: 2500,
        }
    }
}

impl ContextBudget {
    pub fn for_intent(&self, intent: Intent) -> usize {
        match intent {
            Intent::Summary => self.summary_chars,
            Intent::Question => self.question_chars,
        }
    }
}

/// Inputs for composing one prompt.
#[derive(Debug, Clone, Copy)]
pub struct ComposeRequest<'a> {
    /// The user's question, verbatim apart from outer whitespace
    pub question: &'a str,
    pub intent: Intent,
    pub mode: ResponseMode,
    /// Selected fragment contents, best match first
    pub excerpts: &'a [&'a str],
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// Prompt text sent verbatim to the model
    pub text: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    pub intent: Intent,

    pub mode: ResponseMode,

    /// Number of excerpts joined into the context
    #[serde(rename = "excerptCount")]
    pub excerpt_count: usize,

    /// Length of the context block after truncation, in characters
    #[serde(rename = "contextChars")]
    pub context_chars: usize,

    /// Whether the context budget cut the excerpts short
    pub truncated: bool,
}
