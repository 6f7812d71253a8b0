//! Prompt composer for rendering the answer template.

use crate::types::{BuiltPrompt, BuiltPromptMetadata, ComposeRequest, PromptDefinition};
use docqa_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;

const TEMPLATE_NAME: &str = "prompt";

/// Renders prompt definitions into model-ready text.
///
/// The template is compiled once when the composer is created, so syntax
/// errors in a workspace prompt surface before the first question.
pub struct PromptComposer {
    definition: PromptDefinition,
    registry: Handlebars<'static>,
}

impl PromptComposer {
    /// Compile a prompt definition.
    pub fn new(definition: PromptDefinition) -> AppResult<Self> {
        let mut registry = Handlebars::new();

        // Disable HTML escaping for plain text
        registry.register_escape_fn(handlebars::no_escape);

        registry
            .register_template_string(TEMPLATE_NAME, &definition.template)
            .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

        Ok(Self {
            definition,
            registry,
        })
    }

    pub fn definition(&self) -> &PromptDefinition {
        &self.definition
    }

    /// Build the prompt for one question.
    ///
    /// Excerpts are trimmed, joined with the definition's separator and cut to
    /// the intent's character budget before rendering.
    pub fn compose(&self, request: &ComposeRequest<'_>) -> AppResult<BuiltPrompt> {
        let def = &self.definition;
        let joined = join_excerpts(request.excerpts, &def.separator);
        let budget = def.budget.for_intent(request.intent);
        let (context, truncated) = truncate_chars(&joined, budget);

        tracing::debug!(
            prompt_id = %def.id,
            intent = %request.intent,
            mode = %request.mode,
            excerpts = request.excerpts.len(),
            truncated,
            "Composing prompt"
        );

        let mut variables = HashMap::new();
        variables.insert("task", def.directives.task(request.intent));
        variables.insert("refusal", def.directives.refusal(request.intent));
        variables.insert("style", def.directives.style(request.mode));
        variables.insert("question", request.question.trim());
        variables.insert("excerpts", context);

        let rendered = self
            .registry
            .render(TEMPLATE_NAME, &variables)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

        Ok(BuiltPrompt {
            text: rendered.trim().to_string(),
            metadata: BuiltPromptMetadata {
                source_prompt_id: def.id.clone(),
                intent: request.intent,
                mode: request.mode,
                excerpt_count: request.excerpts.len(),
                context_chars: context.chars().count(),
                truncated,
            },
        })
    }
}

/// Join trimmed excerpts with a separator.
fn join_excerpts(excerpts: &[&str], separator: &str) -> String {
    excerpts
        .iter()
        .map(|e| e.trim())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Cut `text` to at most `max_chars` characters.
///
/// Returns the kept prefix and whether anything was dropped. Never splits a
/// code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}
