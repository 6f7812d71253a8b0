//! Answer pipeline orchestration.
//!
//! Each question moves through
//! `Received -> Validated -> Classified -> Retrieved -> {ShortCircuited | Prompted -> Resolved}`
//! exactly once. Empty input and empty retrieval end in `ShortCircuited`
//! without touching the model.

use crate::rag::intent::{normalize_question, IntentClassifier};
use crate::rag::resolve::{resolve, EMPTY_INPUT_MESSAGE, NOT_AVAILABLE_MESSAGE};
use crate::rag::retrieve::Retriever;
use crate::rag::types::{AnswerKind, AnswerPacket};
use crate::vector_index::FragmentIndex;
use docqa_core::config::AppConfig;
use docqa_core::{AppResult, ResponseMode};
use docqa_llm::{generate, LlmClient, LlmRequest};
use docqa_prompt::{load_prompt, ComposeRequest, PromptComposer, DEFAULT_PROMPT_ID};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnswerState {
    Received,
    Validated,
    Classified,
    Retrieved,
    ShortCircuited,
    Prompted,
    Resolved,
}

impl fmt::Display for AnswerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Classified => "classified",
            Self::Retrieved => "retrieved",
            Self::ShortCircuited => "short_circuited",
            Self::Prompted => "prompted",
            Self::Resolved => "resolved",
        };
        f.write_str(name)
    }
}

fn enter(state: AnswerState) {
    tracing::debug!(state = %state, "Answer state");
}

/// Generation parameters for answers.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerSettings {
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl AnswerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            timeout: Duration::from_secs(config.llm.timeout_secs),
        }
    }
}

/// Answers questions over a fragment index.
pub struct Assistant {
    index: Arc<dyn FragmentIndex>,
    llm: Arc<dyn LlmClient>,
    composer: PromptComposer,
    classifier: IntentClassifier,
    retriever: Retriever,
    settings: AnswerSettings,
}

impl Assistant {
    pub fn new(
        index: Arc<dyn FragmentIndex>,
        llm: Arc<dyn LlmClient>,
        composer: PromptComposer,
        classifier: IntentClassifier,
        retriever: Retriever,
        settings: AnswerSettings,
    ) -> Self {
        Self {
            index,
            llm,
            composer,
            classifier,
            retriever,
            settings,
        }
    }

    /// Wire an assistant from configuration. The answer prompt is loaded
    /// from the workspace when overridden there.
    pub fn from_config(
        config: &AppConfig,
        index: Arc<dyn FragmentIndex>,
        llm: Arc<dyn LlmClient>,
    ) -> AppResult<Self> {
        let definition = load_prompt(&config.workspace, DEFAULT_PROMPT_ID)?;
        let composer = PromptComposer::new(definition)?;

        Ok(Self::new(
            index,
            llm,
            composer,
            IntentClassifier::from_settings(&config.retrieval),
            Retriever::from_config(config),
            AnswerSettings::from_config(config),
        ))
    }

    /// Answer one question.
    ///
    /// Runtime conditions (empty input, no context, model unavailable, model
    /// refusal) all produce a packet. Errors are limited to collaborator
    /// failures outside the generation boundary, such as the embedding
    /// backend failing during retrieval.
    pub async fn answer(&self, question: &str, mode: ResponseMode) -> AppResult<AnswerPacket> {
        let span = tracing::info_span!("question", mode = %mode);
        self.answer_inner(question, mode).instrument(span).await
    }

    async fn answer_inner(&self, question: &str, mode: ResponseMode) -> AppResult<AnswerPacket> {
        enter(AnswerState::Received);

        let question = question.trim();
        if question.is_empty() {
            enter(AnswerState::ShortCircuited);
            return Ok(AnswerPacket::bare(EMPTY_INPUT_MESSAGE, AnswerKind::EmptyInput));
        }
        enter(AnswerState::Validated);

        let normalized = normalize_question(question);
        let intent = self.classifier.classify_normalized(&normalized);
        tracing::debug!(intent = %intent, normalized = %normalized, "Classified question");
        enter(AnswerState::Classified);

        let fragments = self
            .retriever
            .retrieve(self.index.as_ref(), question, intent)
            .await?;
        enter(AnswerState::Retrieved);

        if fragments.is_empty() {
            tracing::info!("No relevant fragments for question");
            enter(AnswerState::ShortCircuited);
            return Ok(AnswerPacket::bare(
                NOT_AVAILABLE_MESSAGE,
                AnswerKind::NoRelevantContext,
            ));
        }

        let excerpts: Vec<&str> = fragments.iter().map(|f| f.content()).collect();
        let prompt = self.composer.compose(&ComposeRequest {
            question,
            intent,
            mode,
            excerpts: &excerpts,
        })?;
        tracing::debug!(
            excerpts = prompt.metadata.excerpt_count,
            context_chars = prompt.metadata.context_chars,
            truncated = prompt.metadata.truncated,
            "Built prompt"
        );
        enter(AnswerState::Prompted);

        let request = LlmRequest::new(prompt.text, &self.settings.model)
            .with_temperature(self.settings.temperature);
        let generation = generate(self.llm.as_ref(), &request, self.settings.timeout).await;

        let packet = resolve(generation, &fragments, mode);
        tracing::info!(
            kind = packet.kind.as_str(),
            sources = packet.sources.len(),
            "Answer resolved"
        );
        enter(AnswerState::Resolved);

        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(AnswerState::ShortCircuited.to_string(), "short_circuited");
        assert_eq!(AnswerState::Resolved.to_string(), "resolved");
    }

    #[test]
    fn test_settings_from_config() {
        let config = AppConfig::default();
        let settings = AnswerSettings::from_config(&config);

        assert_eq!(settings.model, "phi3:mini");
        assert_eq!(settings.timeout, Duration::from_secs(300));
        assert!((settings.temperature - 0.2).abs() < f32::EPSILON);
    }
}
