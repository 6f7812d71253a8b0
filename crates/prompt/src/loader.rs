//! Prompt loader for YAML prompt definitions.
//!
//! The answer prompt ships compiled into the binary. A workspace can replace
//! it by placing `<id>.yml` in `.docqa/prompts/`.

use crate::types::PromptDefinition;
use docqa_core::{AppError, AppResult};
use std::path::Path;

/// Identifier of the built-in answer prompt.
pub const DEFAULT_PROMPT_ID: &str = "answer.default";

const BUILTIN_ANSWER_PROMPT: &str = include_str!("../prompts/answer.default.yml");

/// Parse the compiled-in answer prompt.
pub fn builtin_prompt() -> AppResult<PromptDefinition> {
    parse_prompt(BUILTIN_ANSWER_PROMPT, DEFAULT_PROMPT_ID)
}

/// Load a prompt definition by ID.
///
/// Searches `.docqa/prompts/<id>.yml` in the workspace first. When no file
/// exists and `prompt_id` is the default prompt, the built-in definition is
/// returned.
///
/// # Example
/// ```no_run
/// use docqa_prompt::{load_prompt, DEFAULT_PROMPT_ID};
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), DEFAULT_PROMPT_ID)?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = workspace_path
        .join(".docqa/prompts")
        .join(format!("{}.yml", prompt_id));

    if !prompt_file.exists() {
        if prompt_id == DEFAULT_PROMPT_ID {
            tracing::debug!("Using built-in prompt '{}'", prompt_id);
            return builtin_prompt();
        }
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition = parse_prompt(&contents, &prompt_file.display().to_string())?;
    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

fn parse_prompt(contents: &str, origin: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents).map_err(|e| {
        AppError::Prompt(format!("Failed to parse prompt YAML {}: {}", origin, e))
    })?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    if def.template.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if def.budget.summary_chars == 0 || def.budget.question_chars == 0 {
        return Err(AppError::Prompt(
            "Prompt context budgets must be positive".to_string(),
        ));
    }

    Ok(())
}
