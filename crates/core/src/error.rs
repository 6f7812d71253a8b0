//! Error types for the DocQA workspace.
//!
//! This module defines a unified error enum for every failure that can
//! escape a collaborator: configuration, I/O, text extraction, embeddings,
//! prompt rendering and the LLM transport.
//!
//! Conditions the answer pipeline recovers from on its own (empty input,
//! no relevant context, model unavailable, model refusal) are not errors;
//! they are reported on the answer packet instead.

use thiserror::Error;

/// Unified error type for DocQA.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM transport or protocol errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// LLM request exceeded its deadline
    #[error("LLM request timed out: {0}")]
    Timeout(String),

    /// Indexing, embedding and retrieval errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Document text extraction errors
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Prompt definition and rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::Timeout("after 300s".to_string());
        assert_eq!(err.to_string(), "LLM request timed out: after 300s");

        let err = AppError::Extraction("unsupported format: docx".to_string());
        assert!(err.to_string().starts_with("Extraction error"));
    }

    #[test]
    fn test_from_serde_yaml() {
        let parsed: Result<Vec<u32>, _> = serde_yaml::from_str("not: [a list");
        let err: AppError = parsed.unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
