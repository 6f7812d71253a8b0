//! Knowledge system type definitions.

use docqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a text unit inside its document, 1-based.
///
/// Page-oriented formats (PDF) carry pages; paragraph-oriented formats carry
/// sections. The variant is a property of the fragment, not of a lookup on
/// the document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "number", rename_all = "lowercase")]
pub enum Locator {
    Page(u32),
    Section(u32),
}

impl Locator {
    pub fn number(&self) -> u32 {
        match self {
            Self::Page(n) | Self::Section(n) => *n,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page/section {}", self.number())
    }
}

/// Raw text extracted from one page or section of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUnit {
    pub text: String,
    pub source_document: String,
    pub locator: Locator,
}

impl TextUnit {
    pub fn new(text: impl Into<String>, source_document: impl Into<String>, locator: Locator) -> Self {
        Self {
            text: text.into(),
            source_document: source_document.into(),
            locator,
        }
    }
}

/// An immutable unit of retrievable text with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    content: String,
    source_document: String,
    locator: Locator,
}

impl Fragment {
    /// Create a fragment. Whitespace-only content is rejected.
    pub fn new(
        content: impl Into<String>,
        source_document: impl Into<String>,
        locator: Locator,
    ) -> AppResult<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(AppError::Knowledge(
                "Fragment content cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            content,
            source_document: source_document.into(),
            locator,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn source_document(&self) -> &str {
        &self.source_document
    }

    pub fn locator(&self) -> Locator {
        self.locator
    }

    /// Human-readable citation, e.g. `handbook.pdf (page/section 3)`.
    pub fn citation(&self) -> String {
        format!("{} ({})", self.source_document, self.locator)
    }
}

/// A fragment paired with its distance to a query. Lower is closer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredFragment {
    pub fragment: Fragment,
    pub score: f32,
}

/// Statistics from one ingestion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    /// Documents that produced at least one text unit
    pub documents: usize,

    /// Non-empty pages and sections extracted
    pub units: usize,

    /// Fragments in the new index
    pub fragments: usize,

    /// Files that could not be read or have an unsupported format
    pub skipped: Vec<String>,

    /// Duration in seconds
    pub duration_secs: f64,
}
