//! Shared request classifiers used across the pipeline crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// How the answer should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Short answer in simple language.
    #[default]
    Plain,
    /// Structured answer with headings, bullet points and full fallback excerpts.
    Comprehensive,
}

impl ResponseMode {
    /// Get the canonical mode name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "comprehensive" => Ok(Self::Comprehensive),
            other => Err(AppError::Config(format!(
                "Unknown response mode: {}. Supported: plain, comprehensive",
                other
            ))),
        }
    }
}

/// What the user is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    /// Broad coverage of the uploaded documents.
    Summary,
    /// A targeted question answered from the closest excerpts.
    Question,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Question => "question",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
