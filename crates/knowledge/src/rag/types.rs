//! Answer types.

use serde::{Deserialize, Serialize};

/// How an answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// The question was empty; nothing was retrieved
    EmptyInput,
    /// No fragment survived selection; the model was not called
    NoRelevantContext,
    /// The model's reply, verbatim
    Answered,
    /// The model was unavailable; the text carries raw excerpts
    Degraded,
    /// The model said the documents do not cover the question
    Refused,
}

impl AnswerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::NoRelevantContext => "no_relevant_context",
            Self::Answered => "answered",
            Self::Degraded => "degraded",
            Self::Refused => "refused",
        }
    }
}

/// The final answer shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPacket {
    pub text: String,

    /// Unique citations in the order their fragments were selected
    pub sources: Vec<String>,

    pub kind: AnswerKind,
}

impl AnswerPacket {
    pub fn new(text: impl Into<String>, sources: Vec<String>, kind: AnswerKind) -> Self {
        Self {
            text: text.into(),
            sources,
            kind,
        }
    }

    /// A packet with no sources.
    pub fn bare(text: impl Into<String>, kind: AnswerKind) -> Self {
        Self::new(text, Vec::new(), kind)
    }

    pub fn is_degraded(&self) -> bool {
        self.kind == AnswerKind::Degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_serialization() {
        let packet = AnswerPacket::new(
            "Leave is 20 days.",
            vec!["hr.pdf (page/section 2)".to_string()],
            AnswerKind::Answered,
        );

        let json = serde_json::to_value(&packet).unwrap();
        assert_eq!(json["kind"], "answered");
        assert_eq!(json["sources"][0], "hr.pdf (page/section 2)");
    }

    #[test]
    fn test_kind_names_match_serde() {
        for kind in [
            AnswerKind::EmptyInput,
            AnswerKind::NoRelevantContext,
            AnswerKind::Answered,
            AnswerKind::Degraded,
            AnswerKind::Refused,
        ] {
            assert_eq!(serde_json::to_value(kind).unwrap(), kind.as_str());
        }
    }
}
