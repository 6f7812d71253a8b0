//! Turning a generation outcome into the final answer.

use crate::rag::types::{AnswerKind, AnswerPacket};
use crate::types::Fragment;
use docqa_core::ResponseMode;
use docqa_llm::Generation;
use docqa_prompt::truncate_chars;
use std::collections::HashSet;

/// Reply for an empty or whitespace-only question.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a question.";

/// Reply when the documents do not cover the question.
pub const NOT_AVAILABLE_MESSAGE: &str =
    "The requested information is not available in the provided documents.";

/// Heading placed above raw excerpts in a degraded answer.
const EXCERPTS_LABEL: &str = "Most relevant excerpts:";

/// Marker of a model refusal, matched case-insensitively.
const REFUSAL_MARKER: &str = "not found in the provided documents";

/// Per-excerpt length in plain-mode fallbacks.
const PLAIN_EXCERPT_CHARS: usize = 350;

/// Resolve a generation outcome against the fragments that built the prompt.
///
/// Unavailability wins over everything and yields excerpts. Otherwise a
/// reply mentioning the refusal marker becomes the fixed "not available"
/// message with no sources, and any other reply is returned verbatim.
pub fn resolve(generation: Generation, fragments: &[Fragment], mode: ResponseMode) -> AnswerPacket {
    match generation {
        Generation::Unavailable(reason) => {
            let excerpts: Vec<&str> = fragments
                .iter()
                .map(|f| {
                    let content = f.content().trim();
                    match mode {
                        ResponseMode::Plain => truncate_chars(content, PLAIN_EXCERPT_CHARS).0,
                        ResponseMode::Comprehensive => content,
                    }
                })
                .collect();

            let text = format!(
                "{}\n\n{}\n\n{}",
                reason.message(),
                EXCERPTS_LABEL,
                excerpts.join("\n\n")
            );
            AnswerPacket::new(text, citations(fragments), AnswerKind::Degraded)
        }
        Generation::Text(text) if text.to_lowercase().contains(REFUSAL_MARKER) => {
            AnswerPacket::bare(NOT_AVAILABLE_MESSAGE, AnswerKind::Refused)
        }
        Generation::Text(text) => AnswerPacket::new(text, citations(fragments), AnswerKind::Answered),
    }
}

/// Citations for `fragments`, first occurrence wins.
pub fn citations(fragments: &[Fragment]) -> Vec<String> {
    let mut seen = HashSet::new();
    fragments
        .iter()
        .map(Fragment::citation)
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Locator;
    use docqa_llm::Unavailable;

    fn fragment(content: &str, doc: &str, locator: Locator) -> Fragment {
        Fragment::new(content, doc, locator).unwrap()
    }

    #[test]
    fn test_citations_dedupe_in_order() {
        let fragments = vec![
            fragment("a", "hr.pdf", Locator::Page(2)),
            fragment("b", "faq.md", Locator::Section(1)),
            fragment("c", "hr.pdf", Locator::Page(2)),
            fragment("d", "hr.pdf", Locator::Page(3)),
        ];

        assert_eq!(
            citations(&fragments),
            vec![
                "hr.pdf (page/section 2)",
                "faq.md (page/section 1)",
                "hr.pdf (page/section 3)",
            ]
        );
    }

    #[test]
    fn test_page_and_section_with_same_number_collapse() {
        let fragments = vec![
            fragment("a", "doc", Locator::Page(1)),
            fragment("b", "doc", Locator::Section(1)),
        ];
        assert_eq!(citations(&fragments).len(), 1);
    }

    #[test]
    fn test_answer_is_verbatim() {
        let fragments = vec![fragment("Leave is 20 days.", "hr.pdf", Locator::Page(1))];
        let packet = resolve(
            Generation::Text("- You get 20 days of leave.".to_string()),
            &fragments,
            ResponseMode::Plain,
        );

        assert_eq!(packet.kind, AnswerKind::Answered);
        assert_eq!(packet.text, "- You get 20 days of leave.");
        assert_eq!(packet.sources, vec!["hr.pdf (page/section 1)"]);
    }

    #[test]
    fn test_refusal_is_normalized() {
        let fragments = vec![fragment("Unrelated.", "hr.pdf", Locator::Page(1))];

        for reply in [
            "Not found in the provided documents.",
            "Sorry, this is NOT FOUND IN THE PROVIDED DOCUMENTS",
        ] {
            let packet = resolve(Generation::Text(reply.to_string()), &fragments, ResponseMode::Plain);
            assert_eq!(packet.text, NOT_AVAILABLE_MESSAGE);
            assert!(packet.sources.is_empty());
            assert_eq!(packet.kind, AnswerKind::Refused);
        }
    }

    #[test]
    fn test_timeout_fallback_plain_truncates_excerpts() {
        let long = "x".repeat(500);
        let fragments = vec![
            fragment(&format!("  {}  ", long), "big.pdf", Locator::Page(4)),
            fragment("Short excerpt.", "big.pdf", Locator::Page(4)),
        ];

        let packet = resolve(
            Generation::Unavailable(Unavailable::TimedOut),
            &fragments,
            ResponseMode::Plain,
        );

        assert_eq!(packet.kind, AnswerKind::Degraded);
        assert!(packet.text.starts_with(Unavailable::TimedOut.message()));
        let expected = format!(
            "{}\n\nMost relevant excerpts:\n\n{}\n\nShort excerpt.",
            Unavailable::TimedOut.message(),
            "x".repeat(350)
        );
        assert_eq!(packet.text, expected);
        assert_eq!(packet.sources, vec!["big.pdf (page/section 4)"]);
    }

    #[test]
    fn test_unreachable_fallback_comprehensive_keeps_full_excerpts() {
        let long = "y".repeat(500);
        let fragments = vec![fragment(&long, "big.pdf", Locator::Page(1))];

        let packet = resolve(
            Generation::Unavailable(Unavailable::Unreachable("connection refused".to_string())),
            &fragments,
            ResponseMode::Comprehensive,
        );

        assert!(packet.text.starts_with("⚠️ Unable to reach the local AI service"));
        assert!(packet.text.ends_with(&long));
        assert!(packet.is_degraded());
    }

    #[test]
    fn test_fallback_wins_over_refusal_marker_in_excerpts() {
        let fragments = vec![fragment(
            "This page says: not found in the provided documents.",
            "odd.md",
            Locator::Section(2),
        )];

        let packet = resolve(
            Generation::Unavailable(Unavailable::EmptyResponse),
            &fragments,
            ResponseMode::Plain,
        );
        assert_eq!(packet.kind, AnswerKind::Degraded);
        assert_eq!(packet.sources.len(), 1);
    }
}
