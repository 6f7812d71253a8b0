//! Text chunking with configurable size and overlap.

use crate::types::{Fragment, TextUnit};
use docqa_core::config::ChunkSettings;
use docqa_core::{AppError, AppResult};
use text_splitter::{ChunkConfig, TextSplitter as ExternalTextSplitter};

/// Splits text units into overlapping fragments.
///
/// Sizes are counted in characters. The splitter prefers paragraph, then
/// sentence, then word boundaries and only cuts inside a word when nothing
/// else fits.
pub struct Chunker {
    splitter: ExternalTextSplitter<text_splitter::Characters>,
    settings: ChunkSettings,
}

impl Chunker {
    pub fn new(settings: &ChunkSettings) -> AppResult<Self> {
        let config = ChunkConfig::new(settings.chunk_size)
            .with_overlap(settings.chunk_overlap)
            .map_err(|e| AppError::Config(format!("Invalid chunk settings: {}", e)))?;

        Ok(Self {
            splitter: ExternalTextSplitter::new(config),
            settings: settings.clone(),
        })
    }

    /// Split every unit. Units with no visible text produce nothing.
    pub fn chunk(&self, units: &[TextUnit]) -> Vec<Fragment> {
        let mut fragments = Vec::new();

        for unit in units {
            if unit.text.trim().is_empty() {
                tracing::debug!(
                    "Skipping empty unit {} of {}",
                    unit.locator,
                    unit.source_document
                );
                continue;
            }

            fragments.extend(self.splitter.chunks(&unit.text).filter_map(|piece| {
                Fragment::new(piece, unit.source_document.as_str(), unit.locator).ok()
            }));
        }

        tracing::debug!(
            "Chunked {} units into {} fragments (size: {}, overlap: {})",
            units.len(),
            fragments.len(),
            self.settings.chunk_size,
            self.settings.chunk_overlap
        );

        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Locator;

    fn chunker(size: usize, overlap: usize) -> Chunker {
        Chunker::new(&ChunkSettings {
            chunk_size: size,
            chunk_overlap: overlap,
        })
        .unwrap()
    }

    #[test]
    fn test_short_unit_is_one_fragment() {
        let units = [TextUnit::new("Leave is approved by managers.", "hr.pdf", Locator::Page(2))];
        let fragments = chunker(800, 100).chunk(&units);

        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].content(), "Leave is approved by managers.");
        assert_eq!(fragments[0].locator(), Locator::Page(2));
        assert_eq!(fragments[0].source_document(), "hr.pdf");
    }

    #[test]
    fn test_fragments_respect_size_limit() {
        let text = "Employees must record overtime in the portal. ".repeat(80);
        let units = [TextUnit::new(text, "policy.md", Locator::Section(4))];
        let fragments = chunker(800, 100).chunk(&units);

        assert!(fragments.len() > 1);
        for fragment in &fragments {
            assert!(fragment.content().chars().count() <= 800);
            assert_eq!(fragment.locator(), Locator::Section(4));
        }
    }

    #[test]
    fn test_consecutive_fragments_overlap() {
        let text = (0..300)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        let units = [TextUnit::new(text, "list.txt", Locator::Section(1))];
        let fragments = chunker(200, 50).chunk(&units);

        assert!(fragments.len() >= 2);
        let first_tail: Vec<&str> = fragments[0].content().split_whitespace().rev().take(2).collect();
        assert!(first_tail
            .iter()
            .all(|w| fragments[1].content().contains(w)));
    }

    #[test]
    fn test_empty_units_are_skipped() {
        let units = [
            TextUnit::new("", "scan.pdf", Locator::Page(1)),
            TextUnit::new("  \n\t ", "scan.pdf", Locator::Page(2)),
            TextUnit::new("Real text", "scan.pdf", Locator::Page(3)),
        ];
        let fragments = chunker(800, 100).chunk(&units);

        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].locator(), Locator::Page(3));
    }

    #[test]
    fn test_fragments_never_span_documents() {
        let units = [
            TextUnit::new("Alpha document text.", "a.txt", Locator::Section(1)),
            TextUnit::new("Beta document text.", "b.txt", Locator::Section(1)),
        ];
        let fragments = chunker(800, 100).chunk(&units);

        assert_eq!(fragments.len(), 2);
        assert!(!fragments[0].content().contains("Beta"));
        assert_eq!(fragments[1].source_document(), "b.txt");
    }

    #[test]
    fn test_utf8_text() {
        let text = "Férias são aprovadas pelo gestor 🎮 com acentuação: ã, õ, ç. ".repeat(40);
        let units = [TextUnit::new(text, "ferias.md", Locator::Section(1))];
        let fragments = chunker(100, 20).chunk(&units);

        assert!(fragments.len() > 1);
        assert!(fragments.iter().all(|f| f.content().chars().count() <= 100));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let result = Chunker::new(&ChunkSettings {
            chunk_size: 100,
            chunk_overlap: 100,
        });
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
