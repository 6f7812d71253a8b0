//! Summary-intent detection.

use docqa_core::config::RetrievalSettings;
use docqa_core::Intent;

/// Lowercase, turn everything but `[a-z0-9]` and whitespace into spaces, and
/// collapse whitespace runs.
pub fn normalize_question(text: &str) -> String {
    let replaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decides between a summary request and a targeted question.
///
/// A question is a summary request when its normalized form equals one of
/// the triggers or contains one of the phrases. Both lists come from
/// configuration and are normalized the same way as questions.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    triggers: Vec<String>,
    phrases: Vec<String>,
}

impl IntentClassifier {
    pub fn new<T, P>(triggers: T, phrases: P) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let prepare = |s: &str| {
            let n = normalize_question(s);
            (!n.is_empty()).then_some(n)
        };

        Self {
            triggers: triggers.into_iter().filter_map(|t| prepare(t.as_ref())).collect(),
            phrases: phrases.into_iter().filter_map(|p| prepare(p.as_ref())).collect(),
        }
    }

    pub fn from_settings(settings: &RetrievalSettings) -> Self {
        Self::new(&settings.summary_triggers, &settings.summary_phrases)
    }

    /// Classify an already normalized question.
    pub fn classify_normalized(&self, normalized: &str) -> Intent {
        let exact = self.triggers.iter().any(|t| t == normalized);
        let contains = self.phrases.iter().any(|p| normalized.contains(p.as_str()));

        if exact || contains {
            Intent::Summary
        } else {
            Intent::Question
        }
    }

    pub fn classify(&self, question: &str) -> Intent {
        self.classify_normalized(&normalize_question(question))
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::from_settings(&RetrievalSettings::default())
    }
}
