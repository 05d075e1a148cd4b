//! Superfluous word stripping and offset recovery, used in preview mode.

use regex::{Regex, RegexBuilder};

use crate::patterns::PatternError;
use crate::span::Span;

/// A word removed from the original text, positioned in that text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedWord {
    pub start: usize,
    pub length: usize,
}

/// Removes filler words before detection and maps spans back afterwards.
pub trait SuperfluousWordFilter: Send + Sync {
    /// Returns the cleaned text and the removed words in ascending order.
    fn strip(&self, text: &str) -> (String, Vec<RemovedWord>);

    /// Maps spans over the cleaned text back onto `original`.
    fn restore(&self, spans: Vec<Span>, removed: &[RemovedWord], original: &str) -> Vec<Span> {
        restore_offsets(spans, removed, original)
    }
}

/// Shifts and widens spans by the removed words, then re-slices them.
///
/// Words are walked in ascending position: a word at or before the span start
/// moves the span right, a word inside the span widens it. Spans that no
/// longer fit `original` are dropped.
pub fn restore_offsets(spans: Vec<Span>, removed: &[RemovedWord], original: &str) -> Vec<Span> {
    spans
        .into_iter()
        .filter_map(|mut span| {
            for word in removed {
                if word.start <= span.start {
                    span.start += word.length;
                } else if word.start < span.end() {
                    span.length += word.length;
                }
            }
            match span.reslice(original) {
                Ok(()) => Some(span),
                Err(err) => {
                    tracing::warn!(error = %err, "dropping span that cannot be restored");
                    None
                }
            }
        })
        .collect()
}

/// Whole-word, case-insensitive word list filter.
#[derive(Debug, Clone, Default)]
pub struct WordListFilter {
    pattern: Option<Regex>,
}

impl WordListFilter {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Self, PatternError> {
        if words.is_empty() {
            return Ok(Self::default());
        }
        let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w.as_ref())).collect();
        let pattern = RegexBuilder::new(&format!(r"\b(?:{})\b", alternatives.join("|")))
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::Invalid {
                name: "superfluous_words".to_string(),
                source,
            })?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }
}

impl SuperfluousWordFilter for WordListFilter {
    fn strip(&self, text: &str) -> (String, Vec<RemovedWord>) {
        let Some(pattern) = &self.pattern else {
            return (text.to_string(), Vec::new());
        };

        let mut cleaned = String::with_capacity(text.len());
        let mut removed = Vec::new();
        let mut last = 0;
        for m in pattern.find_iter(text) {
            cleaned.push_str(&text[last..m.start()]);
            removed.push(RemovedWord {
                start: m.start(),
                length: m.len(),
            });
            last = m.end();
        }
        cleaned.push_str(&text[last..]);
        (cleaned, removed)
    }
}
