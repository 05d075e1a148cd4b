//! Trailing number absorption ("move 3pm appointment to 4").

use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::category::SpanCategory;
use crate::patterns::{NUMBER_ENDING_GROUP, PatternError};
use crate::span::Span;

/// Finds integer tokens in a fragment of text.
pub trait IntegerExtractor: Send + Sync {
    /// Returns the byte ranges of every integer found in `text`.
    fn extract(&self, text: &str) -> Vec<Range<usize>>;
}

/// Matches runs of ASCII digits, plus an optional list of number words.
#[derive(Debug, Clone)]
pub struct DigitIntegerExtractor {
    pattern: Regex,
}

impl DigitIntegerExtractor {
    /// Also recognizes the given spelled-out numbers ("four", "twelve"),
    /// case-insensitively and as whole words.
    pub fn with_words<S: AsRef<str>>(words: &[S]) -> Result<Self, PatternError> {
        let mut alternatives = vec![r"\d+".to_string()];
        alternatives.extend(words.iter().map(|w| regex::escape(w.as_ref())));
        let raw = format!(r"\b(?:{})\b", alternatives.join("|"));
        let pattern = RegexBuilder::new(&raw)
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::Invalid {
                name: "number_words".to_string(),
                source,
            })?;
        Ok(Self { pattern })
    }
}

impl Default for DigitIntegerExtractor {
    fn default() -> Self {
        Self {
            pattern: Regex::new(r"\b\d+\b").expect("static digit pattern is valid"),
        }
    }
}

impl IntegerExtractor for DigitIntegerExtractor {
    fn extract(&self, text: &str) -> Vec<Range<usize>> {
        self.pattern.find_iter(text).map(|m| m.range()).collect()
    }
}

/// Emits new `Time` spans for bare numbers trailing a time or date-time span.
///
/// `pattern` is applied to the text right after each such span; its
/// `newTime` group marks the number. Groups the integer extractor finds
/// nothing in are skipped. Overlapping results are coalesced.
pub fn absorb_number_endings(
    spans: &[Span],
    pattern: &Regex,
    integers: &dyn IntegerExtractor,
    text: &str,
) -> Vec<Span> {
    let mut tokens = Vec::new();
    for span in spans.iter().filter(|s| s.category.is_time_like()) {
        let Some(after) = text.get(span.end()..) else {
            continue;
        };
        let Some(group) = pattern
            .captures(after)
            .and_then(|caps| caps.name(NUMBER_ENDING_GROUP))
        else {
            continue;
        };
        if integers.extract(group.as_str()).is_empty() {
            continue;
        }
        let start = span.end() + group.start();
        tokens.push(start..start + group.len());
    }

    coalesce(tokens)
        .into_iter()
        .filter_map(|range| Span::new(text, range.start, range.len(), SpanCategory::Time).ok())
        .collect()
}

/// Sorts ranges and merges the ones that overlap.
fn coalesce(mut tokens: Vec<Range<usize>>) -> Vec<Range<usize>> {
    tokens.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match merged.last_mut() {
            Some(last) if token.start < last.end => last.end = last.end.max(token.end),
            _ => merged.push(token),
        }
    }
    merged
}
