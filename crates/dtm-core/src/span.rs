//! Recognized entity spans.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::category::SpanCategory;

/// Bounds violations when building a span over a source text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpanError {
    /// The span has zero length.
    #[error("span at {start} is empty")]
    Empty { start: usize },

    /// The span extends past the end of the text.
    #[error("span {start}+{length} exceeds text length {text_len}")]
    OutOfBounds {
        start: usize,
        length: usize,
        text_len: usize,
    },

    /// A span boundary falls inside a multi-byte character.
    #[error("offset {offset} is not a char boundary")]
    NotCharBoundary { offset: usize },
}

/// A tagged, positioned substring representing one entity candidate.
///
/// Offsets are UTF-8 byte offsets into the text the span was produced from,
/// and `text` always equals `source[start..start + length]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first character.
    pub start: usize,

    /// Length in bytes, always positive.
    pub length: usize,

    /// The covered slice of the source text.
    pub text: String,

    /// Which detector family produced the span.
    pub category: SpanCategory,

    /// Detector-specific annotations.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Span {
    /// Creates a span over `source[start..start + length]`.
    pub fn new(
        source: &str,
        start: usize,
        length: usize,
        category: SpanCategory,
    ) -> Result<Self, SpanError> {
        let text = slice(source, start, length)?.to_string();
        Ok(Self {
            start,
            length,
            text,
            category,
            metadata: Map::new(),
        })
    }

    /// Exclusive end offset.
    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    /// Whether the half-open ranges of the two spans intersect.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// Whether this span fully contains `other` (identical bounds included).
    pub const fn covers(&self, other: &Self) -> bool {
        self.start <= other.start && self.end() >= other.end()
    }

    /// Recomputes `text` from the current bounds.
    pub fn reslice(&mut self, source: &str) -> Result<(), SpanError> {
        self.text = slice(source, self.start, self.length)?.to_string();
        Ok(())
    }

    /// Validates bounds against `source`, repairing `text` when it disagrees.
    pub fn sanitize(mut self, source: &str) -> Result<Self, SpanError> {
        let expected = slice(source, self.start, self.length)?;
        if self.text != expected {
            tracing::debug!(
                start = self.start,
                reported = %self.text,
                actual = expected,
                "re-slicing span text"
            );
            self.text = expected.to_string();
        }
        Ok(self)
    }
}

/// Returns `source[start..start + length]` after checking every invariant.
pub(crate) fn slice(source: &str, start: usize, length: usize) -> Result<&str, SpanError> {
    if length == 0 {
        return Err(SpanError::Empty { start });
    }
    let end = start
        .checked_add(length)
        .filter(|end| *end <= source.len())
        .ok_or(SpanError::OutOfBounds {
            start,
            length,
            text_len: source.len(),
        })?;
    for offset in [start, end] {
        if !source.is_char_boundary(offset) {
            return Err(SpanError::NotCharBoundary { offset });
        }
    }
    Ok(&source[start..end])
}
