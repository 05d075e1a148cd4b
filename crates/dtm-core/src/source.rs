//! Candidate sources: the per-category detectors feeding the merge.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::category::SpanCategory;
use crate::patterns::PatternError;
use crate::span::Span;

/// A detector producing candidate spans for one category at a time.
///
/// Implementations must be deterministic for a given `(category, text,
/// reference)`; the pipeline may call them from several threads at once.
pub trait CandidateSource: Send + Sync {
    fn detect(&self, category: SpanCategory, text: &str, reference: DateTime<Utc>) -> Vec<Span>;
}

/// Post-merge pass that may reinterpret spans as alternative expressions
/// (e.g. a bare time following a date-time).
pub trait AlternativeExpressionReinterpreter: Send + Sync {
    fn apply(&self, spans: Vec<Span>, text: &str, reference: DateTime<Utc>) -> Vec<Span>;
}

/// Raw detector configuration: patterns per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectorTable {
    pub patterns: BTreeMap<SpanCategory, Vec<String>>,
}

impl DetectorTable {
    /// Total number of configured patterns across categories.
    pub fn len(&self) -> usize {
        self.patterns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Table-driven detector: every match of every pattern for the requested
/// category becomes a span of that category, pattern by pattern.
#[derive(Debug, Clone, Default)]
pub struct RegexCandidateSource {
    patterns: BTreeMap<SpanCategory, Vec<Regex>>,
}

impl RegexCandidateSource {
    pub fn compile(table: &DetectorTable) -> Result<Self, PatternError> {
        let mut patterns = BTreeMap::new();
        for (category, raws) in &table.patterns {
            let compiled = raws
                .iter()
                .enumerate()
                .map(|(i, raw)| {
                    Regex::new(raw).map_err(|source| PatternError::Invalid {
                        name: format!("detectors.{category}[{i}]"),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            patterns.insert(*category, compiled);
        }
        Ok(Self { patterns })
    }
}

impl CandidateSource for RegexCandidateSource {
    fn detect(&self, category: SpanCategory, text: &str, _reference: DateTime<Utc>) -> Vec<Span> {
        let Some(patterns) = self.patterns.get(&category) else {
            return Vec::new();
        };
        patterns
            .iter()
            .flat_map(|re| re.find_iter(text))
            .filter_map(|m| Span::new(text, m.start(), m.len(), category).ok())
            .collect()
    }
}
