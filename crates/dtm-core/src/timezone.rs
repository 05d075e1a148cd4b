//! Timezone detection, only run in preview mode.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::category::SpanCategory;
use crate::patterns::PatternError;
use crate::span::Span;

/// Detects timezone mentions and removes the ambiguous ones after merging.
pub trait TimezoneDetector: Send + Sync {
    fn detect(&self, text: &str, reference: DateTime<Utc>) -> Vec<Span>;

    /// Drops timezone spans that are not trustworthy on their own.
    fn disambiguate(&self, spans: Vec<Span>) -> Vec<Span> {
        spans
    }
}

/// Raw timezone configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimezoneTable {
    /// Pattern matching any timezone mention.
    pub pattern: String,
    /// Abbreviations that double as ordinary words ("ist", "cat").
    pub ambiguous: Vec<String>,
}

/// Pattern-driven [`TimezoneDetector`].
#[derive(Debug, Clone)]
pub struct PatternTimezoneDetector {
    pattern: Regex,
    ambiguous: HashSet<String>,
}

impl PatternTimezoneDetector {
    pub fn compile(table: &TimezoneTable) -> Result<Self, PatternError> {
        let pattern = RegexBuilder::new(&table.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::Invalid {
                name: "timezone.pattern".to_string(),
                source,
            })?;
        Ok(Self {
            pattern,
            ambiguous: table.ambiguous.iter().map(|s| s.to_lowercase()).collect(),
        })
    }
}

impl TimezoneDetector for PatternTimezoneDetector {
    fn detect(&self, text: &str, _reference: DateTime<Utc>) -> Vec<Span> {
        self.pattern
            .find_iter(text)
            .filter_map(|m| Span::new(text, m.start(), m.len(), SpanCategory::TimeZone).ok())
            .collect()
    }

    fn disambiguate(&self, mut spans: Vec<Span>) -> Vec<Span> {
        spans.retain(|span| {
            span.category != SpanCategory::TimeZone
                || !self.ambiguous.contains(&span.text.trim().to_lowercase())
        });
        spans
    }
}
