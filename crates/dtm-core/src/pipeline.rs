//! The merged extractor: detection, arbitration, and refinement.
//!
//! # Stages
//!
//! 1. Strip superfluous words (preview only)
//! 2. Run every category detector and merge their output in priority order
//! 3. Merge timezone spans and drop ambiguous ones (preview only)
//! 4. Absorb trailing numbers after time spans
//! 5. Reinterpret alternative expressions (extended types only)
//! 6. Filter unspecific periods and ambiguous matches, attach modifiers,
//!    apply calendar filter words (calendar mode only), order by start
//! 7. Map offsets back onto the original text (preview only)

use std::fmt;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use thiserror::Error;

use crate::category::{DETECTION_ORDER, SpanCategory};
use crate::filter::{filter_ambiguity, filter_calendar_words, filter_unspecific_periods, order};
use crate::merge::merge;
use crate::modifier::attach_modifiers;
use crate::number::{DigitIntegerExtractor, IntegerExtractor, absorb_number_endings};
use crate::options::MergeOptions;
use crate::patterns::MergePatterns;
use crate::source::{AlternativeExpressionReinterpreter, CandidateSource};
use crate::span::Span;
use crate::superfluous::SuperfluousWordFilter;
use crate::timezone::TimezoneDetector;

/// Errors raised while assembling a [`MergedExtractor`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// An enabled option needs a collaborator that was not supplied.
    #[error("{flag} requires a {collaborator}")]
    MissingCollaborator {
        flag: &'static str,
        collaborator: &'static str,
    },
}

/// Merges per-category detector output into one ordered, non-redundant list.
pub struct MergedExtractor {
    source: Box<dyn CandidateSource>,
    patterns: MergePatterns,
    options: MergeOptions,
    integers: Box<dyn IntegerExtractor>,
    superfluous: Option<Box<dyn SuperfluousWordFilter>>,
    timezone: Option<Box<dyn TimezoneDetector>>,
    reinterpreter: Option<Box<dyn AlternativeExpressionReinterpreter>>,
}

impl fmt::Debug for MergedExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedExtractor")
            .field("options", &self.options)
            .field("patterns", &self.patterns.len())
            .field("superfluous", &self.superfluous.is_some())
            .field("timezone", &self.timezone.is_some())
            .field("reinterpreter", &self.reinterpreter.is_some())
            .finish_non_exhaustive()
    }
}

impl MergedExtractor {
    /// Starts building an extractor around a detector and compiled patterns.
    pub fn builder(
        source: impl CandidateSource + 'static,
        patterns: MergePatterns,
    ) -> MergedExtractorBuilder {
        MergedExtractorBuilder {
            source: Box::new(source),
            patterns,
            options: MergeOptions::default(),
            integers: None,
            superfluous: None,
            timezone: None,
            reinterpreter: None,
        }
    }

    /// Extracts entities relative to the current instant.
    pub fn extract_now(&self, text: &str) -> Vec<Span> {
        self.extract(text, Utc::now())
    }

    /// Extracts entities from `text`, ordered ascending by start offset.
    pub fn extract(&self, text: &str, reference: DateTime<Utc>) -> Vec<Span> {
        let preview = self.options.enable_preview;
        let superfluous = self.superfluous.as_deref().filter(|_| preview);
        let stripped = superfluous.map(|filter| filter.strip(text));
        let working = stripped.as_ref().map_or(text, |(cleaned, _)| cleaned.as_str());

        let skip = self
            .patterns
            .from_to
            .as_ref()
            .filter(|_| self.options.skip_from_to_merge);

        // Detectors may run concurrently; arbitration stays in priority order.
        let batches: Vec<Vec<Span>> = DETECTION_ORDER
            .par_iter()
            .map(|&category| {
                sanitize(
                    self.source.detect(category, working, reference),
                    working,
                    category,
                )
            })
            .collect();
        let mut spans = batches
            .into_iter()
            .fold(Vec::new(), |acc, batch| merge(acc, batch, skip));
        tracing::debug!(count = spans.len(), "merged detector output");

        if let Some(timezone) = self.timezone.as_deref().filter(|_| preview) {
            let found = sanitize(
                timezone.detect(working, reference),
                working,
                SpanCategory::TimeZone,
            );
            spans = timezone.disambiguate(merge(spans, found, skip));
        }

        if let Some(pattern) = &self.patterns.number_ending {
            let absorbed = absorb_number_endings(&spans, pattern, self.integers.as_ref(), working);
            if !absorbed.is_empty() {
                tracing::debug!(count = absorbed.len(), "absorbed trailing numbers");
            }
            spans = merge(spans, absorbed, skip);
        }

        if let Some(reinterpreter) = self
            .reinterpreter
            .as_deref()
            .filter(|_| self.options.extended_types)
        {
            let reinterpreted = reinterpreter.apply(spans, working, reference);
            spans = sanitize(reinterpreted, working, SpanCategory::DateTimeAlt);
        }

        spans = filter_unspecific_periods(spans, self.patterns.unspecific_date_period.as_ref());
        spans = filter_ambiguity(spans, &self.patterns.ambiguity_rules, working);
        spans = attach_modifiers(spans, &self.patterns, working);
        if self.options.calendar_mode {
            spans = filter_calendar_words(spans, &self.patterns.calendar_filters);
        }
        spans = order(spans);

        if let (Some(filter), Some((_, removed))) = (superfluous, &stripped) {
            spans = filter.restore(spans, removed, text);
        }

        tracing::debug!(count = spans.len(), "extraction finished");
        spans
    }
}

/// Drops spans that violate bounds, re-slicing any with stale text.
fn sanitize(spans: Vec<Span>, text: &str, stage: SpanCategory) -> Vec<Span> {
    spans
        .into_iter()
        .filter_map(|span| match span.sanitize(text) {
            Ok(span) => Some(span),
            Err(err) => {
                tracing::warn!(stage = %stage, error = %err, "dropping invalid span");
                None
            }
        })
        .collect()
}

/// Builder for [`MergedExtractor`]; validates option/collaborator pairs.
pub struct MergedExtractorBuilder {
    source: Box<dyn CandidateSource>,
    patterns: MergePatterns,
    options: MergeOptions,
    integers: Option<Box<dyn IntegerExtractor>>,
    superfluous: Option<Box<dyn SuperfluousWordFilter>>,
    timezone: Option<Box<dyn TimezoneDetector>>,
    reinterpreter: Option<Box<dyn AlternativeExpressionReinterpreter>>,
}

impl MergedExtractorBuilder {
    #[must_use]
    pub const fn options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the default [`DigitIntegerExtractor`].
    #[must_use]
    pub fn integer_extractor(mut self, integers: impl IntegerExtractor + 'static) -> Self {
        self.integers = Some(Box::new(integers));
        self
    }

    #[must_use]
    pub fn superfluous_filter(mut self, filter: impl SuperfluousWordFilter + 'static) -> Self {
        self.superfluous = Some(Box::new(filter));
        self
    }

    #[must_use]
    pub fn timezone_detector(mut self, detector: impl TimezoneDetector + 'static) -> Self {
        self.timezone = Some(Box::new(detector));
        self
    }

    #[must_use]
    pub fn reinterpreter(
        mut self,
        reinterpreter: impl AlternativeExpressionReinterpreter + 'static,
    ) -> Self {
        self.reinterpreter = Some(Box::new(reinterpreter));
        self
    }

    pub fn build(self) -> Result<MergedExtractor, BuildError> {
        if self.options.enable_preview {
            if self.superfluous.is_none() {
                return Err(BuildError::MissingCollaborator {
                    flag: "enable_preview",
                    collaborator: "superfluous word filter",
                });
            }
            if self.timezone.is_none() {
                return Err(BuildError::MissingCollaborator {
                    flag: "enable_preview",
                    collaborator: "timezone detector",
                });
            }
        }
        if self.options.extended_types && self.reinterpreter.is_none() {
            return Err(BuildError::MissingCollaborator {
                flag: "extended_types",
                collaborator: "alternative expression reinterpreter",
            });
        }

        Ok(MergedExtractor {
            source: self.source,
            patterns: self.patterns,
            options: self.options,
            integers: self
                .integers
                .unwrap_or_else(|| Box::new(DigitIntegerExtractor::default())),
            superfluous: self.superfluous,
            timezone: self.timezone,
            reinterpreter: self.reinterpreter,
        })
    }
}
