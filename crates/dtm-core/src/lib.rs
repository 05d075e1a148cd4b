//! Merge arbitration and refinement for date/time entity spans.
//!
//! This crate contains:
//! - Span model: positioned, category-tagged substrings
//! - Merge arbitration: folding detector output by containment
//! - Refinement: ambiguity and period filters, modifier attachment,
//!   trailing-number absorption, calendar-mode filtering, ordering
//! - `MergedExtractor`: the pipeline tying detectors and passes together

pub mod category;
pub mod filter;
pub mod merge;
pub mod modifier;
pub mod number;
mod options;
pub mod patterns;
mod pipeline;
pub mod source;
pub mod span;
pub mod superfluous;
pub mod timezone;

pub use category::{DETECTION_ORDER, SpanCategory, UnknownCategory};
pub use number::{DigitIntegerExtractor, IntegerExtractor};
pub use options::MergeOptions;
pub use patterns::{AmbiguityRuleTable, MergePatterns, PatternError, PatternTable};
pub use pipeline::{BuildError, MergedExtractor, MergedExtractorBuilder};
pub use source::{
    AlternativeExpressionReinterpreter, CandidateSource, DetectorTable, RegexCandidateSource,
};
pub use span::{Span, SpanError};
pub use superfluous::{RemovedWord, SuperfluousWordFilter, WordListFilter};
pub use timezone::{PatternTimezoneDetector, TimezoneDetector, TimezoneTable};
