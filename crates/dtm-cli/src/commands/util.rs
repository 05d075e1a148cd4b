//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use dtm_core::{
    DigitIntegerExtractor, MergeOptions, MergePatterns, MergedExtractor, PatternTimezoneDetector,
    RegexCandidateSource, WordListFilter,
};

use crate::Config;

/// Pre-compiled regex for relative reference instants.
static RELATIVE_TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(in)\s+)?(\d+)\s+(minute|hour|day|week)s?(?:\s+(ago))?$").unwrap()
});

/// Conservative bounds for relative offsets (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a reference instant relative to `now`.
///
/// Supports:
/// - "now"
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Relative: "2 hours ago", "in 3 days"
pub fn parse_reference(s: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let caps = RELATIVE_TIME_RE
        .captures(s)
        .filter(|caps| caps.get(1).is_some() != caps.get(4).is_some())
        .with_context(|| {
            format!(
                "Invalid reference: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z), 'now', '2 hours ago' or 'in 2 hours'"
            )
        })?;

    let n: i64 = caps[2]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[3] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[3]);
    }

    let offset = Duration::minutes(n * minutes_per_unit);
    if caps.get(4).is_some() {
        Ok(now - offset)
    } else {
        Ok(now + offset)
    }
}

/// Compiles the configured tables into a ready extractor.
///
/// `flags` are OR-ed onto the options from the config file.
pub fn build_extractor(config: &Config, flags: MergeOptions) -> Result<MergedExtractor> {
    let options = config.options.union(flags);
    let source =
        RegexCandidateSource::compile(&config.detectors).context("invalid detector pattern")?;
    let patterns = MergePatterns::compile(&config.patterns).context("invalid merge pattern")?;
    let integers = DigitIntegerExtractor::with_words(&config.number_words)
        .context("invalid number word")?;

    let mut builder = MergedExtractor::builder(source, patterns)
        .options(options)
        .integer_extractor(integers);

    if options.enable_preview {
        builder = builder.superfluous_filter(
            WordListFilter::new(&config.superfluous_words).context("invalid superfluous word")?,
        );
        if let Some(table) = &config.timezone {
            builder = builder.timezone_detector(
                PatternTimezoneDetector::compile(table).context("invalid timezone pattern")?,
            );
        }
    }

    let extractor = builder.build().context("incomplete configuration")?;
    tracing::debug!(?extractor, "built extractor");
    Ok(extractor)
}
