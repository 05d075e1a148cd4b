//! Check command for validating configured patterns.

use std::io::Write;

use anyhow::{Context, Result};

use dtm_core::{
    DigitIntegerExtractor, MergePatterns, PatternTimezoneDetector, RegexCandidateSource,
    WordListFilter,
};

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let patterns = MergePatterns::compile(&config.patterns).context("invalid merge pattern")?;
    RegexCandidateSource::compile(&config.detectors).context("invalid detector pattern")?;
    WordListFilter::new(&config.superfluous_words).context("invalid superfluous word")?;
    DigitIntegerExtractor::with_words(&config.number_words).context("invalid number word")?;
    if let Some(table) = &config.timezone {
        PatternTimezoneDetector::compile(table).context("invalid timezone pattern")?;
    }

    writeln!(writer, "Configuration OK")?;
    writeln!(writer, "Merge patterns: {}", patterns.len())?;
    writeln!(
        writer,
        "Detector patterns: {} across {} categories",
        config.detectors.len(),
        config.detectors.patterns.len()
    )?;
    for (category, raws) in &config.detectors.patterns {
        writeln!(writer, "- {category}: {}", raws.len())?;
    }
    writeln!(writer, "Superfluous words: {}", config.superfluous_words.len())?;
    writeln!(writer, "Number words: {}", config.number_words.len())?;
    writeln!(
        writer,
        "Timezone detection: {}",
        if config.timezone.is_some() {
            "configured"
        } else {
            "not configured"
        }
    )?;

    Ok(())
}
