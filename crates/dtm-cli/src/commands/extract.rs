//! Extract command: run the merged extractor over text.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use dtm_core::{MergeOptions, Span};

use crate::Config;
use crate::commands::util::{build_extractor, parse_reference};

#[derive(Debug, Args)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag maps to an independent CLI switch"
)]
pub struct ExtractArgs {
    /// Text to scan. Read from stdin when omitted.
    pub text: Option<String>,

    /// Reference instant for relative expressions (ISO 8601, "now",
    /// "2 hours ago", "in 3 days").
    #[arg(long, default_value = "now")]
    pub reference: String,

    /// Print spans as JSON.
    #[arg(long)]
    pub json: bool,

    /// Strip superfluous words and detect timezones.
    #[arg(long)]
    pub preview: bool,

    /// Skip "from X to Y" range markers during merging.
    #[arg(long)]
    pub skip_from_to: bool,

    /// Drop spans matching the calendar filter words.
    #[arg(long)]
    pub calendar_mode: bool,
}

impl ExtractArgs {
    /// Options requested on the command line.
    pub const fn flags(&self) -> MergeOptions {
        MergeOptions {
            enable_preview: self.preview,
            skip_from_to_merge: self.skip_from_to,
            extended_types: false,
            calendar_mode: self.calendar_mode,
        }
    }
}

pub fn run<W: Write>(writer: &mut W, args: &ExtractArgs, config: &Config, text: &str) -> Result<()> {
    let reference = parse_reference(&args.reference, Utc::now())?;
    let extractor = build_extractor(config, args.flags())?;
    let spans = extractor.extract(text, reference);
    tracing::debug!(count = spans.len(), %reference, "extracted spans");

    if args.json {
        let json = serde_json::to_string_pretty(&spans).context("failed to serialize spans")?;
        writeln!(writer, "{json}")?;
        return Ok(());
    }

    if spans.is_empty() {
        writeln!(writer, "No entities found.")?;
        return Ok(());
    }

    for span in &spans {
        writeln!(writer, "{}", format_span(span))?;
    }
    Ok(())
}

fn format_span(span: &Span) -> String {
    format!(
        "{}..{} {} {:?}",
        span.start,
        span.end(),
        span.category,
        span.text
    )
}
