//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::extract::ExtractArgs;

/// Date/time entity merger.
///
/// Runs the configured per-category detectors over text and merges their
/// spans into one ordered, non-overlapping list.
#[derive(Debug, Parser)]
#[command(name = "dtm", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract date/time entities from text (or stdin).
    Extract(ExtractArgs),

    /// Compile every configured pattern and report what was loaded.
    Check,
}
