use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dtm_cli::commands::{check, extract};
use dtm_cli::{Cli, Commands, Config};

/// Load config from the default locations plus an optional explicit file.
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Some(Commands::Extract(args)) => {
            let config = load_config(cli.config.as_deref())?;
            let text = match &args.text {
                Some(text) => text.clone(),
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read text from stdin")?;
                    buf
                }
            };
            extract::run(&mut stdout, args, &config, &text)?;
        }
        Some(Commands::Check) => {
            let config = load_config(cli.config.as_deref())?;
            check::run(&mut stdout, &config)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
