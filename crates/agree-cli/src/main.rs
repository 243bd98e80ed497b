use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agree_cli::commands::compare::{self, CompareOptions};
use agree_cli::commands::segmentation::{self, SegmentationOptions};
use agree_cli::{Cli, Commands, Config};

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
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Compare {
            files,
            tolerance,
            check_tag,
            ignore_kinds,
            json,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let criteria = config
                .criteria()
                .map(|c| c.with_check_tag(config.check_tag || *check_tag))
                .and_then(|c| tolerance.apply(c))
                .context("invalid match tolerance")?;
            let mut kinds_ignore = config.kinds_ignore;
            kinds_ignore.extend(ignore_kinds.iter().cloned());

            compare::run(
                files,
                &CompareOptions {
                    criteria,
                    kinds_ignore,
                    json: *json,
                },
            )?;
        }
        Some(Commands::Segmentation {
            left,
            right,
            by,
            tolerance,
            check_kind,
            json,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let criteria = config
                .positional_criteria()
                .map(|c| c.with_check_kind(*check_kind))
                .and_then(|c| tolerance.apply(c))
                .context("invalid match tolerance")?;

            segmentation::run(
                left,
                right,
                &SegmentationOptions {
                    criteria,
                    by: *by,
                    json: *json,
                },
            )?;
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
