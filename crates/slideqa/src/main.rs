//! Slide QA Control - command-line front end for the slide_qa resolver.

mod cli;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use slide_qa::{Resolver, ResolverConfig};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<ResolverConfig> {
    match &cli.config {
        Some(path) => ResolverConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(ResolverConfig::load_or_default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;

    let resolver = || Resolver::from_config(&config).context("Failed to build resolver");

    match &cli.command {
        Commands::Resolve {
            identifier,
            context,
            overrides,
            json,
        } => commands::handle_resolve(
            &resolver()?,
            identifier,
            context,
            overrides.as_deref(),
            *json,
        ),
        Commands::Batch {
            file,
            context,
            overrides,
        } => commands::handle_batch(&resolver()?, file.as_deref(), context, overrides.as_deref()),
        Commands::Classify {
            identifier,
            context,
            json,
        } => commands::handle_classify(&resolver()?, identifier, context, *json),
        Commands::Normalize { question, answer } => commands::handle_normalize(question, answer),
        Commands::Check { knowledge } => commands::handle_check(&config, knowledge.as_deref()),
        Commands::Config => commands::handle_config(&config),
    }
}
