//! legis binary
//!
//! Logs go to stderr so stdout carries only the JSON result.

use anyhow::Context;
use clap::Parser;
use legis_cli::{execute, load_tables, Cli, CliConfig};
use legis_engine::Corpus;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = CliConfig::from_file(&args.config)?;

    let directive = args.log_filter.as_deref().unwrap_or(&config.log_filter);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .with_context(|| format!("Invalid log filter: {}", directive))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting legis v{}", env!("CARGO_PKG_VERSION"));

    let tables = load_tables(&config.sources)?;
    let corpus = Corpus::build(&tables);
    let output = execute(&args.command, &corpus, &config)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
