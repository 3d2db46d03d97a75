//! `gaiaq` - a terminal agent for GAIA-style questions
//!
//! This binary wires the configuration, the inference credential, and
//! the tool set into an agent wrapper and runs one question per
//! invocation.

use anyhow::{bail, Context, Result};
use clap::Parser;
use console::Style;

use crate::cli::{Cli, Commands};
use gaiaq_core::config::{Config, Verbosity};
use gaiaq_core::AgentWrapper;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; only needed in local environments
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load().context("failed to load configuration")?,
    };

    // Apply command-line overrides
    if let Some(model) = &cli.model {
        config.model_id = model.clone();
    }
    if cli.quiet {
        config.verbosity = Verbosity::Quiet;
    } else if cli.verbose {
        config.verbosity = Verbosity::Verbose;
    }

    init_logging(config.verbosity);

    match &cli.command {
        Some(Commands::Ask { question }) => run_question(question, config).await,

        Some(Commands::Config) => {
            print!("{}", serde_yml::to_string(&config)?);
            Ok(())
        }

        None if !cli.question.is_empty() => {
            let question = cli.question.join(" ");
            run_question(&question, config).await
        }

        None => bail!("no question provided; try: gaiaq ask \"your question\""),
    }
}

/// Build the wrapper and answer a single question
async fn run_question(question: &str, config: Config) -> Result<()> {
    let config = config.with_env_credential();

    let mut wrapper =
        AgentWrapper::initialize(&config).context("failed to initialize the agent")?;
    let answer = wrapper.ask(question).await?;

    let green = Style::new().green().bold();
    println!("{}", green.apply_to(answer));
    Ok(())
}

/// Map the configured verbosity onto a tracing filter; RUST_LOG wins
/// when set.
fn init_logging(verbosity: Verbosity) {
    use tracing_subscriber::EnvFilter;

    let default_filter = match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "gaiaq=info,gaiaq_core=info",
        Verbosity::Verbose => "gaiaq=debug,gaiaq_core=debug",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
