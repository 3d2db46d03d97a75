//! CLI argument parsing using clap 4.x derive macros

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A terminal agent for GAIA-style questions
///
/// Talks to the Hugging Face router (or any OpenAI-compatible endpoint)
/// and answers questions with web search, encyclopedia lookup, and
/// arithmetic tools.
#[derive(Parser, Debug)]
#[command(name = "gaiaq")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Direct question (alternative to the 'ask' subcommand)
    #[arg(num_args = 1..)]
    pub question: Vec<String>,

    /// Path to a configuration file (overrides the default lookup)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model identifier (overrides the configured model)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Suppress everything except the answer and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show step-by-step agent activity
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the agent a question
    Ask {
        /// The question to answer
        question: String,
    },

    /// Print the effective configuration
    Config,
}
