//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Token Loom - Manage layered design token documents
#[derive(Parser, Debug)]
#[command(name = "token-loom")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a token document, optionally against its core document
    Validate(commands::validate::ValidateArgs),

    /// Compute the merged view of a core document and its extension layers
    Merge(commands::merge::MergeArgs),

    /// Show the changes between two versions of a document
    Diff(commands::diff::DiffArgs),

    /// Show the session state, declared sources, and merge analytics
    Info(commands::info::InfoArgs),

    /// Switch the editing session to a different source document
    Switch(commands::switch::SwitchArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(&self.log_level),
        )
        .init();

        match self.command {
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
            Commands::Merge(args) => commands::merge::execute(args, &self.color),
            Commands::Diff(args) => commands::diff::execute(args, &self.color),
            Commands::Info(args) => commands::info::execute(args, &self.color),
            Commands::Switch(args) => commands::switch::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
