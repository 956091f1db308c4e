//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CodeForge - natural-language feature requests to multi-file code changes
#[derive(Parser)]
#[command(
    name = "cf",
    about = "Turns a feature request into a multi-file code change via a planner/architect/coder pipeline",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline: plan, architect, code
    Run {
        /// The feature request, in natural language
        prompt: String,

        /// Directory the coder writes into (overrides config)
        #[arg(short, long)]
        project_root: Option<PathBuf>,
    },

    /// Run the planner only and print the plan (no files written)
    Plan {
        /// The feature request, in natural language
        prompt: String,
    },
}
