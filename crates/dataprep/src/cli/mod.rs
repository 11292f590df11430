//! Command-line interface for dataprep.
//!
//! This module provides the CLI structure for the `dataprep` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CategoriesCommand, CheckCommand, ConfigCommand, InitCommand, InspectCommand, LintCommand,
    PrepareCommand,
};

/// dataprep - Lint ignore files and prepare monthly consumption data
///
/// Checks a project's ignore file for patterns that do not do what they
/// appear to do, and runs the data preparation stage: load raw CSV, index by
/// month, impute consumption gaps, write processed data.
#[derive(Debug, Parser)]
#[command(name = "dataprep")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Lint an ignore file
    Lint(LintCommand),

    /// Report whether paths are ignored
    Check(CheckCommand),

    /// Group ignore patterns by category
    Categories(CategoriesCommand),

    /// Prepare a raw data file
    Prepare(PrepareCommand),

    /// Summarize a raw data file
    Inspect(InspectCommand),

    /// Create the project layout and ignore file
    Init(InitCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                2 => crate::logging::Verbosity::Debug,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
