//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Lint command arguments.
#[derive(Debug, Args)]
pub struct LintCommand {
    /// Ignore file to lint (defaults to the project's ignore file)
    pub file: Option<PathBuf>,

    /// Fail on warnings as well as errors
    #[arg(long)]
    pub deny_warnings: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Paths to check, relative to the ignore file's directory
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Ignore file to match against
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Categories command arguments.
#[derive(Debug, Args)]
pub struct CategoriesCommand {
    /// Ignore file to classify
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Prepare command arguments.
#[derive(Debug, Args)]
pub struct PrepareCommand {
    /// Raw CSV file
    pub input: PathBuf,

    /// Output CSV file (defaults to the processed-data directory)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Column to impute; repeat for several (defaults to configuration)
    #[arg(long = "column", value_name = "NAME")]
    pub columns: Vec<String>,

    /// Skip writing the JSON manifest
    #[arg(long)]
    pub no_manifest: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Inspect command arguments.
#[derive(Debug, Args)]
pub struct InspectCommand {
    /// CSV file to summarize
    pub input: PathBuf,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Init command arguments.
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Project directory (defaults to the configured root)
    pub dir: Option<PathBuf>,

    /// Overwrite an existing ignore file
    #[arg(short, long)]
    pub force: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the user configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lint_command_debug() {
        let cmd = LintCommand {
            file: None,
            deny_warnings: true,
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("deny_warnings: true"));
    }

    #[test]
    fn test_prepare_command_debug() {
        let cmd = PrepareCommand {
            input: PathBuf::from("raw.csv"),
            output: None,
            columns: vec!["Gas".to_string()],
            no_manifest: false,
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("raw.csv"));
        assert!(debug_str.contains("Gas"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
