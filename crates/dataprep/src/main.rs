//! `dataprep` - CLI for dataprep
//!
//! This binary lints a project's ignore file and runs the data preparation
//! stage.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use dataprep::cli::{
    CategoriesCommand, CheckCommand, Cli, Command, ConfigCommand, InitCommand, InspectCommand,
    LintCommand, PrepareCommand,
};
use dataprep::ignore::{Category, LintReport, Verdict};
use dataprep::{init_logging, lint, scaffold, Config, IgnoreFile, PrepareRequest};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Lint(cmd) => handle_lint(&config, &cmd),
        Command::Check(cmd) => handle_check(&config, &cmd),
        Command::Categories(cmd) => handle_categories(&config, &cmd),
        Command::Prepare(cmd) => handle_prepare(config, cmd),
        Command::Inspect(cmd) => handle_inspect(&config, &cmd),
        Command::Init(cmd) => handle_init(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn load_ignore_file(config: &Config, file: Option<&PathBuf>) -> Result<IgnoreFile> {
    let path = file.cloned().unwrap_or_else(|| config.ignore_file_path());
    Ok(IgnoreFile::load(path)?)
}

fn handle_lint(config: &Config, cmd: &LintCommand) -> Result<()> {
    let file = load_ignore_file(config, cmd.file.as_ref())?;
    let report = lint(&file, &config.lint);
    let deny_warnings = cmd.deny_warnings || config.lint.deny_warnings;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_lint_report(&report);
    }

    report.check(deny_warnings)?;
    Ok(())
}

fn print_lint_report(report: &LintReport) {
    let name = report
        .path
        .as_deref()
        .map_or_else(|| "<input>".to_string(), |p| p.display().to_string());

    for d in &report.diagnostics {
        println!("{name}:{}: {}[{}]: {}", d.line, d.severity, d.rule, d.message);
        if let Some(suggestion) = &d.suggestion {
            for line in suggestion.lines() {
                println!("    suggestion: {line}");
            }
        }
    }

    println!(
        "{name}: {} pattern(s), {} error(s), {} warning(s)",
        report.patterns,
        report.errors(),
        report.warnings()
    );
}

fn handle_check(config: &Config, cmd: &CheckCommand) -> Result<()> {
    let file = load_ignore_file(config, cmd.file.as_ref())?;
    let base = file
        .path()
        .and_then(Path::parent)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    let results: Vec<(&str, Verdict)> = cmd
        .paths
        .iter()
        .map(|path| {
            let is_dir = path.ends_with('/') || base.join(path).is_dir();
            (path.as_str(), file.is_ignored(path, is_dir))
        })
        .collect();

    if cmd.json {
        let json: Vec<_> = results
            .iter()
            .map(|(path, verdict)| serde_json::json!({ "path": path, "result": verdict }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    for (path, verdict) in &results {
        match verdict {
            Verdict::Ignored { line, pattern } => {
                println!("ignored    {path}  (line {line}: {pattern})");
            }
            Verdict::Included { line, pattern } => {
                println!("included   {path}  (line {line}: {pattern})");
            }
            Verdict::Unmatched => println!("unmatched  {path}"),
        }
    }
    Ok(())
}

fn handle_categories(config: &Config, cmd: &CategoriesCommand) -> Result<()> {
    let file = load_ignore_file(config, cmd.file.as_ref())?;
    let groups = file.by_category();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&groups)?);
        return Ok(());
    }

    for category in Category::ALL {
        let Some(patterns) = groups.get(&category) else {
            continue;
        };
        println!("[{category}] {}", category.label());
        for entry in patterns {
            println!("  {:>4}  {}", entry.line, entry.pattern);
        }
        println!();
    }
    Ok(())
}

fn handle_prepare(mut config: Config, cmd: PrepareCommand) -> Result<()> {
    if cmd.no_manifest {
        config.prepare.write_manifest = false;
    }

    let request = PrepareRequest {
        input: cmd.input,
        output: cmd.output,
        columns: cmd.columns,
    };
    let report = dataprep::prepare(&config, &request)
        .map_err(|err| data_error(&config, err))
        .with_context(|| format!("preparing {}", request.input.display()))?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Prepared {} -> {}", report.source.display(), report.output.display());
    println!("  Rows:      {}", report.rows);
    if let Some(index) = &report.index {
        println!("  Index:     {index}");
    }
    println!("  Columns:   {}", report.columns.join(", "));
    for imputation in &report.imputations {
        println!(
            "  Imputed {}: {} zero-filled, {} interpolated, {} carried forward",
            imputation.column,
            imputation.zero_filled,
            imputation.interpolated,
            imputation.forward_filled
        );
    }
    if let Some(manifest) = &report.manifest {
        println!("  Manifest:  {}", manifest.display());
    }
    Ok(())
}

/// Point at the raw data directory when the input file itself is the problem.
fn data_error(config: &Config, err: dataprep::Error) -> anyhow::Error {
    if err.is_data_file_error() {
        let hint = format!(
            "raw data files are expected under {}",
            config.raw_data_dir().display()
        );
        anyhow::Error::new(err).context(hint)
    } else {
        anyhow::Error::new(err)
    }
}

fn handle_inspect(config: &Config, cmd: &InspectCommand) -> Result<()> {
    let summary = dataprep::inspect(config, &cmd.input)
        .map_err(|err| data_error(config, err))
        .with_context(|| format!("inspecting {}", cmd.input.display()))?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", summary.source.display());
    println!("  Rows:  {}", summary.rows);
    if let Some(index) = &summary.index {
        println!("  Index: {} ({} to {})", index.name, index.first, index.last);
    }
    for column in &summary.columns {
        println!(
            "  {:<24} {:<8} {} missing",
            column.name, column.kind, column.missing
        );
    }
    Ok(())
}

fn handle_init(config: &Config, cmd: &InitCommand) -> Result<()> {
    let root = cmd.dir.clone().unwrap_or_else(|| config.project_root());
    let report = scaffold::init(&root, &config.project, cmd.force)
        .with_context(|| format!("initializing {}", root.display()))?;

    for dir in &report.created_dirs {
        println!("created  {}", dir.display());
    }
    if let Some(path) = &report.ignore_file {
        println!("wrote    {}", path.display());
    }
    if let Some(path) = &report.kept_ignore_file {
        println!("kept     {} (use --force to overwrite)", path.display());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Project]");
                println!("  Root:               {}", config.project_root().display());
                println!("  Ignore file:        {}", config.project.ignore_file);
                println!("  Raw data:           {}", config.raw_data_dir().display());
                println!(
                    "  Processed data:     {}",
                    config.processed_data_dir().display()
                );
                println!();
                println!("[Prepare]");
                println!("  Year column:        {}", config.prepare.year_column);
                println!("  Month column:       {}", config.prepare.month_column);
                println!("  Index column:       {}", config.prepare.index_column);
                println!(
                    "  Consumption:        {}",
                    if config.prepare.consumption_columns.is_empty() {
                        "(all numeric columns)".to_string()
                    } else {
                        config.prepare.consumption_columns.join(", ")
                    }
                );
                println!("  Date format:        {}", config.prepare.date_format);
                println!("  Write manifest:     {}", config.prepare.write_manifest);
                println!();
                println!("[Lint]");
                println!("  Deny warnings:      {}", config.lint.deny_warnings);
                println!(
                    "  Disabled rules:     {}",
                    config.lint.disabled_rules.len()
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
