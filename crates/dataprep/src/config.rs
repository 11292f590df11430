//! Configuration management for dataprep.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::data::format_date;
use crate::error::{Error, Result};
use crate::ignore::LintRule;

/// Default configuration file name in the user config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Project-local configuration file name.
pub const PROJECT_CONFIG_FILE_NAME: &str = "dataprep.toml";

/// Application directory name.
const APP_DIR_NAME: &str = "dataprep";

/// Environment variable prefix.
const ENV_PREFIX: &str = "DATAPREP_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `DATAPREP_`, `__` between levels)
/// 2. `dataprep.toml` in the current directory
/// 3. TOML config file at `~/.config/dataprep/config.toml`
/// 4. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project layout.
    pub project: ProjectConfig,
    /// Data preparation settings.
    pub prepare: PrepareConfig,
    /// Ignore-file lint settings.
    pub lint: LintConfig,
}

/// Project layout, relative to the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project root. Defaults to the current directory.
    pub root: Option<PathBuf>,
    /// Ignore file name.
    pub ignore_file: String,
    /// Raw input data.
    pub raw_data_dir: PathBuf,
    /// Prepared output data.
    pub processed_data_dir: PathBuf,
    /// Trained model artifacts.
    pub models_dir: PathBuf,
    /// Generated report figures.
    pub figures_dir: PathBuf,
}

/// Data preparation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    /// Column holding the year.
    pub year_column: String,
    /// Column holding the month (1-12).
    pub month_column: String,
    /// Name of the date index.
    pub index_column: String,
    /// Columns to impute. Empty means every numeric column.
    pub consumption_columns: Vec<String>,
    /// strftime format for dates in written files.
    pub date_format: String,
    /// Write a JSON manifest next to each prepared file.
    pub write_manifest: bool,
}

/// Ignore-file lint settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Treat warnings as failures.
    pub deny_warnings: bool,
    /// Rule codes to skip, e.g. `duplicate-pattern`.
    pub disabled_rules: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: None,
            ignore_file: ".gitignore".to_string(),
            raw_data_dir: PathBuf::from("01_data_preparation/data/raw"),
            processed_data_dir: PathBuf::from("01_data_preparation/data/processed"),
            models_dir: PathBuf::from("03_modeling/models"),
            figures_dir: PathBuf::from("03_modeling/reports/figure"),
        }
    }
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            year_column: "Year".to_string(),
            month_column: "Month".to_string(),
            index_column: "datetime".to_string(),
            consumption_columns: Vec::new(),
            date_format: "%Y-%m-%d".to_string(),
            write_manifest: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A custom path replaces both the user and the project config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        figment = match config_path {
            Some(path) => figment.merge(Toml::file(path)),
            None => figment
                .merge(Toml::file(Self::default_config_path()))
                .merge(Toml::file(PROJECT_CONFIG_FILE_NAME)),
        };

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default user configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let prepare = &self.prepare;

        for (key, value) in [
            ("year_column", &prepare.year_column),
            ("month_column", &prepare.month_column),
            ("index_column", &prepare.index_column),
        ] {
            if value.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("{key} must not be empty"),
                });
            }
        }

        if prepare.year_column == prepare.month_column {
            return Err(Error::ConfigValidation {
                message: format!(
                    "year_column and month_column are both '{}'",
                    prepare.year_column
                ),
            });
        }

        if prepare.date_format.is_empty()
            || format_date(NaiveDate::default(), &prepare.date_format).is_err()
        {
            return Err(Error::ConfigValidation {
                message: format!("invalid date_format: '{}'", prepare.date_format),
            });
        }

        if self.project.ignore_file.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "ignore_file must not be empty".to_string(),
            });
        }

        for (key, dir) in [
            ("raw_data_dir", &self.project.raw_data_dir),
            ("processed_data_dir", &self.project.processed_data_dir),
            ("models_dir", &self.project.models_dir),
            ("figures_dir", &self.project.figures_dir),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: format!("{key} must not be empty"),
                });
            }
        }

        for rule in &self.lint.disabled_rules {
            if LintRule::from_code(rule).is_none() {
                return Err(Error::ConfigValidation {
                    message: format!("unknown lint rule: {rule}"),
                });
            }
        }

        Ok(())
    }

    /// Get the project root, resolving defaults if not set.
    #[must_use]
    pub fn project_root(&self) -> PathBuf {
        self.project
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the ignore file path under the project root.
    #[must_use]
    pub fn ignore_file_path(&self) -> PathBuf {
        self.project_root().join(&self.project.ignore_file)
    }

    /// Get the processed data directory under the project root.
    #[must_use]
    pub fn processed_data_dir(&self) -> PathBuf {
        self.resolve(&self.project.processed_data_dir)
    }

    /// Get the raw data directory under the project root.
    #[must_use]
    pub fn raw_data_dir(&self) -> PathBuf {
        self.resolve(&self.project.raw_data_dir)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root().join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.project.root.is_none());
        assert_eq!(config.project.ignore_file, ".gitignore");
        assert!(config.prepare.write_manifest);
        assert!(!config.lint.deny_warnings);
    }

    #[test]
    fn test_default_project_config() {
        let project = ProjectConfig::default();

        assert_eq!(
            project.processed_data_dir,
            PathBuf::from("01_data_preparation/data/processed")
        );
        assert_eq!(project.models_dir, PathBuf::from("03_modeling/models"));
        assert_eq!(
            project.figures_dir,
            PathBuf::from("03_modeling/reports/figure")
        );
    }

    #[test]
    fn test_default_prepare_config() {
        let prepare = PrepareConfig::default();

        assert_eq!(prepare.year_column, "Year");
        assert_eq!(prepare.month_column, "Month");
        assert_eq!(prepare.index_column, "datetime");
        assert!(prepare.consumption_columns.is_empty());
        assert_eq!(prepare.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_column_name() {
        let mut config = Config::default();
        config.prepare.year_column = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("year_column"));
    }

    #[test]
    fn test_validate_same_year_and_month_column() {
        let mut config = Config::default();
        config.prepare.month_column = "Year".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("both 'Year'"));
    }

    #[test]
    fn test_validate_invalid_date_format() {
        let mut config = Config::default();
        config.prepare.date_format = "%Y-%Q".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("date_format"));
    }

    #[test]
    fn test_validate_time_only_date_format() {
        let mut config = Config::default();
        config.prepare.date_format = "%Y-%m-%d %H:%M".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("date_format"));

        config.prepare.date_format = "%d/%m/%Y".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_data_dir() {
        let mut config = Config::default();
        config.project.processed_data_dir = PathBuf::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("processed_data_dir"));
    }

    #[test]
    fn test_validate_unknown_lint_rule() {
        let mut config = Config::default();
        config.lint.disabled_rules = vec!["no-such-rule".to_string()];

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("no-such-rule"));
    }

    #[test]
    fn test_validate_known_lint_rule() {
        let mut config = Config::default();
        config.lint.disabled_rules = vec!["duplicate-pattern".to_string()];

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_paths_relative_to_root() {
        let mut config = Config::default();
        config.project.root = Some(PathBuf::from("/work/project"));

        assert_eq!(
            config.ignore_file_path(),
            PathBuf::from("/work/project/.gitignore")
        );
        assert_eq!(
            config.processed_data_dir(),
            PathBuf::from("/work/project/01_data_preparation/data/processed")
        );
        assert_eq!(
            config.raw_data_dir(),
            PathBuf::from("/work/project/01_data_preparation/data/raw")
        );
    }

    #[test]
    fn test_absolute_data_dir_is_kept() {
        let mut config = Config::default();
        config.project.root = Some(PathBuf::from("/work/project"));
        config.project.processed_data_dir = PathBuf::from("/srv/processed");

        assert_eq!(config.processed_data_dir(), PathBuf::from("/srv/processed"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("dataprep"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dataprep.toml");
        std::fs::write(
            &path,
            r#"
[prepare]
consumption_columns = ["Electricity", "Gas"]
date_format = "%Y-%m"

[lint]
deny_warnings = true
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(
            config.prepare.consumption_columns,
            vec!["Electricity".to_string(), "Gas".to_string()]
        );
        assert_eq!(config.prepare.date_format, "%Y-%m");
        assert!(config.lint.deny_warnings);
        // Untouched sections keep their defaults
        assert_eq!(config.project, ProjectConfig::default());
    }

    #[test]
    fn test_load_invalid_file_fails_validation() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dataprep.toml");
        std::fs::write(&path, "[lint]\ndisabled_rules = [\"bogus\"]\n").unwrap();

        let result = Config::load_from(Some(path));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_prepare_config_deserialize() {
        let json = r#"{"year_column": "Anio", "month_column": "Mes"}"#;
        let prepare: PrepareConfig = serde_json::from_str(json).unwrap();
        assert_eq!(prepare.year_column, "Anio");
        assert_eq!(prepare.month_column, "Mes");
        assert_eq!(prepare.index_column, "datetime");
    }
}
