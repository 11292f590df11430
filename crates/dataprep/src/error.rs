//! Error types for dataprep.
//!
//! This module defines all error types used throughout the dataprep crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for dataprep operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Data File Errors ===
    /// The data file does not exist.
    #[error("data file not found: {path}")]
    DataFileNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The data file has no header row.
    #[error("data file is empty: {path}")]
    DataFileEmpty {
        /// Path of the empty file.
        path: PathBuf,
    },

    /// The data file could not be parsed as CSV.
    #[error("failed to parse data file {path}: {message}")]
    DataParse {
        /// Path of the file being parsed.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    /// CSV encoding failed while writing a table.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // === Table Errors ===
    /// A referenced column does not exist.
    #[error("column not found: '{column}'")]
    ColumnNotFound {
        /// Name of the missing column.
        column: String,
    },

    /// A column that must be numeric holds text.
    #[error("column '{column}' is not numeric")]
    ColumnNotNumeric {
        /// Name of the offending column.
        column: String,
    },

    /// Columns of a table have different lengths.
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    ShapeMismatch {
        /// Name of the offending column.
        column: String,
        /// Row count of the table.
        expected: usize,
        /// Row count of the column.
        actual: usize,
    },

    /// A date format needs fields a calendar date does not have.
    #[error("date format '{format}' cannot render a date")]
    DateFormat {
        /// The strftime-style format.
        format: String,
    },

    /// A year/month pair does not form a valid date.
    #[error("invalid date at row {row}: {message}")]
    InvalidDate {
        /// Zero-based data row.
        row: usize,
        /// Description of the bad value.
        message: String,
    },

    // === Ignore File Errors ===
    /// The ignore file could not be read.
    #[error("failed to read ignore file {path}: {source}")]
    IgnoreFileRead {
        /// Path to the ignore file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Linting found problems that fail the check.
    #[error("lint failed: {errors} error(s), {warnings} warning(s)")]
    LintFailed {
        /// Number of error diagnostics.
        errors: usize,
        /// Number of warning diagnostics.
        warnings: usize,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for dataprep operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a column-not-found error.
    #[must_use]
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Create a column-not-numeric error.
    #[must_use]
    pub fn column_not_numeric(column: impl Into<String>) -> Self {
        Self::ColumnNotNumeric {
            column: column.into(),
        }
    }

    /// Create an invalid-date error for a data row.
    #[must_use]
    pub fn invalid_date(row: usize, message: impl Into<String>) -> Self {
        Self::InvalidDate {
            row,
            message: message.into(),
        }
    }

    /// Check if this error came from reading or parsing a data file.
    #[must_use]
    pub fn is_data_file_error(&self) -> bool {
        matches!(
            self,
            Self::DataFileNotFound { .. } | Self::DataFileEmpty { .. } | Self::DataParse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::column_not_found("Consumo");
        assert_eq!(err.to_string(), "column not found: 'Consumo'");

        let err = Error::DateFormat {
            format: "%H:%M".to_string(),
        };
        assert_eq!(err.to_string(), "date format '%H:%M' cannot render a date");
    }

    #[test]
    fn test_is_data_file_error() {
        let err = Error::DataFileNotFound {
            path: PathBuf::from("/data/raw.csv"),
        };
        assert!(err.is_data_file_error());

        let err = Error::DataFileEmpty {
            path: PathBuf::from("/data/raw.csv"),
        };
        assert!(err.is_data_file_error());

        assert!(!Error::column_not_numeric("Year").is_data_file_error());
    }

    #[test]
    fn test_data_parse_error_display() {
        let err = Error::DataParse {
            path: PathBuf::from("/data/raw.csv"),
            message: "found record with 3 fields".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/data/raw.csv"));
        assert!(msg.contains("3 fields"));
    }

    #[test]
    fn test_invalid_date_error_display() {
        let err = Error::invalid_date(4, "month 13 out of range");
        let msg = err.to_string();
        assert!(msg.contains("row 4"));
        assert!(msg.contains("month 13"));
    }

    #[test]
    fn test_shape_mismatch_error_display() {
        let err = Error::ShapeMismatch {
            column: "Gas".to_string(),
            expected: 12,
            actual: 11,
        };
        assert_eq!(err.to_string(), "column 'Gas' has 11 rows, expected 12");
    }

    #[test]
    fn test_lint_failed_error_display() {
        let err = Error::LintFailed {
            errors: 1,
            warnings: 2,
        };
        assert_eq!(err.to_string(), "lint failed: 1 error(s), 2 warning(s)");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_ignore_file_read_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::IgnoreFileRead {
            path: PathBuf::from("/repo/.gitignore"),
            source: io_err,
        };
        assert!(err.to_string().contains("/repo/.gitignore"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "year_column must not be empty".to_string(),
        };
        assert!(err.to_string().contains("year_column"));
    }
}
