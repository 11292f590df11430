//! Ignore-file handling.
//!
//! This module models the version-control ignore file of a project:
//!
//! - **Parsing**: every line is a comment, a blank separator or a glob-style
//!   pattern. Parsing never fails, because version-control tools accept any
//!   line.
//!
//! - **Matching**: decides whether a relative path is excluded, following the
//!   usual rules (last match wins, `!` re-includes, trailing `/` matches
//!   directories only, a `/` anchors to the file's directory).
//!
//! - **Categories**: groups patterns by the kind of artifact they exclude.
//!
//! - **Linting**: flags lines that do not do what they appear to do.
//!
//! # Example
//!
//! ```
//! use dataprep::config::LintConfig;
//! use dataprep::ignore::{lint, IgnoreFile, LintRule};
//!
//! let file = IgnoreFile::parse("build/\ndist/\n*.egg-info/}\n");
//!
//! assert!(file.is_ignored("build", true).is_ignored());
//! assert!(!file.is_ignored("pkg.egg-info", true).is_ignored());
//!
//! let report = lint(&file, &LintConfig::default());
//! assert_eq!(report.diagnostics[0].rule, LintRule::StrayCharacter);
//! assert_eq!(report.diagnostics[0].suggestion.as_deref(), Some("*.egg-info/"));
//! ```

mod category;
mod file;
mod lint;
mod pattern;
pub mod template;

pub use category::{builtin_rules, Categorizer, Category, CategoryRule};
pub use file::{CategorizedPattern, IgnoreFile, Line, LineKind, Verdict};
pub use lint::{lint, Diagnostic, LintReport, LintRule, Severity};
pub use pattern::Pattern;
