//! Parsed ignore files and path matching.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace};

use super::category::{Categorizer, Category};
use super::pattern::{normalize_path, strip_trailing_spaces, Pattern};
use crate::error::{Error, Result};

/// What a single line of an ignore file holds.
#[derive(Debug, Clone)]
pub enum LineKind {
    /// Empty or whitespace-only separator.
    Blank,
    /// A `#` comment; holds the text after the `#`.
    Comment(String),
    /// An exclusion or re-inclusion pattern.
    Pattern(Pattern),
    /// A line that cannot match anything, such as a lone `!`.
    Ineffective,
    /// A glob that does not compile; holds the reason.
    Invalid(String),
}

/// One line of an ignore file.
#[derive(Debug, Clone)]
pub struct Line {
    /// One-based line number.
    pub number: usize,
    /// The line exactly as written.
    pub raw: String,
    /// Parsed content.
    pub kind: LineKind,
}

impl Line {
    /// The pattern on this line, if any.
    #[must_use]
    pub fn pattern(&self) -> Option<&Pattern> {
        match &self.kind {
            LineKind::Pattern(pattern) => Some(pattern),
            _ => None,
        }
    }
}

/// The outcome of matching a path against an ignore file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Excluded by the pattern on `line`.
    Ignored {
        /// Deciding line number.
        line: usize,
        /// Deciding pattern as written.
        pattern: String,
    },
    /// Re-included by the negated pattern on `line`.
    Included {
        /// Deciding line number.
        line: usize,
        /// Deciding pattern as written.
        pattern: String,
    },
    /// No pattern matches.
    Unmatched,
}

impl Verdict {
    /// Whether the path is excluded from tracking.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored { .. })
    }
}

/// A pattern and the line it came from.
#[derive(Debug, Clone, Serialize)]
pub struct CategorizedPattern {
    /// One-based line number.
    pub line: usize,
    /// Pattern as written, including any `!`.
    pub pattern: String,
}

/// A parsed ignore file.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFile {
    path: Option<PathBuf>,
    lines: Vec<Line>,
}

impl IgnoreFile {
    /// Parse ignore-file text. Every input parses; problems are reported by
    /// [`lint`](super::lint).
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, raw)| {
                let raw = raw.trim_end_matches('\r');
                let kind = if strip_trailing_spaces(raw).is_empty() {
                    LineKind::Blank
                } else if let Some(comment) = raw.strip_prefix('#') {
                    LineKind::Comment(comment.trim().to_string())
                } else {
                    match Pattern::try_parse(raw) {
                        Ok(Some(pattern)) => LineKind::Pattern(pattern),
                        Ok(None) => LineKind::Ineffective,
                        Err(err) => LineKind::Invalid(regex_reason(&err)),
                    }
                };
                Line {
                    number: i + 1,
                    raw: raw.to_string(),
                    kind,
                }
            })
            .collect();

        Self { path: None, lines }
    }

    /// Read and parse an ignore file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::IgnoreFileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut file = Self::parse(&text);
        file.path = Some(path.to_path_buf());
        debug!(
            "Loaded {} with {} pattern(s)",
            path.display(),
            file.patterns().count()
        );
        Ok(file)
    }

    /// Path the file was loaded from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All lines in order.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Iterate over pattern lines.
    pub fn patterns(&self) -> impl Iterator<Item = (&Line, &Pattern)> {
        self.lines
            .iter()
            .filter_map(|line| line.pattern().map(|pattern| (line, pattern)))
    }

    /// Decide whether a relative path is excluded.
    ///
    /// The last matching pattern wins. A path inside an excluded directory is
    /// excluded no matter what later patterns say about the path itself.
    #[must_use]
    pub fn is_ignored(&self, path: &str, is_dir: bool) -> Verdict {
        let path = normalize_path(path);
        let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();

        for end in 1..components.len() {
            let parent = components[..end].join("/");
            let verdict = self.decide(&parent, true);
            if verdict.is_ignored() {
                trace!(path, parent = %parent, "Parent directory is ignored");
                return verdict;
            }
        }

        self.decide(path, is_dir)
    }

    fn decide(&self, path: &str, is_dir: bool) -> Verdict {
        self.patterns()
            .filter(|(_, pattern)| pattern.matches(path, is_dir))
            .last()
            .map_or(Verdict::Unmatched, |(line, pattern)| {
                let written = pattern.to_string();
                if pattern.is_negated() {
                    Verdict::Included {
                        line: line.number,
                        pattern: written,
                    }
                } else {
                    Verdict::Ignored {
                        line: line.number,
                        pattern: written,
                    }
                }
            })
    }

    /// Group patterns by category, in category order.
    #[must_use]
    pub fn by_category(&self) -> BTreeMap<Category, Vec<CategorizedPattern>> {
        let categorizer = Categorizer::new();
        let mut groups: BTreeMap<Category, Vec<CategorizedPattern>> = BTreeMap::new();

        for (line, pattern) in self.patterns() {
            groups
                .entry(categorizer.categorize(pattern.text()))
                .or_default()
                .push(CategorizedPattern {
                    line: line.number,
                    pattern: pattern.to_string(),
                });
        }

        groups
    }
}

/// The last line of a regex error, which names the problem.
fn regex_reason(err: &regex::Error) -> String {
    let text = err.to_string();
    let last = text.lines().rev().find(|line| !line.trim().is_empty());
    last.unwrap_or(&text)
        .trim()
        .trim_start_matches("error: ")
        .to_string()
}
