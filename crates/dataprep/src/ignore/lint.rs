//! Ignore-file linting.
//!
//! Version-control tools accept any line of an ignore file, so mistakes such
//! as a stray closing brace silently turn a pattern into one that never
//! matches. The rules here catch those mistakes.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use super::file::{IgnoreFile, LineKind};
use super::pattern::{class_end, strip_trailing_spaces};
use crate::config::LintConfig;
use crate::error::{Error, Result};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Probably unintended, but the pattern still works.
    Warning,
    /// The pattern does not do what it appears to do.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A lint rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LintRule {
    /// Unmatched closing `}`, `)` or `]`.
    StrayCharacter,
    /// `[` with no closing `]`.
    UnclosedBracket,
    /// A lone `!`.
    EmptyNegation,
    /// A glob that does not compile, such as the range in `[z-a]`.
    InvalidPattern,
    /// `{a,b}` alternatives, which are not expanded.
    BraceExpansion,
    /// Unescaped trailing spaces, which are stripped.
    TrailingWhitespace,
    /// The same pattern appears on an earlier line.
    DuplicatePattern,
    /// `**` that is not a whole path segment.
    MisplacedDoubleStar,
    /// `\` used as a path separator.
    BackslashSeparator,
}

impl LintRule {
    /// All rules in check order.
    pub const ALL: [LintRule; 9] = [
        Self::StrayCharacter,
        Self::UnclosedBracket,
        Self::EmptyNegation,
        Self::InvalidPattern,
        Self::BraceExpansion,
        Self::TrailingWhitespace,
        Self::DuplicatePattern,
        Self::MisplacedDoubleStar,
        Self::BackslashSeparator,
    ];

    /// The kebab-case code used in configuration and output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::StrayCharacter => "stray-character",
            Self::UnclosedBracket => "unclosed-bracket",
            Self::EmptyNegation => "empty-negation",
            Self::InvalidPattern => "invalid-pattern",
            Self::BraceExpansion => "brace-expansion",
            Self::TrailingWhitespace => "trailing-whitespace",
            Self::DuplicatePattern => "duplicate-pattern",
            Self::MisplacedDoubleStar => "misplaced-double-star",
            Self::BackslashSeparator => "backslash-separator",
        }
    }

    /// Look up a rule by its code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.code() == code)
    }

    /// Severity of diagnostics from this rule.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::StrayCharacter
            | Self::UnclosedBracket
            | Self::EmptyNegation
            | Self::InvalidPattern => Severity::Error,
            Self::BraceExpansion
            | Self::TrailingWhitespace
            | Self::DuplicatePattern
            | Self::MisplacedDoubleStar
            | Self::BackslashSeparator => Severity::Warning,
        }
    }
}

impl std::fmt::Display for LintRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One finding on one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// One-based line number.
    pub line: usize,
    /// Rule that produced this diagnostic.
    pub rule: LintRule,
    /// Severity of the rule.
    pub severity: Severity,
    /// What is wrong.
    pub message: String,
    /// Replacement text for the line, one line per alternative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// The result of linting one ignore file.
#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    /// File that was linted, if loaded from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Number of pattern lines checked.
    pub patterns: usize,
    /// Findings ordered by line.
    pub diagnostics: Vec<Diagnostic>,
}

impl LintReport {
    /// Number of error diagnostics.
    #[must_use]
    pub fn errors(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warning diagnostics.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Whether there are no findings at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Whether the report passes: no errors, and no warnings if denied.
    #[must_use]
    pub fn passes(&self, deny_warnings: bool) -> bool {
        self.errors() == 0 && !(deny_warnings && self.warnings() > 0)
    }

    /// Convert a failing report into [`Error::LintFailed`].
    ///
    /// # Errors
    ///
    /// Returns an error if the report does not pass.
    pub fn check(&self, deny_warnings: bool) -> Result<()> {
        if self.passes(deny_warnings) {
            Ok(())
        } else {
            Err(Error::LintFailed {
                errors: self.errors(),
                warnings: self.warnings(),
            })
        }
    }
}

/// Lint an ignore file.
#[must_use]
pub fn lint(file: &IgnoreFile, config: &LintConfig) -> LintReport {
    let enabled = |rule: LintRule| !config.disabled_rules.iter().any(|r| r == rule.code());

    let mut diagnostics = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut patterns = 0;

    for line in file.lines() {
        if matches!(line.kind, LineKind::Blank | LineKind::Comment(_)) {
            continue;
        }
        patterns += 1;

        let raw = line.raw.as_str();
        let text = strip_trailing_spaces(raw);
        let mut push = |rule: LintRule, message: String, suggestion: Option<String>| {
            if enabled(rule) {
                diagnostics.push(Diagnostic {
                    line: line.number,
                    rule,
                    severity: rule.severity(),
                    message,
                    suggestion,
                });
            }
        };

        if let Some((index, c)) = find_stray_closer(text) {
            let mut fixed: String = text
                .chars()
                .enumerate()
                .filter_map(|(i, ch)| (i != index).then_some(ch))
                .collect();
            fixed.truncate(fixed.trim_end().len());

            let message = if index + 1 == text.chars().count() {
                format!(
                    "trailing '{c}' is matched literally; '{text}' only matches paths ending in '{c}'"
                )
            } else {
                format!("unmatched '{c}' at column {} is matched literally", index + 1)
            };
            push(LintRule::StrayCharacter, message, Some(fixed));
        }

        if has_unclosed_bracket(text) {
            push(
                LintRule::UnclosedBracket,
                "'[' has no closing ']' and is matched literally".to_string(),
                None,
            );
        }

        if text == "!" {
            push(
                LintRule::EmptyNegation,
                "'!' with nothing after it matches nothing".to_string(),
                None,
            );
        }

        if let LineKind::Invalid(reason) = &line.kind {
            push(
                LintRule::InvalidPattern,
                format!("pattern never matches: {reason}"),
                None,
            );
        }

        if let Some(alternatives) = brace_alternatives(text) {
            push(
                LintRule::BraceExpansion,
                "braces are not expanded; write one pattern per alternative".to_string(),
                Some(alternatives.join("\n")),
            );
        }

        if text.len() != raw.len() {
            push(
                LintRule::TrailingWhitespace,
                "trailing spaces are ignored; escape them with '\\' if intended".to_string(),
                Some(text.to_string()),
            );
        }

        match seen.get(text) {
            Some(first) => push(
                LintRule::DuplicatePattern,
                format!("duplicate of line {first}"),
                None,
            ),
            None => {
                seen.insert(text, line.number);
            }
        }

        if has_misplaced_double_star(text) {
            push(
                LintRule::MisplacedDoubleStar,
                "'**' is not a whole path segment and behaves like '*'".to_string(),
                None,
            );
        }

        if has_backslash_separator(text) {
            push(
                LintRule::BackslashSeparator,
                "'\\' escapes the next character; ignore files use '/' as separator"
                    .to_string(),
                Some(text.replace('\\', "/")),
            );
        }
    }

    for diagnostic in &diagnostics {
        debug!(
            line = diagnostic.line,
            rule = %diagnostic.rule,
            "{}",
            diagnostic.message
        );
    }

    let report = LintReport {
        path: file.path().map(PathBuf::from),
        patterns,
        diagnostics,
    };
    info!(
        patterns = report.patterns,
        errors = report.errors(),
        warnings = report.warnings(),
        "Lint finished"
    );
    report
}

/// Find the first closing `}`, `)` or `]` with no opener, as a char index.
fn find_stray_closer(text: &str) -> Option<(usize, char)> {
    let chars: Vec<char> = text.chars().collect();
    let mut braces = 0usize;
    let mut parens = 0usize;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                i += 2;
                continue;
            }
            '[' => {
                if let Some(end) = class_end(&chars, i) {
                    i = end + 1;
                    continue;
                }
            }
            '{' => braces += 1,
            '(' => parens += 1,
            '}' if braces == 0 => return Some((i, '}')),
            '}' => braces -= 1,
            ')' if parens == 0 => return Some((i, ')')),
            ')' => parens -= 1,
            ']' => return Some((i, ']')),
            _ => {}
        }
        i += 1;
    }

    None
}

fn has_unclosed_bracket(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '[' => match class_end(&chars, i) {
                Some(end) => i = end + 1,
                None => return true,
            },
            _ => i += 1,
        }
    }
    false
}

/// Expand the first `{a,b,...}` group, if the pattern has one.
fn brace_alternatives(text: &str) -> Option<Vec<String>> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '[' => i = class_end(&chars, i).map_or(i + 1, |end| end + 1),
            '{' => {
                let close = chars[i + 1..].iter().position(|c| *c == '}')? + i + 1;
                let inner: String = chars[i + 1..close].iter().collect();
                if !inner.contains(',') {
                    return None;
                }
                let prefix: String = chars[..i].iter().collect();
                let suffix: String = chars[close + 1..].iter().collect();
                return Some(
                    inner
                        .split(',')
                        .map(|alt| format!("{prefix}{alt}{suffix}"))
                        .collect(),
                );
            }
            _ => i += 1,
        }
    }
    None
}

fn has_misplaced_double_star(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '*' => {
                let run = chars[i..].iter().take_while(|c| **c == '*').count();
                if run >= 2 {
                    let before_ok = i == 0 || chars[i - 1] == '/' || (i == 1 && chars[0] == '!');
                    let after_ok = matches!(chars.get(i + run), None | Some('/'));
                    if !(before_ok && after_ok) {
                        return true;
                    }
                }
                i += run;
            }
            _ => i += 1,
        }
    }
    false
}

fn has_backslash_separator(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' {
            if chars.get(i + 1).is_some_and(char::is_ascii_alphanumeric) {
                return true;
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    false
}
