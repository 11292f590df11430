//! Built-in pattern categories.
//!
//! Classifies ignore patterns by what kind of artifact they exclude, using
//! regexes over the pattern text.

use regex::Regex;
use serde::Serialize;

/// What kind of artifact a pattern excludes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Interpreter bytecode and its cache directories.
    Bytecode,
    /// Virtual environments and environment directories.
    Environment,
    /// Notebook checkpoint directories.
    Notebook,
    /// Editor and operating system droppings.
    EditorOs,
    /// Build and packaging output.
    Packaging,
    /// Generic caches and temporary files.
    Cache,
    /// Models, figures and processed data generated by the project.
    ProjectGenerated,
    /// Anything not recognized.
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 8] = [
        Self::Bytecode,
        Self::Environment,
        Self::Notebook,
        Self::EditorOs,
        Self::Packaging,
        Self::Cache,
        Self::ProjectGenerated,
        Self::Other,
    ];

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bytecode => "bytecode/cache artifacts",
            Self::Environment => "environment directories",
            Self::Notebook => "notebook checkpoints",
            Self::EditorOs => "editor/OS artifacts",
            Self::Packaging => "packaging output",
            Self::Cache => "generic caches",
            Self::ProjectGenerated => "project-specific generated paths",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bytecode => write!(f, "bytecode"),
            Self::Environment => write!(f, "environment"),
            Self::Notebook => write!(f, "notebook"),
            Self::EditorOs => write!(f, "editor-os"),
            Self::Packaging => write!(f, "packaging"),
            Self::Cache => write!(f, "cache"),
            Self::ProjectGenerated => write!(f, "project-generated"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A compiled classification rule.
#[derive(Debug)]
pub struct CategoryRule {
    /// Category assigned on match.
    pub category: Category,

    /// Description of what this rule recognizes.
    pub description: &'static str,

    /// The compiled regex, applied to the pattern text.
    regex: Regex,
}

impl CategoryRule {
    /// Create a new classification rule.
    ///
    /// # Panics
    ///
    /// Panics if the regex pattern is invalid.
    #[must_use]
    pub fn new(category: Category, description: &'static str, pattern: &str) -> Self {
        Self {
            category,
            description,
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
        }
    }

    /// Check if a pattern's text matches this rule.
    #[must_use]
    pub fn matches(&self, pattern_text: &str) -> bool {
        self.regex.is_match(pattern_text)
    }
}

/// Get all built-in classification rules, in priority order.
#[must_use]
pub fn builtin_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            Category::Bytecode,
            "Python bytecode, cache directories and Jython class files",
            r"(^|/)__pycache__/?$|\.py\[[cod]+\]$|\.py[cod]$|\$py\.class$",
        ),
        CategoryRule::new(
            Category::Notebook,
            "Jupyter notebook checkpoints",
            r"(^|/)\.ipynb_checkpoints/?$",
        ),
        CategoryRule::new(
            Category::Environment,
            "Virtual environment directories",
            r"^/?(\.?venv|\.?env|ENV|env\.bak|venv\.bak)/?$",
        ),
        CategoryRule::new(
            Category::Packaging,
            "Build output, distributions and egg metadata",
            r"^/?(build|dist|wheels|sdist|eggs|\.eggs)/?$|\.egg-info|\.egg$|\.whl$",
        ),
        CategoryRule::new(
            Category::EditorOs,
            "Editor swap/settings files and OS metadata",
            r"\.(suo|user|bat|swp|swo)$|\.sw\?$|(^|/)\.DS_Store$|(^|/)Thumbs\.db$|\.vscode/?$|(^|/)\.idea/?$|~$",
        ),
        CategoryRule::new(
            Category::Cache,
            "Generic caches and temporary files",
            r"(^|/)\.cache/?$|\.tmp$|(^|/)\.(pytest|mypy|ruff)_cache/?$",
        ),
        CategoryRule::new(
            Category::ProjectGenerated,
            "Trained models, report figures and processed data",
            r"(^|/)(models|reports|processed|figures?)(/|$)|\.(pkl|pickle|joblib|h5|onnx)$",
        ),
    ]
}

/// Classifies pattern text with the built-in rules.
#[derive(Debug)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Categorizer {
    /// Create a categorizer with the built-in rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// Classify pattern text; the first matching rule wins.
    #[must_use]
    pub fn categorize(&self, pattern_text: &str) -> Category {
        self.rules
            .iter()
            .find(|rule| rule.matches(pattern_text))
            .map_or(Category::Other, |rule| rule.category)
    }
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new()
    }
}
