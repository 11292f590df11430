//! The canonical ignore file written by `dataprep init`.

use std::fmt::Write as _;
use std::path::{Component, Path};

use crate::config::ProjectConfig;

const COMMON_SECTIONS: &[(&str, &[&str])] = &[
    (
        "Byte-compiled / optimized files",
        &["__pycache__/", "*.py[cod]", "*$py.class"],
    ),
    ("Virtual environments", &["venv/", ".venv/", ".env/"]),
    ("Jupyter notebook checkpoints", &[".ipynb_checkpoints/"]),
    (
        "Editor and OS files",
        &[
            "*.suo",
            "*.user",
            "*.bat",
            "*.sw?",
            ".DS_Store",
            "Thumbs.db",
            ".vscode/",
            ".idea/",
        ],
    ),
    ("Packaging output", &["build/", "dist/", "*.egg-info/"]),
    ("Caches and temporary files", &[".cache/", "*.tmp"]),
];

/// Render the ignore file for a project layout.
///
/// Project-generated paths come from `project` and are anchored to the
/// project root. Directories outside the project are left out.
#[must_use]
pub fn render(project: &ProjectConfig) -> String {
    let mut out = String::from("# Generated by dataprep init\n");

    for (title, patterns) in COMMON_SECTIONS {
        section(&mut out, title, patterns.iter().map(ToString::to_string));
    }

    section(
        &mut out,
        "Trained models",
        anchored_dir(&project.models_dir)
            .into_iter()
            .chain(["*.pkl".to_string(), "*.joblib".to_string()]),
    );
    section(
        &mut out,
        "Generated figures",
        anchored_dir(&project.figures_dir),
    );
    section(
        &mut out,
        "Processed data",
        anchored_dir(&project.processed_data_dir),
    );

    out
}

fn section(out: &mut String, title: &str, patterns: impl IntoIterator<Item = String>) {
    let mut patterns = patterns.into_iter().peekable();
    if patterns.peek().is_none() {
        return;
    }
    let _ = writeln!(out, "\n# {title}");
    for pattern in patterns {
        let _ = writeln!(out, "{pattern}");
    }
}

/// `/a/b/` for a relative directory, using `/` separators.
///
/// `None` for an empty or absolute path, or one that climbs out with `..`.
fn anchored_dir(dir: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in dir.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(format!("/{}/", parts.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LintConfig;
    use crate::ignore::{lint, Category, IgnoreFile};
    use std::path::PathBuf;

    #[test]
    fn test_template_lints_clean() {
        let text = render(&ProjectConfig::default());
        let report = lint(&IgnoreFile::parse(&text), &LintConfig::default());
        assert!(report.is_clean(), "{:?}", report.diagnostics);
    }

    #[test]
    fn test_template_has_corrected_egg_info() {
        let text = render(&ProjectConfig::default());
        assert!(text.lines().any(|l| l == "*.egg-info/"));
        assert!(!text.contains("egg-info/}"));
    }

    #[test]
    fn test_template_covers_every_category() {
        let file = IgnoreFile::parse(&render(&ProjectConfig::default()));
        let groups = file.by_category();
        for category in Category::ALL {
            if category == Category::Other {
                assert!(!groups.contains_key(&category));
            } else {
                assert!(groups.contains_key(&category), "missing {category}");
            }
        }
    }

    #[test]
    fn test_template_ignores_project_paths() {
        let file = IgnoreFile::parse(&render(&ProjectConfig::default()));

        assert!(file
            .is_ignored("01_data_preparation/data/processed/clean.csv", false)
            .is_ignored());
        assert!(file
            .is_ignored("03_modeling/reports/figure/loss.png", false)
            .is_ignored());
        assert!(file.is_ignored("pkg.egg-info", true).is_ignored());
        assert!(!file
            .is_ignored("01_data_preparation/data/raw/consumption.csv", false)
            .is_ignored());
    }

    #[test]
    fn test_template_uses_configured_dirs() {
        let project = ProjectConfig {
            processed_data_dir: PathBuf::from("stage1/out"),
            ..ProjectConfig::default()
        };
        let text = render(&project);
        assert!(text.lines().any(|l| l == "/stage1/out/"));
    }

    #[test]
    fn test_anchored_dir() {
        assert_eq!(
            anchored_dir(Path::new("03_modeling/models")).as_deref(),
            Some("/03_modeling/models/")
        );
        assert_eq!(anchored_dir(Path::new("./out/")).as_deref(), Some("/out/"));
    }

    #[test]
    fn test_anchored_dir_outside_project() {
        assert_eq!(anchored_dir(Path::new("")), None);
        assert_eq!(anchored_dir(Path::new(".")), None);
        assert_eq!(anchored_dir(Path::new("/srv/processed")), None);
        assert_eq!(anchored_dir(Path::new("../shared/processed")), None);
    }

    #[test]
    fn test_template_skips_dirs_outside_project() {
        let project = ProjectConfig {
            processed_data_dir: PathBuf::from("/srv/processed"),
            ..ProjectConfig::default()
        };
        let text = render(&project);

        assert!(!text.contains("# Processed data"));
        assert!(!text.contains("//"));
        assert!(!text.lines().any(|l| l == "/srv/processed/"));

        let report = lint(&IgnoreFile::parse(&text), &LintConfig::default());
        assert!(report.is_clean(), "{:?}", report.diagnostics);
    }
}
