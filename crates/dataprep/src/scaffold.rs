//! Project scaffolding.
//!
//! Creates the staged directory layout and a canonical ignore file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ProjectConfig;
use crate::error::{Error, Result};
use crate::ignore::template;

/// What [`init`] did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScaffoldReport {
    /// Directories that were created.
    pub created_dirs: Vec<PathBuf>,
    /// The ignore file, if it was written.
    pub ignore_file: Option<PathBuf>,
    /// The ignore file, if an existing one was kept.
    pub kept_ignore_file: Option<PathBuf>,
}

/// Create the project layout under `root`.
///
/// Existing directories are left alone. An existing ignore file is kept
/// unless `force` is set.
///
/// # Errors
///
/// Returns an error if a directory or the ignore file cannot be created.
pub fn init(root: &Path, project: &ProjectConfig, force: bool) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();

    for dir in [
        &project.raw_data_dir,
        &project.processed_data_dir,
        &project.models_dir,
        &project.figures_dir,
    ] {
        let path = root.join(dir);
        if path.is_dir() {
            continue;
        }
        std::fs::create_dir_all(&path).map_err(|source| Error::DirectoryCreate {
            path: path.clone(),
            source,
        })?;
        info!("Created {}", path.display());
        report.created_dirs.push(path);
    }

    let ignore_path = root.join(&project.ignore_file);
    if ignore_path.exists() && !force {
        warn!(
            "{} already exists, keeping it (use --force to overwrite)",
            ignore_path.display()
        );
        report.kept_ignore_file = Some(ignore_path);
    } else {
        std::fs::write(&ignore_path, template::render(project))?;
        info!("Wrote {}", ignore_path.display());
        report.ignore_file = Some(ignore_path);
    }

    Ok(report)
}
