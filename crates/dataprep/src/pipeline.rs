//! The data preparation stage end to end.
//!
//! [`prepare`] loads a raw CSV file, indexes it by month, imputes the
//! consumption columns, writes the result to the processed-data directory and
//! records a manifest with BLAKE3 fingerprints of the input and output.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::data::{
    impute_consumption, load_csv, with_date_index, write_csv, ColumnImputation, DateColumns,
};
use crate::error::Result;

/// What to prepare.
#[derive(Debug, Clone, Default)]
pub struct PrepareRequest {
    /// Raw CSV file.
    pub input: PathBuf,
    /// Output file. Defaults to `<processed dir>/<input stem>.csv`.
    pub output: Option<PathBuf>,
    /// Columns to impute, overriding the configured list.
    pub columns: Vec<String>,
}

/// The outcome of a preparation run; also the manifest contents.
#[derive(Debug, Clone, Serialize)]
pub struct PrepareReport {
    /// Raw input file.
    pub source: PathBuf,
    /// Prepared output file.
    pub output: PathBuf,
    /// Manifest file, when one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
    /// Number of data rows.
    pub rows: usize,
    /// Name of the date index, if one was built.
    pub index: Option<String>,
    /// Output columns after the index.
    pub columns: Vec<String>,
    /// Per-column imputation counts.
    pub imputations: Vec<ColumnImputation>,
    /// BLAKE3 hash of the input bytes.
    pub source_hash: String,
    /// BLAKE3 hash of the output bytes.
    pub output_hash: String,
    /// When the run finished.
    pub prepared_at: DateTime<Utc>,
}

/// Run the preparation stage.
///
/// # Errors
///
/// Returns an error if loading, indexing, imputation or writing fails.
pub fn prepare(config: &Config, request: &PrepareRequest) -> Result<PrepareReport> {
    let settings = &config.prepare;
    info!("Preparing {}", request.input.display());

    let raw = load_csv(&request.input)?;
    let source_hash = hash_file(&request.input)?;

    let indexed = with_date_index(&raw, &DateColumns::from(settings))?;

    let columns = if !request.columns.is_empty() {
        request.columns.clone()
    } else if !settings.consumption_columns.is_empty() {
        settings.consumption_columns.clone()
    } else {
        indexed.numeric_column_names()
    };
    debug!(?columns, "Imputing consumption columns");
    let (prepared, imputations) = impute_consumption(&indexed, &columns)?;

    let output = request
        .output
        .clone()
        .unwrap_or_else(|| default_output(config, &request.input));
    write_csv(&prepared, &output, &settings.date_format)?;
    let output_hash = hash_file(&output)?;

    let mut report = PrepareReport {
        source: request.input.clone(),
        output: output.clone(),
        manifest: None,
        rows: prepared.n_rows(),
        index: prepared.index().map(|index| index.name.clone()),
        columns: prepared
            .column_names()
            .into_iter()
            .map(String::from)
            .collect(),
        imputations,
        source_hash,
        output_hash,
        prepared_at: Utc::now(),
    };

    if settings.write_manifest {
        let manifest = output.with_extension("manifest.json");
        report.manifest = Some(manifest.clone());
        std::fs::write(&manifest, serde_json::to_string_pretty(&report)?)?;
        debug!("Wrote manifest {}", manifest.display());
    }

    info!(
        rows = report.rows,
        output = %report.output.display(),
        "Preparation finished"
    );
    Ok(report)
}

/// `<processed dir>/<input stem>.csv`.
fn default_output(config: &Config, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "prepared".into(), |s| s.to_string_lossy());
    config.processed_data_dir().join(format!("{stem}.csv"))
}

/// BLAKE3 hash of a file's bytes, as hex.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn hash_file(path: impl AsRef<Path>) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// Summary of one column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    /// Column name.
    pub name: String,
    /// `numeric` or `text`.
    pub kind: &'static str,
    /// Number of missing values.
    pub missing: usize,
}

/// Date range of an index.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    /// Index name.
    pub name: String,
    /// Earliest date.
    pub first: NaiveDate,
    /// Latest date.
    pub last: NaiveDate,
}

/// Summary of a raw data file.
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    /// File that was inspected.
    pub source: PathBuf,
    /// Number of data rows.
    pub rows: usize,
    /// Date range, when year and month columns are present.
    pub index: Option<IndexSummary>,
    /// Per-column summaries, after indexing.
    pub columns: Vec<ColumnSummary>,
}

/// Load a data file and summarize it without writing anything.
///
/// # Errors
///
/// Returns an error if loading or date indexing fails.
pub fn inspect(config: &Config, path: impl AsRef<Path>) -> Result<TableSummary> {
    let path = path.as_ref();
    let table = with_date_index(&load_csv(path)?, &DateColumns::from(&config.prepare))?;

    let index = table.index().and_then(|index| {
        let first = index.dates.iter().min()?;
        let last = index.dates.iter().max()?;
        Some(IndexSummary {
            name: index.name.clone(),
            first: *first,
            last: *last,
        })
    });

    let columns = table
        .columns()
        .iter()
        .map(|column| ColumnSummary {
            name: column.name.clone(),
            kind: column.data.type_name(),
            missing: column.data.missing(),
        })
        .collect();

    Ok(TableSummary {
        source: path.to_path_buf(),
        rows: table.n_rows(),
        index,
        columns,
    })
}
