//! CSV loading.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use super::table::{Column, Table};
use crate::error::{Error, Result};

/// Cell values read as missing.
const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "NaN", "nan", "-nan", "null", "NULL", "None", "#N/A",
];

/// Load a CSV file with a header row into a [`Table`].
///
/// Columns whose non-missing cells all parse as numbers become numeric,
/// everything else is text.
///
/// # Errors
///
/// - [`Error::DataFileNotFound`] if the file does not exist
/// - [`Error::DataFileEmpty`] if it has no header row
/// - [`Error::DataParse`] if it is not valid CSV
pub fn load_csv(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::DataFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Io(source)
        }
    })?;

    let table = read_csv(file, path)?;
    info!(
        "Loaded {} ({} rows, {} columns)",
        path.display(),
        table.n_rows(),
        table.columns().len()
    );
    Ok(table)
}

/// Read CSV from any reader; `source` names it in errors.
///
/// # Errors
///
/// Returns [`Error::DataFileEmpty`] or [`Error::DataParse`] as for
/// [`load_csv`].
pub fn read_csv<R: Read>(reader: R, source: &Path) -> Result<Table> {
    let parse_error = |err: csv::Error| Error::DataParse {
        path: source.to_path_buf(),
        message: err.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(parse_error)?.clone();
    if headers.is_empty() {
        return Err(Error::DataFileEmpty {
            path: source.to_path_buf(),
        });
    }
    let names = dedupe_headers(headers.iter());

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
    for record in reader.records() {
        let record = record.map_err(parse_error)?;
        for (column, value) in cells.iter_mut().zip(record.iter()) {
            column.push(parse_cell(value));
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| infer_column(name, values))
        .collect();

    Table::new(columns)
}

fn parse_cell(value: &str) -> Option<String> {
    if MISSING_TOKENS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Rename repeated headers to `name.1`, `name.2`, ..., skipping suffixed
/// names that are already taken.
fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let headers: Vec<&str> = headers.collect();
    let mut used: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut names = Vec::with_capacity(headers.len());

    for header in headers {
        let mut name = header.to_string();
        if used.contains(&name) {
            let count = counts.entry(header).or_insert(0);
            while used.contains(&name) {
                *count += 1;
                name = format!("{header}.{count}");
            }
            debug!(original = header, renamed = %name, "Renamed duplicate header");
        }
        used.insert(name.clone());
        names.push(name);
    }

    names
}

fn infer_column(name: String, values: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|value| match value {
            None => Some(None),
            // `inf` and `NaN` spellings are not observations
            Some(text) => text
                .parse::<f64>()
                .ok()
                .map(|number| number.is_finite().then_some(number)),
        })
        .collect();

    match parsed {
        Some(numbers) => Column::numeric(name, numbers),
        None => Column::text(name, values),
    }
}
