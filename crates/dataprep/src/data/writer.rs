//! CSV writing.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use super::table::{ColumnData, Table};
use crate::error::{Error, Result};

/// Write a table as CSV, creating parent directories as needed.
///
/// The date index, if any, is the first column.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub fn write_csv(table: &Table, path: impl AsRef<Path>, date_format: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(date) = table.index().and_then(|index| index.dates.first()) {
        format_date(*date, date_format)?;
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let file = std::fs::File::create(path)?;
    write_csv_to(table, file, date_format)?;
    info!("Wrote {} rows to {}", table.n_rows(), path.display());
    Ok(())
}

/// Write a table as CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv_to<W: Write>(table: &Table, writer: W, date_format: &str) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(table.columns().len() + 1);
    if let Some(index) = table.index() {
        header.push(&index.name);
    }
    header.extend(table.column_names());
    writer.write_record(&header)?;

    for row in 0..table.n_rows() {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        if let Some(index) = table.index() {
            record.push(format_date(index.dates[row], date_format)?);
        }
        for column in table.columns() {
            record.push(match &column.data {
                ColumnData::Numeric(values) => values[row].map(format_number).unwrap_or_default(),
                ColumnData::Text(values) => values[row].clone().unwrap_or_default(),
            });
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Render a date with a strftime-style format.
///
/// # Errors
///
/// Returns [`Error::DateFormat`] if the format needs fields a date does not
/// have, such as `%H`.
pub fn format_date(date: NaiveDate, format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).map_err(|_| Error::DateFormat {
        format: format.to_string(),
    })?;
    Ok(out)
}

/// Format a number with at least one decimal place, so `3` reads `3.0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, DateIndex};

    fn render(table: &Table, date_format: &str) -> String {
        let mut buf = Vec::new();
        write_csv_to(table, &mut buf, date_format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3.0");
        assert_eq!(format_number(-0.0), "-0.0");
        assert_eq!(format_number(2.25), "2.25");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_large_number() {
        assert_eq!(format_number(1e15), "1000000000000000.0");
        assert_eq!(format_number(1e16), "10000000000000000.0");
        assert_eq!(format_number(-2e17), "-200000000000000000.0");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        assert_eq!(format_date(date, "%Y-%m-%d").unwrap(), "2021-03-01");
        assert_eq!(format_date(date, "%b %Y").unwrap(), "Mar 2021");
    }

    #[test]
    fn test_format_date_with_time_fields() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let err = format_date(date, "%Y-%m-%d %H:%M").unwrap_err();
        assert!(matches!(err, Error::DateFormat { .. }));
    }

    #[test]
    fn test_write_with_time_format_leaves_no_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut table = Table::new(vec![Column::numeric("Gas", vec![Some(1.0)])]).unwrap();
        table
            .set_index(DateIndex {
                name: "datetime".to_string(),
                dates: vec![NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()],
            })
            .unwrap();

        let result = write_csv(&table, &path, "%Y-%m-%d %H:%M");
        assert!(matches!(result, Err(Error::DateFormat { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_without_index() {
        let table = Table::new(vec![
            Column::numeric("Gas", vec![Some(1.0), None]),
            Column::text("Region", vec![Some("North".to_string()), None]),
        ])
        .unwrap();

        assert_eq!(render(&table, "%Y-%m-%d"), "Gas,Region\n1.0,North\n,\n");
    }

    #[test]
    fn test_write_with_index() {
        let mut table = Table::new(vec![Column::numeric("Gas", vec![Some(1.5), Some(2.0)])]).unwrap();
        table
            .set_index(DateIndex {
                name: "datetime".to_string(),
                dates: vec![
                    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2020, 2, 1).unwrap(),
                ],
            })
            .unwrap();

        assert_eq!(
            render(&table, "%Y-%m-%d"),
            "datetime,Gas\n2020-01-01,1.5\n2020-02-01,2.0\n"
        );
        assert_eq!(
            render(&table, "%Y-%m"),
            "datetime,Gas\n2020-01,1.5\n2020-02,2.0\n"
        );
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data/processed/out.csv");
        let table = Table::new(vec![Column::numeric("Gas", vec![Some(1.0)])]).unwrap();

        write_csv(&table, &path, "%Y-%m-%d").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Gas\n1.0\n");
    }
}
