//! Building a monthly date index from year and month columns.

use chrono::NaiveDate;
use tracing::debug;

use super::table::{DateIndex, Table};
use crate::config::PrepareConfig;
use crate::error::{Error, Result};

/// Names of the columns involved in date indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateColumns {
    /// Column holding the year.
    pub year: String,
    /// Column holding the month (1-12).
    pub month: String,
    /// Name given to the resulting index.
    pub index: String,
}

impl Default for DateColumns {
    fn default() -> Self {
        Self::from(&PrepareConfig::default())
    }
}

impl From<&PrepareConfig> for DateColumns {
    fn from(config: &PrepareConfig) -> Self {
        Self {
            year: config.year_column.clone(),
            month: config.month_column.clone(),
            index: config.index_column.clone(),
        }
    }
}

/// Index a table by the first day of each row's year and month.
///
/// Returns a copy of `table` with the year and month columns replaced by a
/// date index. The copy is unchanged when the table already has an index or
/// an index column, or lacks either the year or the month column.
///
/// # Errors
///
/// - [`Error::ColumnNotNumeric`] if the year or month column holds text
/// - [`Error::InvalidDate`] if a row's year or month is missing, fractional
///   or out of range
pub fn with_date_index(table: &Table, columns: &DateColumns) -> Result<Table> {
    if table.index().is_some() || table.has_column(&columns.index) {
        debug!(index = %columns.index, "Table already has a date index");
        return Ok(table.clone());
    }
    if !(table.has_column(&columns.year) && table.has_column(&columns.month)) {
        debug!(
            year = %columns.year,
            month = %columns.month,
            "Year/month columns not present, leaving table unindexed"
        );
        return Ok(table.clone());
    }

    let years = table.column(&columns.year)?.as_numeric()?;
    let months = table.column(&columns.month)?.as_numeric()?;

    let dates = years
        .iter()
        .zip(months)
        .enumerate()
        .map(|(row, (year, month))| first_of_month(row, *year, *month))
        .collect::<Result<Vec<_>>>()?;

    let mut indexed = table.clone();
    indexed.drop_columns(&[columns.year.as_str(), columns.month.as_str()]);
    indexed.set_index(DateIndex {
        name: columns.index.clone(),
        dates,
    })?;

    debug!(rows = indexed.n_rows(), "Built date index");
    Ok(indexed)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn first_of_month(row: usize, year: Option<f64>, month: Option<f64>) -> Result<NaiveDate> {
    let year = whole_number(row, "year", year)?;
    let month = whole_number(row, "month", month)?;

    if !(1.0..=12.0).contains(&month) {
        return Err(Error::invalid_date(
            row,
            format!("month {month} out of range"),
        ));
    }
    if year.abs() > f64::from(i32::MAX) {
        return Err(Error::invalid_date(row, format!("year {year} out of range")));
    }

    NaiveDate::from_ymd_opt(year as i32, month as u32, 1)
        .ok_or_else(|| Error::invalid_date(row, format!("year {year} out of range")))
}

fn whole_number(row: usize, what: &str, value: Option<f64>) -> Result<f64> {
    match value {
        None => Err(Error::invalid_date(row, format!("missing {what}"))),
        Some(v) if !v.is_finite() || v.fract() != 0.0 => {
            Err(Error::invalid_date(row, format!("{what} {v} is not a whole number")))
        }
        Some(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, ColumnData};

    fn date(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    fn monthly(years: &[f64], months: &[f64]) -> Table {
        Table::new(vec![
            Column::numeric("Year", years.iter().copied().map(Some).collect()),
            Column::numeric("Month", months.iter().copied().map(Some).collect()),
            Column::numeric("Electricity", vec![Some(1.0); years.len()]),
        ])
        .unwrap()
    }

    #[test]
    fn test_builds_index_and_drops_columns() {
        let table = monthly(&[2019.0, 2019.0, 2020.0], &[11.0, 12.0, 1.0]);
        let indexed = with_date_index(&table, &DateColumns::default()).unwrap();

        let index = indexed.index().unwrap();
        assert_eq!(index.name, "datetime");
        assert_eq!(index.dates, vec![date(2019, 11), date(2019, 12), date(2020, 1)]);
        assert_eq!(indexed.column_names(), vec!["Electricity"]);
        assert_eq!(indexed.n_rows(), 3);

        // The input is left untouched
        assert!(table.index().is_none());
        assert!(table.has_column("Year"));
    }

    #[test]
    fn test_already_indexed_is_unchanged() {
        let table = monthly(&[2020.0], &[5.0]);
        let indexed = with_date_index(&table, &DateColumns::default()).unwrap();
        let again = with_date_index(&indexed, &DateColumns::default()).unwrap();
        assert_eq!(indexed, again);
    }

    #[test]
    fn test_existing_datetime_column_is_unchanged() {
        let table = Table::new(vec![
            Column::text("datetime", vec![Some("2020-01-01".to_string())]),
            Column::numeric("Year", vec![Some(2020.0)]),
            Column::numeric("Month", vec![Some(1.0)]),
        ])
        .unwrap();
        let result = with_date_index(&table, &DateColumns::default()).unwrap();
        assert_eq!(result, table);
    }

    #[test]
    fn test_missing_month_column_is_unchanged() {
        let table = Table::new(vec![Column::numeric("Year", vec![Some(2020.0)])]).unwrap();
        let result = with_date_index(&table, &DateColumns::default()).unwrap();
        assert_eq!(result, table);
    }

    #[test]
    fn test_only_year_and_month_columns() {
        let table = Table::new(vec![
            Column::numeric("Year", vec![Some(2021.0), Some(2021.0)]),
            Column::numeric("Month", vec![Some(1.0), Some(2.0)]),
        ])
        .unwrap();
        let indexed = with_date_index(&table, &DateColumns::default()).unwrap();
        assert!(indexed.columns().is_empty());
        assert_eq!(indexed.n_rows(), 2);
    }

    #[test]
    fn test_custom_column_names() {
        let table = Table::new(vec![
            Column::numeric("Anio", vec![Some(2022.0)]),
            Column::numeric("Mes", vec![Some(7.0)]),
        ])
        .unwrap();
        let columns = DateColumns {
            year: "Anio".to_string(),
            month: "Mes".to_string(),
            index: "fecha".to_string(),
        };
        let indexed = with_date_index(&table, &columns).unwrap();
        let index = indexed.index().unwrap();
        assert_eq!(index.name, "fecha");
        assert_eq!(index.dates, vec![date(2022, 7)]);
    }

    #[test]
    fn test_month_out_of_range() {
        let table = monthly(&[2020.0, 2020.0], &[12.0, 13.0]);
        let err = with_date_index(&table, &DateColumns::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidDate { row: 1, .. }));
    }

    #[test]
    fn test_fractional_and_missing_values() {
        let table = monthly(&[2020.5], &[1.0]);
        let err = with_date_index(&table, &DateColumns::default()).unwrap_err();
        assert!(err.to_string().contains("not a whole number"));

        let table = Table::new(vec![
            Column::numeric("Year", vec![None]),
            Column::numeric("Month", vec![Some(1.0)]),
        ])
        .unwrap();
        let err = with_date_index(&table, &DateColumns::default()).unwrap_err();
        assert!(err.to_string().contains("missing year"));
    }

    #[test]
    fn test_text_month_column() {
        let table = Table::new(vec![
            Column::numeric("Year", vec![Some(2020.0)]),
            Column {
                name: "Month".to_string(),
                data: ColumnData::Text(vec![Some("Jan".to_string())]),
            },
        ])
        .unwrap();
        let err = with_date_index(&table, &DateColumns::default()).unwrap_err();
        assert!(matches!(err, Error::ColumnNotNumeric { .. }));
    }
}
