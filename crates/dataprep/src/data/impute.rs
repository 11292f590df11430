//! Filling gaps in consumption series.
//!
//! A consumption series is zero until metering starts, so values before the
//! first observation are set to `0`. After that, gaps are filled by linear
//! interpolation over row positions, and gaps after the last observation
//! repeat it.

use serde::Serialize;
use tracing::{debug, info};

use super::table::{ColumnData, Table};
use crate::error::Result;

/// What imputation did to one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnImputation {
    /// Column name.
    pub column: String,
    /// Missing values before the first observation set to zero.
    pub zero_filled: usize,
    /// Missing values between observations interpolated.
    pub interpolated: usize,
    /// Missing values after the last observation set to it.
    pub forward_filled: usize,
}

impl ColumnImputation {
    /// Total number of values filled.
    #[must_use]
    pub fn total(&self) -> usize {
        self.zero_filled + self.interpolated + self.forward_filled
    }
}

/// Impute missing values in the named numeric columns.
///
/// Returns a new table with every named column fully populated, and what was
/// done to each column.
///
/// # Errors
///
/// - [`Error::ColumnNotFound`](crate::Error::ColumnNotFound) if a column is missing
/// - [`Error::ColumnNotNumeric`](crate::Error::ColumnNotNumeric) if a column holds text
pub fn impute_consumption(
    table: &Table,
    columns: &[String],
) -> Result<(Table, Vec<ColumnImputation>)> {
    let mut imputed = table.clone();
    let mut report = Vec::with_capacity(columns.len());

    for name in columns {
        let values = table.column(name)?.as_numeric()?;
        let (filled, mut stats) = impute_series(values);
        stats.column.clone_from(name);

        debug!(
            column = %name,
            zero_filled = stats.zero_filled,
            interpolated = stats.interpolated,
            forward_filled = stats.forward_filled,
            "Imputed column"
        );
        imputed.replace_column(name, ColumnData::Numeric(filled.into_iter().map(Some).collect()))?;
        report.push(stats);
    }

    info!(
        columns = report.len(),
        filled = report.iter().map(ColumnImputation::total).sum::<usize>(),
        "Imputation finished"
    );
    Ok((imputed, report))
}

/// Impute one series. The returned stats have an empty column name.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn impute_series(values: &[Option<f64>]) -> (Vec<f64>, ColumnImputation) {
    let mut stats = ColumnImputation::default();

    let Some(first) = values.iter().position(Option::is_some) else {
        stats.zero_filled = values.len();
        return (vec![0.0; values.len()], stats);
    };

    let mut out = Vec::with_capacity(values.len());
    out.extend(std::iter::repeat(0.0).take(first));
    stats.zero_filled = first;

    // (position, value) of the last observation seen
    let mut last = (first, values[first].unwrap_or_default());
    out.push(last.1);

    for (i, value) in values.iter().enumerate().skip(first + 1) {
        let Some(value) = *value else { continue };

        let (start, from) = last;
        let span = (i - start) as f64;
        for k in start + 1..i {
            let t = (k - start) as f64 / span;
            out.push(from + (value - from) * t);
        }
        stats.interpolated += i - start - 1;

        out.push(value);
        last = (i, value);
    }

    let trailing = values.len() - out.len();
    out.extend(std::iter::repeat(last.1).take(trailing));
    stats.forward_filled = trailing;

    (out, stats)
}
