//! In-memory column-oriented tables.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};

/// Values of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    /// Floating-point values; `None` is missing.
    Numeric(Vec<Option<f64>>),
    /// Free text; `None` is missing.
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    /// Whether the column holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of missing values.
    #[must_use]
    pub fn missing(&self) -> usize {
        match self {
            Self::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            Self::Text(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }

    /// Short type name for summaries.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Numeric(_) => "numeric",
            Self::Text(_) => "text",
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Column header.
    pub name: String,
    /// Column values.
    pub data: ColumnData,
}

impl Column {
    /// Create a numeric column.
    #[must_use]
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    /// Create a text column.
    #[must_use]
    pub fn text(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    /// Numeric values, or [`Error::ColumnNotNumeric`].
    ///
    /// # Errors
    ///
    /// Returns an error if the column holds text.
    pub fn as_numeric(&self) -> Result<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(values) => Ok(values),
            ColumnData::Text(_) => Err(Error::column_not_numeric(&self.name)),
        }
    }
}

/// A row index of calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateIndex {
    /// Index name, written as the first header.
    pub name: String,
    /// One date per row.
    pub dates: Vec<NaiveDate>,
}

/// A table of equally long columns with an optional date index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    index: Option<DateIndex>,
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking that every column has the same length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if column lengths differ.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.data.len();
            if let Some(bad) = columns.iter().find(|c| c.data.len() != expected) {
                return Err(Error::ShapeMismatch {
                    column: bad.name.clone(),
                    expected,
                    actual: bad.data.len(),
                });
            }
        }
        Ok(Self {
            index: None,
            columns,
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or_else(
            || self.index.as_ref().map_or(0, |index| index.dates.len()),
            |c| c.data.len(),
        )
    }

    /// All columns in order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Names of numeric columns in order.
    #[must_use]
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| matches!(c.data, ColumnData::Numeric(_)))
            .map(|c| c.name.clone())
            .collect()
    }

    /// Whether a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look up a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnNotFound`] if there is no such column.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::column_not_found(name))
    }

    /// Replace the values of an existing column.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing or the length differs.
    pub fn replace_column(&mut self, name: &str, data: ColumnData) -> Result<()> {
        let expected = self.n_rows();
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                column: name.to_string(),
                expected,
                actual: data.len(),
            });
        }
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::column_not_found(name))?;
        column.data = data;
        Ok(())
    }

    /// Remove the named columns; unknown names are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        self.columns.retain(|c| !names.contains(&c.name.as_str()));
    }

    /// The date index, if set.
    #[must_use]
    pub fn index(&self) -> Option<&DateIndex> {
        self.index.as_ref()
    }

    /// Set the date index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index length differs from the row count.
    pub fn set_index(&mut self, index: DateIndex) -> Result<()> {
        if !self.columns.is_empty() && index.dates.len() != self.n_rows() {
            return Err(Error::ShapeMismatch {
                column: index.name,
                expected: self.n_rows(),
                actual: index.dates.len(),
            });
        }
        self.index = Some(index);
        Ok(())
    }
}
