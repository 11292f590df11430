//! Tabular data preparation.
//!
//! Loads raw monthly consumption data from CSV, indexes it by date, fills
//! gaps in the consumption columns and writes the result back out.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use dataprep::data::{impute_consumption, read_csv, with_date_index, DateColumns};
//!
//! let raw = "Year,Month,Electricity\n2020,1,\n2020,2,10\n2020,3,\n2020,4,14\n";
//! let table = read_csv(raw.as_bytes(), Path::new("raw.csv")).unwrap();
//!
//! let table = with_date_index(&table, &DateColumns::default()).unwrap();
//! let (table, _) = impute_consumption(&table, &["Electricity".to_string()]).unwrap();
//!
//! assert_eq!(table.index().unwrap().dates.len(), 4);
//! assert_eq!(table.column("Electricity").unwrap().data.missing(), 0);
//! ```

mod dates;
mod impute;
mod loader;
mod table;
mod writer;

pub use dates::{with_date_index, DateColumns};
pub use impute::{impute_consumption, impute_series, ColumnImputation};
pub use loader::{load_csv, read_csv};
pub use table::{Column, ColumnData, DateIndex, Table};
pub use writer::{format_date, format_number, write_csv, write_csv_to};
