//! `dataprep` - Ignore-file linting and data preparation for staged
//! data-science projects
//!
//! This library provides the ignore-file model and linter, the monthly data
//! preparation stage (load, date-index, impute, write) and project
//! scaffolding used by the `dataprep` binary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod ignore;
pub mod logging;
pub mod pipeline;
pub mod scaffold;

pub use config::Config;
pub use error::{Error, Result};
pub use ignore::{lint, IgnoreFile, LintReport};
pub use logging::init_logging;
pub use pipeline::{inspect, prepare, PrepareReport, PrepareRequest};
