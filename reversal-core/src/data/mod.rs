//! Bar data sources: CSV files, Renko bricks and a synthetic generator.

pub mod csv_io;
pub mod renko;
pub mod synthetic;

pub use csv_io::{load_bars_csv, read_bars, write_bars_csv};
pub use renko::{build_renko, RenkoError};
pub use synthetic::SyntheticBars;

use crate::domain::BarError;
use thiserror::Error;

/// Failure while ingesting bar data. `row` is 1-based and excludes the header.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("bar data i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("row {row}: {source}")]
    Parse {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("row {row}: unrecognized date {value:?}")]
    BadDate { row: usize, value: String },

    #[error("row {row}: {source}")]
    InvalidBar {
        row: usize,
        #[source]
        source: BarError,
    },

    #[error("failed to write bar data: {0}")]
    Write(#[from] csv::Error),
}
