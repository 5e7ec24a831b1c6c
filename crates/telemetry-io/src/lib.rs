//! Telemetry Table I/O
//!
//! Reads loaded-state tables from CSV, orders them for cleaning, and writes
//! cleaned results back out as CSV or JSON.

mod reader;
mod writer;

pub use reader::{load_csv, read_observations, sort_observations, TableFormat};
pub use writer::{write_csv, write_json, RESULT_COLUMN};

use thiserror::Error;

/// Table I/O errors
#[derive(Debug, Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Malformed row {row}: {reason}")]
    Malformed { row: u64, reason: String },
    #[error("{observations} observations but {cleaned} cleaned values")]
    LengthMismatch { observations: usize, cleaned: usize },
}
