//! Error types for log ingestion and catalog loading.
//!
//! The taxonomy is deliberately narrow: once an `EventLog` and catalog are
//! built, every downstream computation returns a defined degenerate value
//! rather than an error.

use std::path::PathBuf;

/// Errors that can occur while building an [`crate::EventLog`] from a table.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Wraps both read and file-open failures; `csv::Error` carries the
    /// underlying I/O error for a path that cannot be opened.
    #[error("CSV error in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Missing required column: {column}")]
    MissingColumn { column: String },

    #[error("Row {row}: cannot parse {column} value {value:?} as a number")]
    BadNumber {
        row: usize,
        column: String,
        value: String,
    },
}

/// Errors that can occur while loading a [`crate::ConditioningCatalog`].
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed catalog {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}
