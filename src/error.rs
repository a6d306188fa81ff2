use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the ledger core. Every variant is terminal for the
/// operation that produced it.
#[derive(Error, Debug)]
pub(crate) enum LedgerError {
    #[error("Invalid amount '{0}': use a number like 12 or 12.34")]
    InvalidAmount(String),

    #[error("Category cannot be empty")]
    InvalidCategory,

    #[error("Keyword cannot be empty")]
    InvalidKeyword,

    #[error("Invalid month '{0}': use YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid date '{0}': use YYYY-MM-DD or 'today'")]
    InvalidDate(String),

    #[error("No transaction found with id {0}")]
    NotFound(i64),

    #[error("Row {row}: date '{value}' does not match format '{format}'")]
    DateParse {
        row: usize,
        value: String,
        format: String,
    },

    #[error("CSV not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("CSV has no column named '{0}'")]
    MissingColumn(String),

    #[error("CSV has no header row")]
    EmptySource,

    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub(crate) type LedgerResult<T> = std::result::Result<T, LedgerError>;
