//! CSV error types

use sheetdb::backend::{BackendError, BackendErrorKind};
use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur in the CSV backend
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A document id or worksheet title that cannot name a file
    #[error("Invalid name '{0}'")]
    InvalidName(String),
}

impl From<CsvError> for BackendError {
    fn from(err: CsvError) -> Self {
        match err {
            CsvError::Io(e) => BackendError::from(e),
            CsvError::Csv(e) => {
                let kind = match e.kind() {
                    csv::ErrorKind::Io(_) => BackendErrorKind::Io,
                    _ => BackendErrorKind::Malformed,
                };
                BackendError::new(kind, e.to_string()).with_source(e)
            }
            CsvError::InvalidName(name) => {
                BackendError::new(BackendErrorKind::NotFound, format!("invalid name '{}'", name))
            }
        }
    }
}
