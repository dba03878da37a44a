//! Error types for sheetdb

use thiserror::Error;

use crate::backend::BackendError;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by schemes, tables and the registry
#[derive(Debug, Error)]
pub enum Error {
    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetdb_core::Error),

    /// Worksheet backend error
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// A required field was absent from the source record
    #[error("{scheme}: missing required field '{field}'")]
    MissingField { scheme: &'static str, field: String },

    /// A field value had the wrong type
    #[error("{scheme}: field '{field}' expected {expected}, got {actual}")]
    InvalidFieldType {
        scheme: &'static str,
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A name that is not a declared field of the scheme
    #[error("{scheme}: unknown field '{field}'")]
    UnknownField { scheme: &'static str, field: String },

    /// A registry entry was requested with a different scheme than declared
    #[error("Table '{table}' holds '{declared}' records, not '{requested}'")]
    SchemeMismatch {
        table: &'static str,
        declared: &'static str,
        requested: &'static str,
    },

    /// A scheme rejected its field values
    #[error("{scheme}: {message}")]
    Invalid {
        scheme: &'static str,
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(String),
}

impl Error {
    /// Validation failure raised from a scheme's `preprocess` hook
    pub fn invalid<S: Into<String>>(scheme: &'static str, message: S) -> Self {
        Error::Invalid {
            scheme,
            message: message.into(),
        }
    }
}
