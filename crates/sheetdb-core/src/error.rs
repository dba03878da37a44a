//! Error types for sheetdb-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Time conversion failures
#[derive(Debug, Error)]
pub enum Error {
    /// Serial number that cannot be turned into a calendar timestamp
    #[error("Serial number {0} is outside the representable date range")]
    SerialOutOfRange(f64),

    /// Unix timestamp that cannot be turned into a calendar timestamp
    #[error("Unix timestamp {0} is outside the representable date range")]
    TimestampOutOfRange(i64),
}
