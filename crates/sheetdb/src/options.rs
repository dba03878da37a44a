//! Table options

use crate::backend::BackendError;

/// What a table does when the backend fails to return its rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadFailurePolicy {
    /// Fetch failures read as an empty table; other failures propagate
    #[default]
    TreatAsEmpty,
    /// Every failure propagates
    Propagate,
}

impl ReadFailurePolicy {
    /// Whether `err` is swallowed (the table reads as empty) under this policy
    ///
    /// Only failures to fetch at all qualify; a sheet that was fetched and
    /// holds an unusable header is always an error.
    pub fn suppresses(self, err: &BackendError) -> bool {
        match self {
            ReadFailurePolicy::TreatAsEmpty => err.kind().is_fetch_failure(),
            ReadFailurePolicy::Propagate => false,
        }
    }
}

/// Options for binding a table to a worksheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// 1-based row holding the column names (default: 1)
    pub header_row: u32,
    /// Handling of failed reads (default: treat as empty)
    pub read_failure: ReadFailurePolicy,
}

impl TableOptions {
    /// Header row, never above the sheet's first row
    pub(crate) fn header_row_number(&self) -> u32 {
        self.header_row.max(1)
    }
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            header_row: 1,
            read_failure: ReadFailurePolicy::TreatAsEmpty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendErrorKind;

    #[test]
    fn test_policy_classification() {
        let transient = BackendError::unavailable("503");
        let bad_header = BackendError::new(BackendErrorKind::InvalidHeader, "dup");

        assert!(ReadFailurePolicy::TreatAsEmpty.suppresses(&transient));
        assert!(!ReadFailurePolicy::TreatAsEmpty.suppresses(&bad_header));
        assert!(!ReadFailurePolicy::Propagate.suppresses(&transient));
    }

    #[test]
    fn test_header_row_floor() {
        let options = TableOptions {
            header_row: 0,
            ..TableOptions::default()
        };
        assert_eq!(options.header_row_number(), 1);
    }
}
