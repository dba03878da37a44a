//! Worksheet backend contract
//!
//! The table layer never talks to a spreadsheet service directly. It goes
//! through three traits:
//!
//! - [`Connector`] opens a document by id (credentials are the connector's
//!   business)
//! - [`Document`] resolves worksheet titles to handles
//! - [`Worksheet`] exposes the five primitives tables are built on: read rows
//!   keyed by a header, read the header, clear, write a block at a cell and
//!   append after the table range
//!
//! Handles are cheap to clone and share the underlying sheet, the way a
//! remote handle would. Timeouts and retries belong to implementations.

mod grid;
pub mod memory;

use std::fmt;

use sheetdb_core::{Cell, CellAddress, Record};
use thiserror::Error;

pub use grid::Grid;

/// Result type for backend calls
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Broad classes of backend failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendErrorKind {
    /// The service could not be reached or refused the request for now
    Unavailable,
    /// Local I/O failed
    Io,
    /// Document or worksheet does not exist
    NotFound,
    /// Header row cannot key records (duplicate column names)
    InvalidHeader,
    /// Stored data could not be decoded
    Malformed,
    /// A write addressed cells outside the sheet
    InvalidRange,
}

impl BackendErrorKind {
    /// Failures to fetch data at all, as opposed to data that was fetched and is bad
    pub fn is_fetch_failure(self) -> bool {
        matches!(
            self,
            BackendErrorKind::Unavailable | BackendErrorKind::Io | BackendErrorKind::NotFound
        )
    }
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendErrorKind::Unavailable => "unavailable",
            BackendErrorKind::Io => "I/O failure",
            BackendErrorKind::NotFound => "not found",
            BackendErrorKind::InvalidHeader => "invalid header",
            BackendErrorKind::Malformed => "malformed data",
            BackendErrorKind::InvalidRange => "invalid range",
        };
        f.write_str(name)
    }
}

/// Error raised by a backend implementation
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    kind: BackendErrorKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl BackendError {
    /// Create an error of the given kind
    pub fn new<S: Into<String>>(kind: BackendErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying cause
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Worksheet or document lookup miss
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::new(BackendErrorKind::NotFound, what)
    }

    /// Service temporarily unreachable
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::new(BackendErrorKind::Unavailable, message)
    }

    /// The failure class
    pub fn kind(&self) -> BackendErrorKind {
        self.kind
    }

    /// Human-readable detail
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => BackendErrorKind::NotFound,
            _ => BackendErrorKind::Io,
        };
        BackendError::new(kind, err.to_string()).with_source(err)
    }
}

/// One worksheet of an opened document
pub trait Worksheet: Clone {
    /// Worksheet title within its document
    fn title(&self) -> &str;

    /// Read every data row below `header_row` (1-based), keyed by that row
    ///
    /// Cell text is typed the way a spreadsheet types user input, except in
    /// the columns named in `type_hints`, which are returned verbatim. A sheet
    /// without a header returns no rows.
    fn read_rows(&self, header_row: u32, type_hints: &[&str]) -> BackendResult<Vec<Record>>;

    /// The given 1-based row as text, trailing blank cells trimmed
    fn read_header(&self, row: u32) -> BackendResult<Vec<String>>;

    /// Remove all cell content
    fn clear(&self) -> BackendResult<()>;

    /// Overwrite a rectangular block whose top-left corner is `top_left`
    ///
    /// Values are stored as given, without reinterpretation.
    fn write_block(&self, top_left: CellAddress, rows: &[Vec<Cell>]) -> BackendResult<()>;

    /// Append rows below the populated table that contains `table_range`
    ///
    /// Values are interpreted as user-entered: numeric-looking strings become
    /// numbers.
    fn append_rows(&self, rows: &[Vec<Cell>], table_range: CellAddress) -> BackendResult<()>;
}

/// An opened spreadsheet document
pub trait Document {
    /// Worksheet handle type
    type Worksheet: Worksheet;

    /// The id this document was opened with
    fn id(&self) -> &str;

    /// Resolve a worksheet by title
    fn worksheet(&self, title: &str) -> BackendResult<Self::Worksheet>;

    /// Titles of all worksheets, in document order
    fn worksheet_titles(&self) -> BackendResult<Vec<String>>;
}

/// Opens documents by id
pub trait Connector {
    /// Document handle type
    type Document: Document;

    /// Open a document
    fn open_document(&self, id: &str) -> BackendResult<Self::Document>;
}

/// Worksheet handle type reachable through a connector
pub type WorksheetOf<C> = <<C as Connector>::Document as Document>::Worksheet;
