//! # sheetdb-csv
//!
//! CSV backend for sheetdb.
//!
//! A document is a directory under the connector root, named by the document
//! id; each worksheet is one `<title>.csv` file inside it. Every call reads or
//! rewrites the whole file, so edits made by other tools between calls are
//! picked up.
//!
//! ```rust
//! use sheetdb::backend::{Connector, Document, Worksheet};
//! use sheetdb_csv::{CsvConnector, CsvOptions};
//!
//! let root = tempfile::tempdir().unwrap();
//! let options = CsvOptions {
//!     create_missing: true,
//!     ..CsvOptions::default()
//! };
//! let connector = CsvConnector::new(root.path(), options);
//!
//! let document = connector.open_document("inventory").unwrap();
//! let sheet = document.worksheet("Items").unwrap();
//! assert!(sheet.read_header(1).unwrap().is_empty());
//! assert!(root.path().join("inventory").join("Items.csv").exists());
//! ```

mod connector;
mod error;
mod file;
mod options;
mod worksheet;

pub use connector::{CsvConnector, CsvDocument};
pub use error::{CsvError, CsvResult};
pub use file::{read_grid, write_grid};
pub use options::{CsvOptions, LineTerminator};
pub use worksheet::CsvWorksheet;
