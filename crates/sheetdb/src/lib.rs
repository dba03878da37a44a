//! # sheetdb
//!
//! A typed record store on top of spreadsheet worksheets.
//!
//! Each worksheet is a table: the header row names the columns and every row
//! below it is one record. A [`Scheme`] maps those columns onto a Rust type,
//! and a [`Table`] provides lookups, filtered scans and writes over it.
//!
//! ## Features
//!
//! - Typed records with `created_at` / `updated_at` kept as spreadsheet
//!   serial numbers (or formatted text)
//! - Linear-scan `get` and `find`, always against the live sheet
//! - Whole-sheet overwrite, single-row update and append
//! - YAML export of raw rows
//! - A [`Registry`] that opens each document and worksheet once
//! - Pluggable backends: in-memory here, CSV directories in `sheetdb-csv`
//!
//! ## Example
//!
//! ```rust
//! use sheetdb::backend::memory::MemoryWorksheet;
//! use sheetdb::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Task {
//!     stamps: Timestamps,
//!     primary_key: i64,
//!     title: String,
//!     done: bool,
//! }
//!
//! impl Scheme for Task {
//!     const NAME: &'static str = "task";
//!     const FIELDS: &'static [&'static str] =
//!         &["created_at", "updated_at", "primary_key", "title", "done"];
//!
//!     fn build(fields: &Fields) -> Result<Self> {
//!         Ok(Self {
//!             stamps: fields.timestamps()?,
//!             primary_key: fields.get("primary_key")?,
//!             title: fields.get("title")?,
//!             done: fields.get_or_default("done")?,
//!         })
//!     }
//!
//!     fn field_value(&self, name: &str) -> Option<Cell> {
//!         match name {
//!             "primary_key" => Some(self.primary_key.into()),
//!             "title" => Some(self.title.clone().into()),
//!             "done" => Some(self.done.into()),
//!             _ => None,
//!         }
//!     }
//!
//!     fn timestamps(&self) -> &Timestamps {
//!         &self.stamps
//!     }
//!
//!     fn timestamps_mut(&mut self) -> &mut Timestamps {
//!         &mut self.stamps
//!     }
//! }
//!
//! let sheet = MemoryWorksheet::new("Tasks", Vec::new());
//! let tasks: Table<Task, _> = Table::new("tasks", sheet);
//!
//! let write = Task::construct([("primary_key", Cell::from(1)), ("title", Cell::from("write docs"))])?;
//! let test = Task::construct([("primary_key", Cell::from(2)), ("title", Cell::from("test"))])?;
//! tasks.append(&[write, test])?;
//!
//! let mut task = tasks.get(2)?.expect("task 2 exists");
//! task.done = true;
//! task.refresh_updated_at();
//! assert!(tasks.update_one(&task)?);
//!
//! let open: Vec<Task> = tasks
//!     .find(&Query::new().equals("done", false))?
//!     .collect::<Result<_>>()?;
//! assert_eq!(open.len(), 1);
//! assert_eq!(open[0].title, "write docs");
//! # Ok::<(), sheetdb::Error>(())
//! ```

pub mod backend;
pub mod error;
pub mod export;
pub mod options;
pub mod prelude;
pub mod query;
pub mod registry;
pub mod scheme;
pub mod sheet;
pub mod table;

pub use error::{Error, Result};
pub use options::{ReadFailurePolicy, TableOptions};
pub use query::{Match, Query};
pub use registry::{Catalog, Registry};
pub use scheme::{
    Fields, Scheme, Timestamp, TimestampFormat, Timestamps, CREATED_AT, DEFAULT_DATETIME_FORMAT,
    UPDATED_AT,
};
pub use sheet::Sheet;
pub use table::Table;

// Re-export core types
pub use sheetdb_core::{serial, Cell, CellAddress, FromCell, Record};
