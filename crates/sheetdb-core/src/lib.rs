//! # sheetdb-core
//!
//! Core value types for the sheetdb record store.
//!
//! This crate provides the types shared by the table layer and the worksheet
//! backends:
//! - [`Cell`] - A scalar cell value (string, integer, number, boolean, empty)
//! - [`Record`] - A data row keyed by its header row
//! - [`CellAddress`] - A1-style addressing for block writes
//! - [`serial`] - Conversion between timestamps and spreadsheet serial numbers
//!
//! ## Example
//!
//! ```rust
//! use sheetdb_core::{serial, Cell, Record};
//!
//! let record = Record::from_row(&["id", "score"], &[Cell::from("a1"), Cell::infer("9.5")]);
//! assert_eq!(record.get("score"), Some(&Cell::Number(9.5)));
//!
//! // Unix seconds and serial numbers are told apart by magnitude
//! assert_eq!(serial::normalize(0.5), 0.5);
//! assert_eq!(serial::normalize(0_i64), 25569.0);
//! ```

pub mod cell;
pub mod error;
pub mod serial;

pub use cell::{Cell, CellAddress, FromCell, Record};
pub use error::{Error, Result};

/// Maximum number of rows in a worksheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet
pub const MAX_COLS: u16 = 16_384;
