//! Cell-related types
//!
//! This module contains:
//! - [`Cell`] - The scalar value stored in a cell
//! - [`Record`] - One row keyed by its header
//! - [`CellAddress`] - A cell's location (e.g., "A1")

mod address;
mod record;
mod value;

pub use address::CellAddress;
pub use record::Record;
pub use value::{Cell, FromCell};
