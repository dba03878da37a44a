//! Prelude module - common imports for sheetdb users
//!
//! ```rust
//! use sheetdb::prelude::*;
//! ```

pub use crate::{
    // Backend contract
    backend::{Connector, Document, Worksheet},
    // Registry
    Catalog,
    // Values
    Cell,
    // Error types
    Error,
    Fields,
    Match,
    Query,
    ReadFailurePolicy,
    Record,
    Registry,
    Result,
    // Schemes
    Scheme,
    Sheet,
    // Tables
    Table,
    TableOptions,
    Timestamp,
    TimestampFormat,
    Timestamps,
};
