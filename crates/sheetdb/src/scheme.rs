//! Typed record definitions
//!
//! A [`Scheme`] is a Rust type whose fields map one-to-one onto worksheet
//! columns. Field names are declared up front in [`Scheme::FIELDS`]; the
//! table layer uses that list to drop unmapped columns on read and to project
//! values into header order on write.
//!
//! Every scheme carries `created_at` / `updated_at` ([`Timestamps`]) and names
//! one field as its primary key. Keys are expected to be unique within a
//! table, but nothing enforces it.
//!
//! ```rust
//! use sheetdb::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Member {
//!     stamps: Timestamps,
//!     primary_key: String,
//!     age: i64,
//! }
//!
//! impl Scheme for Member {
//!     const NAME: &'static str = "member";
//!     const FIELDS: &'static [&'static str] = &["created_at", "updated_at", "primary_key", "age"];
//!
//!     fn build(fields: &Fields) -> Result<Self> {
//!         Ok(Self {
//!             stamps: fields.timestamps()?,
//!             primary_key: fields.get("primary_key")?,
//!             age: fields.get("age")?,
//!         })
//!     }
//!
//!     fn field_value(&self, name: &str) -> Option<Cell> {
//!         match name {
//!             "primary_key" => Some(self.primary_key.clone().into()),
//!             "age" => Some(self.age.into()),
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
//! let m = Member::construct([("primary_key", Cell::from("ann")), ("age", Cell::from(31))]).unwrap();
//! assert_eq!(m.primary_key_value(), Cell::from("ann"));
//! assert_eq!(m.as_row_for(&["age", "primary_key"]).unwrap(), vec![Cell::Int(31), Cell::from("ann")]);
//! ```

use std::fmt;

use chrono::Utc;
use sheetdb_core::serial::{self, TimeValue};
use sheetdb_core::{Cell, FromCell, Record};

use crate::error::{Error, Result};

/// Name of the creation timestamp column
pub const CREATED_AT: &str = "created_at";

/// Name of the last-update timestamp column
pub const UPDATED_AT: &str = "updated_at";

/// Default pattern for [`TimestampFormat::Formatted`]
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// How a scheme stores its timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    /// Spreadsheet serial numbers
    #[default]
    Serial,
    /// Text rendered with a `chrono` format pattern (UTC)
    Formatted(&'static str),
}

impl TimestampFormat {
    /// The current time in this representation
    pub fn now(self) -> Timestamp {
        match self {
            TimestampFormat::Serial => Timestamp::Serial(serial::now()),
            TimestampFormat::Formatted(pattern) => {
                Timestamp::Formatted(Utc::now().format(pattern).to_string())
            }
        }
    }
}

/// A stored point in time
#[derive(Debug, Clone, PartialEq)]
pub enum Timestamp {
    /// Days since 1899-12-30
    Serial(f64),
    /// Preformatted date-time text
    Formatted(String),
}

impl Timestamp {
    /// Serial timestamp from a serial number, Unix seconds or a datetime
    ///
    /// See [`serial::normalize`] for how the input is told apart.
    pub fn serial<V: Into<TimeValue>>(value: V) -> Self {
        Timestamp::Serial(serial::normalize(value))
    }

    /// Read a timestamp back from a cell
    ///
    /// Sheets do not keep integers and floats apart, so every numeric cell
    /// goes through the float rule: small values are serial numbers, values
    /// above the Unix threshold are epoch seconds. Blank cells give `None`.
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Int(n) => Some(Timestamp::serial(*n as f64)),
            Cell::Number(n) => Some(Timestamp::serial(*n)),
            Cell::String(s) if !s.is_empty() => Some(Timestamp::Formatted(s.clone())),
            _ => None,
        }
    }

    /// The cell written for this timestamp
    pub fn to_cell(&self) -> Cell {
        match self {
            Timestamp::Serial(n) => Cell::Number(*n),
            Timestamp::Formatted(s) => Cell::string(s.as_str()),
        }
    }

    /// The serial number, for serial timestamps
    pub fn as_serial(&self) -> Option<f64> {
        match self {
            Timestamp::Serial(n) => Some(*n),
            Timestamp::Formatted(_) => None,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Serial(n) => write!(f, "{}", n),
            Timestamp::Formatted(s) => f.write_str(s),
        }
    }
}

/// Creation and last-update times of a record
///
/// `created_at` is fixed once constructed; `updated_at` only moves through
/// [`Timestamps::refresh`].
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamps {
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Timestamps {
    /// Both timestamps set to the same instant
    pub fn now(format: TimestampFormat) -> Self {
        let now = format.now();
        Self {
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Explicit timestamps
    pub fn new(created_at: Timestamp, updated_at: Timestamp) -> Self {
        Self {
            created_at,
            updated_at,
        }
    }

    /// When the record was created
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// When the record was last refreshed
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Set `updated_at` to now
    pub fn refresh(&mut self, format: TimestampFormat) {
        self.updated_at = format.now();
    }
}

/// Declared field values handed to [`Scheme::build`]
///
/// Only declared columns ever reach a `Fields`; unknown columns are dropped
/// (on parse) or rejected (on construct) before it is built.
#[derive(Debug, Clone)]
pub struct Fields {
    scheme: &'static str,
    values: Record,
    format: TimestampFormat,
}

impl Fields {
    fn new(scheme: &'static str, values: Record, format: TimestampFormat) -> Self {
        Self {
            scheme,
            values,
            format,
        }
    }

    /// Raw cell for a field, if present
    pub fn cell(&self, name: &str) -> Option<&Cell> {
        self.values.get(name)
    }

    /// Typed value of a field
    ///
    /// An absent column is an error unless `T` has a missing value (`Option`
    /// and `Cell` do).
    pub fn get<T: FromCell>(&self, name: &str) -> Result<T> {
        match self.values.get(name) {
            Some(cell) => T::from_cell(cell).ok_or_else(|| Error::InvalidFieldType {
                scheme: self.scheme,
                field: name.to_string(),
                expected: T::EXPECTED,
                actual: cell.type_name(),
            }),
            None => T::missing().ok_or_else(|| Error::MissingField {
                scheme: self.scheme,
                field: name.to_string(),
            }),
        }
    }

    /// Typed value of a field, `T::default()` when absent or blank
    pub fn get_or_default<T: FromCell + Default>(&self, name: &str) -> Result<T> {
        match self.values.get(name) {
            Some(cell) if !cell.is_blank() => self.get(name),
            _ => Ok(T::default()),
        }
    }

    /// `created_at` / `updated_at`, defaulting unset ones to now
    pub fn timestamps(&self) -> Result<Timestamps> {
        let now = self.format.now();
        let created_at = self.timestamp(CREATED_AT)?.unwrap_or_else(|| now.clone());
        let updated_at = self.timestamp(UPDATED_AT)?.unwrap_or(now);
        Ok(Timestamps::new(created_at, updated_at))
    }

    fn timestamp(&self, name: &str) -> Result<Option<Timestamp>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(cell) if cell.is_blank() => Ok(None),
            Some(cell) => Timestamp::from_cell(cell)
                .map(Some)
                .ok_or_else(|| Error::InvalidFieldType {
                    scheme: self.scheme,
                    field: name.to_string(),
                    expected: "timestamp",
                    actual: cell.type_name(),
                }),
        }
    }
}

/// A typed record bound to worksheet columns
pub trait Scheme: Clone + fmt::Debug + PartialEq + Sized {
    /// Scheme name, used in errors, logs and registry checks
    const NAME: &'static str;

    /// Every column, in declaration order, including `created_at` and `updated_at`
    const FIELDS: &'static [&'static str];

    /// Field holding the primary key
    const PRIMARY_KEY: &'static str = "primary_key";

    /// Columns the backend must return verbatim instead of retyping
    const RAW_FIELDS: &'static [&'static str] = &[];

    /// Representation of `created_at` / `updated_at`
    const TIMESTAMP_FORMAT: TimestampFormat = TimestampFormat::Serial;

    /// Build a value from declared fields
    fn build(fields: &Fields) -> Result<Self>;

    /// Current value of a domain field (timestamps are handled by [`Scheme::get`])
    fn field_value(&self, name: &str) -> Option<Cell>;

    /// The record's timestamps
    fn timestamps(&self) -> &Timestamps;

    /// Mutable access to the record's timestamps
    fn timestamps_mut(&mut self) -> &mut Timestamps;

    /// Normalization run after every construction
    fn preprocess(&mut self) -> Result<()> {
        Ok(())
    }

    /// Value of any declared field, `None` for undeclared names
    fn get(&self, name: &str) -> Option<Cell> {
        if !Self::FIELDS.contains(&name) {
            return None;
        }
        match name {
            CREATED_AT => Some(self.timestamps().created_at().to_cell()),
            UPDATED_AT => Some(self.timestamps().updated_at().to_cell()),
            _ => self.field_value(name),
        }
    }

    /// Value of the primary-key field
    fn primary_key_value(&self) -> Cell {
        self.get(Self::PRIMARY_KEY).unwrap_or_default()
    }

    /// All fields in declaration order
    fn as_row(&self) -> Vec<Cell> {
        Self::FIELDS
            .iter()
            .map(|name| self.get(name).unwrap_or_default())
            .collect()
    }

    /// The named fields in the given order
    ///
    /// Used to write into a sheet whose header order differs from the
    /// declaration order, or that holds only some of the fields.
    fn as_row_for<C: AsRef<str>>(&self, columns: &[C]) -> Result<Vec<Cell>> {
        columns
            .iter()
            .map(|column| {
                let column = column.as_ref();
                self.get(column).ok_or_else(|| Error::UnknownField {
                    scheme: Self::NAME,
                    field: column.to_string(),
                })
            })
            .collect()
    }

    /// All fields as a record, in declaration order
    fn to_record(&self) -> Record {
        Record::from_row(Self::FIELDS, &self.as_row())
    }

    /// Build from a raw record, ignoring columns that are not declared fields
    fn parse(raw: &Record) -> Result<Self> {
        let values = raw
            .iter()
            .filter(|(name, _)| Self::FIELDS.contains(name))
            .map(|(name, value)| (name, value.clone()))
            .collect();
        Self::from_fields(values)
    }

    /// Build from `(field, value)` pairs, rejecting undeclared names
    ///
    /// Unset timestamps default to now.
    fn construct<'a, I, V>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Into<Cell>,
    {
        let mut record = Record::new();
        for (name, value) in values {
            if !Self::FIELDS.contains(&name) {
                return Err(Error::UnknownField {
                    scheme: Self::NAME,
                    field: name.to_string(),
                });
            }
            record.insert(name, value);
        }
        Self::from_fields(record)
    }

    /// Run [`Scheme::build`] then [`Scheme::preprocess`]
    fn from_fields(values: Record) -> Result<Self> {
        let fields = Fields::new(Self::NAME, values, Self::TIMESTAMP_FORMAT);
        let mut value = Self::build(&fields)?;
        value.preprocess()?;
        Ok(value)
    }

    /// Set `updated_at` to now, leaving `created_at` untouched
    fn refresh_updated_at(&mut self) {
        self.timestamps_mut().refresh(Self::TIMESTAMP_FORMAT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        stamps: Timestamps,
        primary_key: i64,
        body: String,
        pinned: Option<bool>,
    }

    impl Scheme for Note {
        const NAME: &'static str = "note";
        const FIELDS: &'static [&'static str] =
            &["created_at", "updated_at", "primary_key", "body", "pinned"];

        fn build(fields: &Fields) -> Result<Self> {
            Ok(Self {
                stamps: fields.timestamps()?,
                primary_key: fields.get("primary_key")?,
                body: fields.get_or_default("body")?,
                pinned: fields.get("pinned")?,
            })
        }

        fn field_value(&self, name: &str) -> Option<Cell> {
            match name {
                "primary_key" => Some(self.primary_key.into()),
                "body" => Some(self.body.clone().into()),
                "pinned" => Some(self.pinned.into()),
                _ => None,
            }
        }

        fn timestamps(&self) -> &Timestamps {
            &self.stamps
        }

        fn timestamps_mut(&mut self) -> &mut Timestamps {
            &mut self.stamps
        }

        fn preprocess(&mut self) -> Result<()> {
            self.body = self.body.trim().to_string();
            if self.primary_key < 0 {
                return Err(Error::invalid(Self::NAME, "primary_key must not be negative"));
            }
            Ok(())
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Stamped {
        stamps: Timestamps,
        code: String,
    }

    impl Scheme for Stamped {
        const NAME: &'static str = "stamped";
        const FIELDS: &'static [&'static str] = &["created_at", "updated_at", "code"];
        const PRIMARY_KEY: &'static str = "code";
        const TIMESTAMP_FORMAT: TimestampFormat =
            TimestampFormat::Formatted(DEFAULT_DATETIME_FORMAT);

        fn build(fields: &Fields) -> Result<Self> {
            Ok(Self {
                stamps: fields.timestamps()?,
                code: fields.get("code")?,
            })
        }

        fn field_value(&self, name: &str) -> Option<Cell> {
            (name == "code").then(|| self.code.clone().into())
        }

        fn timestamps(&self) -> &Timestamps {
            &self.stamps
        }

        fn timestamps_mut(&mut self) -> &mut Timestamps {
            &mut self.stamps
        }
    }

    fn note(id: i64, body: &str) -> Note {
        Note::construct([("primary_key", Cell::from(id)), ("body", Cell::from(body))]).unwrap()
    }

    #[test]
    fn test_construct_defaults_timestamps() {
        let n = note(1, "hello");
        assert!(matches!(n.timestamps().created_at(), Timestamp::Serial(_)));
        assert_eq!(n.timestamps().created_at(), n.timestamps().updated_at());
        assert_eq!(n.pinned, None);
    }

    #[test]
    fn test_construct_rejects_unknown_field() {
        let err = Note::construct([("primary_key", Cell::Int(1)), ("colour", Cell::from("red"))])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownField { ref field, .. } if field == "colour"));
    }

    #[test]
    fn test_preprocess_runs_after_build() {
        assert_eq!(note(1, "  padded  ").body, "padded");

        let err = Note::construct([("primary_key", Cell::Int(-1))]).unwrap_err();
        assert!(matches!(err, Error::Invalid { .. }));
    }

    #[test]
    fn test_primary_key_indirection() {
        assert_eq!(note(7, "x").primary_key_value(), Cell::Int(7));

        let s = Stamped::construct([("code", "A-1")]).unwrap();
        assert_eq!(s.primary_key_value(), Cell::from("A-1"));
    }

    #[test]
    fn test_as_row_declaration_order() {
        let n = note(3, "body");
        let row = n.as_row();
        assert_eq!(row.len(), Note::FIELDS.len());
        assert_eq!(row[2..], [Cell::Int(3), Cell::from("body"), Cell::Empty]);
    }

    #[test]
    fn test_as_row_for_projection() {
        let n = note(3, "body");
        assert_eq!(
            n.as_row_for(&["body", "primary_key"]).unwrap(),
            vec![Cell::from("body"), Cell::Int(3)]
        );

        let err = n.as_row_for(&["body", "extra"]).unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn test_parse_drops_unknown_columns() {
        let raw = Record::new()
            .with("primary_key", 9)
            .with("body", "kept")
            .with("unmapped", "dropped")
            .with("created_at", 45000.5)
            .with("updated_at", 45001.25);

        let n = Note::parse(&raw).unwrap();
        assert_eq!(n.primary_key, 9);
        assert_eq!(n.timestamps().created_at(), &Timestamp::Serial(45000.5));
        assert_eq!(n.timestamps().updated_at(), &Timestamp::Serial(45001.25));
    }

    #[test]
    fn test_parse_missing_required_field() {
        let raw = Record::new().with("body", "no key");
        let err = Note::parse(&raw).unwrap_err();
        assert!(matches!(err, Error::MissingField { ref field, .. } if field == "primary_key"));
    }

    #[test]
    fn test_parse_wrong_type() {
        let raw = Record::new().with("primary_key", "abc");
        let err = Note::parse(&raw).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidFieldType {
                expected: "integer",
                actual: "string",
                ..
            }
        ));
    }

    #[test]
    fn test_round_trip_through_header() {
        let original = note(4, "round trip");
        let header = ["body", "updated_at", "primary_key", "created_at", "pinned"];
        let row = original.as_row_for(&header).unwrap();

        let parsed = Note::parse(&Record::from_row(&header, &row)).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_refresh_updated_at_keeps_created_at() {
        let raw = Record::new()
            .with("primary_key", 1)
            .with("created_at", 100.0)
            .with("updated_at", 100.0);
        let mut n = Note::parse(&raw).unwrap();
        n.refresh_updated_at();

        assert_eq!(n.timestamps().created_at(), &Timestamp::Serial(100.0));
        assert!(n.timestamps().updated_at().as_serial().unwrap() > 40000.0);
    }

    #[test]
    fn test_formatted_timestamps() {
        let s = Stamped::construct([("code", "A-1")]).unwrap();
        let Timestamp::Formatted(text) = s.timestamps().created_at() else {
            panic!("expected formatted timestamp");
        };
        assert!(chrono::NaiveDateTime::parse_from_str(text, DEFAULT_DATETIME_FORMAT).is_ok());
        assert_eq!(s.get("created_at"), Some(Cell::string(text.as_str())));
    }

    #[test]
    fn test_unix_seconds_in_timestamp_columns() {
        let raw = Record::new()
            .with("primary_key", 1)
            .with("created_at", 1_700_000_000_i64);
        let n = Note::parse(&raw).unwrap();
        assert_eq!(
            n.timestamps().created_at(),
            &Timestamp::Serial(serial::normalize(1_700_000_000_i64))
        );
    }

    #[test]
    fn test_get_rejects_undeclared() {
        let n = note(1, "x");
        assert_eq!(n.get("nope"), None);
        assert!(n.get("created_at").is_some());
    }
}
