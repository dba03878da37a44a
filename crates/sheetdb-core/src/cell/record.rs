//! Raw records: one data row keyed by the header row

use std::collections::BTreeSet;

use super::Cell;

/// One worksheet row as an ordered column name → [`Cell`] mapping
///
/// Column order follows the header the row was read against. Inserting an
/// existing column replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Cell)>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Zip a header with a data row
    ///
    /// Rows shorter than the header are padded with [`Cell::Empty`]; extra
    /// cells beyond the header are dropped.
    pub fn from_row<S: AsRef<str>>(header: &[S], row: &[Cell]) -> Self {
        let entries = header
            .iter()
            .enumerate()
            .map(|(i, name)| {
                (
                    name.as_ref().to_string(),
                    row.get(i).cloned().unwrap_or_default(),
                )
            })
            .collect();
        Self { entries }
    }

    /// Get a value by column name
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Check whether a column is present
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Set a column value, replacing an existing one or appending a new column
    pub fn insert<S: Into<String>, V: Into<Cell>>(&mut self, column: S, value: V) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Builder-style [`Record::insert`]
    pub fn with<S: Into<String>, V: Into<Cell>>(mut self, column: S, value: V) -> Self {
        self.insert(column, value);
        self
    }

    /// Keep only the named columns, preserving order
    pub fn retain_columns(&mut self, columns: &BTreeSet<String>) {
        self.entries.retain(|(name, _)| columns.contains(name));
    }

    /// Column names in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Values in column order
    pub fn values(&self) -> impl Iterator<Item = &Cell> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Iterate over `(column, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the record has no columns
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if every cell is blank (a gap row inside a table)
    pub fn is_blank(&self) -> bool {
        self.entries.iter().all(|(_, value)| value.is_blank())
    }
}

impl<S: Into<String>, V: Into<Cell>> FromIterator<(S, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Cell);
    type IntoIter = std::vec::IntoIter<(String, Cell)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
