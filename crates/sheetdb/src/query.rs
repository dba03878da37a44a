//! Field filters for [`Table::find`](crate::Table::find)

use std::collections::BTreeMap;

use sheetdb_core::{Cell, Record};

/// Condition on a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Match {
    /// Field equals the value
    Eq(Cell),
    /// Field equals any of the values
    OneOf(Vec<Cell>),
}

impl Match {
    /// Check a field value against this condition
    pub fn matches(&self, value: &Cell) -> bool {
        match self {
            Match::Eq(expected) => value == expected,
            Match::OneOf(options) => options.iter().any(|option| value == option),
        }
    }
}

/// Conjunction of field conditions
///
/// An empty query matches every record.
///
/// ```rust
/// use sheetdb::Query;
///
/// let query = Query::new().equals("status", "open").one_of("priority", [1, 2]);
/// assert_eq!(query.len(), 2);
/// assert!(query.fields().eq(["priority", "status"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    conditions: BTreeMap<String, Match>,
}

impl Query {
    /// Empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    pub fn equals<S: Into<String>, V: Into<Cell>>(self, field: S, value: V) -> Self {
        self.with(field, Match::Eq(value.into()))
    }

    /// Require `field` to equal one of `values`
    pub fn one_of<S, I, V>(self, field: S, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Cell>,
    {
        self.with(field, Match::OneOf(values.into_iter().map(Into::into).collect()))
    }

    /// Add a condition, replacing any earlier one on the same field
    pub fn with<S: Into<String>>(mut self, field: S, condition: Match) -> Self {
        self.conditions.insert(field.into(), condition);
        self
    }

    /// Field names the query constrains
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }

    /// Number of conditions
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Check if the query has no conditions
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Check every condition against a record
    ///
    /// A field the record lacks compares as [`Cell::Empty`].
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_with(|field| record.get(field).cloned().unwrap_or_default())
    }

    /// Check every condition against values looked up by field name
    pub fn matches_with<F: Fn(&str) -> Cell>(&self, lookup: F) -> bool {
        self.conditions
            .iter()
            .all(|(field, condition)| condition.matches(&lookup(field)))
    }
}

/// Equality conditions from `(field, value)` pairs
impl<S: Into<String>, V: Into<Cell>> FromIterator<(S, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Query::new(), |query, (field, value)| query.equals(field, value))
    }
}
