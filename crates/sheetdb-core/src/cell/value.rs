//! Cell value types

use std::fmt;

/// A scalar value stored in one worksheet cell
///
/// Spreadsheets do not distinguish integers from floats, so equality treats
/// `Int(3)` and `Number(3.0)` as the same value.
#[derive(Debug, Clone, Default)]
pub enum Cell {
    /// Empty cell (no value)
    #[default]
    Empty,

    /// Boolean value (TRUE/FALSE)
    Bool(bool),

    /// Whole number
    Int(i64),

    /// Floating-point number (including serial dates)
    Number(f64),

    /// String value
    String(String),
}

impl Cell {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        Cell::String(s.into())
    }

    /// Best-effort typing of raw cell text
    ///
    /// This is what a spreadsheet does with user-entered text: `TRUE`/`FALSE`
    /// become booleans, integer-looking text becomes `Int`, decimal text becomes
    /// `Number`, blank text becomes `Empty` and everything else stays a string.
    pub fn infer(text: &str) -> Self {
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Cell::Empty;
        }

        if trimmed.eq_ignore_ascii_case("true") {
            return Cell::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Cell::Bool(false);
        }

        // `f64::from_str` also accepts "inf" and "NaN"; those stay text
        if !trimmed.bytes().any(|b| b.is_ascii_digit()) {
            return Cell::String(text.to_string());
        }

        if let Ok(n) = trimmed.parse::<i64>() {
            return Cell::Int(n);
        }

        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::String(text.to_string()),
        }
    }

    /// Re-type a cell the way a user-entered write would
    ///
    /// Strings go through [`Cell::infer`]; every other variant is already typed.
    pub fn interpret(self) -> Self {
        match self {
            Cell::String(s) => Cell::infer(&s),
            other => other,
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Check if the cell shows nothing: empty, or an empty string
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Int(n) => Some(*n as f64),
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a whole number
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(n) => Some(*n),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Some(*n as i64),
            _ => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Cell::Empty => "empty",
            Cell::Bool(_) => "boolean",
            Cell::Int(_) => "integer",
            Cell::Number(_) => "number",
            Cell::String(_) => "string",
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Empty, Cell::Empty) => true,
            (Cell::Bool(a), Cell::Bool(b)) => a == b,
            (Cell::Int(a), Cell::Int(b)) => a == b,
            (Cell::Number(a), Cell::Number(b)) => a == b,
            (Cell::Int(a), Cell::Number(b)) | (Cell::Number(b), Cell::Int(a)) => *a as f64 == *b,
            (Cell::String(a), Cell::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Cell::Int(n) => write!(f, "{}", n),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<i32> for Cell {
    fn from(n: i32) -> Self {
        Cell::Int(n as i64)
    }
}

impl From<u32> for Cell {
    fn from(n: u32) -> Self {
        Cell::Int(n as i64)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Int(n)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::string(s)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::String(s)
    }
}

impl From<&String> for Cell {
    fn from(s: &String) -> Self {
        Cell::String(s.clone())
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// Typed extraction of a field value from a [`Cell`]
///
/// Conversions are lenient in the direction backends are lenient: numbers
/// read back into `String` fields are formatted, and numeric text read into
/// numeric fields is parsed.
pub trait FromCell: Sized {
    /// Type name used in error messages
    const EXPECTED: &'static str;

    /// Convert a present cell, `None` if the value has the wrong type
    fn from_cell(cell: &Cell) -> Option<Self>;

    /// Value to use when the column is absent altogether
    fn missing() -> Option<Self> {
        None
    }
}

impl FromCell for Cell {
    const EXPECTED: &'static str = "cell";

    fn from_cell(cell: &Cell) -> Option<Self> {
        Some(cell.clone())
    }

    fn missing() -> Option<Self> {
        Some(Cell::Empty)
    }
}

impl FromCell for String {
    const EXPECTED: &'static str = "string";

    fn from_cell(cell: &Cell) -> Option<Self> {
        Some(match cell {
            Cell::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

impl FromCell for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::String(s) => s.trim().parse().ok(),
            other => other.as_int(),
        }
    }
}

impl FromCell for i32 {
    const EXPECTED: &'static str = "integer";

    fn from_cell(cell: &Cell) -> Option<Self> {
        i64::from_cell(cell).and_then(|n| i32::try_from(n).ok())
    }
}

impl FromCell for u32 {
    const EXPECTED: &'static str = "unsigned integer";

    fn from_cell(cell: &Cell) -> Option<Self> {
        i64::from_cell(cell).and_then(|n| u32::try_from(n).ok())
    }
}

impl FromCell for f64 {
    const EXPECTED: &'static str = "number";

    fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::String(s) => s.trim().parse().ok(),
            other => other.as_number(),
        }
    }
}

impl FromCell for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Bool(b) => Some(*b),
            Cell::String(s) => match Cell::infer(s) {
                Cell::Bool(b) => Some(b),
                _ => None,
            },
            _ => None,
        }
    }
}

impl<T: FromCell> FromCell for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_cell(cell: &Cell) -> Option<Self> {
        match cell {
            Cell::Empty => Some(None),
            Cell::String(s) if s.is_empty() => Some(None),
            other => T::from_cell(other).map(Some),
        }
    }

    fn missing() -> Option<Self> {
        Some(None)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Cell {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Blank cells come back from a sheet as empty strings
            Cell::Empty => serializer.serialize_str(""),
            Cell::Bool(b) => serializer.serialize_bool(*b),
            Cell::Int(n) => serializer.serialize_i64(*n),
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::String(s) => serializer.serialize_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_conversions() {
        assert_eq!(Cell::from(42), Cell::Int(42));
        assert_eq!(Cell::from(3.5), Cell::Number(3.5));
        assert_eq!(Cell::from(true), Cell::Bool(true));
        assert_eq!(Cell::from(None::<i64>), Cell::Empty);
        assert_eq!(Cell::from("hello").as_str(), Some("hello"));
    }

    #[test]
    fn test_int_number_equality() {
        assert_eq!(Cell::Int(3), Cell::Number(3.0));
        assert_eq!(Cell::Number(3.0), Cell::Int(3));
        assert_ne!(Cell::Int(3), Cell::Number(3.5));
        assert_ne!(Cell::Int(1), Cell::Bool(true));
        assert_ne!(Cell::string("3"), Cell::Int(3));
    }

    #[test]
    fn test_is_blank() {
        assert!(Cell::Empty.is_blank());
        assert!(Cell::string("").is_blank());
        assert!(!Cell::string(" ").is_blank());
        assert!(!Cell::Int(0).is_blank());
    }

    #[test]
    fn test_infer() {
        assert_eq!(Cell::infer(""), Cell::Empty);
        assert_eq!(Cell::infer("  "), Cell::Empty);
        assert_eq!(Cell::infer("TRUE"), Cell::Bool(true));
        assert_eq!(Cell::infer("false"), Cell::Bool(false));
        assert_eq!(Cell::infer("42"), Cell::Int(42));
        assert_eq!(Cell::infer("-7"), Cell::Int(-7));
        assert_eq!(Cell::infer("44000.5"), Cell::Number(44000.5));
        assert_eq!(Cell::infer("inf"), Cell::string("inf"));
        assert_eq!(Cell::infer("NaN"), Cell::string("NaN"));
        assert_eq!(Cell::infer("1e999"), Cell::string("1e999"));
        assert_eq!(Cell::infer("v1.2"), Cell::string("v1.2"));
    }

    #[test]
    fn test_display_reinfers() {
        for cell in [
            Cell::Bool(true),
            Cell::Int(-12),
            Cell::Number(0.25),
            Cell::Number(45000.0),
        ] {
            assert_eq!(Cell::infer(&cell.to_string()), cell);
        }
    }

    #[test]
    fn test_from_cell() {
        assert_eq!(String::from_cell(&Cell::Int(7)), Some("7".to_string()));
        assert_eq!(i64::from_cell(&Cell::Number(7.0)), Some(7));
        assert_eq!(i64::from_cell(&Cell::Number(7.5)), None);
        assert_eq!(i64::from_cell(&Cell::string(" 12 ")), Some(12));
        assert_eq!(f64::from_cell(&Cell::Int(2)), Some(2.0));
        assert_eq!(bool::from_cell(&Cell::string("TRUE")), Some(true));
        assert_eq!(bool::from_cell(&Cell::Int(1)), None);
        assert_eq!(Option::<i64>::from_cell(&Cell::Empty), Some(None));
        assert_eq!(Option::<i64>::from_cell(&Cell::string("")), Some(None));
        assert_eq!(Option::<i64>::from_cell(&Cell::Int(5)), Some(Some(5)));
        assert_eq!(Option::<i64>::missing(), Some(None));
        assert_eq!(i64::missing(), None);
        assert_eq!(u32::from_cell(&Cell::Int(-1)), None);
    }
}
