//! Cell anchors for block writes

use std::fmt;

/// Top-left corner of a block written to a worksheet
///
/// Stored 0-based; displayed in A1 notation. Backends only ever receive
/// anchors in column A, one per table row, but the column is kept so that a
/// block can be placed anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// 0-based row
    pub row: u32,
    /// 0-based column (A = 0)
    pub col: u16,
}

impl CellAddress {
    /// Anchor at a 0-based row and column
    pub fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// Column A of a 1-based sheet row
    ///
    /// ```
    /// use sheetdb_core::CellAddress;
    ///
    /// assert_eq!(CellAddress::row_start(2).to_string(), "A2");
    /// assert_eq!(CellAddress::row_start(0), CellAddress::row_start(1));
    /// ```
    pub fn row_start(row_number: u32) -> Self {
        Self::new(row_number.saturating_sub(1), 0)
    }

    /// 1-based row number
    pub fn row_number(&self) -> u32 {
        self.row + 1
    }

    /// Spreadsheet letters for a 0-based column: A..Z, AA..ZZ, AAA..
    pub fn column_name(col: u16) -> String {
        let mut letters = Vec::with_capacity(3);
        let mut rest = u32::from(col) + 1;
        while rest > 0 {
            let digit = (rest - 1) % 26;
            letters.push(b'A' + digit as u8);
            rest = (rest - 1) / 26;
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_name(self.col), self.row_number())
    }
}
