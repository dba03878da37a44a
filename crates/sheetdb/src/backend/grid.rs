//! In-memory cell grid shared by the bundled backends

use std::collections::HashSet;

use sheetdb_core::{Cell, CellAddress, Record, MAX_COLS, MAX_ROWS};

use super::{BackendError, BackendErrorKind, BackendResult};

/// A ragged grid of cells, row-major, 0-based
///
/// Implements the worksheet primitives on plain memory. The memory backend
/// keeps one per sheet; the CSV backend loads one from disk per call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid from rows of cells
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// All rows, including blank ones
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Consume the grid into its rows
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }

    /// Number of rows up to and including the last populated one
    pub fn used_rows(&self) -> usize {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|c| !c.is_blank()))
            .map_or(0, |last| last + 1)
    }

    /// The given 1-based row as text, trailing blank cells trimmed
    pub fn header(&self, row: u32) -> Vec<String> {
        let Some(cells) = row.checked_sub(1).and_then(|i| self.rows.get(i as usize)) else {
            return Vec::new();
        };
        let len = cells
            .iter()
            .rposition(|c| !c.is_blank())
            .map_or(0, |last| last + 1);
        cells[..len].iter().map(|c| c.to_string()).collect()
    }

    /// Data rows below `header_row`, keyed by it
    ///
    /// Columns with a blank header are skipped. Cells are retyped with
    /// [`Cell::interpret`] unless their column is listed in `type_hints`.
    /// Blank rows inside the table are kept so record positions line up with
    /// sheet rows.
    pub fn records(&self, header_row: u32, type_hints: &[&str]) -> BackendResult<Vec<Record>> {
        let header = self.header(header_row);
        if header.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        for name in header.iter().filter(|name| !name.is_empty()) {
            if !seen.insert(name.as_str()) {
                return Err(BackendError::new(
                    BackendErrorKind::InvalidHeader,
                    format!("duplicate column '{}' in row {}", name, header_row),
                ));
            }
        }

        let start = header_row as usize;
        let end = self.used_rows().max(start);

        let records: Vec<Record> = self.rows[start..end]
            .iter()
            .map(|row| {
                header
                    .iter()
                    .enumerate()
                    .filter(|(_, name)| !name.is_empty())
                    .map(|(col, name)| {
                        let cell = row.get(col).cloned().unwrap_or_default();
                        let cell = if type_hints.contains(&name.as_str()) {
                            cell
                        } else {
                            cell.interpret()
                        };
                        (name.clone(), cell)
                    })
                    .collect()
            })
            .collect();

        Ok(records)
    }

    /// Remove all content
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Overwrite a block starting at `top_left`, storing values as given
    pub fn write_block(&mut self, top_left: CellAddress, block: &[Vec<Cell>]) -> BackendResult<()> {
        check_bounds(top_left, block)?;

        for (r, values) in block.iter().enumerate() {
            let row_idx = top_left.row as usize + r;
            if self.rows.len() <= row_idx {
                self.rows.resize_with(row_idx + 1, Vec::new);
            }
            let row = &mut self.rows[row_idx];
            let needed = top_left.col as usize + values.len();
            if row.len() < needed {
                row.resize(needed, Cell::Empty);
            }
            for (c, value) in values.iter().enumerate() {
                row[top_left.col as usize + c] = value.clone();
            }
        }

        Ok(())
    }

    /// Append rows after the table containing `table_range`
    ///
    /// The table ends at the last populated row; appending to an empty sheet
    /// starts at `table_range`. Values are interpreted as user-entered.
    /// Returns the 1-based sheet row of the first appended row.
    pub fn append(&mut self, block: &[Vec<Cell>], table_range: CellAddress) -> BackendResult<u32> {
        let start_row = (self.used_rows() as u32).max(table_range.row);
        let top_left = CellAddress::new(start_row, table_range.col);

        let interpreted: Vec<Vec<Cell>> = block
            .iter()
            .map(|row| row.iter().cloned().map(Cell::interpret).collect())
            .collect();

        self.write_block(top_left, &interpreted)?;
        Ok(top_left.row_number())
    }
}

fn check_bounds(top_left: CellAddress, block: &[Vec<Cell>]) -> BackendResult<()> {
    let last_row = top_left.row as u64 + block.len() as u64;
    let widest = block.iter().map(Vec::len).max().unwrap_or(0);
    let last_col = top_left.col as u64 + widest as u64;

    if last_row > MAX_ROWS as u64 || last_col > MAX_COLS as u64 {
        return Err(BackendError::new(
            BackendErrorKind::InvalidRange,
            format!(
                "block of {}x{} at {} exceeds the sheet",
                block.len(),
                widest,
                top_left
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(rows: &[&[&str]]) -> Grid {
        Grid::from_rows(
            rows.iter()
                .map(|r| r.iter().map(|s| Cell::string(*s)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_header_trims_trailing_blanks() {
        let grid = text(&[&["id", "name", "", ""]]);
        assert_eq!(grid.header(1), vec!["id", "name"]);
        assert!(grid.header(2).is_empty());
        assert!(grid.header(0).is_empty());
    }

    #[test]
    fn test_records_typing_and_hints() {
        let grid = text(&[&["id", "zip", "note"], &["1", "007", "hi"], &["2", "010"]]);

        let records = grid.records(1, &["zip"]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("id"), Some(&Cell::Int(1)));
        assert_eq!(records[0].get("zip"), Some(&Cell::string("007")));
        assert_eq!(records[1].get("note"), Some(&Cell::Empty));
    }

    #[test]
    fn test_records_keep_inner_blank_rows() {
        let grid = text(&[&["id"], &["1"], &[""], &["3"], &[""]]);
        let ids: Vec<Cell> = grid
            .records(1, &[])
            .unwrap()
            .iter()
            .map(|r| r.get("id").cloned().unwrap())
            .collect();
        assert_eq!(ids, vec![Cell::Int(1), Cell::Empty, Cell::Int(3)]);
    }

    #[test]
    fn test_records_without_header() {
        assert!(Grid::new().records(1, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_header_is_rejected() {
        let grid = text(&[&["id", "id"], &["1", "2"]]);
        let err = grid.records(1, &[]).unwrap_err();
        assert_eq!(err.kind(), BackendErrorKind::InvalidHeader);
    }

    #[test]
    fn test_write_block_grows_grid() {
        let mut grid = Grid::new();
        grid.write_block(CellAddress::new(1, 1), &[vec![Cell::Int(5)]])
            .unwrap();
        assert_eq!(grid.rows().len(), 2);
        assert_eq!(grid.rows()[1], vec![Cell::Empty, Cell::Int(5)]);
    }

    #[test]
    fn test_write_block_out_of_range() {
        let mut grid = Grid::new();
        let err = grid
            .write_block(CellAddress::new(MAX_ROWS - 1, 0), &[vec![], vec![]])
            .unwrap_err();
        assert_eq!(err.kind(), BackendErrorKind::InvalidRange);
    }

    #[test]
    fn test_append_interprets_values() {
        let mut grid = text(&[&["id", "n"], &["a", "1"]]);
        let first = grid
            .append(
                &[vec![Cell::string("b"), Cell::string("2.5")]],
                CellAddress::row_start(1),
            )
            .unwrap();

        assert_eq!(first, 3);
        assert_eq!(grid.rows()[2], vec![Cell::string("b"), Cell::Number(2.5)]);
    }

    #[test]
    fn test_append_to_empty_sheet_starts_at_range() {
        let mut grid = Grid::new();
        let first = grid
            .append(&[vec![Cell::Int(1)]], CellAddress::row_start(1))
            .unwrap();
        assert_eq!(first, 1);
    }
}
