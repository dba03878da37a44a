//! Whole-file CSV reads and writes

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use sheetdb::backend::Grid;
use sheetdb_core::Cell;

use crate::error::CsvResult;
use crate::options::CsvOptions;

/// Read a CSV file into a grid of raw text cells
pub fn read_grid<P: AsRef<Path>>(path: P, options: &CsvOptions) -> CsvResult<Grid> {
    let file = File::open(path)?;
    read(file, options)
}

/// Read CSV text into a grid
///
/// Every field is kept as text; typing happens when records are built.
/// Empty fields become [`Cell::Empty`].
pub fn read<R: Read>(reader: R, options: &CsvOptions) -> CsvResult<Grid> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Cell::Empty
                } else {
                    Cell::string(field)
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(Grid::from_rows(rows))
}

/// Write a grid to a CSV file, replacing its contents
pub fn write_grid<P: AsRef<Path>>(path: P, grid: &Grid, options: &CsvOptions) -> CsvResult<()> {
    let file = File::create(path)?;
    write(grid, file, options)
}

/// Write a grid as CSV
///
/// Trailing blank rows are dropped and the remaining rows are padded to a
/// rectangle.
pub fn write<W: Write>(grid: &Grid, writer: W, options: &CsvOptions) -> CsvResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .terminator(options.line_terminator.to_csv())
        .flexible(true)
        .from_writer(writer);

    let rows = &grid.rows()[..grid.used_rows()];
    let width = rows
        .iter()
        .filter_map(|row| row.iter().rposition(|c| !c.is_blank()))
        .max()
        .map_or(0, |last| last + 1);

    for row in rows {
        let record: Vec<String> = (0..width)
            .map(|col| row.get(col).map(Cell::to_string).unwrap_or_default())
            .collect();
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn to_text(grid: &Grid) -> String {
        let mut out = Vec::new();
        write(grid, &mut out, &CsvOptions::default()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_read_keeps_text() {
        let grid = read("id,zip\n1,007\n2,\n".as_bytes(), &CsvOptions::default()).unwrap();
        assert_eq!(
            grid.rows(),
            &[
                vec![Cell::from("id"), Cell::from("zip")],
                vec![Cell::from("1"), Cell::from("007")],
                vec![Cell::from("2"), Cell::Empty],
            ]
        );
    }

    #[test]
    fn test_read_ragged_rows() {
        let grid = read("a,b,c\n1\n".as_bytes(), &CsvOptions::default()).unwrap();
        assert_eq!(grid.rows()[1], vec![Cell::from("1")]);
    }

    #[test]
    fn test_write_pads_to_rectangle() {
        let grid = Grid::from_rows(vec![
            vec!["id".into(), "name".into(), "note".into()],
            vec![1.into()],
            vec![],
            vec![2.into(), "b".into(), true.into()],
            vec![],
        ]);
        assert_eq!(to_text(&grid), "id,name,note\n1,,\n,,\n2,b,TRUE\n");
    }

    #[test]
    fn test_write_quotes_multiline() {
        let grid = Grid::from_rows(vec![vec!["note".into()], vec!["a\nb".into()]]);
        let text = to_text(&grid);
        assert_eq!(text, "note\n\"a\nb\"\n");

        let back = read(text.as_bytes(), &CsvOptions::default()).unwrap();
        assert_eq!(back.rows()[1], vec![Cell::from("a\nb")]);
    }

    #[test]
    fn test_write_empty_grid() {
        assert_eq!(to_text(&Grid::new()), "");
    }

    #[test]
    fn test_semicolon_delimiter() {
        let options = CsvOptions {
            delimiter: b';',
            ..CsvOptions::default()
        };
        let grid = read("a;b\n1;2\n".as_bytes(), &options).unwrap();
        assert_eq!(grid.rows()[1], vec![Cell::from("1"), Cell::from("2")]);
    }
}
