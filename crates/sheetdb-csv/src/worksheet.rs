//! Worksheets as CSV files

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sheetdb::backend::{BackendResult, Grid, Worksheet};
use sheetdb_core::{Cell, CellAddress, Record};

use crate::error::CsvResult;
use crate::file::{read_grid, write_grid};
use crate::options::CsvOptions;

/// One `<title>.csv` file
///
/// Each call loads the file; writes rewrite it in full.
#[derive(Debug, Clone)]
pub struct CsvWorksheet {
    title: String,
    path: PathBuf,
    options: Arc<CsvOptions>,
}

impl CsvWorksheet {
    /// Bind a worksheet to a file path
    pub fn new<S: Into<String>>(title: S, path: PathBuf, options: Arc<CsvOptions>) -> Self {
        Self {
            title: title.into(),
            path,
            options,
        }
    }

    /// The backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> CsvResult<Grid> {
        read_grid(&self.path, &self.options)
    }

    /// Load for modification; a file removed since open counts as empty
    fn load_for_write(&self) -> CsvResult<Grid> {
        match read_grid(&self.path, &self.options) {
            Err(crate::CsvError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("{} is gone, recreating it", self.path.display());
                Ok(Grid::new())
            }
            other => other,
        }
    }

    fn save(&self, grid: &Grid) -> CsvResult<()> {
        write_grid(&self.path, grid, &self.options)?;
        log::debug!("Wrote {} rows to {}", grid.used_rows(), self.path.display());
        Ok(())
    }
}

impl Worksheet for CsvWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn read_rows(&self, header_row: u32, type_hints: &[&str]) -> BackendResult<Vec<Record>> {
        let grid = self.load()?;
        grid.records(header_row, type_hints)
    }

    fn read_header(&self, row: u32) -> BackendResult<Vec<String>> {
        Ok(self.load()?.header(row))
    }

    fn clear(&self) -> BackendResult<()> {
        self.save(&Grid::new())?;
        Ok(())
    }

    fn write_block(&self, top_left: CellAddress, rows: &[Vec<Cell>]) -> BackendResult<()> {
        let mut grid = self.load_for_write()?;
        grid.write_block(top_left, rows)?;
        self.save(&grid)?;
        Ok(())
    }

    fn append_rows(&self, rows: &[Vec<Cell>], table_range: CellAddress) -> BackendResult<()> {
        let mut grid = self.load_for_write()?;
        let first = grid.append(rows, table_range)?;
        self.save(&grid)?;
        log::debug!(
            "Appended {} rows to {} at row {}",
            rows.len(),
            self.path.display(),
            first
        );
        Ok(())
    }
}
