//! Schema-less worksheet view
//!
//! [`Sheet`] covers the operations that only need raw records: reading,
//! exporting and resetting to the header. [`Table`](crate::Table) builds on
//! it, and tools that don't know a sheet's scheme (the CLI) use it directly.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use sheetdb_core::{Cell, CellAddress, Record};

use crate::backend::Worksheet;
use crate::error::Result;
use crate::export;
use crate::options::TableOptions;

/// A named worksheet read as raw records
#[derive(Debug, Clone)]
pub struct Sheet<W> {
    name: String,
    worksheet: W,
    options: TableOptions,
    type_hints: Vec<String>,
}

impl<W: Worksheet> Sheet<W> {
    /// Bind a worksheet under a logical name, with default options
    pub fn new<S: Into<String>>(name: S, worksheet: W) -> Self {
        Self::with_options(name, worksheet, TableOptions::default())
    }

    /// Bind a worksheet with explicit options
    pub fn with_options<S: Into<String>>(name: S, worksheet: W, options: TableOptions) -> Self {
        Self {
            name: name.into(),
            worksheet,
            options,
            type_hints: Vec::new(),
        }
    }

    /// Columns to read as stored, without retyping
    pub fn with_type_hints<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_hints = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Logical name, used as the export key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound worksheet handle
    pub fn worksheet(&self) -> &W {
        &self.worksheet
    }

    /// Binding options
    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// 1-based header row
    pub(crate) fn header_row(&self) -> u32 {
        self.options.header_row_number()
    }

    /// Every data row keyed by the header
    ///
    /// Hinted columns are returned as stored. A read that the
    /// [`ReadFailurePolicy`](crate::ReadFailurePolicy) suppresses is logged
    /// and reads as an empty sheet.
    pub fn raw_records(&self) -> Result<std::vec::IntoIter<Record>> {
        let hints: Vec<&str> = self.type_hints.iter().map(String::as_str).collect();
        match self.worksheet.read_rows(self.header_row(), &hints) {
            Ok(records) => {
                tracing::debug!(
                    "Read {} rows from '{}' ({})",
                    records.len(),
                    self.name,
                    self.worksheet.title()
                );
                Ok(records.into_iter())
            }
            Err(err) if self.options.read_failure.suppresses(&err) => {
                tracing::warn!("Reading '{}' failed, treating as empty: {err}", self.name);
                Ok(Vec::new().into_iter())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Raw records with blank rows left out
    pub fn data_records(&self) -> Result<impl Iterator<Item = Record>> {
        Ok(self.raw_records()?.filter(|record| !record.is_blank()))
    }

    /// Column names of the header row, in sheet order
    pub fn header(&self) -> Result<Vec<String>> {
        Ok(self.worksheet.read_header(self.header_row())?)
    }

    /// Replace the whole sheet with a header row and data rows
    ///
    /// The header lands on the configured header row.
    pub(crate) fn replace<S: AsRef<str>>(&self, header: &[S], rows: &[Vec<Cell>]) -> Result<()> {
        let mut block = Vec::with_capacity(rows.len() + 1);
        block.push(header.iter().map(|name| Cell::from(name.as_ref())).collect());
        block.extend(rows.iter().cloned());

        self.worksheet.clear()?;
        self.worksheet
            .write_block(CellAddress::row_start(self.header_row()), &block)?;
        Ok(())
    }

    /// Reset the sheet to just its header row
    pub fn initialize(&self) -> Result<()> {
        let header = self.header()?;
        self.replace(&header, &[])?;
        tracing::info!(
            "Initialized '{}' with {} header columns",
            self.name,
            header.len()
        );
        Ok(())
    }

    /// Raw records, optionally cut down to `columns`
    pub fn export_records(&self, columns: Option<&BTreeSet<String>>) -> Result<Vec<Record>> {
        let mut records: Vec<Record> = self.raw_records()?.collect();
        export::filter_columns(&mut records, columns);
        Ok(records)
    }

    /// Write `{name: [records]}` as YAML to `path`
    pub fn export<P: AsRef<Path>>(&self, path: P, columns: Option<&BTreeSet<String>>) -> Result<()> {
        let records = self.export_records(columns)?;
        export::write_yaml_file(path.as_ref(), &self.name, &records)?;
        tracing::info!(
            "Exported {} records from '{}' to {}",
            records.len(),
            self.name,
            path.as_ref().display()
        );
        Ok(())
    }

    /// Write `{name: [records]}` as YAML to `writer`
    pub fn export_to_writer<O: Write>(
        &self,
        writer: &mut O,
        columns: Option<&BTreeSet<String>>,
    ) -> Result<()> {
        let records = self.export_records(columns)?;
        export::write_yaml(writer, &self.name, &records)
    }
}
