//! In-memory backend
//!
//! Documents live in a [`MemoryConnector`] and hold named [`Grid`]s. Handles
//! share state, so a worksheet opened twice sees the same cells. Every handle
//! counts the calls made through it, and reads can be made to fail on demand
//! to exercise the table layer's failure handling.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use sheetdb_core::{Cell, CellAddress, Record};

use super::{
    BackendError, BackendErrorKind, BackendResult, Connector, Document, Grid, Worksheet,
};

/// Holds every in-memory document by id
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    documents: Arc<Mutex<BTreeMap<String, MemoryDocument>>>,
    opens: Arc<AtomicUsize>,
}

impl MemoryConnector {
    /// Create a connector with no documents
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or fetch) a document
    pub fn add_document(&self, id: &str) -> MemoryDocument {
        self.documents
            .lock()
            .entry(id.to_string())
            .or_insert_with(|| MemoryDocument::new(id))
            .clone()
    }

    /// How many times [`Connector::open_document`] succeeded
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl Connector for MemoryConnector {
    type Document = MemoryDocument;

    fn open_document(&self, id: &str) -> BackendResult<MemoryDocument> {
        let document = self
            .documents
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| BackendError::not_found(format!("document '{}'", id)))?;
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(document)
    }
}

/// A document of named in-memory worksheets
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    id: Arc<str>,
    sheets: Arc<Mutex<Vec<MemoryWorksheet>>>,
    lookups: Arc<AtomicUsize>,
}

impl MemoryDocument {
    /// Create an empty document
    pub fn new(id: &str) -> Self {
        Self {
            id: Arc::from(id),
            sheets: Arc::default(),
            lookups: Arc::default(),
        }
    }

    /// Add a worksheet with initial rows, replacing one with the same title
    pub fn add_worksheet(&self, title: &str, rows: Vec<Vec<Cell>>) -> MemoryWorksheet {
        let sheet = MemoryWorksheet::new(title, rows);
        let mut sheets = self.sheets.lock();
        match sheets.iter_mut().find(|s| s.title() == title) {
            Some(slot) => *slot = sheet.clone(),
            None => sheets.push(sheet.clone()),
        }
        sheet
    }

    /// How many times [`Document::worksheet`] was called
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Document for MemoryDocument {
    type Worksheet = MemoryWorksheet;

    fn id(&self) -> &str {
        &self.id
    }

    fn worksheet(&self, title: &str) -> BackendResult<MemoryWorksheet> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.sheets
            .lock()
            .iter()
            .find(|s| s.title() == title)
            .cloned()
            .ok_or_else(|| BackendError::not_found(format!("worksheet '{}' in '{}'", title, self.id)))
    }

    fn worksheet_titles(&self) -> BackendResult<Vec<String>> {
        Ok(self
            .sheets
            .lock()
            .iter()
            .map(|s| s.title().to_string())
            .collect())
    }
}

#[derive(Debug, Default)]
struct SheetState {
    grid: Grid,
    read_failure: Option<BackendErrorKind>,
    reads: usize,
    writes: usize,
}

/// Handle to an in-memory worksheet
#[derive(Debug, Clone)]
pub struct MemoryWorksheet {
    title: Arc<str>,
    state: Arc<Mutex<SheetState>>,
}

impl MemoryWorksheet {
    /// Create a standalone worksheet
    pub fn new(title: &str, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            title: Arc::from(title),
            state: Arc::new(Mutex::new(SheetState {
                grid: Grid::from_rows(rows),
                ..SheetState::default()
            })),
        }
    }

    /// Snapshot of every stored row
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.state.lock().grid.rows().to_vec()
    }

    /// Make subsequent reads fail with `kind`, or succeed again with `None`
    pub fn fail_reads(&self, kind: Option<BackendErrorKind>) {
        self.state.lock().read_failure = kind;
    }

    /// Number of read calls served
    pub fn read_count(&self) -> usize {
        self.state.lock().reads
    }

    /// Number of mutating calls served
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    fn read<T>(&self, f: impl FnOnce(&Grid) -> BackendResult<T>) -> BackendResult<T> {
        let mut state = self.state.lock();
        state.reads += 1;
        if let Some(kind) = state.read_failure {
            return Err(BackendError::new(
                kind,
                format!("simulated read failure on '{}'", self.title),
            ));
        }
        f(&state.grid)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Grid) -> BackendResult<T>) -> BackendResult<T> {
        let mut state = self.state.lock();
        state.writes += 1;
        f(&mut state.grid)
    }
}

impl Worksheet for MemoryWorksheet {
    fn title(&self) -> &str {
        &self.title
    }

    fn read_rows(&self, header_row: u32, type_hints: &[&str]) -> BackendResult<Vec<Record>> {
        self.read(|grid| grid.records(header_row, type_hints))
    }

    fn read_header(&self, row: u32) -> BackendResult<Vec<String>> {
        self.read(|grid| Ok(grid.header(row)))
    }

    fn clear(&self) -> BackendResult<()> {
        self.write(|grid| {
            grid.clear();
            Ok(())
        })
    }

    fn write_block(&self, top_left: CellAddress, rows: &[Vec<Cell>]) -> BackendResult<()> {
        self.write(|grid| grid.write_block(top_left, rows))
    }

    fn append_rows(&self, rows: &[Vec<Cell>], table_range: CellAddress) -> BackendResult<()> {
        self.write(|grid| grid.append(rows, table_range).map(|_| ()))
    }
}
