//! Typed access to one worksheet
//!
//! A [`Table`] binds a [`Scheme`] to a worksheet. Every call goes to the
//! backend; nothing is cached, so lookups are linear scans over freshly read
//! rows and a table always reflects the sheet as it is now.

use std::collections::BTreeSet;
use std::io::Write;
use std::marker::PhantomData;
use std::path::Path;

use sheetdb_core::{Cell, CellAddress, Record};

use crate::backend::Worksheet;
use crate::error::{Error, Result};
use crate::options::TableOptions;
use crate::query::Query;
use crate::scheme::Scheme;
use crate::sheet::Sheet;

/// A worksheet holding records of scheme `S`
#[derive(Debug, Clone)]
pub struct Table<S, W> {
    sheet: Sheet<W>,
    scheme: PhantomData<fn() -> S>,
}

impl<S: Scheme, W: Worksheet> Table<S, W> {
    /// Bind a worksheet under a logical name, with default options
    pub fn new<N: Into<String>>(name: N, worksheet: W) -> Self {
        Self::with_options(name, worksheet, TableOptions::default())
    }

    /// Bind a worksheet with explicit options
    pub fn with_options<N: Into<String>>(name: N, worksheet: W, options: TableOptions) -> Self {
        Self::from_sheet(Sheet::with_options(name, worksheet, options))
    }

    pub(crate) fn from_sheet(sheet: Sheet<W>) -> Self {
        Self {
            sheet: sheet.with_type_hints(S::RAW_FIELDS.iter().copied()),
            scheme: PhantomData,
        }
    }

    /// Logical name
    pub fn name(&self) -> &str {
        self.sheet.name()
    }

    /// The bound worksheet handle
    pub fn worksheet(&self) -> &W {
        self.sheet.worksheet()
    }

    /// Binding options
    pub fn options(&self) -> &TableOptions {
        self.sheet.options()
    }

    /// Schema-less view of the same worksheet
    pub fn sheet(&self) -> &Sheet<W> {
        &self.sheet
    }

    /// Every data row as a raw record, [`Scheme::RAW_FIELDS`] left untyped
    pub fn raw_records(&self) -> Result<std::vec::IntoIter<Record>> {
        self.sheet.raw_records()
    }

    /// Every data row parsed into `S`
    ///
    /// Blank rows are skipped. A row that fails to parse yields an `Err` in
    /// its place.
    pub fn records(&self) -> Result<impl Iterator<Item = Result<S>>> {
        Ok(self.sheet.data_records()?.map(|raw| S::parse(&raw)))
    }

    /// Column names of the header row
    pub fn header(&self) -> Result<Vec<String>> {
        self.sheet.header()
    }

    /// First record whose primary key equals `primary_key`
    pub fn get<K: Into<Cell>>(&self, primary_key: K) -> Result<Option<S>> {
        let primary_key = primary_key.into();
        for record in self.records()? {
            let record = record?;
            if record.primary_key_value() == primary_key {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Records matching every condition of `query`
    ///
    /// Conditions on fields `S` does not declare are rejected before the
    /// sheet is read.
    pub fn find(&self, query: &Query) -> Result<impl Iterator<Item = Result<S>>> {
        if let Some(field) = query.fields().find(|f| !S::FIELDS.contains(f)) {
            return Err(Error::UnknownField {
                scheme: S::NAME,
                field: field.to_string(),
            });
        }

        let query = query.clone();
        Ok(self.records()?.filter(move |record| match record {
            Ok(record) => query.matches_with(|field| record.get(field).unwrap_or_default()),
            Err(_) => true,
        }))
    }

    /// Replace every row with `records`, keeping the header
    ///
    /// Records are projected against the header before the sheet is cleared,
    /// so a projection error leaves the sheet untouched. A sheet without a
    /// header gets one from [`Scheme::FIELDS`].
    pub fn overwrite(&self, records: &[S]) -> Result<()> {
        let header = self.header_or_fields()?;
        let rows = project(records, &header)?;
        self.sheet.replace(&header, &rows)?;
        tracing::info!("Overwrote '{}' with {} records", self.name(), rows.len());
        Ok(())
    }

    /// Rewrite the row of the first record sharing `record`'s primary key
    ///
    /// Returns `false`, writing nothing, when no record matches.
    pub fn update_one(&self, record: &S) -> Result<bool> {
        let primary_key = record.primary_key_value();
        let header = self.header()?;

        for (index, raw) in self.raw_records()?.enumerate() {
            if raw.is_blank() {
                continue;
            }
            if S::parse(&raw)?.primary_key_value() != primary_key {
                continue;
            }

            let row = record.as_row_for(&header)?;
            let sheet_row = self.sheet.header_row() + 1 + index as u32;
            self.worksheet()
                .write_block(CellAddress::row_start(sheet_row), &[row])?;
            tracing::debug!(
                "Updated '{}' row {} (primary key {})",
                self.name(),
                sheet_row,
                primary_key
            );
            return Ok(true);
        }

        tracing::debug!(
            "No record in '{}' with primary key {}, nothing updated",
            self.name(),
            primary_key
        );
        Ok(false)
    }

    /// Add `records` after the last populated row
    ///
    /// Existing rows are not rewritten. A sheet without a header gets one
    /// from [`Scheme::FIELDS`] first.
    pub fn append(&self, records: &[S]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut header = self.header()?;
        let table_range = CellAddress::row_start(self.sheet.header_row());
        if header.is_empty() {
            header = fields_header::<S>();
            let cells = header.iter().map(|name| Cell::from(name.as_str())).collect();
            self.worksheet().write_block(table_range, &[cells])?;
        }

        let rows = project(records, &header)?;
        self.worksheet().append_rows(&rows, table_range)?;
        tracing::debug!("Appended {} records to '{}'", rows.len(), self.name());
        Ok(())
    }

    /// Write `{name: [raw records]}` as YAML to `path`
    pub fn export<P: AsRef<Path>>(&self, path: P, columns: Option<&BTreeSet<String>>) -> Result<()> {
        self.sheet.export(path, columns)
    }

    /// Write `{name: [raw records]}` as YAML to `writer`
    pub fn export_to_writer<O: Write>(
        &self,
        writer: &mut O,
        columns: Option<&BTreeSet<String>>,
    ) -> Result<()> {
        self.sheet.export_to_writer(writer, columns)
    }

    /// Reset the sheet to just its header row
    pub fn initialize(&self) -> Result<()> {
        self.sheet.initialize()
    }

    fn header_or_fields(&self) -> Result<Vec<String>> {
        let header = self.header()?;
        Ok(if header.is_empty() {
            fields_header::<S>()
        } else {
            header
        })
    }
}

fn fields_header<S: Scheme>() -> Vec<String> {
    S::FIELDS.iter().map(|name| name.to_string()).collect()
}

fn project<S: Scheme>(records: &[S], header: &[String]) -> Result<Vec<Vec<Cell>>> {
    records
        .iter()
        .map(|record| record.as_row_for(header))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryWorksheet;
    use crate::scheme::{Fields, Timestamps};
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        stamps: Timestamps,
        primary_key: String,
        qty: i64,
    }

    impl Scheme for Item {
        const NAME: &'static str = "item";
        const FIELDS: &'static [&'static str] = &["created_at", "updated_at", "primary_key", "qty"];

        fn build(fields: &Fields) -> Result<Self> {
            Ok(Self {
                stamps: fields.timestamps()?,
                primary_key: fields.get("primary_key")?,
                qty: fields.get_or_default("qty")?,
            })
        }

        fn field_value(&self, name: &str) -> Option<Cell> {
            match name {
                "primary_key" => Some(self.primary_key.clone().into()),
                "qty" => Some(self.qty.into()),
                _ => None,
            }
        }

        fn timestamps(&self) -> &Timestamps {
            &self.stamps
        }

        fn timestamps_mut(&mut self) -> &mut Timestamps {
            &mut self.stamps
        }
    }

    fn item(key: &str, qty: i64) -> Item {
        Item::construct([("primary_key", Cell::from(key)), ("qty", Cell::from(qty))]).unwrap()
    }

    fn empty_table() -> (MemoryWorksheet, Table<Item, MemoryWorksheet>) {
        let ws = MemoryWorksheet::new("Items", Vec::new());
        (ws.clone(), Table::new("items", ws))
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let ws = MemoryWorksheet::new(
            "Items",
            vec![
                vec!["primary_key".into(), "qty".into()],
                vec!["a".into(), 1.into()],
                vec![],
                vec!["b".into(), 2.into()],
            ],
        );
        let table: Table<Item, _> = Table::new("items", ws);
        let keys: Vec<String> = table
            .records()
            .unwrap()
            .map(|r| r.unwrap().primary_key)
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_update_one_after_blank_row() {
        let ws = MemoryWorksheet::new(
            "Items",
            vec![
                vec!["primary_key".into(), "qty".into()],
                vec![],
                vec!["b".into(), 2.into()],
            ],
        );
        let table: Table<Item, _> = Table::new("items", ws.clone());
        assert!(table.update_one(&item("b", 5)).unwrap());
        assert_eq!(ws.rows()[2], vec![Cell::from("b"), Cell::Int(5)]);
    }

    #[test]
    fn test_overwrite_bootstraps_header() {
        let (ws, table) = empty_table();
        table.overwrite(&[item("a", 1)]).unwrap();
        assert_eq!(table.header().unwrap(), Item::FIELDS.to_vec());
        assert_eq!(ws.rows().len(), 2);
    }

    #[test]
    fn test_append_bootstraps_header() {
        let (_, table) = empty_table();
        let items = vec![item("a", 1), item("b", 2)];
        table.append(&items).unwrap();

        assert_eq!(table.header().unwrap(), Item::FIELDS.to_vec());
        let records: Vec<Item> = table.records().unwrap().map(|r| r.unwrap()).collect();
        assert_eq!(records, items);
    }

    #[test]
    fn test_append_empty_is_noop() {
        let (ws, table) = empty_table();
        table.append(&[]).unwrap();
        assert_eq!(ws.write_count(), 0);
        assert_eq!(ws.read_count(), 0);
    }

    #[test]
    fn test_find_rejects_unknown_field_without_reading() {
        let (ws, table) = empty_table();
        let result = table.find(&Query::new().equals("colour", "red"));
        assert!(matches!(result, Err(Error::UnknownField { .. })));
        assert_eq!(ws.read_count(), 0);
    }

    #[test]
    fn test_overwrite_projection_error_leaves_sheet() {
        let ws = MemoryWorksheet::new(
            "Items",
            vec![
                vec!["primary_key".into(), "extra".into()],
                vec!["a".into(), "x".into()],
            ],
        );
        let table: Table<Item, _> = Table::new("items", ws.clone());
        let before = ws.rows();

        let err = table.overwrite(&[item("b", 1)]).unwrap_err();
        assert!(matches!(err, Error::UnknownField { ref field, .. } if field == "extra"));
        assert_eq!(ws.rows(), before);
    }

    #[test]
    fn test_custom_header_row() {
        let ws = MemoryWorksheet::new(
            "Items",
            vec![
                vec!["Inventory".into()],
                vec!["primary_key".into(), "qty".into()],
                vec!["a".into(), 1.into()],
            ],
        );
        let table: Table<Item, _> = Table::with_options(
            "items",
            ws.clone(),
            TableOptions {
                header_row: 2,
                ..TableOptions::default()
            },
        );

        assert_eq!(table.get("a").unwrap().map(|i| i.qty), Some(1));
        assert!(table.update_one(&item("a", 9)).unwrap());
        assert_eq!(ws.rows()[2], vec![Cell::from("a"), Cell::Int(9)]);

        table.append(&[item("b", 2)]).unwrap();
        assert_eq!(ws.rows()[3], vec![Cell::from("b"), Cell::Int(2)]);
    }
}
