//! YAML export of raw records
//!
//! The document has one top-level key, the table name, mapping to a sequence
//! of records. Multi-line strings are written as literal blocks (`|`) so that
//! notes and descriptions stay readable in the file.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use sheetdb_core::{Cell, Record};

use crate::error::{Error, Result};

struct ExportDocument<'a> {
    name: &'a str,
    records: &'a [Record],
}

impl Serialize for ExportDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.name, &RecordList(self.records))?;
        map.end()
    }
}

struct RecordList<'a>(&'a [Record]);

impl Serialize for RecordList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for record in self.0 {
            seq.serialize_element(&ExportRecord(record))?;
        }
        seq.end()
    }
}

struct ExportRecord<'a>(&'a Record);

impl Serialize for ExportRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0.iter() {
            match value {
                Cell::String(s) if s.contains('\n') => {
                    map.serialize_entry(name, &serde_saphyr::LitStr(s))?
                }
                other => map.serialize_entry(name, other)?,
            }
        }
        map.end()
    }
}

/// Keep only the named columns of every record
///
/// An empty set is the same as no filter.
pub fn filter_columns(records: &mut [Record], columns: Option<&BTreeSet<String>>) {
    if let Some(columns) = columns.filter(|columns| !columns.is_empty()) {
        for record in records {
            record.retain_columns(columns);
        }
    }
}

/// Render `{name: [records]}` as YAML
pub fn to_yaml_string(name: &str, records: &[Record]) -> Result<String> {
    serde_saphyr::to_string(&ExportDocument { name, records })
        .map_err(|e| Error::Yaml(e.to_string()))
}

/// Write `{name: [records]}` as YAML to `writer`
pub fn write_yaml<W: Write>(writer: &mut W, name: &str, records: &[Record]) -> Result<()> {
    let yaml = to_yaml_string(name, records)?;
    writer.write_all(yaml.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Write `{name: [records]}` as YAML to a file, replacing it if present
pub fn write_yaml_file<P: AsRef<Path>>(path: P, name: &str, records: &[Record]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_yaml(&mut writer, name, records)
}
