//! Fixed catalog of tables
//!
//! An application lists its tables once, as an enum implementing [`Catalog`].
//! A [`Registry`] resolves each entry lazily: the first access opens the
//! entry's document (shared by every entry naming the same document id) and
//! looks up its worksheet; later accesses reuse the resolved handles without
//! touching the backend.
//!
//! ```rust
//! use sheetdb::backend::memory::MemoryConnector;
//! use sheetdb::{Catalog, Registry};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Tables {
//!     Users,
//! }
//!
//! impl Catalog for Tables {
//!     const ALL: &'static [Self] = &[Tables::Users];
//!
//!     fn name(self) -> &'static str {
//!         "users"
//!     }
//!     fn worksheet_title(self) -> &'static str {
//!         "Users"
//!     }
//!     fn scheme_name(self) -> &'static str {
//!         "user"
//!     }
//!     fn document_id(self) -> &'static str {
//!         "accounts"
//!     }
//! }
//!
//! let connector = MemoryConnector::new();
//! connector.add_document("accounts").add_worksheet("Users", Vec::new());
//!
//! let registry = Registry::new(connector);
//! assert!(!registry.is_resolved(Tables::Users));
//! let sheet = registry.sheet(Tables::Users).unwrap();
//! assert_eq!(sheet.name(), "users");
//! assert!(registry.is_resolved(Tables::Users));
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::backend::{Connector, Document, WorksheetOf};
use crate::error::{Error, Result};
use crate::options::TableOptions;
use crate::scheme::Scheme;
use crate::sheet::Sheet;
use crate::table::Table;

/// A closed set of tables, each bound to one worksheet of one document
pub trait Catalog: Copy + Eq + Hash + Debug + 'static {
    /// Every entry, in a stable order
    const ALL: &'static [Self];

    /// Logical table name, used for logs and exports
    fn name(self) -> &'static str;

    /// Worksheet title within the document
    fn worksheet_title(self) -> &'static str;

    /// [`Scheme::NAME`] of the records the table holds
    fn scheme_name(self) -> &'static str;

    /// Id of the document holding the worksheet
    fn document_id(self) -> &'static str;

    /// Columns read as stored, without number detection
    ///
    /// Should match the entry scheme's [`Scheme::RAW_FIELDS`]. Schema-less
    /// views ([`Registry::sheet`], [`Registry::export_all`]) have no scheme
    /// to ask, so they read with these.
    fn raw_fields(self) -> &'static [&'static str] {
        &[]
    }

    /// Binding options for the table
    fn options(self) -> TableOptions {
        TableOptions::default()
    }
}

/// Lazily resolved handles for every entry of a [`Catalog`]
///
/// Handles are kept for the lifetime of the registry. Memo tables are
/// locked worksheets-first, documents-second.
pub struct Registry<K, C: Connector> {
    connector: C,
    documents: Mutex<HashMap<&'static str, C::Document>>,
    worksheets: Mutex<HashMap<K, WorksheetOf<C>>>,
}

impl<K: Catalog, C: Connector> Registry<K, C> {
    /// Create a registry with nothing resolved yet
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            documents: Mutex::new(HashMap::new()),
            worksheets: Mutex::new(HashMap::new()),
        }
    }

    /// The connector documents are opened with
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Every catalog entry
    pub fn entries(&self) -> &'static [K] {
        K::ALL
    }

    /// Whether `key`'s worksheet has been resolved
    pub fn is_resolved(&self, key: K) -> bool {
        self.worksheets.lock().contains_key(&key)
    }

    /// Typed table for `key`
    ///
    /// `S` must be the scheme the entry declares; the check happens before
    /// anything is resolved.
    pub fn table<S: Scheme>(&self, key: K) -> Result<Table<S, WorksheetOf<C>>> {
        if S::NAME != key.scheme_name() {
            return Err(Error::SchemeMismatch {
                table: key.name(),
                declared: key.scheme_name(),
                requested: S::NAME,
            });
        }
        Ok(Table::from_sheet(self.sheet(key)?))
    }

    /// Schema-less view of `key`'s worksheet, reading [`Catalog::raw_fields`] as stored
    pub fn sheet(&self, key: K) -> Result<Sheet<WorksheetOf<C>>> {
        let worksheet = self.worksheet(key)?;
        Ok(Sheet::with_options(key.name(), worksheet, key.options())
            .with_type_hints(key.raw_fields().iter().copied()))
    }

    /// Export every entry to `<dir>/<name>.yaml`
    pub fn export_all<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let mut written = Vec::with_capacity(K::ALL.len());
        for &key in K::ALL {
            let path = dir.join(format!("{}.yaml", key.name()));
            self.sheet(key)?.export(&path, None)?;
            written.push(path);
        }
        Ok(written)
    }

    fn worksheet(&self, key: K) -> Result<WorksheetOf<C>> {
        let mut worksheets = self.worksheets.lock();
        if let Some(worksheet) = worksheets.get(&key) {
            return Ok(worksheet.clone());
        }

        let mut documents = self.documents.lock();
        let document = match documents.entry(key.document_id()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                tracing::debug!("Opening document '{}'", key.document_id());
                entry.insert(self.connector.open_document(key.document_id())?)
            }
        };

        tracing::debug!(
            "Resolving '{}' to worksheet '{}'",
            key.name(),
            key.worksheet_title()
        );
        let worksheet = document.worksheet(key.worksheet_title())?;
        worksheets.insert(key, worksheet.clone());
        Ok(worksheet)
    }
}
