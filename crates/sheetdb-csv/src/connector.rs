//! Documents as directories

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sheetdb::backend::{BackendError, BackendResult, Connector, Document};

use crate::error::CsvError;
use crate::options::CsvOptions;
use crate::worksheet::CsvWorksheet;

/// Opens documents as directories under a root directory
#[derive(Debug, Clone)]
pub struct CsvConnector {
    root: PathBuf,
    options: Arc<CsvOptions>,
}

impl CsvConnector {
    /// Create a connector rooted at `root`
    pub fn new<P: Into<PathBuf>>(root: P, options: CsvOptions) -> Self {
        Self {
            root: root.into(),
            options: Arc::new(options),
        }
    }

    /// The root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Backend options
    pub fn options(&self) -> &CsvOptions {
        &self.options
    }
}

impl Connector for CsvConnector {
    type Document = CsvDocument;

    fn open_document(&self, id: &str) -> BackendResult<CsvDocument> {
        check_name(id)?;
        let dir = self.root.join(id);

        if !dir.is_dir() {
            if !self.options.create_missing {
                return Err(BackendError::not_found(format!(
                    "document directory {}",
                    dir.display()
                )));
            }
            fs::create_dir_all(&dir)?;
            log::info!("Created document directory {}", dir.display());
        }

        log::debug!("Opened document '{}' at {}", id, dir.display());
        Ok(CsvDocument {
            id: id.to_string(),
            dir,
            options: Arc::clone(&self.options),
        })
    }
}

/// A directory of worksheet files
#[derive(Debug, Clone)]
pub struct CsvDocument {
    id: String,
    dir: PathBuf,
    options: Arc<CsvOptions>,
}

impl CsvDocument {
    /// The document directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(&self, title: &str) -> String {
        format!("{}.{}", title, self.options.extension)
    }
}

impl Document for CsvDocument {
    type Worksheet = CsvWorksheet;

    fn id(&self) -> &str {
        &self.id
    }

    fn worksheet(&self, title: &str) -> BackendResult<CsvWorksheet> {
        check_name(title)?;
        let path = self.dir.join(self.file_name(title));

        if !path.is_file() {
            if !self.options.create_missing {
                return Err(BackendError::not_found(format!(
                    "worksheet file {}",
                    path.display()
                )));
            }
            fs::File::create(&path)?;
            log::info!("Created worksheet file {}", path.display());
        }

        Ok(CsvWorksheet::new(title, path, Arc::clone(&self.options)))
    }

    /// Titles sorted by name; directory order is not stable
    fn worksheet_titles(&self) -> BackendResult<Vec<String>> {
        let mut titles = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let matches = path
                .extension()
                .is_some_and(|ext| ext == self.options.extension.as_str());
            if !matches || !path.is_file() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                titles.push(stem.to_string());
            }
        }
        titles.sort();
        Ok(titles)
    }
}

/// Ids and titles become path components; reject anything that escapes the directory
fn check_name(name: &str) -> Result<(), CsvError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        Err(CsvError::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}
