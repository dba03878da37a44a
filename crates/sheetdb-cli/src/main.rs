//! sheetdb CLI - inspect and export CSV-backed record stores

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sheetdb::backend::{Connector, Document};
use sheetdb::{CellAddress, ReadFailurePolicy, Sheet, TableOptions};
use sheetdb_csv::{CsvConnector, CsvDocument, CsvOptions, CsvWorksheet};
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetdb")]
#[command(author, version, about = "Inspect and export CSV-backed sheetdb tables")]
struct Cli {
    /// Directory holding one sub-directory per document
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Field delimiter (default: comma)
    #[arg(short, long, global = true, default_value = ",")]
    delimiter: char,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the worksheets of a document
    Sheets {
        /// Document id (directory name under the root)
        document: String,
    },

    /// Show row and column counts for every worksheet of a document
    Info {
        /// Document id
        document: String,
    },

    /// Print the header row of a worksheet
    Header {
        /// Document id
        document: String,

        /// Worksheet title
        sheet: String,

        /// 1-based header row
        #[arg(long, default_value = "1")]
        header_row: u32,
    },

    /// Export a worksheet's records as YAML
    #[command(alias = "yaml")]
    Export {
        /// Document id
        document: String,

        /// Worksheet title
        sheet: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only export these columns (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Columns to export as stored text, without number detection
        #[arg(long, value_delimiter = ',')]
        raw: Vec<String>,

        /// Top-level key of the export (default: the worksheet title)
        #[arg(short, long)]
        name: Option<String>,

        /// 1-based header row
        #[arg(long, default_value = "1")]
        header_row: u32,
    },

    /// Remove every data row, keeping the header
    Init {
        /// Document id
        document: String,

        /// Worksheet title
        sheet: String,

        /// 1-based header row
        #[arg(long, default_value = "1")]
        header_row: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let connector = connector(&cli.root, cli.delimiter)?;

    match cli.command {
        Commands::Sheets { document } => list_sheets(&connector, &document),
        Commands::Info { document } => show_info(&connector, &document),
        Commands::Header {
            document,
            sheet,
            header_row,
        } => show_header(&open_sheet(&connector, &document, &sheet, header_row)?),
        Commands::Export {
            document,
            sheet,
            output,
            columns,
            raw,
            name,
            header_row,
        } => {
            let view = open_sheet(&connector, &document, &sheet, header_row)?;
            let view = match name {
                Some(name) => rename(view, name),
                None => view,
            };
            export(&view.with_type_hints(raw), output.as_deref(), &columns)
        }
        Commands::Init {
            document,
            sheet,
            header_row,
        } => init(&open_sheet(&connector, &document, &sheet, header_row)?),
    }
}

fn connector(root: &Path, delimiter: char) -> Result<CsvConnector> {
    if !delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got '{}'", delimiter);
    }
    if !root.is_dir() {
        bail!("Root '{}' is not a directory", root.display());
    }
    let options = CsvOptions {
        delimiter: delimiter as u8,
        ..CsvOptions::default()
    };
    Ok(CsvConnector::new(root, options))
}

fn open_document(connector: &CsvConnector, document: &str) -> Result<CsvDocument> {
    connector
        .open_document(document)
        .with_context(|| format!("Failed to open document '{}'", document))
}

/// Schema-less view of one worksheet; read failures are reported, not hidden
fn open_sheet(
    connector: &CsvConnector,
    document: &str,
    title: &str,
    header_row: u32,
) -> Result<Sheet<CsvWorksheet>> {
    let worksheet = open_document(connector, document)?
        .worksheet(title)
        .with_context(|| format!("Worksheet '{}' not found in '{}'", title, document))?;
    let options = TableOptions {
        header_row,
        read_failure: ReadFailurePolicy::Propagate,
    };
    Ok(Sheet::with_options(title, worksheet, options))
}

fn rename(view: Sheet<CsvWorksheet>, name: String) -> Sheet<CsvWorksheet> {
    Sheet::with_options(name, view.worksheet().clone(), view.options().clone())
}

fn list_sheets(connector: &CsvConnector, document: &str) -> Result<()> {
    let titles = open_document(connector, document)?
        .worksheet_titles()
        .with_context(|| format!("Failed to list worksheets of '{}'", document))?;

    for (i, title) in titles.iter().enumerate() {
        println!("{}\t{}", i, title);
    }

    Ok(())
}

fn show_info(connector: &CsvConnector, document: &str) -> Result<()> {
    let doc = open_document(connector, document)?;
    let titles = doc
        .worksheet_titles()
        .with_context(|| format!("Failed to list worksheets of '{}'", document))?;

    println!("Document: {}", doc.dir().display());
    println!("Sheets: {}", titles.len());

    for title in &titles {
        let view = open_sheet(connector, document, title, 1)?;
        let header = view
            .header()
            .with_context(|| format!("Failed to read '{}'", title))?;
        let rows = view
            .data_records()
            .with_context(|| format!("Failed to read '{}'", title))?
            .count();

        println!();
        println!("  Sheet \"{}\"", title);
        if header.is_empty() {
            println!("    Header: empty");
        } else {
            println!("    Header: {} columns", header.len());
        }
        println!("    Records: {}", rows);
    }

    Ok(())
}

fn show_header(view: &Sheet<CsvWorksheet>) -> Result<()> {
    let header = view
        .header()
        .with_context(|| format!("Failed to read '{}'", view.name()))?;

    if header.is_empty() {
        eprintln!("Warning: '{}' has no header row", view.name());
    }
    for (i, column) in header.iter().enumerate() {
        println!("{}\t{}", CellAddress::column_name(i as u16), column);
    }

    Ok(())
}

fn export(view: &Sheet<CsvWorksheet>, output: Option<&Path>, columns: &[String]) -> Result<()> {
    let columns: BTreeSet<String> = columns.iter().cloned().collect();
    let columns = (!columns.is_empty()).then_some(&columns);

    if let Some(path) = output {
        view.export(path, columns)
            .with_context(|| format!("Failed to export '{}' to '{}'", view.name(), path.display()))?;
        eprintln!("Exported '{}' to '{}'", view.name(), path.display());
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        view.export_to_writer(&mut handle, columns)
            .with_context(|| format!("Failed to export '{}'", view.name()))?;
        handle.flush().context("Failed to write to stdout")?;
    }

    Ok(())
}

fn init(view: &Sheet<CsvWorksheet>) -> Result<()> {
    let header = view
        .header()
        .with_context(|| format!("Failed to read '{}'", view.name()))?;
    if header.is_empty() {
        bail!("'{}' has no header row to keep", view.name());
    }

    view.initialize()
        .with_context(|| format!("Failed to initialize '{}'", view.name()))?;
    eprintln!("Reset '{}' to its {} header columns", view.name(), header.len());

    Ok(())
}
