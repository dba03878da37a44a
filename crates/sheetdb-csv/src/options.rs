//! CSV backend options

/// How worksheet files are located, parsed and rewritten
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Separator between fields (default: `,`)
    pub delimiter: u8,
    /// Quoting byte for fields holding the separator or newlines (default: `"`)
    pub quote: u8,
    /// Worksheet file extension, without the dot (default: `csv`)
    pub extension: String,
    /// Create missing document directories and worksheet files on open
    pub create_missing: bool,
    /// Line terminator used when rewriting files
    pub line_terminator: LineTerminator,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            extension: "csv".to_string(),
            create_missing: false,
            line_terminator: LineTerminator::LF,
        }
    }
}

/// Line ending written when a worksheet file is saved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// `\n`
    LF,
    /// `\r\n`
    CRLF,
}

impl LineTerminator {
    pub(crate) fn to_csv(self) -> csv::Terminator {
        match self {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        }
    }
}
