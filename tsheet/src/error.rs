//! All error types for the tsheet crate.
//!
//! These are returned from all fallible operations (parsing, merging, serialization, batch runs).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("no language declared in {}", .0.display())]
    MissingLanguage(PathBuf),

    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("unsupported language `{0}`")]
    UnsupportedLanguage(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid table: {0}")]
    InvalidTable(String),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("worker pool error: {0}")]
    ThreadPool(String),
}

impl Error {
    /// Creates a new malformed record error
    pub fn malformed(detail: impl Into<String>) -> Self {
        Error::MalformedRecord(detail.into())
    }
}
