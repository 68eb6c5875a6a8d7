//! All file formats handled by tsheet.
//!
//! `.ts` documents live in [`ts`]; the translation table can be stored as
//! `.xlsx` ([`xlsx`]) or `.csv` ([`csv`]), selected through [`TableFormat`].

pub mod csv;
pub mod ts;
pub mod xlsx;

use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
    str::FromStr,
};

// Reexporting the formats for easier access
pub use csv::Format as CsvFormat;
pub use ts::Format as TsFormat;
pub use xlsx::Format as XlsxFormat;

use crate::{
    error::Error,
    traits::Parser,
    types::{COLUMN_COUNT, TABLE_HEADERS, TableRow},
};

/// Extension given to a table path that has none.
pub const DEFAULT_TABLE_EXTENSION: &str = "xlsx";

/// Storage formats for the translation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Excel workbook, first worksheet.
    Xlsx,
    /// Comma-separated values with a header row.
    Csv,
}

impl Display for TableFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TableFormat::Xlsx => write!(f, "xlsx"),
            TableFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Accepts `"xlsx"` and `"csv"`, case-insensitively.
impl FromStr for TableFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(TableFormat::Xlsx),
            "csv" => Ok(TableFormat::Csv),
            other => Err(Error::UnsupportedFormat(format!(
                "unsupported table extension `{other}`"
            ))),
        }
    }
}

impl TableFormat {
    /// Infers the table format from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => ext.parse(),
            None => Err(Error::UnsupportedFormat(format!(
                "cannot infer table format of {}",
                path.display()
            ))),
        }
    }
}

/// Appends the default `.xlsx` extension to a table path without one.
pub fn normalize_table_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DEFAULT_TABLE_EXTENSION)
    }
}

/// Reads the table at `path`, in the format implied by its extension.
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Vec<TableRow>, Error> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let rows = match TableFormat::from_path(path)? {
        TableFormat::Xlsx => XlsxFormat::read_from(path)?.rows,
        TableFormat::Csv => CsvFormat::read_from(path)?.rows,
    };
    Ok(rows)
}

/// Writes `rows` to `path`, in the format implied by its extension.
pub fn write_table<P: AsRef<Path>>(path: P, rows: Vec<TableRow>) -> Result<(), Error> {
    let path = path.as_ref();
    match TableFormat::from_path(path)? {
        TableFormat::Xlsx => XlsxFormat { rows }.write_to(path),
        TableFormat::Csv => CsvFormat { rows }.write_to(path),
    }
}

/// Where each schema column sits in a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnLayout {
    indices: [Option<usize>; COLUMN_COUNT],
}

impl ColumnLayout {
    /// Maps header cells to schema columns.
    ///
    /// Blank headers are ignored. Any other header outside the schema is rejected,
    /// so an unexpected language never grows the table. `ClassName` and `Source`
    /// are required.
    pub(crate) fn from_headers<'a>(
        headers: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, Error> {
        let mut indices = [None; COLUMN_COUNT];
        for (position, header) in headers.into_iter().enumerate() {
            let header = header.trim();
            if header.is_empty() {
                continue;
            }
            let column = TABLE_HEADERS
                .iter()
                .position(|known| *known == header)
                .ok_or_else(|| Error::UnsupportedLanguage(header.to_string()))?;
            if indices[column].replace(position).is_some() {
                return Err(Error::InvalidTable(format!("duplicate `{header}` column")));
            }
        }

        for (column, required) in TABLE_HEADERS.iter().enumerate().take(2) {
            if indices[column].is_none() {
                return Err(Error::InvalidTable(format!("missing `{required}` column")));
            }
        }
        Ok(Self { indices })
    }

    /// Picks the schema cells out of one data row; absent cells are empty.
    pub(crate) fn row(&self, cells: &[String]) -> TableRow {
        TableRow::from_cells(std::array::from_fn(|column| {
            self.indices[column]
                .and_then(|position| cells.get(position))
                .cloned()
                .unwrap_or_default()
        }))
    }
}
