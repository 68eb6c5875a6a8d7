//! Support for the CSV rendition of the translation table.
//!
//! Same schema as the `.xlsx` sheet: a header row with `ClassName`, `Source`,
//! `Comment` and one column per supported language, then one row per key.
use std::io::{BufRead, Write};

use crate::{
    error::Error,
    formats::ColumnLayout,
    traits::Parser,
    types::{TABLE_HEADERS, TableRow},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub rows: Vec<TableRow>,
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        // Spreadsheet exports often prefix the first header with a BOM.
        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let layout = ColumnLayout::from_headers(headers.iter().map(String::as_str))?;

        // Rows may stop short of the header; missing cells read as empty.
        let mut rows = Vec::new();
        for result in rdr.records() {
            let cells: Vec<String> = result?.iter().map(str::to_string).collect();
            if cells.iter().all(String::is_empty) {
                continue;
            }
            rows.push(layout.row(&cells));
        }
        Ok(Format { rows })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(TABLE_HEADERS)?;
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
