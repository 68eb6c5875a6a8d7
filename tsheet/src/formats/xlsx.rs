//! Support for the `.xlsx` translation table.
//!
//! The first worksheet holds the table: a header row followed by one row per key.
//! Every cell is written as a string; on read, non-string cells are taken by their
//! display text and empty cells become empty strings.
use std::io::{BufRead, Cursor, Read, Write};

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;

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
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        // The zip container needs random access.
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let mut workbook = Xlsx::new(Cursor::new(bytes))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::InvalidTable("workbook has no worksheet".to_string()))??;

        let mut lines = range.rows();
        let Some(header) = lines.next() else {
            return Err(Error::InvalidTable("worksheet is empty".to_string()));
        };
        let header: Vec<String> = header.iter().map(cell_text).collect();
        let layout = ColumnLayout::from_headers(header.iter().map(String::as_str))?;

        let mut rows = Vec::new();
        for line in lines {
            let cells: Vec<String> = line.iter().map(cell_text).collect();
            if cells.iter().all(String::is_empty) {
                continue;
            }
            rows.push(layout.row(&cells));
        }
        Ok(Format { rows })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (column, header) in TABLE_HEADERS.iter().enumerate() {
            worksheet.write_string(0, column as u16, *header)?;
        }
        for (index, row) in self.rows.iter().enumerate() {
            let line = u32::try_from(index + 1)
                .map_err(|_| Error::InvalidTable("too many rows for one worksheet".to_string()))?;
            for (column, cell) in row.cells().iter().enumerate() {
                if !cell.is_empty() {
                    worksheet.write_string(line, column as u16, *cell)?;
                }
            }
        }

        let buffer = workbook.save_to_buffer()?;
        writer.write_all(&buffer)?;
        writer.flush()?;
        Ok(())
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
