//! Traits for format-agnostic parsing and serialization in tsheet.

use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    path::Path,
};

use tempfile::NamedTempFile;

use crate::error::Error;

/// A trait for parsing and writing one document or table from/to one file.
///
/// # Example
///
/// ```rust,no_run
/// use tsheet::traits::Parser;
/// let table = tsheet::formats::csv::Format::read_from("strings.csv")?;
/// table.write_to("strings_copy.csv")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path).map_err(Error::Io)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    ///
    /// The output is written to a temporary file next to `path` and renamed
    /// over it, so an interrupted write never leaves a truncated file behind.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            self.to_writer(&mut writer)?;
            writer.flush()?;
        }
        file.as_file().sync_all()?;
        if let Ok(metadata) = fs::metadata(path) {
            fs::set_permissions(file.path(), metadata.permissions())?;
        }
        file.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}
