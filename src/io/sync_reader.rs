//! Synchronous desk-script reader with iterator interface
//!
//! Streams [`DeskEntry`] commands from a CSV file one row at a time,
//! delegating format concerns to the csv_format module.
//!
//! ```no_run
//! use library_desk::io::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("desk.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(entry) => println!("{}", entry.command.name()),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - A missing or unreadable file is returned from `new()`
//! - Row errors are yielded as `ParseError` carrying the 1-based line number

use crate::io::csv_format::{convert_desk_record, DeskEntry, DeskRecord};
use crate::types::LibraryError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Streaming reader over a desk script
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    record: StringRecord,
}

impl SyncReader {
    /// Open a desk script and read its header row
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if the path does not exist
    /// - `IoError` / `ParseError` if the file cannot be opened or has no
    ///   readable header
    pub fn new(path: &Path) -> Result<Self, LibraryError> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LibraryError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                LibraryError::from(e)
            }
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        Ok(SyncReader {
            reader,
            headers,
            record: StringRecord::new(),
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<DeskEntry, LibraryError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Err(e) => Some(Err(e.into())),
            Ok(true) => {
                let line = self.record.position().map(|pos| pos.line());
                let entry = self
                    .record
                    .deserialize::<DeskRecord>(Some(&self.headers))
                    .map_err(|e| e.to_string())
                    .and_then(convert_desk_record)
                    .map_err(|message| LibraryError::ParseError { line, message });
                Some(entry)
            }
        }
    }
}
