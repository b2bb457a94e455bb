//! I/O module
//!
//! Handles desk-script parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, report serialization)
//! - `sync_reader` - Streaming desk-script reader with iterator interface

pub mod csv_format;
pub mod sync_reader;

pub use csv_format::{
    convert_desk_record, parse_date, write_books_csv, write_loans_csv, write_members_csv,
    write_top_books_csv, DeskCommand, DeskEntry, DeskRecord, DATE_FORMAT,
};
pub use sync_reader::SyncReader;
