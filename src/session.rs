//! Desk-script replay
//!
//! A session replays a desk script against a fresh [`Library`] dated by a
//! [`ManualClock`], then writes one report. It is the only caller of the
//! registry in the binary and goes through the public operations only.
//!
//! Rows are applied in file order. A malformed row or a rejected operation is
//! logged at `warn` and skipped; only a missing input file or a failed report
//! write ends the session early.

use crate::cli::ReportKind;
use crate::core::{Library, ManualClock};
use crate::io::{
    write_books_csv, write_loans_csv, write_members_csv, write_top_books_csv, DeskCommand,
    DeskEntry, SyncReader,
};
use crate::types::{Book, LibraryError, MemberId};
use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Number of books in the top-borrowed report when no limit is given
pub const DEFAULT_TOP: usize = 5;

/// Session settings
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Desk date before the first dated row
    pub start_date: NaiveDate,
    /// Report written after the script has run
    pub report: ReportKind,
    /// Limit for the top-borrowed report
    pub top: usize,
    /// Restrict the loans report to one member
    pub member: Option<MemberId>,
}

impl SessionConfig {
    /// Build a config; a `top` of zero falls back to [`DEFAULT_TOP`]
    pub fn new(
        start_date: NaiveDate,
        report: ReportKind,
        top: usize,
        member: Option<MemberId>,
    ) -> Self {
        let top = if top == 0 { DEFAULT_TOP } else { top };
        SessionConfig {
            start_date,
            report,
            top,
            member,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::new(
            Local::now().date_naive(),
            ReportKind::Catalog,
            DEFAULT_TOP,
            None,
        )
    }
}

/// Row counts for one replayed script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Rows whose operation succeeded
    pub applied: usize,
    /// Well-formed rows the registry rejected
    pub rejected: usize,
    /// Rows that could not be parsed
    pub malformed: usize,
}

/// Replay the script at `input_path` and write the configured report
///
/// # Errors
///
/// - `FileNotFound` / `IoError` if the script cannot be opened
/// - `IoError` / `ParseError` if the report cannot be written
pub fn process(
    config: &SessionConfig,
    input_path: &Path,
    output: &mut dyn Write,
) -> Result<SessionSummary, LibraryError> {
    let reader = SyncReader::new(input_path)?;
    let clock = Arc::new(ManualClock::new(config.start_date));
    let library = Library::with_clock(clock.clone());
    let mut summary = SessionSummary::default();

    for result in reader {
        match result {
            Ok(entry) => {
                let command = entry.command.name();
                match apply(&library, &clock, entry) {
                    Ok(()) => summary.applied += 1,
                    Err(e) => {
                        warn!(command, kind = ?e.kind(), "{}", e);
                        summary.rejected += 1;
                    }
                }
            }
            Err(e) => {
                warn!("{}", e);
                summary.malformed += 1;
            }
        }
    }

    info!(
        applied = summary.applied,
        rejected = summary.rejected,
        malformed = summary.malformed,
        "desk script finished"
    );

    write_report(config, &library, output)?;
    Ok(summary)
}

/// Run one desk command against the registry
fn apply(library: &Library, clock: &ManualClock, entry: DeskEntry) -> Result<(), LibraryError> {
    if let Some(date) = entry.date {
        clock.set(date);
    }
    let today = library.today();

    match entry.command {
        DeskCommand::AddBook {
            isbn,
            title,
            author,
            year,
            copies,
        } => {
            let book = Book::new_as_of(&isbn, title, author, year, copies, today.year())?;
            library.add_book(book)?;
        }
        DeskCommand::Register { name, email } => {
            library.new_member(name, email)?;
        }
        DeskCommand::Checkout { member, isbn, due } => {
            let due = match due {
                Some(due) => due,
                None => library.default_due_date()?,
            };
            if due <= today {
                return Err(LibraryError::InvalidDueDate { due, today });
            }
            library.checkout(member, &isbn, due)?;
        }
        DeskCommand::Return { loan } => {
            let fine = library.return_loan(loan)?;
            if fine > Decimal::ZERO {
                debug!(loan, %fine, "late return");
            }
        }
        DeskCommand::PayFine { member, amount } => {
            library.pay_fine(member, amount)?;
        }
        DeskCommand::Sweep => {
            library.sweep_overdue();
        }
    }

    Ok(())
}

fn write_report(
    config: &SessionConfig,
    library: &Library,
    output: &mut dyn Write,
) -> Result<(), LibraryError> {
    match config.report {
        ReportKind::Catalog => write_books_csv(&library.books(), output),
        ReportKind::Available => write_books_csv(&library.available_books(), output),
        ReportKind::TopBorrowed => {
            write_top_books_csv(&library.top_borrowed_books(config.top), output)
        }
        ReportKind::Members => write_members_csv(&library.members(), output),
        ReportKind::Fines => write_members_csv(&library.members_with_fines(), output),
        ReportKind::Loans => match config.member {
            Some(member) => write_loans_csv(&library.loans_for_member(member), output),
            None => write_loans_csv(&library.loans(), output),
        },
    }
}
