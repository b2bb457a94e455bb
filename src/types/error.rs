//! Error types for the library desk
//!
//! This module defines all error types that can occur while operating the
//! circulation desk. Errors are designed to be descriptive and user-friendly
//! for CLI output.
//!
//! # Error Categories
//!
//! - **Validation Errors**: Malformed ISBN, year, copy count, email or due date
//! - **Not Found Errors**: Unknown member, book or loan
//! - **Quota Errors**: Member at the loan limit or over the fine threshold
//! - **Availability Errors**: No copies left to lend
//! - **File I/O and Parse Errors**: Only raised by the desk-script layer
//!
//! Every domain error leaves the registry untouched: operations validate
//! before they mutate.

use crate::types::{LoanId, MemberId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Coarse classification of a [`LibraryError`]
///
/// Callers (the presentation layer) decide whether to re-prompt based on the
/// kind, never on the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; the entity or operation was rejected wholesale
    Validation,
    /// Unknown member, ISBN or loan id
    NotFound,
    /// Member cannot borrow (loan limit or fine threshold)
    QuotaExceeded,
    /// No copies left
    Unavailable,
    /// File could not be opened, read or written
    Io,
    /// Desk-script row could not be parsed
    Parse,
}

/// Main error type for the library desk
///
/// This enum represents all possible errors that can occur during desk
/// operations. Each variant includes relevant context to help diagnose the
/// rejected request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LibraryError {
    /// ISBN is not exactly 13 digits
    #[error("Invalid ISBN '{isbn}': must be exactly 13 digits")]
    InvalidIsbn {
        /// The rejected ISBN text
        isbn: String,
    },

    /// Publication year outside [1500, current year]
    #[error("Invalid publication year {year}: must be between 1500 and {max}")]
    InvalidYear {
        /// The rejected year
        year: i32,
        /// The current year at validation time
        max: i32,
    },

    /// Copy count is zero or negative
    #[error("Invalid copy count {copies}: must be at least 1")]
    InvalidCopies {
        /// The rejected copy count
        copies: i32,
    },

    /// Email does not look like `local@domain`
    #[error("Invalid email '{email}'")]
    InvalidEmail {
        /// The rejected email text
        email: String,
    },

    /// Due date is not after the desk date
    #[error("Due date {due} must be after {today}")]
    InvalidDueDate {
        /// Requested due date
        due: NaiveDate,
        /// Desk date at request time
        today: NaiveDate,
    },

    /// Adding the loan period to the desk date leaves the calendar
    #[error("Date {from} plus {days} days is out of range")]
    DateOutOfRange {
        /// Date the period starts from
        from: NaiveDate,
        /// Length of the period in days
        days: u64,
    },

    /// Member id outside the range the registry can hand out
    #[error("Member id {member} is out of range")]
    MemberIdOutOfRange {
        /// The rejected member id
        member: MemberId,
    },

    /// No member or loan ids are left to hand out
    #[error("No {sequence} ids left")]
    IdsExhausted {
        /// Which sequence ran out: "member" or "loan"
        sequence: &'static str,
    },

    /// A member with this id is already registered
    #[error("Member {member} is already registered")]
    DuplicateMember {
        /// The conflicting member id
        member: MemberId,
    },

    /// No book with this ISBN in the catalog
    #[error("Book {isbn} not found")]
    BookNotFound {
        /// ISBN that was looked up
        isbn: String,
    },

    /// No member with this id
    #[error("Member {member} not found")]
    MemberNotFound {
        /// Member id that was looked up
        member: MemberId,
    },

    /// No loan with this id
    #[error("Loan {loan} not found")]
    LoanNotFound {
        /// Loan id that was looked up
        loan: LoanId,
    },

    /// Member is at the loan limit or owes more than the fine threshold
    #[error("Member {member} cannot borrow: {active_loans} active loans, fines {fines}")]
    QuotaExceeded {
        /// Member id
        member: MemberId,
        /// Active loans at check time
        active_loans: usize,
        /// Fine balance at check time
        fines: Decimal,
    },

    /// Every copy of the book is on loan
    #[error("No copies of {isbn} available")]
    Unavailable {
        /// ISBN of the requested book
        isbn: String,
    },

    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents a desk script from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// Desk-script parse error
    ///
    /// This is a recoverable error - the malformed row is skipped
    /// and processing continues with the next one.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl LibraryError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LibraryError::InvalidIsbn { .. }
            | LibraryError::InvalidYear { .. }
            | LibraryError::InvalidCopies { .. }
            | LibraryError::InvalidEmail { .. }
            | LibraryError::InvalidDueDate { .. }
            | LibraryError::DateOutOfRange { .. }
            | LibraryError::MemberIdOutOfRange { .. }
            | LibraryError::IdsExhausted { .. }
            | LibraryError::DuplicateMember { .. } => ErrorKind::Validation,
            LibraryError::BookNotFound { .. }
            | LibraryError::MemberNotFound { .. }
            | LibraryError::LoanNotFound { .. } => ErrorKind::NotFound,
            LibraryError::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            LibraryError::Unavailable { .. } => ErrorKind::Unavailable,
            LibraryError::FileNotFound { .. } | LibraryError::IoError { .. } => ErrorKind::Io,
            LibraryError::ParseError { .. } => ErrorKind::Parse,
        }
    }
}

// Conversion from io::Error to LibraryError
impl From<std::io::Error> for LibraryError {
    fn from(error: std::io::Error) -> Self {
        LibraryError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LibraryError
impl From<csv::Error> for LibraryError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LibraryError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LibraryError {
    /// Create an InvalidIsbn error
    pub fn invalid_isbn(isbn: &str) -> Self {
        LibraryError::InvalidIsbn {
            isbn: isbn.to_string(),
        }
    }

    /// Create an InvalidEmail error
    pub fn invalid_email(email: &str) -> Self {
        LibraryError::InvalidEmail {
            email: email.to_string(),
        }
    }

    /// Create a BookNotFound error
    pub fn book_not_found(isbn: &str) -> Self {
        LibraryError::BookNotFound {
            isbn: isbn.to_string(),
        }
    }

    /// Create a MemberNotFound error
    pub fn member_not_found(member: MemberId) -> Self {
        LibraryError::MemberNotFound { member }
    }

    /// Create a LoanNotFound error
    pub fn loan_not_found(loan: LoanId) -> Self {
        LibraryError::LoanNotFound { loan }
    }

    /// Create a QuotaExceeded error
    pub fn quota_exceeded(member: MemberId, active_loans: usize, fines: Decimal) -> Self {
        LibraryError::QuotaExceeded {
            member,
            active_loans,
            fines,
        }
    }

    /// Create an Unavailable error
    pub fn unavailable(isbn: &str) -> Self {
        LibraryError::Unavailable {
            isbn: isbn.to_string(),
        }
    }

    /// Create a ParseError without line information
    pub fn parse(message: impl Into<String>) -> Self {
        LibraryError::ParseError {
            line: None,
            message: message.into(),
        }
    }
}
