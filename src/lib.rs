//! Library Circulation Desk
//! # Overview
//!
//! In-memory model of a small library's circulation desk: a catalog of books
//! with copy counts, a roll of members with loan quotas and fines, and the
//! ledger of loans between them. All state lives in one [`Library`] that can
//! be shared between threads.
//!
//! # Architecture
//!
//! - [`types`] - Book, Member and Loan records, constants and [`LibraryError`]
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Single-threaded circulation engine
//!   - [`core::library`] - Thread-safe registry handle over the engine
//!   - [`core::catalog`], [`core::membership`], [`core::loan_ledger`] - Keyed collections
//! - [`io`] - Desk-script parsing and CSV reports
//! - [`session`] - Replays a desk script and writes a report
//! - [`cli`] - CLI argument parsing
//! - [`logging`] - `tracing` subscriber setup
//!
//! # Borrowing Rules
//!
//! - A member holds at most [`MAX_LOANS`] open loans
//! - A member owing more than [`MAX_FINE`] cannot borrow
//! - A late return costs [`COST_PER_DAY`] per day past the due date
//! - Returning a loan twice charges its fine once

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod session;
pub mod types;

pub use core::{Circulation, Clock, Insertion, Library, ManualClock, SystemClock};
pub use session::{process, SessionConfig, SessionSummary};
pub use types::{
    Book, ErrorKind, Isbn, LibraryError, Loan, LoanId, LoanState, Member, MemberId, COST_PER_DAY,
    LOAN_PERIOD_DAYS, MAX_FINE, MAX_LOANS,
};
