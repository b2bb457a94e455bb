//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `book`: Catalog entries and ISBN validation
//! - `member`: Borrowers, quotas and fine balances
//! - `loan`: Loan records and their lifecycle
//! - `error`: Error types for the library desk

pub mod book;
pub mod error;
pub mod loan;
pub mod member;

pub use book::{Book, Isbn, MIN_PUBLICATION_YEAR};
pub use error::{ErrorKind, LibraryError};
pub use loan::{Loan, LoanId, LoanState, COST_PER_DAY, FIRST_LOAN_ID, LOAN_PERIOD_DAYS};
pub use member::{Member, MemberId, FIRST_MEMBER_ID, MAX_FINE, MAX_LOANS};
