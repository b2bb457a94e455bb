//! Loan-related types for the library desk
//!
//! A loan links a member and a book for a period of time. Its lifecycle is a
//! small state machine:
//!
//! ```text
//! Active ──return, on time──▶ Returned
//!   │
//!   ├──return, late─────────▶ Overdue (fine charged)
//!   └──sweep, past due──────▶ Overdue (still open)
//! ```
//!
//! Transitions are monotone; nothing moves back to `Active`. Paying a fine
//! later does not rewrite the loan's historical state.

use super::book::Isbn;
use super::member::MemberId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

/// Loan identifier
///
/// Assigned by the registry, ascending from [`FIRST_LOAN_ID`].
pub type LoanId = u32;

/// First identifier handed out to a loan
pub const FIRST_LOAN_ID: LoanId = 1;

/// Fine charged per whole day past the due date
pub const COST_PER_DAY: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Default loan period when no due date is given
pub const LOAN_PERIOD_DAYS: u64 = 14;

/// Loan lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanState {
    /// Lent out, not yet due or not yet swept
    Active,
    /// Past due: either swept while open, or returned late with a fine
    Overdue,
    /// Returned on time
    Returned,
}

impl LoanState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanState::Active => "active",
            LoanState::Overdue => "overdue",
            LoanState::Returned => "returned",
        }
    }
}

impl fmt::Display for LoanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single lending transaction
///
/// Refers to its member and book by key; the registry resolves them.
#[derive(Debug, Clone, PartialEq)]
pub struct Loan {
    id: LoanId,
    member: MemberId,
    isbn: Isbn,
    loan_date: NaiveDate,
    due_date: NaiveDate,
    return_date: Option<NaiveDate>,
    state: LoanState,
}

impl Loan {
    /// Open a new loan dated `loan_date`
    pub fn new(
        id: LoanId,
        member: MemberId,
        isbn: Isbn,
        loan_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Loan {
            id,
            member,
            isbn,
            loan_date,
            due_date,
            return_date: None,
            state: LoanState::Active,
        }
    }

    pub fn id(&self) -> LoanId {
        self.id
    }

    pub fn member(&self) -> MemberId {
        self.member
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn loan_date(&self) -> NaiveDate {
        self.loan_date
    }

    pub fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn state(&self) -> LoanState {
        self.state
    }

    /// Whether the copy is still out (and counts against the member's quota)
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }

    /// Fine owed if the book came back on `reference`
    ///
    /// Zero on or before the due date, otherwise [`COST_PER_DAY`] per whole
    /// day late. Pure: works for hypothetical dates.
    pub fn compute_fine(&self, reference: NaiveDate) -> Decimal {
        if reference <= self.due_date {
            return Decimal::ZERO;
        }
        let days_late = (reference - self.due_date).num_days();
        COST_PER_DAY * Decimal::from(days_late)
    }

    /// Close the loan on `today` and return the fine due
    ///
    /// Idempotent: a loan that already has a return date yields zero and is
    /// left as is. A late return ends in `Overdue`, an on-time one in
    /// `Returned`.
    pub fn close(&mut self, today: NaiveDate) -> Decimal {
        if !self.is_open() {
            return Decimal::ZERO;
        }
        let fine = self.compute_fine(today);
        self.return_date = Some(today);
        self.state = if fine > Decimal::ZERO {
            LoanState::Overdue
        } else {
            LoanState::Returned
        };
        fine
    }

    /// Flag an active loan as overdue once `today` is past the due date
    ///
    /// Returns whether the state changed.
    pub fn mark_overdue_if_applicable(&mut self, today: NaiveDate) -> bool {
        if self.state == LoanState::Active && today > self.due_date {
            self.state = LoanState::Overdue;
            return true;
        }
        false
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loan[{}] member {} -> {} | from {} due {} | {}",
            self.id, self.member, self.isbn, self.loan_date, self.due_date, self.state
        )
    }
}
