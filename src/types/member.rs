//! Member-related types for the library desk
//!
//! This module defines the borrower record: identity, active loans and the
//! running fine balance.

use super::error::LibraryError;
use super::loan::LoanId;
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::LazyLock;

/// Member identifier
///
/// Assigned by the registry, ascending from [`FIRST_MEMBER_ID`].
pub type MemberId = u32;

/// First identifier handed out to a registered member
pub const FIRST_MEMBER_ID: MemberId = 1000;

/// Maximum number of concurrently active loans per member
pub const MAX_LOANS: usize = 3;

/// Fine balance above which a member may not borrow
pub const MAX_FINE: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+$").unwrap());

/// Library member
///
/// Holds back-references to its open loans by id only; the loans themselves
/// live in the registry's ledger.
///
/// Invariants:
/// - `active_loans.len() <= MAX_LOANS`
/// - `fines >= 0`
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    id: MemberId,
    name: String,
    email: String,
    active_loans: Vec<LoanId>,
    fines: Decimal,
}

impl Member {
    /// Create a member with no loans and no fines
    ///
    /// # Errors
    ///
    /// Returns `InvalidEmail` if `email` does not match `local@domain`.
    pub fn new(
        id: MemberId,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, LibraryError> {
        let email = email.into();
        validate_email(&email)?;

        Ok(Member {
            id,
            name: name.into(),
            email,
            active_loans: Vec::new(),
            fines: Decimal::ZERO,
        })
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Open loans in the order they were taken out
    pub fn active_loans(&self) -> &[LoanId] {
        &self.active_loans
    }

    pub fn active_loan_count(&self) -> usize {
        self.active_loans.len()
    }

    pub fn fines(&self) -> Decimal {
        self.fines
    }

    /// Whether the member is under the loan limit and the fine threshold
    pub fn can_borrow(&self) -> bool {
        self.active_loans.len() < MAX_LOANS && self.fines <= MAX_FINE
    }

    /// Record a new open loan
    ///
    /// Re-checks [`can_borrow`](Self::can_borrow) rather than trusting the caller.
    ///
    /// # Errors
    ///
    /// Returns `QuotaExceeded` if the member cannot borrow; nothing changes.
    pub fn add_active_loan(&mut self, loan: LoanId) -> Result<(), LibraryError> {
        if !self.can_borrow() {
            return Err(LibraryError::quota_exceeded(
                self.id,
                self.active_loans.len(),
                self.fines,
            ));
        }
        self.active_loans.push(loan);
        Ok(())
    }

    /// Drop a loan from the active list; no-op if it is not there
    pub fn remove_active_loan(&mut self, loan: LoanId) {
        self.active_loans.retain(|&id| id != loan);
    }

    /// Charge a fine; non-positive amounts are ignored
    pub fn add_fine(&mut self, amount: Decimal) {
        if amount <= Decimal::ZERO {
            return;
        }
        self.fines += amount;
    }

    /// Pay towards the balance; non-positive amounts are ignored
    ///
    /// Overpayment clamps the balance at zero.
    pub fn pay_fine(&mut self, amount: Decimal) {
        if amount <= Decimal::ZERO {
            return;
        }
        self.fines = (self.fines - amount).max(Decimal::ZERO);
    }
}

/// Check an email against the `local@domain` pattern
pub fn validate_email(email: &str) -> Result<(), LibraryError> {
    if EMAIL.is_match(email) {
        Ok(())
    } else {
        Err(LibraryError::invalid_email(email))
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Member[{}] {} <{}> | active loans: {} | fines: {:.2}",
            self.id,
            self.name,
            self.email,
            self.active_loans.len(),
            self.fines
        )
    }
}
