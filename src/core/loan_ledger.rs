//! Loan ledger
//!
//! This module provides the `LoanLedger` component that keeps every loan
//! ever made, open or closed. The ledger is the source for a member's loan
//! history and for the overdue sweep.
//!
//! Loans are never removed: a returned loan stays in the ledger with its
//! return date so the history report can show it.

use crate::types::{Loan, LoanId, MemberId};
use chrono::NaiveDate;
use std::collections::HashMap;

/// All loans by id
#[derive(Debug, Default)]
pub struct LoanLedger {
    /// Map of loan ID to loan record
    loans: HashMap<LoanId, Loan>,
}

impl LoanLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        LoanLedger {
            loans: HashMap::new(),
        }
    }

    /// Record a loan
    ///
    /// If a loan with the same id is already recorded the new one is
    /// ignored; ids come from a monotonic sequence so this does not happen
    /// in practice.
    pub fn store(&mut self, loan: Loan) {
        self.loans.entry(loan.id()).or_insert(loan);
    }

    pub fn get(&self, id: LoanId) -> Option<&Loan> {
        self.loans.get(&id)
    }

    pub fn get_mut(&mut self, id: LoanId) -> Option<&mut Loan> {
        self.loans.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    /// Every loan, sorted by id
    pub fn all(&self) -> Vec<&Loan> {
        let mut loans: Vec<&Loan> = self.loans.values().collect();
        loans.sort_by_key(|loan| loan.id());
        loans
    }

    /// A member's loans, open and closed, newest loan date first
    ///
    /// Loans made on the same day are ordered newest id first.
    pub fn for_member(&self, member: MemberId) -> Vec<&Loan> {
        let mut loans: Vec<&Loan> = self
            .loans
            .values()
            .filter(|loan| loan.member() == member)
            .collect();
        loans.sort_by(|a, b| {
            b.loan_date()
                .cmp(&a.loan_date())
                .then(b.id().cmp(&a.id()))
        });
        loans
    }

    /// Flag every open, past-due loan as overdue
    ///
    /// Returns the number of loans whose state changed.
    pub fn mark_overdue(&mut self, today: NaiveDate) -> usize {
        self.loans
            .values_mut()
            .filter(|loan| loan.is_open())
            .map(|loan| loan.mark_overdue_if_applicable(today))
            .filter(|&changed| changed)
            .count()
    }
}
