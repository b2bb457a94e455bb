//! Circulation engine
//!
//! This module provides the `Circulation` engine that orchestrates desk
//! operations by coordinating between the Catalog, MemberRoll and LoanLedger
//! components.
//!
//! The engine enforces business rules that span more than one entity:
//! - Checkout validates member and book, then moves a copy, opens the loan
//!   and attaches it to the member in one step
//! - Return closes the loan, shelves the copy, detaches the loan from the
//!   member and charges any fine in one step
//! - Every operation validates before it mutates, so a failure leaves all
//!   three collections untouched
//!
//! `Circulation` is single-threaded (`&mut self`). The thread-safe handle is
//! [`Library`](crate::core::library::Library), which wraps one engine behind
//! a lock and supplies the date.

use crate::core::catalog::{Catalog, Insertion};
use crate::core::loan_ledger::LoanLedger;
use crate::core::membership::MemberRoll;
use crate::core::sequence::IdSequence;
use crate::types::{
    Book, LibraryError, Loan, LoanId, Member, MemberId, FIRST_LOAN_ID, FIRST_MEMBER_ID,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Circulation desk engine
///
/// Owns the canonical collections (books by ISBN, members by id, loans by
/// id) and the id sequences.
#[derive(Debug)]
pub struct Circulation {
    catalog: Catalog,
    members: MemberRoll,
    loans: LoanLedger,
    member_ids: IdSequence,
    loan_ids: IdSequence,
}

impl Circulation {
    /// Create an empty desk
    ///
    /// Member ids start at 1000 and loan ids at 1.
    pub fn new() -> Self {
        Circulation {
            catalog: Catalog::new(),
            members: MemberRoll::new(),
            loans: LoanLedger::new(),
            member_ids: IdSequence::starting_at(FIRST_MEMBER_ID),
            loan_ids: IdSequence::starting_at(FIRST_LOAN_ID),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn members(&self) -> &MemberRoll {
        &self.members
    }

    pub fn loans(&self) -> &LoanLedger {
        &self.loans
    }

    /// Add a book to the catalog, merging copies into a known ISBN
    pub fn add_book(&mut self, book: Book) -> Result<Insertion, LibraryError> {
        let isbn = book.isbn().clone();
        let outcome = self.catalog.add(book)?;
        info!(%isbn, ?outcome, "catalog updated");
        Ok(outcome)
    }

    /// Create and register a member with the next free id
    ///
    /// The email is validated before an id is taken, so rejected
    /// registrations leave no gap in the sequence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEmail` for a malformed email.
    pub fn new_member(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Member, LibraryError> {
        let id = self
            .member_ids
            .peek()
            .ok_or(LibraryError::IdsExhausted { sequence: "member" })?;
        let member = Member::new(id, name, email)?;
        self.insert_member(member.clone())?;
        Ok(member)
    }

    /// Register an already constructed member under its own id
    ///
    /// # Errors
    ///
    /// Returns `MemberIdOutOfRange` for `u32::MAX`, which would leave no id
    /// for later registrations, and `DuplicateMember` if the id is taken.
    pub fn register_member(&mut self, member: Member) -> Result<MemberId, LibraryError> {
        if !self.member_ids.can_observe(member.id()) {
            return Err(LibraryError::MemberIdOutOfRange {
                member: member.id(),
            });
        }
        self.insert_member(member)
    }

    fn insert_member(&mut self, member: Member) -> Result<MemberId, LibraryError> {
        let id = self.members.insert(member)?;
        self.member_ids.observe(id);
        info!(member = id, "member registered");
        Ok(id)
    }

    /// Lend a copy of `isbn` to `member_id` until `due_date`
    ///
    /// Checks run in this order, and the first failure is returned with no
    /// state changed:
    /// 1. Member exists, then book exists (`MemberNotFound` / `BookNotFound`)
    /// 2. Member can borrow (`QuotaExceeded`)
    /// 3. A copy is on the shelf (`Unavailable`)
    /// 4. A loan id is left (`IdsExhausted`)
    ///
    /// On success the copy leaves the shelf, the loan is recorded, and the
    /// member's active list gains the loan id.
    pub fn checkout(
        &mut self,
        member_id: MemberId,
        isbn: &str,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Loan, LibraryError> {
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::member_not_found(member_id))?;
        let book = self
            .catalog
            .get_mut(isbn)
            .ok_or_else(|| LibraryError::book_not_found(isbn))?;

        if !member.can_borrow() {
            return Err(LibraryError::quota_exceeded(
                member_id,
                member.active_loan_count(),
                member.fines(),
            ));
        }
        if !book.is_available() {
            return Err(LibraryError::unavailable(isbn));
        }

        // Both guards above hold for the rest of this call: nothing else can
        // touch the member or the book while `self` is mutably borrowed.
        let loan_id = self
            .loan_ids
            .peek()
            .ok_or(LibraryError::IdsExhausted { sequence: "loan" })?;
        let loan = Loan::new(
            loan_id,
            member_id,
            book.isbn().clone(),
            today,
            due_date,
        );
        member.add_active_loan(loan.id())?;
        if let Err(e) = book.checkout_one_copy() {
            member.remove_active_loan(loan.id());
            return Err(e);
        }
        self.loan_ids.next_id();
        self.loans.store(loan.clone());

        info!(
            loan = loan.id(),
            member = member_id,
            %isbn,
            due = %due_date,
            "checkout recorded"
        );
        Ok(loan)
    }

    /// Take back the copy lent under `loan_id` and return the fine charged
    ///
    /// A loan that was already returned yields a zero fine and changes
    /// nothing, so a repeated return never charges twice.
    ///
    /// # Errors
    ///
    /// Returns `LoanNotFound` for an unknown id.
    pub fn return_loan(
        &mut self,
        loan_id: LoanId,
        today: NaiveDate,
    ) -> Result<Decimal, LibraryError> {
        let loan = self
            .loans
            .get_mut(loan_id)
            .ok_or_else(|| LibraryError::loan_not_found(loan_id))?;
        if !loan.is_open() {
            debug!(loan = loan_id, "loan already returned");
            return Ok(Decimal::ZERO);
        }

        let fine = loan.close(today);
        if let Some(book) = self.catalog.get_mut(loan.isbn().as_str()) {
            book.return_one_copy();
        }
        if let Some(member) = self.members.get_mut(loan.member()) {
            member.remove_active_loan(loan_id);
            member.add_fine(fine);
        }

        info!(
            loan = loan_id,
            member = loan.member(),
            isbn = %loan.isbn(),
            state = %loan.state(),
            %fine,
            "return recorded"
        );
        Ok(fine)
    }

    /// Apply a payment to a member's fine balance and return the new balance
    ///
    /// # Errors
    ///
    /// Returns `MemberNotFound` for an unknown id.
    pub fn pay_fine(
        &mut self,
        member_id: MemberId,
        amount: Decimal,
    ) -> Result<Decimal, LibraryError> {
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::member_not_found(member_id))?;
        member.pay_fine(amount);
        info!(member = member_id, %amount, balance = %member.fines(), "fine payment recorded");
        Ok(member.fines())
    }

    /// Fine `loan_id` would owe if returned on `reference`
    pub fn assess_fine(
        &self,
        loan_id: LoanId,
        reference: NaiveDate,
    ) -> Result<Decimal, LibraryError> {
        self.loans
            .get(loan_id)
            .map(|loan| loan.compute_fine(reference))
            .ok_or_else(|| LibraryError::loan_not_found(loan_id))
    }

    /// Flag open, past-due loans as overdue; returns how many changed
    pub fn sweep_overdue(&mut self, today: NaiveDate) -> usize {
        let changed = self.loans.mark_overdue(today);
        if changed > 0 {
            info!(changed, %today, "overdue sweep");
        }
        changed
    }
}

impl Default for Circulation {
    fn default() -> Self {
        Self::new()
    }
}
