//! Thread-safe library registry
//!
//! This module provides the `Library` struct, the aggregate root that
//! presentation code talks to. It wraps one [`Circulation`] engine behind a
//! single registry-wide `RwLock` and stamps every operation with the date
//! from an injected [`Clock`].
//!
//! # Thread Safety
//!
//! - Mutations (`add_book`, `register_member`, `checkout`, `return_loan`,
//!   `pay_fine`, `sweep_overdue`) hold the write lock for the whole
//!   validate-then-mutate transaction, so they are mutually exclusive and a
//!   checkout can never be half applied.
//! - Queries hold the read lock and run concurrently with each other. They
//!   return owned snapshots, never references into the registry.
//!
//! Because every mutation validates before it writes, a panic inside a
//! critical section cannot leave a half-updated entity behind. A poisoned
//! lock is therefore recovered instead of propagated.

use crate::core::catalog::Insertion;
use crate::core::engine::Circulation;
use crate::core::traits::{Clock, SystemClock};
use crate::types::{Book, LibraryError, Loan, LoanId, Member, MemberId, LOAN_PERIOD_DAYS};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared, thread-safe circulation desk
///
/// `Library` is `Send + Sync`; share it between threads with `Arc`.
///
/// # Examples
///
/// ```
/// use library_desk::{Book, Library};
///
/// let library = Library::new();
/// library.add_book(Book::new("9780306406157", "El Principito", "Saint-Exupery", 1943, 3)?)?;
/// let member = library.new_member("Maria", "maria@example.com")?;
///
/// let loan = library.checkout(member.id(), "9780306406157", library.default_due_date()?)?;
/// assert_eq!(library.return_loan(loan.id())?, rust_decimal::Decimal::ZERO);
/// # Ok::<(), library_desk::LibraryError>(())
/// ```
pub struct Library {
    desk: RwLock<Circulation>,
    clock: Arc<dyn Clock>,
}

impl Library {
    /// Create an empty library dated by the host's local calendar
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty library dated by `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Library {
            desk: RwLock::new(Circulation::new()),
            clock,
        }
    }

    /// The date operations are stamped with right now
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Today plus the standard loan period
    ///
    /// # Errors
    ///
    /// Returns `DateOutOfRange` when today is too close to the end of the
    /// calendar for a full loan period.
    pub fn default_due_date(&self) -> Result<NaiveDate, LibraryError> {
        let today = self.today();
        today
            .checked_add_days(Days::new(LOAN_PERIOD_DAYS))
            .ok_or(LibraryError::DateOutOfRange {
                from: today,
                days: LOAN_PERIOD_DAYS,
            })
    }

    fn read(&self) -> RwLockReadGuard<'_, Circulation> {
        self.desk.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Circulation> {
        self.desk.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Add a book, merging copies into an existing ISBN
    pub fn add_book(&self, book: Book) -> Result<Insertion, LibraryError> {
        self.write().add_book(book)
    }

    /// Register a member under the id it carries
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMember` if the id is taken and `MemberIdOutOfRange`
    /// for `u32::MAX`.
    pub fn register_member(&self, member: Member) -> Result<MemberId, LibraryError> {
        self.write().register_member(member)
    }

    /// Create a member with the next free id and register it
    pub fn new_member(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Member, LibraryError> {
        self.write().new_member(name, email)
    }

    /// Lend a copy of `isbn` to `member_id`, dated today
    ///
    /// See [`Circulation::checkout`] for the order of checks.
    pub fn checkout(
        &self,
        member_id: MemberId,
        isbn: &str,
        due_date: NaiveDate,
    ) -> Result<Loan, LibraryError> {
        let today = self.today();
        self.write().checkout(member_id, isbn, due_date, today)
    }

    /// Return the copy lent under `loan_id` today; yields the fine charged
    pub fn return_loan(&self, loan_id: LoanId) -> Result<Decimal, LibraryError> {
        let today = self.today();
        self.write().return_loan(loan_id, today)
    }

    /// Pay towards a member's fines; yields the remaining balance
    pub fn pay_fine(&self, member_id: MemberId, amount: Decimal) -> Result<Decimal, LibraryError> {
        self.write().pay_fine(member_id, amount)
    }

    /// Flag open loans past their due date as overdue
    ///
    /// Not run automatically; meant for an external scheduler.
    pub fn sweep_overdue(&self) -> usize {
        let today = self.today();
        self.write().sweep_overdue(today)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn find_book_by_isbn(&self, isbn: &str) -> Option<Book> {
        self.read().catalog().get(isbn).cloned()
    }

    /// Books whose title contains `fragment`, ignoring case
    pub fn find_books_by_title(&self, fragment: &str) -> Vec<Book> {
        cloned(self.read().catalog().search_title(fragment))
    }

    pub fn find_member(&self, member_id: MemberId) -> Option<Member> {
        self.read().members().get(member_id).cloned()
    }

    pub fn find_loan(&self, loan_id: LoanId) -> Option<Loan> {
        self.read().loans().get(loan_id).cloned()
    }

    /// Fine a loan would owe if returned on `reference` (today if `None`)
    pub fn assess_fine(
        &self,
        loan_id: LoanId,
        reference: Option<NaiveDate>,
    ) -> Result<Decimal, LibraryError> {
        let reference = reference.unwrap_or_else(|| self.today());
        self.read().assess_fine(loan_id, reference)
    }

    /// Members owing fines, largest balance first
    pub fn members_with_fines(&self) -> Vec<Member> {
        cloned(self.read().members().with_fines())
    }

    /// Up to `n` books, most borrowed first
    pub fn top_borrowed_books(&self, n: usize) -> Vec<Book> {
        cloned(self.read().catalog().top_borrowed(n))
    }

    /// A member's loans, open and closed, newest first
    pub fn loans_for_member(&self, member_id: MemberId) -> Vec<Loan> {
        cloned(self.read().loans().for_member(member_id))
    }

    /// Books with at least one copy on the shelf
    pub fn available_books(&self) -> Vec<Book> {
        cloned(self.read().catalog().available())
    }

    /// Whole catalog, sorted by ISBN
    pub fn books(&self) -> Vec<Book> {
        cloned(self.read().catalog().all())
    }

    /// Every member, sorted by id
    pub fn members(&self) -> Vec<Member> {
        cloned(self.read().members().all())
    }

    /// Every loan, sorted by id
    pub fn loans(&self) -> Vec<Loan> {
        cloned(self.read().loans().all())
    }
}

fn cloned<T: Clone>(items: Vec<&T>) -> Vec<T> {
    items.into_iter().cloned().collect()
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("desk", &self.desk)
            .field("today", &self.today())
            .finish()
    }
}
