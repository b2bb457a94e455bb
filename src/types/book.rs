//! Book-related types for the library desk
//!
//! This module defines the catalog entry and its copy-count bookkeeping.

use super::error::LibraryError;
use chrono::{Datelike, Local};
use regex::Regex;
use std::borrow::Borrow;
use std::fmt;
use std::sync::LazyLock;

/// Earliest accepted publication year
pub const MIN_PUBLICATION_YEAR: i32 = 1500;

static ISBN13: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{13}$").unwrap());

/// A validated 13-digit ISBN
///
/// Catalog key. Borrows as `str` so lookups can use plain string slices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Isbn(String);

impl Isbn {
    /// Parse an ISBN, accepting exactly 13 ASCII digits
    pub fn parse(isbn: &str) -> Result<Self, LibraryError> {
        if !ISBN13.is_match(isbn) {
            return Err(LibraryError::invalid_isbn(isbn));
        }
        Ok(Isbn(isbn.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Isbn {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalog entry
///
/// Tracks how many copies the library owns, how many are on the shelf, and
/// how often the title has been lent out.
///
/// Invariants:
/// - `available <= total`
/// - `times_borrowed` never decreases
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    isbn: Isbn,
    title: String,
    author: String,
    year: i32,
    total: u32,
    available: u32,
    times_borrowed: u64,
}

impl Book {
    /// Create a new catalog entry, validating against the current local year
    ///
    /// # Errors
    ///
    /// Returns a validation error if:
    /// - The ISBN is not 13 digits
    /// - The year is outside [1500, current year]
    /// - `copies` is zero or negative
    pub fn new(
        isbn: &str,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        copies: i32,
    ) -> Result<Self, LibraryError> {
        Self::new_as_of(isbn, title, author, year, copies, Local::now().year())
    }

    /// Create a new catalog entry, validating the year against `current_year`
    pub fn new_as_of(
        isbn: &str,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        copies: i32,
        current_year: i32,
    ) -> Result<Self, LibraryError> {
        let isbn = Isbn::parse(isbn)?;
        if !(MIN_PUBLICATION_YEAR..=current_year).contains(&year) {
            return Err(LibraryError::InvalidYear {
                year,
                max: current_year,
            });
        }
        let copies = positive_copies(copies)?;

        Ok(Book {
            isbn,
            title: title.into(),
            author: author.into(),
            year,
            total: copies,
            available: copies,
            times_borrowed: 0,
        })
    }

    pub fn isbn(&self) -> &Isbn {
        &self.isbn
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn total_copies(&self) -> u32 {
        self.total
    }

    pub fn available_copies(&self) -> u32 {
        self.available
    }

    pub fn times_borrowed(&self) -> u64 {
        self.times_borrowed
    }

    /// Whether at least one copy is on the shelf
    pub fn is_available(&self) -> bool {
        self.available > 0
    }

    /// Lend one copy
    ///
    /// Decrements the available count and bumps the borrow counter.
    ///
    /// # Errors
    ///
    /// Returns `Unavailable` if no copy is on the shelf; nothing changes.
    pub fn checkout_one_copy(&mut self) -> Result<(), LibraryError> {
        if self.available == 0 {
            return Err(LibraryError::unavailable(self.isbn.as_str()));
        }
        self.available -= 1;
        self.times_borrowed += 1;
        Ok(())
    }

    /// Put one copy back on the shelf
    ///
    /// Never raises `available` above `total`: a duplicate return is a
    /// silent no-op.
    pub fn return_one_copy(&mut self) {
        if self.available < self.total {
            self.available += 1;
        }
    }

    /// Add `n` copies to both the owned and the available count
    ///
    /// # Errors
    ///
    /// Returns `InvalidCopies` if `n` is zero or negative.
    pub fn increase_copies(&mut self, n: i32) -> Result<(), LibraryError> {
        let n = positive_copies(n)?;
        self.total = self.total.saturating_add(n);
        self.available = self.available.saturating_add(n);
        Ok(())
    }
}

fn positive_copies(copies: i32) -> Result<u32, LibraryError> {
    u32::try_from(copies)
        .ok()
        .filter(|&c| c > 0)
        .ok_or(LibraryError::InvalidCopies { copies })
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | total: {} available: {} borrowed: {}",
            self.isbn,
            self.title,
            self.author,
            self.year,
            self.total,
            self.available,
            self.times_borrowed
        )
    }
}
