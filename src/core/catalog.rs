//! Catalog management module
//!
//! This module provides the `Catalog` struct which holds every book the
//! library owns, keyed by ISBN.
//!
//! The Catalog is responsible for:
//! - Merge-on-insert: re-adding a known ISBN adds copies instead of a duplicate
//! - Title search
//! - Availability and popularity listings for reports
//!
//! Listings are returned sorted by ISBN so output is deterministic even
//! though the backing map is unordered.

use crate::types::{Book, Isbn, LibraryError};
use std::collections::HashMap;
use tracing::debug;

/// Outcome of [`Catalog::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The ISBN was new; the book was stored as given
    Inserted,
    /// The ISBN was known; its copy counts were raised
    Merged,
}

/// All catalog entries by ISBN
#[derive(Debug, Default)]
pub struct Catalog {
    /// Map of ISBN to catalog entry
    books: HashMap<Isbn, Book>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Catalog {
            books: HashMap::new(),
        }
    }

    /// Add a book, merging into an existing entry with the same ISBN
    ///
    /// On merge the existing entry's total and available counts grow by the
    /// incoming book's total; its title, author and year are kept.
    ///
    /// # Errors
    ///
    /// Propagates `InvalidCopies` from the merge. A validated `Book` always
    /// has at least one copy, so in practice this cannot fail.
    pub fn add(&mut self, book: Book) -> Result<Insertion, LibraryError> {
        match self.books.get_mut(book.isbn().as_str()) {
            Some(existing) => {
                let copies = i32::try_from(book.total_copies()).unwrap_or(i32::MAX);
                existing.increase_copies(copies)?;
                debug!(
                    isbn = %existing.isbn(),
                    added = copies,
                    total = existing.total_copies(),
                    "merged copies into existing catalog entry"
                );
                Ok(Insertion::Merged)
            }
            None => {
                self.books.insert(book.isbn().clone(), book);
                Ok(Insertion::Inserted)
            }
        }
    }

    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    pub fn get_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.get_mut(isbn)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Every book, sorted by ISBN
    pub fn all(&self) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.values().collect();
        books.sort_by(|a, b| a.isbn().cmp(b.isbn()));
        books
    }

    /// Books whose title contains `fragment`, ignoring case
    pub fn search_title(&self, fragment: &str) -> Vec<&Book> {
        let needle = fragment.to_lowercase();
        self.all()
            .into_iter()
            .filter(|book| book.title().to_lowercase().contains(&needle))
            .collect()
    }

    /// Books with at least one copy on the shelf
    pub fn available(&self) -> Vec<&Book> {
        self.all()
            .into_iter()
            .filter(|book| book.is_available())
            .collect()
    }

    /// Up to `n` books, most borrowed first
    ///
    /// Ties keep ISBN order (the sort is stable over the ISBN-sorted listing).
    pub fn top_borrowed(&self, n: usize) -> Vec<&Book> {
        let mut books = self.all();
        books.sort_by(|a, b| b.times_borrowed().cmp(&a.times_borrowed()));
        books.truncate(n);
        books
    }
}
