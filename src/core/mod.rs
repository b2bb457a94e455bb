//! Core business logic module
//!
//! This module contains the circulation desk components:
//! - `traits` - The injected `Clock` seam and its implementations
//! - `sequence` - Member and loan id generators
//! - `catalog` - Books by ISBN, merge-on-insert and catalog listings
//! - `membership` - Members by id and the fine report
//! - `loan_ledger` - Every loan ever made, for history and the overdue sweep
//! - `engine` - Single-threaded orchestration of cross-entity operations
//! - `library` - Thread-safe registry handle around the engine

pub mod catalog;
pub mod engine;
pub mod library;
pub mod loan_ledger;
pub mod membership;
pub mod sequence;
pub mod traits;

pub use catalog::{Catalog, Insertion};
pub use engine::Circulation;
pub use library::Library;
pub use loan_ledger::LoanLedger;
pub use membership::MemberRoll;
pub use sequence::IdSequence;
pub use traits::{Clock, ManualClock, SystemClock};
