//! Core traits for the circulation desk
//!
//! The registry never reads the wall clock directly. "Today" is injected
//! through [`Clock`] so loans can be dated and fines assessed against a
//! controllable calendar.

use chrono::{Datelike, Local, NaiveDate};
use std::sync::atomic::{AtomicI32, Ordering};

/// Source of the current calendar date
///
/// Implementations must be shareable across threads; the registry holds one
/// behind an `Arc`.
pub trait Clock: Send + Sync {
    /// The date loans are stamped with and fines are assessed on
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Settable date, used by desk scripts and tests
///
/// Stored as days since the common era in an atomic, so it can be moved
/// forward from one thread while others read it.
#[derive(Debug)]
pub struct ManualClock {
    days_from_ce: AtomicI32,
}

impl ManualClock {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            days_from_ce: AtomicI32::new(start.num_days_from_ce()),
        }
    }

    /// Move the clock to `date` (backwards is allowed)
    pub fn set(&self, date: NaiveDate) {
        self.days_from_ce
            .store(date.num_days_from_ce(), Ordering::SeqCst);
    }

    /// Move the clock forward by `days`
    pub fn advance(&self, days: i32) {
        self.days_from_ce.fetch_add(days, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        let days = self.days_from_ce.load(Ordering::SeqCst);
        // Only ever written from valid dates plus small offsets.
        NaiveDate::from_num_days_from_ce_opt(days).unwrap_or(NaiveDate::MAX)
    }
}
