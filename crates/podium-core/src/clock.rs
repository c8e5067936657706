//! Source of "now" for status texts.
//!
//! Timeline dates are naive venue-local timestamps, so the clock reports
//! local wall time without a zone. Tests pin it with [`FixedClock`].

use std::fmt::Debug;

use chrono::NaiveDateTime;

/// A source of the current venue-local time.
pub trait Clock: Send + Sync + Debug {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// Reads the host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
