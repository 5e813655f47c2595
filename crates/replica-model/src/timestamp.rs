//! Mutable point-in-time values

use crate::value::Identity;
use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Shared, mutable timestamp
///
/// Treated as an intrinsic value, but because it can be changed in place a
/// duplicate always gets a fresh instance holding an equal value.
#[derive(Clone)]
pub struct TimestampRef(Rc<Cell<DateTime<Utc>>>);

impl TimestampRef {
    /// Create timestamp
    #[inline]
    #[must_use]
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(Rc::new(Cell::new(at)))
    }

    /// Timestamp `millis` milliseconds after the Unix epoch
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(millis).map(Self::new)
    }

    /// Current value
    #[inline]
    #[must_use]
    pub fn get(&self) -> DateTime<Utc> {
        self.0.get()
    }

    /// Overwrite in place
    #[inline]
    pub fn set(&self, at: DateTime<Utc>) {
        self.0.set(at);
    }

    /// New instance with an equal value
    #[inline]
    #[must_use]
    pub fn fresh_copy(&self) -> Self {
        Self::new(self.get())
    }

    /// Reference identity
    #[inline]
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::of(Rc::as_ptr(&self.0))
    }

    /// True if both handles point at the same instance
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for TimestampRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.get().to_rfc3339())
    }
}
