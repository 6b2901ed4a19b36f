//! Time-bounded filtering of codes and scan events.
//!
//! A [`TimeWindow`] has two optional, inclusive bounds. A missing bound is
//! unbounded on that side, and a window whose start lies after its end
//! matches nothing. Stores apply the same rule when filtering server-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Code, ScanEvent};

/// Anything with a single authoritative timestamp.
pub trait Timestamped {
    /// The instant used for window membership.
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for ScanEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

impl Timestamped for Code {
    fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl<T: Timestamped + ?Sized> Timestamped for &T {
    fn timestamp(&self) -> DateTime<Utc> {
        (**self).timestamp()
    }
}

/// Optional inclusive `[start, end]` bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Earliest matching instant.
    pub start: Option<DateTime<Utc>>,
    /// Latest matching instant.
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Window with both bounds optional.
    #[must_use]
    pub const fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Window matching every instant.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// `true` when both bounds are set and `start > end`.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    /// Whether `instant` falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| instant >= start) && self.end.is_none_or(|end| instant <= end)
    }

    /// Returns the items inside the window, preserving order.
    #[must_use]
    pub fn filter<'a, T: Timestamped>(&self, items: &'a [T]) -> Vec<&'a T> {
        if self.is_inverted() {
            return Vec::new();
        }
        items
            .iter()
            .filter(|item| self.contains(item.timestamp()))
            .collect()
    }

    /// Owned variant of [`TimeWindow::filter`].
    #[must_use]
    pub fn retain<T: Timestamped>(&self, mut items: Vec<T>) -> Vec<T> {
        if self.is_inverted() {
            items.clear();
        } else {
            items.retain(|item| self.contains(item.timestamp()));
        }
        items
    }

    /// Number of items inside the window; always equals
    /// `self.filter(items).len()`.
    #[must_use]
    pub fn count<T: Timestamped>(&self, items: &[T]) -> usize {
        if self.is_inverted() {
            return 0;
        }
        items
            .iter()
            .filter(|item| self.contains(item.timestamp()))
            .count()
    }
}
