//! Effective date ranges of versioned records.
//!
//! Ranges are inclusive on both ends and measured in whole calendar days.
//! An open-ended range is stored with `NaiveDate::MAX` as its end, which keeps
//! every comparison a plain date comparison; callers only ever see it as
//! `end() == None`.

use std::fmt;

use chrono::NaiveDate;

use crate::types::Priority;

/// Effective range and priority of one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Validity {
    start: NaiveDate,
    end: NaiveDate,
    priority: Priority,
}

impl Validity {
    /// Creates a validity; `end = None` means valid indefinitely.
    #[must_use]
    pub const fn new(start: NaiveDate, end: Option<NaiveDate>, priority: Priority) -> Self {
        let end = match end {
            Some(end) => end,
            None => NaiveDate::MAX,
        };
        Self {
            start,
            end,
            priority,
        }
    }

    #[must_use]
    pub const fn closed(start: NaiveDate, end: NaiveDate, priority: Priority) -> Self {
        Self::new(start, Some(end), priority)
    }

    #[must_use]
    pub const fn indefinite(start: NaiveDate, priority: Priority) -> Self {
        Self::new(start, None, priority)
    }

    /// First day of validity (inclusive).
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of validity (inclusive), or `None` if valid indefinitely.
    pub fn end(&self) -> Option<NaiveDate> {
        (!self.is_indefinite()).then_some(self.end)
    }

    pub const fn priority(&self) -> Priority {
        self.priority
    }

    pub fn is_indefinite(&self) -> bool {
        self.end == NaiveDate::MAX
    }

    /// A range is valid while it covers at least one day.
    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether the two ranges share at least one day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Whether both versions sit on the same priority tier and share a day.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.priority == other.priority && self.overlaps(other)
    }

    /// Whether every day of this range is also covered by `other`.
    pub fn is_within(&self, other: &Self) -> bool {
        other.start <= self.start && self.end <= other.end
    }

    pub fn starts_before(&self, other: &Self) -> bool {
        self.start < other.start
    }

    pub fn ends_after(&self, other: &Self) -> bool {
        self.end > other.end
    }

    /// The same version cut to end the day before `date`.
    ///
    /// Returns `None` if nothing of the range would remain.
    #[must_use]
    pub fn ending_before(&self, date: NaiveDate) -> Option<Self> {
        let end = date.pred_opt()?;
        Some(Self { end, ..*self }).filter(Self::is_valid)
    }

    /// The same version cut to start the day after `date`.
    ///
    /// Returns `None` if nothing of the range would remain.
    #[must_use]
    pub fn starting_after(&self, date: NaiveDate) -> Option<Self> {
        let start = date.succ_opt()?;
        Some(Self { start, ..*self }).filter(Self::is_valid)
    }

    /// Last covered day, `NaiveDate::MAX` for indefinite ranges.
    pub(crate) const fn last_day(&self) -> NaiveDate {
        self.end
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end() {
            Some(end) => write!(f, "[{}, {}]", self.start, end)?,
            None => write!(f, "[{}, ∞)", self.start)?,
        }
        write!(f, " priority {}", self.priority)
    }
}

/// A validity together with a reference to the record it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedInterval<O> {
    pub validity: Validity,
    pub owner: O,
}

impl<O> VersionedInterval<O> {
    pub const fn new(validity: Validity, owner: O) -> Self {
        Self { validity, owner }
    }

    /// Moves the owner onto a different range.
    #[must_use]
    pub fn with_validity(self, validity: Validity) -> Self {
        Self {
            validity,
            owner: self.owner,
        }
    }
}
