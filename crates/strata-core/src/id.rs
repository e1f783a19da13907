//! Process ranks and inclusive row ranges.

use std::fmt;
use std::ops::Range;

use crate::error::GridError;

/// Identifies a cooperating process. Rank 0 is the coordinator; ranks
/// `1..size` are workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub u32);

impl Rank {
    /// The coordinator process.
    pub const COORDINATOR: Rank = Rank(0);

    /// Whether this is the coordinator rank.
    pub fn is_coordinator(self) -> bool {
        self == Self::COORDINATOR
    }

    /// Rank as an index into per-process tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Rank {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Inclusive range of global row indices `start..=end`.
///
/// A block shipped for a range always has `end - start + 1` rows. Rows
/// `start` and `end` are halo (or fixed boundary) rows; the rows a worker
/// owns are [`owned_rows`](Self::owned_rows), i.e. `start + 1 .. end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowRange {
    start: usize,
    end: usize,
}

impl RowRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: usize, end: usize) -> Result<Self, GridError> {
        if start > end {
            return Err(GridError::ReversedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First row (inclusive).
    pub fn start(self) -> usize {
        self.start
    }

    /// Last row (inclusive).
    pub fn end(self) -> usize {
        self.end
    }

    /// Number of rows in a block for this range, halos included.
    pub fn len(self) -> usize {
        self.end - self.start + 1
    }

    /// Never true; a range holds at least one row.
    pub fn is_empty(self) -> bool {
        false
    }

    /// Global rows whose updated values this range is responsible for.
    /// Empty when the range spans fewer than three rows.
    pub fn owned_rows(self) -> Range<usize> {
        (self.start + 1)..self.end.max(self.start + 1)
    }

    /// Number of owned rows (`end - start - 1`, saturating at zero).
    pub fn owned_len(self) -> usize {
        self.owned_rows().len()
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}
