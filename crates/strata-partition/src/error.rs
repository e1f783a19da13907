//! Errors from partition planning, extraction and merging.

use strata_core::GridError;
use thiserror::Error;

/// Errors from [`PartitionPlan`](crate::PartitionPlan),
/// [`extract`](crate::extract) and [`merge`](crate::merge).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// A plan needs at least one worker.
    #[error("partition plan needs at least one worker")]
    NoWorkers,
    /// The grid has no interior rows to distribute.
    #[error("grid with {rows} rows has no interior rows to partition")]
    NoInteriorRows {
        /// Grid row count.
        rows: usize,
    },
    /// A row range reaches past the last row of the grid.
    #[error("row range {start} - {end} exceeds grid with {rows} rows")]
    RangeOutOfGrid {
        /// First row of the range.
        start: usize,
        /// Last row of the range.
        end: usize,
        /// Grid row count.
        rows: usize,
    },
    /// A block does not have the shape its range implies.
    #[error("block shape {found:?} does not match expected {expected:?}")]
    BlockShape {
        /// `(range.len(), grid.cols())`.
        expected: (usize, usize),
        /// Actual block shape.
        found: (usize, usize),
    },
    /// Underlying grid error.
    #[error(transparent)]
    Grid(#[from] GridError),
}
