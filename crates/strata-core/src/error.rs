//! Error types for grid access and run configuration.

use thiserror::Error;

/// Errors from [`Grid`](crate::Grid) construction and cell access.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// A grid must have at least one row and one column.
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    Empty {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },
    /// A flat cell buffer does not match `rows * cols`.
    #[error("cell buffer length {found} does not match {rows}x{cols} = {expected}")]
    LengthMismatch {
        /// Row count of the target shape.
        rows: usize,
        /// Column count of the target shape.
        cols: usize,
        /// `rows * cols`.
        expected: usize,
        /// Length actually supplied.
        found: usize,
    },
    /// Two grids that must share a shape do not.
    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Actual `(rows, cols)`.
        found: (usize, usize),
    },
    /// A cell or row index lies outside the grid.
    #[error("cell ({row}, {col}) out of bounds for {rows}x{cols} grid")]
    OutOfBounds {
        /// Offending row.
        row: usize,
        /// Offending column.
        col: usize,
        /// Grid row count.
        rows: usize,
        /// Grid column count.
        cols: usize,
    },
    /// A row range has `start > end`.
    #[error("row range {start}..={end} is reversed")]
    ReversedRange {
        /// First row.
        start: usize,
        /// Last row.
        end: usize,
    },
}

/// Errors detected while validating a [`RunConfig`](crate::RunConfig)
/// or the process layout of a run.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Fewer than two cooperating processes (one coordinator, at least
    /// one worker).
    #[error("at least {min} processes are required (one coordinator and one worker), got {size}")]
    TooFewProcesses {
        /// Number of processes available.
        size: usize,
        /// Required minimum.
        min: usize,
    },
    /// The grid must have an interior, i.e. at least 3 rows and 3 columns.
    #[error("grid {rows}x{cols} is too small: need at least 3x3")]
    GridTooSmall {
        /// Configured row count.
        rows: usize,
        /// Configured column count.
        cols: usize,
    },
    /// The cell count or a row index does not fit the `u32` wire format.
    #[error("grid {rows}x{cols} exceeds u32::MAX cells")]
    GridTooLarge {
        /// Configured row count.
        rows: usize,
        /// Configured column count.
        cols: usize,
    },
    /// A diffusion coefficient is NaN, infinite or negative.
    #[error("diffusion coefficient {name} must be finite and non-negative, got {value}")]
    InvalidCoefficient {
        /// `"cx"` or `"cy"`.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}
