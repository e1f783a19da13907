//! Bounds-checked, row-major 2D cell container.
//!
//! [`Grid`] is used for both the full coordinator grid and the per-worker
//! blocks. Row `r`, column `c` lives at flat index `r * cols + c`. Shape is
//! fixed at construction; every accessor either checks bounds and returns
//! an `Option`/`Result`, or panics like slice indexing does (`Index`).

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::error::GridError;
use crate::id::RowRange;

/// A row-major `rows x cols` array of `f64` cells.
#[derive(Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl Grid {
    /// Create a zero-filled grid.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GridError> {
        Self::filled(rows, cols, 0.0)
    }

    /// Create a grid with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Result<Self, GridError> {
        check_shape(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, cells: Vec<f64>) -> Result<Self, GridError> {
        check_shape(rows, cols)?;
        if cells.len() != rows * cols {
            return Err(GridError::LengthMismatch {
                rows,
                cols,
                expected: rows * cols,
                found: cells.len(),
            });
        }
        Ok(Self { rows, cols, cells })
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Result<Self, GridError> {
        check_shape(rows, cols)?;
        let mut cells = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                cells.push(f(r, c));
            }
        }
        Ok(Self { rows, cols, cells })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; grids have at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell value at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.flat_index(row, col).map(|i| self.cells[i])
    }

    /// Overwrite the cell at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), GridError> {
        let i = self
            .flat_index(row, col)
            .ok_or(GridError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })?;
        self.cells[i] = value;
        Ok(())
    }

    /// One full row, or `None` if `row` is out of bounds.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.rows {
            Some(&self.cells[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    /// Mutable access to one full row.
    pub fn row_mut(&mut self, row: usize) -> Option<&mut [f64]> {
        if row < self.rows {
            Some(&mut self.cells[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    /// Contiguous slice covering the inclusive row range, all columns.
    pub fn rows_slice(&self, range: RowRange) -> Result<&[f64], GridError> {
        if range.end() >= self.rows {
            return Err(GridError::OutOfBounds {
                row: range.end(),
                col: 0,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(&self.cells[range.start() * self.cols..(range.end() + 1) * self.cols])
    }

    /// Borrow the flat row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }

    /// Mutably borrow the flat row-major buffer.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.cells
    }

    /// Consume the grid, returning its row-major buffer.
    pub fn into_vec(self) -> Vec<f64> {
        self.cells
    }

    /// Copy every cell from `other`, which must have the same shape.
    pub fn copy_from(&mut self, other: &Grid) -> Result<(), GridError> {
        if self.shape() != other.shape() {
            return Err(GridError::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        self.cells.copy_from_slice(&other.cells);
        Ok(())
    }

    /// True when both grids have the same shape and every cell has the
    /// same bit pattern. Unlike `==`, NaN cells compare equal to themselves
    /// and `0.0` differs from `-0.0`.
    pub fn bitwise_eq(&self, other: &Grid) -> bool {
        self.shape() == other.shape()
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }

    fn flat_index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }
}

fn check_shape(rows: usize, cols: usize) -> Result<(), GridError> {
    if rows == 0 || cols == 0 {
        return Err(GridError::Empty { rows, cols });
    }
    Ok(())
}

impl Index<(usize, usize)> for Grid {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        match self.flat_index(row, col) {
            Some(i) => &self.cells[i],
            None => panic!(
                "cell ({row}, {col}) out of bounds for {}x{} grid",
                self.rows, self.cols
            ),
        }
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        match self.flat_index(row, col) {
            Some(i) => &mut self.cells[i],
            None => panic!(
                "cell ({row}, {col}) out of bounds for {}x{} grid",
                self.rows, self.cols
            ),
        }
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_zero_filled() {
        let g = Grid::new(3, 4).unwrap();
        assert_eq!(g.shape(), (3, 4));
        assert_eq!(g.len(), 12);
        assert!(g.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_dimension_rejected() {
        assert_eq!(
            Grid::new(0, 4).unwrap_err(),
            GridError::Empty { rows: 0, cols: 4 }
        );
        assert!(Grid::new(4, 0).is_err());
    }

    #[test]
    fn from_vec_length_checked() {
        let err = Grid::from_vec(2, 2, vec![1.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            GridError::LengthMismatch {
                expected: 4,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn row_major_layout() {
        let g = Grid::from_fn(2, 3, |r, c| (r * 10 + c) as f64).unwrap();
        assert_eq!(g.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(g.row(1).unwrap(), &[10.0, 11.0, 12.0]);
        assert_eq!(g[(1, 2)], 12.0);
    }

    #[test]
    fn get_and_set_bounds() {
        let mut g = Grid::new(2, 2).unwrap();
        g.set(1, 1, 5.0).unwrap();
        assert_eq!(g.get(1, 1), Some(5.0));
        assert_eq!(g.get(2, 0), None);
        assert_eq!(g.get(0, 2), None);
        assert!(matches!(
            g.set(0, 2, 1.0),
            Err(GridError::OutOfBounds { row: 0, col: 2, .. })
        ));
        assert!(g.row(2).is_none());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_out_of_bounds_panics() {
        let g = Grid::new(2, 2).unwrap();
        let _ = g[(0, 2)];
    }

    #[test]
    fn rows_slice_inclusive() {
        let g = Grid::from_fn(4, 2, |r, _| r as f64).unwrap();
        let s = g.rows_slice(RowRange::new(1, 2).unwrap()).unwrap();
        assert_eq!(s, &[1.0, 1.0, 2.0, 2.0]);
        assert!(g.rows_slice(RowRange::new(2, 4).unwrap()).is_err());
    }

    #[test]
    fn copy_from_requires_same_shape() {
        let mut a = Grid::new(2, 2).unwrap();
        let b = Grid::filled(2, 2, 3.0).unwrap();
        a.copy_from(&b).unwrap();
        assert_eq!(a, b);
        let c = Grid::new(3, 2).unwrap();
        assert!(matches!(
            a.copy_from(&c),
            Err(GridError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn bitwise_eq_distinguishes_signed_zero() {
        let a = Grid::filled(1, 1, 0.0).unwrap();
        let b = Grid::filled(1, 1, -0.0).unwrap();
        assert_eq!(a, b);
        assert!(!a.bitwise_eq(&b));
        let n = Grid::filled(1, 1, f64::NAN).unwrap();
        assert!(n.bitwise_eq(&n.clone()));
    }
}
