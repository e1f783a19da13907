//! Closed-form initial temperature fields.

use strata_core::{Grid, GridError};

/// Initial state for a run.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum InitialCondition {
    /// `u[i][j] = i * (X - i - 1) * j * (Y - j - 1)`: zero on the boundary,
    /// peaked in the middle. Evaluated in `f64`, so large grids do not
    /// overflow.
    #[default]
    Parabolic,
    /// Every cell set to the same value.
    Uniform(f64),
}

impl InitialCondition {
    /// Generate a `rows x cols` grid.
    pub fn generate(&self, rows: usize, cols: usize) -> Result<Grid, GridError> {
        match *self {
            Self::Parabolic => {
                let (x, y) = (rows as f64, cols as f64);
                Grid::from_fn(rows, cols, |i, j| {
                    let (i, j) = (i as f64, j as f64);
                    i * (x - i - 1.0) * j * (y - j - 1.0)
                })
            }
            Self::Uniform(value) => Grid::filled(rows, cols, value),
        }
    }
}
