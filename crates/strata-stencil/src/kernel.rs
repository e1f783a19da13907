//! Five-point explicit diffusion kernel.
//!
//! For every interior cell `(i, j)` with `1 <= i <= nx-2`, `1 <= j <= ny-2`:
//!
//! ```text
//! next[i,j] = prev[i,j]
//!           + cx * (prev[i+1,j] + prev[i-1,j] - 2*prev[i,j])
//!           + cy * (prev[i,j+1] + prev[i,j-1] - 2*prev[i,j])
//! ```
//!
//! Row 0, row `nx-1`, column 0 and column `ny-1` of `next` are left
//! untouched; callers seed them (usually by starting `next` as a copy of
//! `prev`). The kernel is pure: same inputs, same output bits.

use strata_core::{Coefficients, Grid, GridError};

/// Diffusion stencil with fixed coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffusionStencil {
    coefficients: Coefficients,
}

impl DiffusionStencil {
    /// Create a stencil with the given coefficients.
    pub fn new(coefficients: Coefficients) -> Self {
        Self { coefficients }
    }

    /// The coefficients this stencil applies.
    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    /// Write the updated interior of `prev` into `next`.
    ///
    /// Both grids must have the same shape. Grids with fewer than three
    /// rows or columns have no interior and are left unchanged.
    pub fn apply(&self, prev: &Grid, next: &mut Grid) -> Result<(), GridError> {
        if prev.shape() != next.shape() {
            return Err(GridError::ShapeMismatch {
                expected: prev.shape(),
                found: next.shape(),
            });
        }
        let (nx, ny) = prev.shape();
        if nx < 3 || ny < 3 {
            return Ok(());
        }
        let Coefficients { cx, cy } = self.coefficients;
        let src = prev.as_slice();
        let dst = next.as_mut_slice();

        for i in 1..nx - 1 {
            let up = &src[(i - 1) * ny..i * ny];
            let mid = &src[i * ny..(i + 1) * ny];
            let down = &src[(i + 1) * ny..(i + 2) * ny];
            let out = &mut dst[i * ny..(i + 1) * ny];
            for j in 1..ny - 1 {
                let p = mid[j];
                out[j] = p
                    + cx * (down[j] + up[j] - 2.0 * p)
                    + cy * (mid[j + 1] + mid[j - 1] - 2.0 * p);
            }
        }
        Ok(())
    }

    /// Return a new grid: the boundary of `prev` with the updated interior.
    pub fn step(&self, prev: &Grid) -> Grid {
        let mut next = prev.clone();
        // Shapes match by construction.
        let _ = self.apply(prev, &mut next);
        next
    }
}
