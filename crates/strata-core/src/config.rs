//! Immutable run configuration and process-layout checks.
//!
//! A [`RunConfig`] is constructed once before the run, validated with
//! [`RunConfig::validate`], and passed by reference to the coordinator
//! and every worker. It is never mutated afterwards.

use crate::error::ConfigError;

/// Minimum number of cooperating processes: one coordinator plus one worker.
pub const MIN_PROCESSES: usize = 2;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Diffusion coefficients along the row (`cx`) and column (`cy`) axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coefficients {
    /// Coefficient applied to the vertical (row-axis) second difference.
    pub cx: f64,
    /// Coefficient applied to the horizontal (column-axis) second difference.
    pub cy: f64,
}

impl Coefficients {
    /// Create a coefficient pair.
    pub fn new(cx: f64, cy: f64) -> Self {
        Self { cx, cy }
    }

    /// Whether the explicit scheme is stable: `cx + cy <= 0.5`.
    pub fn is_stable(&self) -> bool {
        self.cx + self.cy <= 0.5
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self { cx: 0.1, cy: 0.1 }
    }
}

/// Parameters shared by the coordinator and all workers for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunConfig {
    /// Grid height `X`. Rows are the decomposition axis.
    pub rows: usize,
    /// Grid width `Y`.
    pub cols: usize,
    /// Diffusion coefficients.
    pub coefficients: Coefficients,
    /// Number of timesteps (`nts`). Both sides run exactly this many rounds.
    pub timesteps: u64,
}

impl RunConfig {
    /// Create a configuration. Call [`validate`](Self::validate) before use.
    pub fn new(rows: usize, cols: usize, coefficients: Coefficients, timesteps: u64) -> Self {
        Self {
            rows,
            cols,
            coefficients,
            timesteps,
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < 3 || self.cols < 3 {
            return Err(ConfigError::GridTooSmall {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let cells = self.rows.checked_mul(self.cols);
        if cells.is_none_or(|n| u32::try_from(n).is_err()) {
            return Err(ConfigError::GridTooLarge {
                rows: self.rows,
                cols: self.cols,
            });
        }
        for (name, value) in [("cx", self.coefficients.cx), ("cy", self.coefficients.cy)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidCoefficient { name, value });
            }
        }
        Ok(())
    }

    /// Total number of cells in the full grid.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// FNV-1a hash over every field. Two processes agree on the run
    /// parameters iff their fingerprints match.
    pub fn fingerprint(&self) -> u64 {
        let mut hash = FNV_OFFSET;
        hash = fnv1a_u64(hash, self.rows as u64);
        hash = fnv1a_u64(hash, self.cols as u64);
        hash = fnv1a_u64(hash, self.coefficients.cx.to_bits());
        hash = fnv1a_u64(hash, self.coefficients.cy.to_bits());
        hash = fnv1a_u64(hash, self.timesteps);
        hash
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            rows: 100,
            cols: 100,
            coefficients: Coefficients::default(),
            timesteps: 100,
        }
    }
}

/// Number of workers for a run with `world_size` processes.
///
/// Fails with [`ConfigError::TooFewProcesses`] when there is no worker.
pub fn worker_count(world_size: usize) -> Result<usize, ConfigError> {
    if world_size < MIN_PROCESSES {
        return Err(ConfigError::TooFewProcesses {
            size: world_size,
            min: MIN_PROCESSES,
        });
    }
    Ok(world_size - 1)
}
