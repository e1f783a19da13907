//! Reusable grids, configurations and scratch directories.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use strata_core::{Coefficients, Grid, RunConfig};
use strata_stencil::InitialCondition;

static SCRATCH_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// The 4x4 parabolic grid whose cell (1, 1) steps from 4.0 to 3.2 with
/// `cx = cy = 0.1`.
pub fn golden_grid() -> Grid {
    InitialCondition::Parabolic
        .generate(4, 4)
        .expect("4x4 grid is valid")
}

/// Expected value of cell (1, 1) after one step of [`golden_grid`].
pub const GOLDEN_STEP_VALUE: f64 = 3.2;

/// A small run with default coefficients.
pub fn small_config(rows: usize, cols: usize, timesteps: u64) -> RunConfig {
    RunConfig::new(rows, cols, Coefficients::default(), timesteps)
}

/// A grid whose every cell is distinct, for spotting misplaced rows.
pub fn numbered_grid(rows: usize, cols: usize) -> Grid {
    Grid::from_fn(rows, cols, |r, c| (r * 1000 + c) as f64 + 0.5).expect("non-empty grid")
}

/// A path under the system temp dir, unique to this process and call, that
/// does not exist yet.
pub fn scratch_dir(name: &str) -> PathBuf {
    let n = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!("strata-{name}-{}-{n}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
