//! Benchmark profiles for the Strata diffusion workspace.
//!
//! - [`reference_profile`]: 100x100 grid, 100 timesteps, 12 processes
//! - [`stress_profile`]: 1000x1000 grid (1M cells) for kernel throughput
//! - [`profile_grid`]: the parabolic starting field for a profile

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_core::{Coefficients, Grid, RunConfig};
use strata_stencil::InitialCondition;

/// Process count of the reference run.
pub const REFERENCE_PROCESSES: usize = 12;

/// The reference run: 100x100 grid, `cx = cy = 0.1`, 100 timesteps.
pub fn reference_profile() -> RunConfig {
    RunConfig::default()
}

/// A 1000x1000 grid with the reference coefficients.
pub fn stress_profile(timesteps: u64) -> RunConfig {
    RunConfig::new(1000, 1000, Coefficients::default(), timesteps)
}

/// Parabolic initial grid for `config`.
///
/// # Panics
///
/// If `config` has fewer than one row or column.
pub fn profile_grid(config: &RunConfig) -> Grid {
    InitialCondition::Parabolic
        .generate(config.rows, config.cols)
        .expect("benchmark profiles are non-empty")
}
