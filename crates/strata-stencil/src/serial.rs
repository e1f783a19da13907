//! Single-process reference solver.

use log::debug;
use strata_core::{Grid, GridError, RunConfig};

use crate::kernel::DiffusionStencil;

/// Advance `initial` by `config.timesteps` steps on one process.
///
/// Uses the same double-buffering scheme as the coordinator: both buffers
/// start as copies of `initial`, so boundary cells never change.
pub fn solve_serial(config: &RunConfig, initial: &Grid) -> Result<Grid, GridError> {
    if initial.shape() != (config.rows, config.cols) {
        return Err(GridError::ShapeMismatch {
            expected: (config.rows, config.cols),
            found: initial.shape(),
        });
    }
    let stencil = DiffusionStencil::new(config.coefficients);
    let mut prev = initial.clone();
    let mut next = initial.clone();
    for _ in 0..config.timesteps {
        stencil.apply(&prev, &mut next)?;
        std::mem::swap(&mut prev, &mut next);
    }
    debug!(
        "serial solve finished: {}x{} grid, {} timesteps",
        config.rows, config.cols, config.timesteps
    );
    Ok(prev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initial::InitialCondition;
    use strata_core::Coefficients;

    #[test]
    fn zero_timesteps_returns_initial() {
        let cfg = RunConfig::new(5, 5, Coefficients::default(), 0);
        let init = InitialCondition::Parabolic.generate(5, 5).unwrap();
        let out = solve_serial(&cfg, &init).unwrap();
        assert!(out.bitwise_eq(&init));
    }

    #[test]
    fn one_step_matches_kernel() {
        let cfg = RunConfig::new(7, 6, Coefficients::default(), 1);
        let init = InitialCondition::Parabolic.generate(7, 6).unwrap();
        let out = solve_serial(&cfg, &init).unwrap();
        let direct = DiffusionStencil::new(cfg.coefficients).step(&init);
        assert!(out.bitwise_eq(&direct));
    }

    #[test]
    fn heat_decays_with_fixed_zero_boundary() {
        let cfg = RunConfig::new(10, 10, Coefficients::default(), 50);
        let init = InitialCondition::Parabolic.generate(10, 10).unwrap();
        let out = solve_serial(&cfg, &init).unwrap();
        let before: f64 = init.as_slice().iter().sum();
        let after: f64 = out.as_slice().iter().sum();
        assert!(after < before);
        assert!(out.as_slice().iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn shape_mismatch_rejected() {
        let cfg = RunConfig::new(5, 5, Coefficients::default(), 1);
        let init = Grid::new(5, 6).unwrap();
        assert!(solve_serial(&cfg, &init).is_err());
    }
}
