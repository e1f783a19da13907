//! TOML job files and command-line overrides.
//!
//! Every section and key is optional; missing values fall back to the
//! reference run (100 x 100 grid, `cx = cy = 0.1`, 100 timesteps).

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use serde::Deserialize;
use strata_core::{Coefficients, RunConfig};
use strata_engine::{CoordinatorOptions, SnapshotPolicy};
use strata_stencil::InitialCondition;

/// Top-level job configuration.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub diffusion: DiffusionConfig,
    #[serde(default)]
    pub run: RunSection,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Grid shape and starting field.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    #[serde(default = "default_extent")]
    pub rows: usize,
    #[serde(default = "default_extent")]
    pub cols: usize,
    /// Start from a constant field instead of the parabolic profile.
    #[serde(default)]
    pub uniform: Option<f64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_extent(),
            cols: default_extent(),
            uniform: None,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiffusionConfig {
    #[serde(default = "default_coefficient")]
    pub cx: f64,
    #[serde(default = "default_coefficient")]
    pub cy: f64,
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            cx: default_coefficient(),
            cy: default_coefficient(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    #[serde(default = "default_timesteps")]
    pub timesteps: u64,
    /// Coordinator plus workers.
    #[serde(default = "default_processes")]
    pub processes: usize,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            timesteps: default_timesteps(),
            processes: default_processes(),
        }
    }
}

/// Snapshot output.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Write a step snapshot every this many ticks; 0 disables them.
    #[serde(default = "default_every")]
    pub every: u64,
    #[serde(default = "default_true")]
    pub initial: bool,
    #[serde(default = "default_true", rename = "final")]
    pub last: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: default_output_dir(),
            prefix: default_prefix(),
            every: default_every(),
            initial: true,
            last: true,
        }
    }
}

fn default_extent() -> usize {
    100
}
fn default_coefficient() -> f64 {
    0.1
}
fn default_timesteps() -> u64 {
    100
}
fn default_processes() -> usize {
    4
}
fn default_true() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_prefix() -> String {
    "heat".into()
}
fn default_every() -> u64 {
    1
}

impl JobConfig {
    /// Parse a job file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading job file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing job file {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn run_config(&self) -> RunConfig {
        RunConfig::new(
            self.grid.rows,
            self.grid.cols,
            Coefficients::new(self.diffusion.cx, self.diffusion.cy),
            self.run.timesteps,
        )
    }

    pub fn coordinator_options(&self) -> CoordinatorOptions {
        let snapshot = if self.output.enabled {
            SnapshotPolicy {
                every: (self.output.every > 0).then_some(self.output.every),
                initial: self.output.initial,
                last: self.output.last,
                prefix: self.output.prefix.clone(),
            }
        } else {
            SnapshotPolicy::disabled()
        };
        let initial = match self.grid.uniform {
            Some(value) => InitialCondition::Uniform(value),
            None => InitialCondition::Parabolic,
        };
        CoordinatorOptions { snapshot, initial }
    }
}

/// Job parameters accepted on the command line. Each flag overrides the
/// corresponding job-file value.
#[derive(Args, Debug, Default)]
pub struct JobArgs {
    /// TOML job file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Grid height (decomposition axis).
    #[arg(long)]
    pub rows: Option<usize>,
    /// Grid width.
    #[arg(long)]
    pub cols: Option<usize>,
    /// Row-axis diffusion coefficient.
    #[arg(long)]
    pub cx: Option<f64>,
    /// Column-axis diffusion coefficient.
    #[arg(long)]
    pub cy: Option<f64>,
    /// Number of timesteps.
    #[arg(short = 'n', long)]
    pub timesteps: Option<u64>,
    /// Start from a constant field with this value.
    #[arg(long, value_name = "VALUE")]
    pub uniform: Option<f64>,
    /// Snapshot directory.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
    /// Snapshot file name prefix.
    #[arg(long)]
    pub prefix: Option<String>,
    /// Step snapshot cadence in ticks (0 disables step snapshots).
    #[arg(long, value_name = "TICKS")]
    pub every: Option<u64>,
    /// Skip the snapshot of the initial grid.
    #[arg(long)]
    pub no_initial: bool,
    /// Skip the snapshot of the final grid.
    #[arg(long)]
    pub no_final: bool,
    /// Write no snapshots at all.
    #[arg(long)]
    pub no_snapshots: bool,
}

impl JobArgs {
    /// Whether any run parameter was given, either as a file or a flag.
    pub fn pins_run_config(&self) -> bool {
        self.config.is_some()
            || self.rows.is_some()
            || self.cols.is_some()
            || self.cx.is_some()
            || self.cy.is_some()
            || self.timesteps.is_some()
    }

    /// Load the job file, if any, and apply the flags on top.
    pub fn resolve(&self) -> anyhow::Result<JobConfig> {
        let mut job = match &self.config {
            Some(path) => JobConfig::load(path)?,
            None => JobConfig::default(),
        };
        self.apply(&mut job);
        Ok(job)
    }

    fn apply(&self, job: &mut JobConfig) {
        if let Some(rows) = self.rows {
            job.grid.rows = rows;
        }
        if let Some(cols) = self.cols {
            job.grid.cols = cols;
        }
        if let Some(value) = self.uniform {
            job.grid.uniform = Some(value);
        }
        if let Some(cx) = self.cx {
            job.diffusion.cx = cx;
        }
        if let Some(cy) = self.cy {
            job.diffusion.cy = cy;
        }
        if let Some(timesteps) = self.timesteps {
            job.run.timesteps = timesteps;
        }
        if let Some(dir) = &self.output {
            job.output.directory = dir.clone();
        }
        if let Some(prefix) = &self.prefix {
            job.output.prefix = prefix.clone();
        }
        if let Some(every) = self.every {
            job.output.every = every;
        }
        if self.no_initial {
            job.output.initial = false;
        }
        if self.no_final {
            job.output.last = false;
        }
        if self.no_snapshots {
            job.output.enabled = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_the_reference_run() {
        let job = JobConfig::parse("").unwrap();
        assert_eq!(job, JobConfig::default());
        assert_eq!(job.run_config(), RunConfig::default());
        assert_eq!(job.run.processes, 4);
        let options = job.coordinator_options();
        assert_eq!(options.snapshot, SnapshotPolicy::default());
        assert_eq!(options.initial, InitialCondition::Parabolic);
    }

    #[test]
    fn full_file_parses() {
        let job = JobConfig::parse(
            r#"
            [grid]
            rows = 40
            cols = 30
            uniform = 1.5

            [diffusion]
            cx = 0.2
            cy = 0.05

            [run]
            timesteps = 12
            processes = 6

            [output]
            directory = "snaps"
            prefix = "plate"
            every = 0
            initial = false
            final = true
            "#,
        )
        .unwrap();
        let config = job.run_config();
        assert_eq!((config.rows, config.cols, config.timesteps), (40, 30, 12));
        assert_eq!(config.coefficients, Coefficients::new(0.2, 0.05));
        assert_eq!(job.run.processes, 6);
        assert_eq!(job.output.directory, PathBuf::from("snaps"));

        let options = job.coordinator_options();
        assert_eq!(options.snapshot.every, None);
        assert!(!options.snapshot.initial);
        assert!(options.snapshot.last);
        assert_eq!(options.snapshot.prefix, "plate");
        assert_eq!(options.initial, InitialCondition::Uniform(1.5));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(JobConfig::parse("[grid]\nrow = 10\n").is_err());
        assert!(JobConfig::parse("[solver]\n").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let mut job = JobConfig::parse("[grid]\nrows = 10\ncols = 10\n").unwrap();
        let args = JobArgs {
            rows: Some(20),
            timesteps: Some(3),
            no_final: true,
            ..JobArgs::default()
        };
        args.apply(&mut job);
        assert_eq!(job.grid.rows, 20);
        assert_eq!(job.grid.cols, 10);
        assert_eq!(job.run.timesteps, 3);
        assert!(!job.output.last);
        assert!(args.pins_run_config());
    }

    #[test]
    fn disabled_output_writes_nothing() {
        let args = JobArgs {
            no_snapshots: true,
            ..JobArgs::default()
        };
        let job = args.resolve().unwrap();
        assert_eq!(job.coordinator_options().snapshot, SnapshotPolicy::disabled());
        assert!(!args.pins_run_config());
    }
}
