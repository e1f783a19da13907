//! The coordinator loop (rank 0).
//!
//! ```text
//! Initializing
//!   -> { Decomposing -> Dispatching -> Collecting -> Recomposing -> Snapshotting } x nts
//!   -> Finalizing
//! ```
//!
//! The coordinator owns both full grids. Each round it extracts one block
//! per planned range from the previous grid, sends every worker its block
//! (or the no-work sentinel) in increasing rank order, then receives the
//! results in the same order and merges each into the next grid. The
//! receive order must match the send order for the bookkeeping to line up.

use std::time::Instant;

use log::{debug, info, warn};
use strata_core::{worker_count, Grid, GridError, RunConfig};
use strata_partition::{extract, merge, PartitionPlan};
use strata_stencil::InitialCondition;
use strata_transport::Transport;

use crate::buffers::DoubleBuffer;
use crate::error::{ProtocolError, RunError};
use crate::metrics::RunReport;
use crate::protocol::{offer_config, receive_work, send_work, WorkOrder};
use crate::snapshot::{SnapshotId, SnapshotKind, SnapshotSink};

/// Which snapshots the coordinator takes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotPolicy {
    /// Snapshot after every `n`-th round; `None` disables per-round snapshots.
    pub every: Option<u64>,
    /// Snapshot the initial grid before the first round.
    pub initial: bool,
    /// Snapshot the final grid after the last round.
    pub last: bool,
    /// Output identifier prefix.
    pub prefix: String,
}

impl SnapshotPolicy {
    /// No snapshots at all.
    pub fn disabled() -> Self {
        Self {
            every: None,
            initial: false,
            last: false,
            ..Self::default()
        }
    }

    fn wants_step(&self, tick: u64) -> bool {
        matches!(self.every, Some(n) if n > 0 && tick % n == 0)
    }
}

impl Default for SnapshotPolicy {
    /// Initial grid, every round, and the final grid.
    fn default() -> Self {
        Self {
            every: Some(1),
            initial: true,
            last: true,
            prefix: "heat".to_string(),
        }
    }
}

/// Coordinator-only settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CoordinatorOptions {
    /// Snapshot cadence and naming.
    pub snapshot: SnapshotPolicy,
    /// How [`Coordinator::run`] builds the initial grid.
    pub initial: InitialCondition,
}

/// Final state of a completed run.
#[derive(Debug)]
pub struct RunOutcome {
    /// The grid after the last round.
    pub grid: Grid,
    /// Run statistics.
    pub report: RunReport,
}

/// Rank 0 of a run.
pub struct Coordinator<T, S> {
    transport: T,
    config: RunConfig,
    options: CoordinatorOptions,
    sink: S,
}

impl<T: Transport, S: SnapshotSink> Coordinator<T, S> {
    /// Set up a coordinator over `transport`, which must be rank 0.
    pub fn new(transport: T, config: RunConfig, options: CoordinatorOptions, sink: S) -> Self {
        Self {
            transport,
            config,
            options,
            sink,
        }
    }

    /// Run from the configured initial condition.
    pub fn run(self) -> Result<RunOutcome, RunError> {
        let initial = self
            .options
            .initial
            .generate(self.config.rows, self.config.cols)?;
        self.run_with(initial)
    }

    /// Run from an explicit initial grid of shape `rows x cols`.
    pub fn run_with(self, initial: Grid) -> Result<RunOutcome, RunError> {
        let Self {
            mut transport,
            config,
            options,
            mut sink,
        } = self;
        let started = Instant::now();

        config.validate()?;
        let workers = worker_count(transport.size())?;
        if initial.shape() != (config.rows, config.cols) {
            return Err(GridError::ShapeMismatch {
                expected: (config.rows, config.cols),
                found: initial.shape(),
            }
            .into());
        }
        if !config.coefficients.is_stable() {
            warn!(
                "cx + cy = {} exceeds the explicit-scheme stability limit 0.5",
                config.coefficients.cx + config.coefficients.cy
            );
        }

        let plan = PartitionPlan::new(config.rows, workers)?;
        info!("using {} processes", transport.size());
        info!("using [{}][{}] grid", config.rows, config.cols);
        info!(
            "splitting into blocks of {} rows + 2 halo",
            plan.stride()
        );
        if plan.idle_workers() > 0 {
            info!(
                "{} of {} workers have no rows and receive the no-work sentinel",
                plan.idle_workers(),
                workers
            );
        }

        for (rank, _) in plan.iter() {
            offer_config(&mut transport, rank, &config)?;
        }
        debug!("handshake complete with {workers} workers");

        let mut report = RunReport {
            timesteps: config.timesteps,
            workers,
            ..RunReport::default()
        };
        let policy = &options.snapshot;
        let mut buffers = DoubleBuffer::new(initial);
        if policy.initial {
            snapshot(&mut sink, policy, SnapshotKind::Initial, 0, buffers.current(), &mut report);
        }

        for tick in 1..=config.timesteps {
            let (prev, next) = buffers.split();

            let phase = Instant::now();
            for (rank, assignment) in plan.iter() {
                let order = match assignment {
                    Some(range) => {
                        debug!("> 0 sending {rank} rows {range}");
                        WorkOrder::Assigned {
                            range,
                            block: extract(prev, range)?,
                        }
                    }
                    None => WorkOrder::NoWorkThisRound,
                };
                send_work(&mut transport, rank, order)?;
            }
            report.dispatch_time += phase.elapsed();

            let phase = Instant::now();
            for (rank, assignment) in plan.iter() {
                let result = receive_work(&mut transport, rank, &config)?;
                match (assignment, result) {
                    (Some(range), WorkOrder::Assigned { range: got, block }) if got == range => {
                        merge(&block, next, range)?;
                    }
                    (None, WorkOrder::NoWorkThisRound) => report.idle_worker_rounds += 1,
                    (expected, found) => {
                        return Err(ProtocolError::RangeMismatch {
                            worker: rank,
                            expected,
                            found: found.range(),
                        }
                        .into())
                    }
                }
            }
            report.collect_time += phase.elapsed();

            buffers.flip();
            report.rounds = tick;
            if policy.wants_step(tick) {
                snapshot(&mut sink, policy, SnapshotKind::Step, tick, buffers.current(), &mut report);
            }
        }

        if policy.last {
            snapshot(
                &mut sink,
                policy,
                SnapshotKind::Final,
                config.timesteps,
                buffers.current(),
                &mut report,
            );
        }
        report.elapsed = started.elapsed();
        info!("done: {report}");

        Ok(RunOutcome {
            grid: buffers.into_current(),
            report,
        })
    }
}

fn snapshot<S: SnapshotSink>(
    sink: &mut S,
    policy: &SnapshotPolicy,
    kind: SnapshotKind,
    tick: u64,
    grid: &Grid,
    report: &mut RunReport,
) {
    let id = SnapshotId {
        prefix: &policy.prefix,
        kind,
        tick,
    };
    match sink.write(&id, grid) {
        Ok(()) => {
            debug!("wrote snapshot {id}");
            report.snapshots_written += 1;
        }
        Err(e) => {
            warn!("{e}; continuing without snapshot {id}");
            report.snapshot_failures += 1;
        }
    }
}
