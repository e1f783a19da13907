//! Run a whole cluster inside one process.
//!
//! [`run_local`] spawns one thread per worker, wires every rank through a
//! [`ChannelTransport`] mesh and runs the coordinator on the calling
//! thread. If any side fails, dropping its endpoint disconnects the others,
//! so no thread is left blocked.

use std::thread;

use log::{debug, info};
use strata_core::{worker_count, ConfigError, RunConfig, MIN_PROCESSES};
use strata_transport::{ChannelTransport, Transport};

use crate::coordinator::{Coordinator, CoordinatorOptions, RunOutcome};
use crate::error::RunError;
use crate::snapshot::SnapshotSink;
use crate::worker::Worker;

/// Run `config` on `processes` ranks (one coordinator plus `processes - 1`
/// worker threads).
///
/// Fails with [`ConfigError::TooFewProcesses`]
/// before spawning anything when `processes < 2`. When the coordinator
/// fails its error is returned; otherwise the first worker failure is.
pub fn run_local<S: SnapshotSink>(
    config: RunConfig,
    processes: usize,
    options: CoordinatorOptions,
    sink: S,
) -> Result<RunOutcome, RunError> {
    config.validate()?;
    let workers = worker_count(processes)?;
    info!("starting local run: {workers} worker threads");

    let mut endpoints = ChannelTransport::mesh(processes).into_iter();
    let Some(coordinator_end) = endpoints.next() else {
        return Err(ConfigError::TooFewProcesses {
            size: processes,
            min: MIN_PROCESSES,
        }
        .into());
    };

    let mut handles = Vec::with_capacity(workers);
    for endpoint in endpoints {
        let rank = endpoint.rank();
        let spawned = thread::Builder::new()
            .name(format!("strata-worker-{rank}"))
            .spawn(move || Worker::new(endpoint).run());
        match spawned {
            Ok(handle) => handles.push((rank, handle)),
            // Already spawned workers see the coordinator endpoint dropped
            // on return and exit with a disconnect.
            Err(e) => return Err(RunError::Spawn(e)),
        }
    }

    let outcome = Coordinator::new(coordinator_end, config, options, sink).run();

    let mut worker_error = None;
    for (rank, handle) in handles {
        match handle.join() {
            Ok(Ok(summary)) => debug!(
                "worker {rank}: {} rounds, {} computed, {} skipped",
                summary.rounds, summary.computed, summary.skipped
            ),
            Ok(Err(e)) => {
                worker_error.get_or_insert(RunError::Worker {
                    rank,
                    source: Box::new(e),
                });
            }
            Err(_) => {
                worker_error.get_or_insert(RunError::WorkerPanicked { rank });
            }
        }
    }

    let outcome = outcome?;
    match worker_error {
        Some(e) => Err(e),
        None => Ok(outcome),
    }
}
