//! Wires a resolved job to a transport, a snapshot sink and the engine.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use log::info;
use strata_core::{worker_count, Rank, RunConfig};
use strata_engine::{
    run_local, Coordinator, CsvSnapshotWriter, NullSink, RunReport, SnapshotSink, Worker,
    WorkerSummary,
};
use strata_transport::TcpTransport;

use crate::config::JobConfig;

fn checked_config(job: &JobConfig) -> Result<RunConfig> {
    let config = job.run_config();
    config.validate().context("invalid run configuration")?;
    Ok(config)
}

fn snapshot_sink(job: &JobConfig) -> Box<dyn SnapshotSink> {
    if job.output.enabled {
        info!("writing snapshots to {}", job.output.directory.display());
        Box::new(CsvSnapshotWriter::new(&job.output.directory))
    } else {
        Box::new(NullSink)
    }
}

/// Run the whole cluster as threads of this process.
pub fn local(job: &JobConfig) -> Result<RunReport> {
    let config = checked_config(job)?;
    let outcome = run_local(
        config,
        job.run.processes,
        job.coordinator_options(),
        snapshot_sink(job),
    )
    .context("local run failed")?;
    Ok(outcome.report)
}

/// Accept `processes - 1` workers on `listen`, then drive the run.
pub fn coordinator(job: &JobConfig, listen: SocketAddr) -> Result<RunReport> {
    let config = checked_config(job)?;
    let processes = job.run.processes;
    worker_count(processes)?;

    info!("waiting for {} workers on {listen}", processes - 1);
    let transport = TcpTransport::listen(listen, processes)
        .with_context(|| format!("failed to assemble cluster on {listen}"))?;
    let outcome = Coordinator::new(
        transport,
        config,
        job.coordinator_options(),
        snapshot_sink(job),
    )
    .run()
    .context("coordinator failed")?;
    Ok(outcome.report)
}

/// Join the cluster at `connect` as `rank`. With `expected`, the worker
/// refuses a coordinator whose run parameters differ.
pub fn worker(connect: SocketAddr, rank: u32, expected: Option<RunConfig>) -> Result<WorkerSummary> {
    if let Some(config) = &expected {
        config.validate().context("invalid run configuration")?;
    }
    let transport = TcpTransport::connect(connect, Rank(rank))
        .with_context(|| format!("rank {rank} failed to join {connect}"))?;
    let mut worker = match expected {
        Some(config) => Worker::with_config(transport, config),
        None => Worker::new(transport),
    };
    worker
        .run()
        .with_context(|| format!("worker {rank} failed"))
}
