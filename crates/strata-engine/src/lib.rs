//! Coordinator and worker loops for distributed Strata runs.
//!
//! A run has one [`Coordinator`] (rank 0) and one or more [`Worker`]s,
//! connected by any [`Transport`](strata_transport::Transport). Every
//! timestep the coordinator partitions the grid by rows, ships each worker
//! its block plus halo rows, collects the updated blocks in the same rank
//! order, and merges them into the next grid of its [`DoubleBuffer`].
//!
//! # Architecture
//!
//! - [`protocol`]: the wire-level exchange ([`WorkOrder`], handshake)
//! - [`coordinator`]: the rank-0 loop, snapshot policy and options
//! - [`worker`]: the per-worker state machine
//! - [`snapshot`]: snapshot sinks, including the CSV writer
//! - [`local`]: a whole cluster on threads in one process
//!
//! Both sides agree on the run parameters through a fingerprint handshake
//! before the first round, so a mismatched timestep count or grid shape is
//! reported as [`ProtocolError::ConfigMismatch`] instead of deadlocking.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffers;
pub mod coordinator;
pub mod error;
pub mod local;
pub mod metrics;
pub mod protocol;
pub mod snapshot;
pub mod worker;

pub use buffers::DoubleBuffer;
pub use coordinator::{Coordinator, CoordinatorOptions, RunOutcome, SnapshotPolicy};
pub use error::{ProtocolError, RunError, SnapshotError};
pub use local::run_local;
pub use metrics::RunReport;
pub use protocol::WorkOrder;
pub use snapshot::{CsvSnapshotWriter, NullSink, SnapshotId, SnapshotKind, SnapshotSink};
pub use worker::{Worker, WorkerState, WorkerSummary};
