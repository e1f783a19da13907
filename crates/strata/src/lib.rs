//! Strata: distributed explicit heat diffusion on a 2D grid.
//!
//! This is the facade crate that re-exports the public API of the Strata
//! sub-crates. A rank-0 coordinator splits the grid into row blocks with one
//! halo row on each side, workers apply the five-point stencil to their
//! block, and the coordinator merges the owned rows back every timestep.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! let config = RunConfig::new(24, 16, Coefficients::new(0.1, 0.1), 10);
//! let options = CoordinatorOptions {
//!     snapshot: SnapshotPolicy::disabled(),
//!     ..CoordinatorOptions::default()
//! };
//! let outcome = run_local(config, 4, options, NullSink).unwrap();
//!
//! // Any worker count gives the serial answer, bit for bit.
//! let initial = InitialCondition::Parabolic.generate(24, 16).unwrap();
//! let serial = solve_serial(&config, &initial).unwrap();
//! assert!(outcome.grid.bitwise_eq(&serial));
//! assert_eq!(outcome.report.rounds, 10);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | `Grid`, `RowRange`, `Rank`, `RunConfig`, errors |
//! | [`stencil`] | `strata-stencil` | Kernel, initial conditions, serial solver |
//! | [`partition`] | `strata-partition` | Partition plan, block extract and merge |
//! | [`transport`] | `strata-transport` | Transport trait, channel and TCP transports, codec |
//! | [`engine`] | `strata-engine` | Coordinator, worker, snapshots, local launcher |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid container, ranks, row ranges and run configuration (`strata-core`).
pub use strata_core as types;

/// Five-point stencil kernel and serial reference solver (`strata-stencil`).
pub use strata_stencil as stencil;

/// Row decomposition: [`partition::PartitionPlan`], block
/// [`partition::extract`] and [`partition::merge`] (`strata-partition`).
pub use strata_partition as partition;

/// Point-to-point messaging (`strata-transport`).
///
/// [`transport::ChannelTransport`] connects threads of one process;
/// [`transport::TcpTransport`] connects separate processes.
pub use strata_transport as transport;

/// Coordinator and worker loops (`strata-engine`).
pub use strata_engine as engine;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use strata_core::{Coefficients, Grid, Rank, RowRange, RunConfig};

    // Errors
    pub use strata_core::{ConfigError, GridError};
    pub use strata_engine::{ProtocolError, RunError, SnapshotError};
    pub use strata_transport::TransportError;

    // Numerics
    pub use strata_stencil::{solve_serial, DiffusionStencil, InitialCondition};

    // Transport
    pub use strata_transport::{ChannelTransport, TcpTransport, Transport};

    // Engine
    pub use strata_engine::{
        run_local, Coordinator, CoordinatorOptions, CsvSnapshotWriter, NullSink, RunOutcome,
        RunReport, SnapshotPolicy, SnapshotSink, Worker,
    };
}
