//! Core types for the Strata distributed diffusion solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the bounds-checked [`Grid`] container shared by the stencil kernel,
//! decomposer and recomposer, the [`RowRange`] and [`Rank`] identifiers
//! used by the partition protocol, the immutable [`RunConfig`], and the
//! error types for these.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod grid;
pub mod id;

pub use config::{worker_count, Coefficients, RunConfig, MIN_PROCESSES};
pub use error::{ConfigError, GridError};
pub use grid::Grid;
pub use id::{Rank, RowRange};
