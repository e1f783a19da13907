//! Row-wise domain decomposition for the Strata solver.
//!
//! The coordinator splits the full grid into contiguous row blocks, one per
//! worker, each carrying one halo row above and below the rows it owns:
//!
//! - [`PartitionPlan`] decides which [`RowRange`](strata_core::RowRange)
//!   each worker gets (or none, when rows run out).
//! - [`extract`] copies a range out of the full grid into a block.
//! - [`merge`] writes the owned rows of an updated block back, never
//!   touching halo rows or boundary columns.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod decompose;
pub mod error;
pub mod plan;
pub mod recompose;

pub use decompose::extract;
pub use error::PartitionError;
pub use plan::PartitionPlan;
pub use recompose::merge;
