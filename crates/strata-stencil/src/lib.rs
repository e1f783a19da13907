//! Explicit five-point diffusion stencil for the Strata solver.
//!
//! - [`DiffusionStencil`] advances the interior of a grid or block by one
//!   timestep. Boundary cells are never written.
//! - [`InitialCondition`] generates the starting temperature field.
//! - [`solve_serial`] runs the whole simulation on one process; the
//!   distributed run must agree with it bit for bit.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod initial;
pub mod kernel;
pub mod serial;

pub use initial::InitialCondition;
pub use kernel::DiffusionStencil;
pub use serial::solve_serial;
