//! Persisting full-grid snapshots.
//!
//! The coordinator hands each snapshot to a [`SnapshotSink`]. A failed
//! write is logged and counted by the coordinator but never aborts a run.
//!
//! [`CsvSnapshotWriter`] writes one text file per snapshot, one line per
//! grid row. Every value is printed as `{:8.3},`, followed by a space, or
//! by a newline after the last column:
//!
//! ```text
//!    0.000,    0.000,    0.000,    0.000,
//!    0.000,    4.000,    4.000,    0.000,
//! ```

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use strata_core::Grid;

use crate::error::SnapshotError;

/// Point in the run a snapshot was taken at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotKind {
    /// The initial grid, before any round.
    Initial,
    /// After the recompose step of a round.
    Step,
    /// The grid returned from the run.
    Final,
}

impl SnapshotKind {
    /// Label used in file names.
    pub fn label(self) -> &'static str {
        match self {
            SnapshotKind::Initial => "initial",
            SnapshotKind::Step => "step",
            SnapshotKind::Final => "final",
        }
    }
}

/// Identifies one snapshot: `<prefix>_<label>_<tick>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotId<'a> {
    /// Output identifier prefix.
    pub prefix: &'a str,
    /// When the snapshot was taken.
    pub kind: SnapshotKind,
    /// Timestep the grid corresponds to (0 for the initial grid).
    pub tick: u64,
}

impl fmt::Display for SnapshotId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.prefix, self.kind.label(), self.tick)
    }
}

/// Destination for grid snapshots.
pub trait SnapshotSink {
    /// Persist `grid` under `id`.
    fn write(&mut self, id: &SnapshotId<'_>, grid: &Grid) -> Result<(), SnapshotError>;
}

impl<S: SnapshotSink + ?Sized> SnapshotSink for &mut S {
    fn write(&mut self, id: &SnapshotId<'_>, grid: &Grid) -> Result<(), SnapshotError> {
        (**self).write(id, grid)
    }
}

impl<S: SnapshotSink + ?Sized> SnapshotSink for Box<S> {
    fn write(&mut self, id: &SnapshotId<'_>, grid: &Grid) -> Result<(), SnapshotError> {
        (**self).write(id, grid)
    }
}

/// Discards every snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn write(&mut self, _id: &SnapshotId<'_>, _grid: &Grid) -> Result<(), SnapshotError> {
        Ok(())
    }
}

/// Writes each snapshot to `<directory>/<id>.csv`.
#[derive(Clone, Debug)]
pub struct CsvSnapshotWriter {
    directory: PathBuf,
}

impl CsvSnapshotWriter {
    /// Write under `directory`, which is created on first use if missing.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Output directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File a snapshot with `id` is written to.
    pub fn path_for(&self, id: &SnapshotId<'_>) -> PathBuf {
        self.directory.join(format!("{id}.csv"))
    }
}

impl SnapshotSink for CsvSnapshotWriter {
    fn write(&mut self, id: &SnapshotId<'_>, grid: &Grid) -> Result<(), SnapshotError> {
        let path = self.path_for(id);
        let result = fs::create_dir_all(&self.directory).and_then(|()| {
            let mut w = BufWriter::new(File::create(&path)?);
            write_csv(&mut w, grid)?;
            w.flush()
        });
        result.map_err(|source| SnapshotError::Io { path, source })
    }
}

/// Format `grid` in the snapshot text layout.
pub fn write_csv(w: &mut dyn Write, grid: &Grid) -> io::Result<()> {
    let last = grid.cols() - 1;
    for r in 0..grid.rows() {
        let Some(row) = grid.row(r) else { break };
        for (c, v) in row.iter().enumerate() {
            write!(w, "{v:8.3},")?;
            w.write_all(if c == last { b"\n" } else { b" " })?;
        }
    }
    Ok(())
}
