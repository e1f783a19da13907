//! Per-round assignment of row ranges to workers.
//!
//! The interior rows `1..=X-2` are split into contiguous strips of
//! `stride` rows, assigned to workers in increasing rank order. Each strip
//! is shipped with one extra row on either side, so a block spans
//! `chunk = stride + 2` rows and adjacent blocks overlap by two rows (each
//! one's last owned row is the next one's halo, and vice versa).
//!
//! ```text
//! chunk  = min(ceil(X / N) + 2, X)
//! stride = chunk - 2
//! block k: start = k * stride, end = min(start + stride + 1, X - 1)
//!          emitted while start < X - 2
//! ```
//!
//! The first block's upper halo is the fixed boundary row 0 and the last
//! block's lower halo is the fixed boundary row `X-1`, so a block's owned
//! rows are always exactly `start+1 ..= end-1`. Because `N * stride >= X - 2`,
//! at most `N` blocks are produced; workers past the last block get no
//! work for the round.

use smallvec::SmallVec;
use strata_core::{Rank, RowRange};

use crate::error::PartitionError;

/// Row assignments for one round, indexed by worker (rank - 1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionPlan {
    rows: usize,
    chunk: usize,
    assignments: SmallVec<[Option<RowRange>; 16]>,
}

impl PartitionPlan {
    /// Plan the distribution of `rows` grid rows across `workers` workers.
    pub fn new(rows: usize, workers: usize) -> Result<Self, PartitionError> {
        if workers == 0 {
            return Err(PartitionError::NoWorkers);
        }
        if rows < 3 {
            return Err(PartitionError::NoInteriorRows { rows });
        }
        let chunk = (rows.div_ceil(workers) + 2).min(rows);
        let stride = chunk - 2;
        let last_interior = rows - 2;

        let assignments = (0..workers)
            .map(|k| {
                let start = k * stride;
                if start < last_interior {
                    let end = (start + stride + 1).min(rows - 1);
                    RowRange::new(start, end).ok()
                } else {
                    None
                }
            })
            .collect();

        Ok(Self {
            rows,
            chunk,
            assignments,
        })
    }

    /// Grid row count this plan was built for.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of workers (assigned or idle).
    pub fn workers(&self) -> usize {
        self.assignments.len()
    }

    /// Rows per block including both halo rows (the largest block size).
    pub fn chunk_size(&self) -> usize {
        self.chunk
    }

    /// Owned rows per full block.
    pub fn stride(&self) -> usize {
        self.chunk - 2
    }

    /// Range for the worker with the given rank, or `None` when it has no
    /// work this round or the rank is not a worker of this plan.
    pub fn assignment(&self, rank: Rank) -> Option<RowRange> {
        let idx = rank.index().checked_sub(1)?;
        self.assignments.get(idx).copied().flatten()
    }

    /// `(rank, assignment)` for every worker, in increasing rank order.
    pub fn iter(&self) -> impl Iterator<Item = (Rank, Option<RowRange>)> + '_ {
        self.assignments
            .iter()
            .enumerate()
            .map(|(i, a)| (Rank(i as u32 + 1), *a))
    }

    /// Number of workers with a range this round.
    pub fn active_workers(&self) -> usize {
        self.assignments.iter().filter(|a| a.is_some()).count()
    }

    /// Number of workers with no rows left for them.
    pub fn idle_workers(&self) -> usize {
        self.workers() - self.active_workers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges(plan: &PartitionPlan) -> Vec<Option<(usize, usize)>> {
        plan.iter()
            .map(|(_, a)| a.map(|r| (r.start(), r.end())))
            .collect()
    }

    #[test]
    fn hundred_rows_eleven_workers_leaves_one_idle() {
        // ceil(100 / 11) = 10; chunk 12, stride 10.
        let plan = PartitionPlan::new(100, 11).unwrap();
        assert_eq!(plan.chunk_size(), 12);
        assert_eq!(plan.stride(), 10);
        assert_eq!(plan.active_workers(), 10);
        assert_eq!(plan.idle_workers(), 1);
        assert_eq!(plan.assignment(Rank(1)), RowRange::new(0, 11).ok());
        assert_eq!(plan.assignment(Rank(10)), RowRange::new(90, 99).ok());
        assert_eq!(plan.assignment(Rank(11)), None);
    }

    #[test]
    fn single_worker_gets_whole_grid() {
        let plan = PartitionPlan::new(4, 1).unwrap();
        assert_eq!(plan.chunk_size(), 4);
        assert_eq!(ranges(&plan), vec![Some((0, 3))]);
    }

    #[test]
    fn small_grid_many_workers() {
        // ceil(10 / 4) = 3; stride 3: starts 0, 3, 6; 9 >= 8 is idle.
        let plan = PartitionPlan::new(10, 4).unwrap();
        assert_eq!(
            ranges(&plan),
            vec![Some((0, 4)), Some((3, 7)), Some((6, 9)), None]
        );
    }

    #[test]
    fn more_workers_than_rows() {
        let plan = PartitionPlan::new(3, 8).unwrap();
        assert_eq!(plan.active_workers(), 1);
        assert_eq!(plan.assignment(Rank(1)), RowRange::new(0, 2).ok());
    }

    #[test]
    fn coordinator_and_unknown_ranks_have_no_assignment() {
        let plan = PartitionPlan::new(10, 2).unwrap();
        assert_eq!(plan.assignment(Rank::COORDINATOR), None);
        assert_eq!(plan.assignment(Rank(3)), None);
    }

    #[test]
    fn invalid_inputs() {
        assert_eq!(PartitionPlan::new(10, 0), Err(PartitionError::NoWorkers));
        assert_eq!(
            PartitionPlan::new(2, 1),
            Err(PartitionError::NoInteriorRows { rows: 2 })
        );
    }
}
