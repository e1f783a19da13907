//! Write a worker's updated block back into the full grid.

use strata_core::{Grid, RowRange};

use crate::error::PartitionError;

/// Copy the owned rows of `block` into `grid`.
///
/// Local rows `1 ..= range.len() - 2` (global `range.start() + 1 ..=
/// range.end() - 1`) are written, interior columns `1 ..= cols - 2` only.
/// Local row 0, the last local row, and columns `0` and `cols - 1` are never
/// written, so fixed boundary cells keep their initial values and the halo
/// rows shared with neighbouring blocks are not clobbered. Merging the same
/// block twice leaves the grid as merging it once.
pub fn merge(block: &Grid, grid: &mut Grid, range: RowRange) -> Result<(), PartitionError> {
    if range.end() >= grid.rows() {
        return Err(PartitionError::RangeOutOfGrid {
            start: range.start(),
            end: range.end(),
            rows: grid.rows(),
        });
    }
    let expected = (range.len(), grid.cols());
    if block.shape() != expected {
        return Err(PartitionError::BlockShape {
            expected,
            found: block.shape(),
        });
    }
    let cols = grid.cols();
    if cols < 3 {
        return Ok(());
    }

    for (local, global) in (1..).zip(range.owned_rows()) {
        let (Some(src), Some(dst)) = (block.row(local), grid.row_mut(global)) else {
            continue;
        };
        dst[1..cols - 1].copy_from_slice(&src[1..cols - 1]);
    }
    Ok(())
}
