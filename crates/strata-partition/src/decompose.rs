//! Copy a row range out of the full grid.

use strata_core::{Grid, RowRange};

use crate::error::PartitionError;

/// Copy rows `range.start() ..= range.end()` of `grid`, all columns, into
/// a new `range.len() x grid.cols()` block. Row order is preserved and
/// `grid` is not modified.
pub fn extract(grid: &Grid, range: RowRange) -> Result<Grid, PartitionError> {
    if range.end() >= grid.rows() {
        return Err(PartitionError::RangeOutOfGrid {
            start: range.start(),
            end: range.end(),
            rows: grid.rows(),
        });
    }
    let cells = grid.rows_slice(range)?.to_vec();
    Ok(Grid::from_vec(range.len(), grid.cols(), cells)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(rows: usize, cols: usize) -> Grid {
        Grid::from_fn(rows, cols, |r, c| (r * 100 + c) as f64).unwrap()
    }

    #[test]
    fn extracts_inclusive_rows() {
        let g = numbered(6, 3);
        let block = extract(&g, RowRange::new(2, 4).unwrap()).unwrap();
        assert_eq!(block.shape(), (3, 3));
        assert_eq!(block.row(0).unwrap(), g.row(2).unwrap());
        assert_eq!(block.row(2).unwrap(), g.row(4).unwrap());
    }

    #[test]
    fn single_row_range() {
        let g = numbered(4, 2);
        let block = extract(&g, RowRange::new(3, 3).unwrap()).unwrap();
        assert_eq!(block.as_slice(), &[300.0, 301.0]);
    }

    #[test]
    fn range_past_end_rejected() {
        let g = numbered(4, 2);
        assert_eq!(
            extract(&g, RowRange::new(2, 4).unwrap()),
            Err(PartitionError::RangeOutOfGrid {
                start: 2,
                end: 4,
                rows: 4
            })
        );
    }
}
