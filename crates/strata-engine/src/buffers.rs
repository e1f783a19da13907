//! Ping-pong pair of full grids owned by the coordinator.
//!
//! ```text
//! odd tick:   read A  ->  write B
//! even tick:  read B  ->  write A
//! ```
//!
//! Both buffers start as copies of the initial grid. Only interior cells
//! are ever written, so the fixed boundary is present in whichever buffer
//! is current.

use strata_core::Grid;

/// Two same-shape grids that alternate between "previous" and "next".
pub struct DoubleBuffer {
    a: Grid,
    b: Grid,
    a_is_current: bool,
}

impl DoubleBuffer {
    /// Seed both buffers with `initial`.
    pub fn new(initial: Grid) -> Self {
        Self {
            b: initial.clone(),
            a: initial,
            a_is_current: true,
        }
    }

    /// The most recently completed grid.
    pub fn current(&self) -> &Grid {
        if self.a_is_current {
            &self.a
        } else {
            &self.b
        }
    }

    /// `(previous, next)` for the round in progress.
    pub fn split(&mut self) -> (&Grid, &mut Grid) {
        if self.a_is_current {
            (&self.a, &mut self.b)
        } else {
            (&self.b, &mut self.a)
        }
    }

    /// Make the grid just written the current one.
    pub fn flip(&mut self) {
        self.a_is_current = !self.a_is_current;
    }

    /// Consume the pair, keeping the current grid.
    pub fn into_current(self) -> Grid {
        if self.a_is_current {
            self.a
        } else {
            self.b
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternates_by_parity() {
        let mut buf = DoubleBuffer::new(Grid::filled(3, 3, 1.0).unwrap());
        {
            let (prev, next) = buf.split();
            assert_eq!(prev[(1, 1)], 1.0);
            next[(1, 1)] = 2.0;
        }
        buf.flip();
        assert_eq!(buf.current()[(1, 1)], 2.0);
        {
            let (prev, next) = buf.split();
            assert_eq!(prev[(1, 1)], 2.0);
            assert_eq!(next[(1, 1)], 1.0);
            next[(1, 1)] = 3.0;
        }
        buf.flip();
        assert_eq!(buf.into_current()[(1, 1)], 3.0);
    }

    #[test]
    fn both_buffers_seeded() {
        let init = Grid::from_fn(4, 4, |r, c| (r + c) as f64).unwrap();
        let mut buf = DoubleBuffer::new(init.clone());
        let (prev, next) = buf.split();
        assert!(prev.bitwise_eq(&init));
        assert!(next.bitwise_eq(&init));
    }
}
