//! The worker update loop (ranks 1 and up).
//!
//! ```text
//! Idle -> Receiving -> Computing | Skipping -> Sending -> Idle    (x nts)
//!      -> Done
//! ```
//!
//! The only branch on content is the no-work sentinel. Blocks are sized per
//! round from the received range, so nothing is preallocated.

use log::{debug, trace};
use strata_core::{Rank, RunConfig};
use strata_stencil::DiffusionStencil;
use strata_transport::Transport;

use crate::error::RunError;
use crate::protocol::{accept_config, receive_work, send_work, WorkOrder};

/// Where a worker is in its round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerState {
    /// Between rounds, or not yet started.
    Idle,
    /// Waiting for the coordinator's block.
    Receiving,
    /// Applying the stencil to an assigned block.
    Computing,
    /// Handling the no-work sentinel.
    Skipping,
    /// Returning the result.
    Sending,
    /// All rounds finished.
    Done,
}

/// Counts from a finished worker run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerSummary {
    /// Worker rank.
    pub rank: Rank,
    /// Rounds completed.
    pub rounds: u64,
    /// Rounds with an assigned block.
    pub computed: u64,
    /// Rounds that received the no-work sentinel.
    pub skipped: u64,
}

/// One worker process.
pub struct Worker<T> {
    transport: T,
    expected: Option<RunConfig>,
    state: WorkerState,
}

impl<T: Transport> Worker<T> {
    /// A worker that adopts the configuration the coordinator offers.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            expected: None,
            state: WorkerState::Idle,
        }
    }

    /// A worker that only runs with `config`. Any other offer fails the
    /// handshake on both sides.
    pub fn with_config(transport: T, config: RunConfig) -> Self {
        Self {
            expected: Some(config),
            ..Self::new(transport)
        }
    }

    /// Current state.
    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Handshake, then serve `timesteps` rounds.
    pub fn run(&mut self) -> Result<WorkerSummary, RunError> {
        let rank = self.transport.rank();
        let config = accept_config(&mut self.transport, self.expected.as_ref())?;
        config.validate()?;
        let stencil = DiffusionStencil::new(config.coefficients);
        debug!("worker {rank} running {} rounds", config.timesteps);

        let mut summary = WorkerSummary {
            rank,
            rounds: 0,
            computed: 0,
            skipped: 0,
        };
        for round in 1..=config.timesteps {
            self.state = WorkerState::Receiving;
            let order = receive_work(&mut self.transport, Rank::COORDINATOR, &config)?;

            let reply = match order {
                WorkOrder::Assigned { range, block } => {
                    self.state = WorkerState::Computing;
                    trace!("worker {rank} round {round}: rows {range}");
                    summary.computed += 1;
                    WorkOrder::Assigned {
                        range,
                        block: stencil.step(&block),
                    }
                }
                WorkOrder::NoWorkThisRound => {
                    self.state = WorkerState::Skipping;
                    summary.skipped += 1;
                    WorkOrder::NoWorkThisRound
                }
            };

            self.state = WorkerState::Sending;
            send_work(&mut self.transport, Rank::COORDINATOR, reply)?;
            summary.rounds = round;
            self.state = WorkerState::Idle;
        }

        self.state = WorkerState::Done;
        debug!(
            "worker {rank} done: {} computed, {} skipped",
            summary.computed, summary.skipped
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use strata_core::{Coefficients, Grid, RowRange};
    use strata_transport::{ChannelTransport, Message, Tag};

    use crate::protocol::offer_config;

    #[test]
    fn computes_assigned_and_echoes_sentinel() {
        let mut mesh = ChannelTransport::mesh(2);
        let mut worker = Worker::new(mesh.pop().unwrap());
        let mut coord = mesh.pop().unwrap();
        let config = RunConfig::new(4, 4, Coefficients::default(), 2);

        let h = thread::spawn(move || {
            let summary = worker.run().unwrap();
            (summary, worker.state())
        });

        offer_config(&mut coord, Rank(1), &config).unwrap();

        let range = RowRange::new(0, 3).unwrap();
        let block = Grid::from_fn(4, 4, |i, j| {
            (i * (4 - i - 1) * j * (4 - j - 1)) as f64
        })
        .unwrap();
        send_work(&mut coord, Rank(1), WorkOrder::Assigned { range, block }).unwrap();
        match receive_work(&mut coord, Rank(1), &config).unwrap() {
            WorkOrder::Assigned { range: got, block } => {
                assert_eq!(got, range);
                assert!((block[(1, 1)] - 3.2).abs() < 1e-12);
            }
            other => panic!("expected Assigned, got {other:?}"),
        }

        send_work(&mut coord, Rank(1), WorkOrder::NoWorkThisRound).unwrap();
        assert_eq!(
            receive_work(&mut coord, Rank(1), &config).unwrap(),
            WorkOrder::NoWorkThisRound
        );

        let (summary, state) = h.join().unwrap();
        assert_eq!(
            summary,
            WorkerSummary {
                rank: Rank(1),
                rounds: 2,
                computed: 1,
                skipped: 1
            }
        );
        assert_eq!(state, WorkerState::Done);
    }

    #[test]
    fn coordinator_vanishing_is_a_disconnect() {
        let mut mesh = ChannelTransport::mesh(2);
        let mut worker = Worker::new(mesh.pop().unwrap());
        let mut coord = mesh.pop().unwrap();
        let config = RunConfig::new(5, 5, Coefficients::default(), 3);

        let h = thread::spawn(move || worker.run());
        offer_config(&mut coord, Rank(1), &config).unwrap();
        coord.send(Rank(1), Tag::StartRow, Message::Row(0)).unwrap();
        drop(coord);
        assert!(matches!(h.join().unwrap(), Err(RunError::Protocol(_))));
    }
}
