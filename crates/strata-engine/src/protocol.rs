//! The per-round exchange between the coordinator and a worker.
//!
//! Each round, in both directions, a block travels as three messages on
//! fixed tags:
//!
//! ```text
//! StartRow  Row(start)
//! EndRow    Row(end)
//! Payload   Cells((end - start + 1) * cols values)
//! ```
//!
//! A worker with no rows this round is sent the sentinel `(0, 0)` with an
//! empty payload and answers with the same. The sentinel never collides
//! with a real range: every planned block spans at least three rows.
//! Above the wire the two cases are the explicit [`WorkOrder`] variants.
//!
//! Before the first round the coordinator offers its [`RunConfig`] to each
//! worker ([`offer_config`]) and each worker answers with the fingerprint
//! of the configuration it will run ([`accept_config`]).

use strata_core::{Grid, Rank, RowRange, RunConfig};
use strata_transport::{Message, Tag, Transport};

use crate::error::ProtocolError;

/// One side of a round: a block to update (or its updated result), or
/// nothing to do.
#[derive(Clone, Debug, PartialEq)]
pub enum WorkOrder {
    /// Rows `range` of the grid, halo rows included.
    Assigned {
        /// Global rows covered by `block`.
        range: RowRange,
        /// `range.len() x cols` cells.
        block: Grid,
    },
    /// No rows remain for this worker this round.
    NoWorkThisRound,
}

impl WorkOrder {
    /// The range carried, `None` for [`NoWorkThisRound`](Self::NoWorkThisRound).
    pub fn range(&self) -> Option<RowRange> {
        match self {
            WorkOrder::Assigned { range, .. } => Some(*range),
            WorkOrder::NoWorkThisRound => None,
        }
    }
}

/// Send `order` to `dest` as start, end and payload messages.
pub fn send_work<T: Transport + ?Sized>(
    transport: &mut T,
    dest: Rank,
    order: WorkOrder,
) -> Result<(), ProtocolError> {
    let (start, end, cells) = match order {
        // Rows fit u32: RunConfig::validate bounds the cell count.
        WorkOrder::Assigned { range, block } => {
            (range.start() as u32, range.end() as u32, block.into_vec())
        }
        WorkOrder::NoWorkThisRound => (0, 0, Vec::new()),
    };
    transport.send(dest, Tag::StartRow, Message::Row(start))?;
    transport.send(dest, Tag::EndRow, Message::Row(end))?;
    transport.send(dest, Tag::Payload, Message::Cells(cells))?;
    Ok(())
}

/// Receive one block from `source` and check it against `config`.
pub fn receive_work<T: Transport + ?Sized>(
    transport: &mut T,
    source: Rank,
    config: &RunConfig,
) -> Result<WorkOrder, ProtocolError> {
    let start = receive_row(transport, source, Tag::StartRow)?;
    let end = receive_row(transport, source, Tag::EndRow)?;
    let cells = receive_cells(transport, source)?;

    if (start, end) == (0, 0) {
        if !cells.is_empty() {
            return Err(ProtocolError::PayloadLength {
                peer: source,
                expected: 0,
                found: cells.len(),
            });
        }
        return Ok(WorkOrder::NoWorkThisRound);
    }

    let invalid = || ProtocolError::InvalidRange {
        peer: source,
        start,
        end,
        rows: config.rows,
    };
    if end as usize >= config.rows {
        return Err(invalid());
    }
    let range = RowRange::new(start as usize, end as usize).map_err(|_| invalid())?;

    let expected = range.len() * config.cols;
    if cells.len() != expected {
        return Err(ProtocolError::PayloadLength {
            peer: source,
            expected,
            found: cells.len(),
        });
    }
    let block = Grid::from_vec(range.len(), config.cols, cells).map_err(|_| invalid())?;
    Ok(WorkOrder::Assigned { range, block })
}

/// Coordinator side of the startup handshake with one worker.
pub fn offer_config<T: Transport + ?Sized>(
    transport: &mut T,
    worker: Rank,
    config: &RunConfig,
) -> Result<(), ProtocolError> {
    transport.send(worker, Tag::Handshake, Message::Handshake(*config))?;
    let found = match transport.receive(worker, Tag::HandshakeAck)? {
        Message::HandshakeAck { fingerprint } => fingerprint,
        other => return Err(unexpected(worker, Tag::HandshakeAck, &other)),
    };
    let expected = config.fingerprint();
    if found != expected {
        return Err(ProtocolError::ConfigMismatch {
            peer: worker,
            expected,
            found,
        });
    }
    Ok(())
}

/// Worker side of the startup handshake.
///
/// With `expected == None` the worker adopts whatever the coordinator
/// offers. Otherwise the offer must match `expected`; on a mismatch the
/// worker still acknowledges with its own fingerprint, so the coordinator
/// detects the disagreement too, and then fails.
pub fn accept_config<T: Transport + ?Sized>(
    transport: &mut T,
    expected: Option<&RunConfig>,
) -> Result<RunConfig, ProtocolError> {
    let coordinator = Rank::COORDINATOR;
    let offered = match transport.receive(coordinator, Tag::Handshake)? {
        Message::Handshake(config) => config,
        other => return Err(unexpected(coordinator, Tag::Handshake, &other)),
    };
    let local = expected.copied().unwrap_or(offered);
    transport.send(
        coordinator,
        Tag::HandshakeAck,
        Message::HandshakeAck {
            fingerprint: local.fingerprint(),
        },
    )?;
    if local.fingerprint() != offered.fingerprint() {
        return Err(ProtocolError::ConfigMismatch {
            peer: coordinator,
            expected: local.fingerprint(),
            found: offered.fingerprint(),
        });
    }
    Ok(local)
}

fn receive_row<T: Transport + ?Sized>(
    transport: &mut T,
    source: Rank,
    tag: Tag,
) -> Result<u32, ProtocolError> {
    match transport.receive(source, tag)? {
        Message::Row(row) => Ok(row),
        other => Err(unexpected(source, tag, &other)),
    }
}

fn receive_cells<T: Transport + ?Sized>(
    transport: &mut T,
    source: Rank,
) -> Result<Vec<f64>, ProtocolError> {
    match transport.receive(source, Tag::Payload)? {
        Message::Cells(cells) => Ok(cells),
        other => Err(unexpected(source, Tag::Payload, &other)),
    }
}

fn unexpected(peer: Rank, tag: Tag, message: &Message) -> ProtocolError {
    ProtocolError::UnexpectedMessage {
        peer,
        tag,
        kind: message.kind(),
    }
}
