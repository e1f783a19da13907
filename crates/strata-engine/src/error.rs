//! Error types for the coordinator, workers and snapshot sinks.

use std::io;
use std::path::PathBuf;

use strata_core::{ConfigError, GridError, Rank, RowRange};
use strata_partition::PartitionError;
use strata_transport::{Tag, TransportError};
use thiserror::Error;

/// A coordinator and worker disagree about the state of the exchange.
///
/// Every variant is fatal for the run.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The handshake fingerprints differ.
    #[error(
        "configuration mismatch with rank {peer}: expected {expected:#018x}, found {found:#018x}"
    )]
    ConfigMismatch {
        /// The other side of the handshake.
        peer: Rank,
        /// Fingerprint of the local configuration.
        expected: u64,
        /// Fingerprint the peer reported.
        found: u64,
    },
    /// A message arrived under a different tag than the exchange step expects.
    #[error("expected tag {expected} from rank {peer}, got {found}")]
    UnexpectedTag {
        /// Sending rank.
        peer: Rank,
        /// Tag for the current step.
        expected: Tag,
        /// Tag that arrived.
        found: Tag,
    },
    /// A message body is not the kind the exchange step expects.
    #[error("expected {tag} from rank {peer}, got a {kind} message")]
    UnexpectedMessage {
        /// Sending rank.
        peer: Rank,
        /// Tag the message arrived under.
        tag: Tag,
        /// [`Message::kind`](strata_transport::Message::kind) of the body.
        kind: &'static str,
    },
    /// A worker returned a different range than it was dispatched.
    #[error(
        "rank {worker} returned {} for dispatched {}",
        fmt_range(.found),
        fmt_range(.expected)
    )]
    RangeMismatch {
        /// Worker rank.
        worker: Rank,
        /// Range dispatched this round, `None` for no work.
        expected: Option<RowRange>,
        /// Range the worker returned, `None` for no work.
        found: Option<RowRange>,
    },
    /// A payload does not hold `(end - start + 1) * cols` cells.
    #[error("payload from rank {peer} has {found} cells, expected {expected}")]
    PayloadLength {
        /// Sending rank.
        peer: Rank,
        /// Cell count implied by the range descriptors.
        expected: usize,
        /// Cells received.
        found: usize,
    },
    /// Range descriptors that do not describe rows of the grid.
    #[error("rank {peer} sent invalid range {start} - {end} for a grid of {rows} rows")]
    InvalidRange {
        /// Sending rank.
        peer: Rank,
        /// Start descriptor.
        start: u32,
        /// End descriptor.
        end: u32,
        /// Grid row count.
        rows: usize,
    },
    /// The transport failed underneath the protocol.
    #[error(transparent)]
    Transport(TransportError),
}

fn fmt_range(range: &Option<RowRange>) -> String {
    match range {
        Some(r) => format!("rows {r}"),
        None => "no work".to_string(),
    }
}

impl From<TransportError> for ProtocolError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::UnexpectedTag {
                peer,
                expected,
                found,
            } => ProtocolError::UnexpectedTag {
                peer,
                expected,
                found,
            },
            other => ProtocolError::Transport(other),
        }
    }
}

/// A snapshot could not be persisted. Reported as a warning; the run
/// continues.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Creating the output location or writing the file failed.
    #[error("failed to write snapshot {}: {source}", .path.display())]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors that end a coordinator or worker run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The run configuration or process count is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The initial grid does not fit the configuration.
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
    /// Partitioning or merging failed.
    #[error("partition error: {0}")]
    Partition(#[from] PartitionError),
    /// The coordinator/worker exchange broke down.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// A local worker thread could not be started.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(io::Error),
    /// A local worker thread panicked.
    #[error("worker {rank} panicked")]
    WorkerPanicked {
        /// Rank of the worker.
        rank: Rank,
    },
    /// A local worker failed.
    #[error("worker {rank} failed: {source}")]
    Worker {
        /// Rank of the worker.
        rank: Rank,
        /// The worker's error.
        source: Box<RunError>,
    },
}

impl From<TransportError> for RunError {
    fn from(e: TransportError) -> Self {
        RunError::Protocol(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_tag_error_lifts_to_protocol_tag_error() {
        let err: ProtocolError = TransportError::UnexpectedTag {
            peer: Rank(4),
            expected: Tag::EndRow,
            found: Tag::Payload,
        }
        .into();
        match err {
            ProtocolError::UnexpectedTag {
                peer,
                expected: Tag::EndRow,
                found: Tag::Payload,
            } => assert_eq!(peer, Rank(4)),
            other => panic!("expected UnexpectedTag, got {other:?}"),
        }
    }

    #[test]
    fn disconnect_stays_transport() {
        let err: RunError = TransportError::Disconnected { peer: Rank(2) }.into();
        assert!(matches!(
            err,
            RunError::Protocol(ProtocolError::Transport(TransportError::Disconnected { .. }))
        ));
        assert_eq!(err.to_string(), "protocol error: peer 2 disconnected");
    }

    #[test]
    fn range_mismatch_display() {
        let err = ProtocolError::RangeMismatch {
            worker: Rank(3),
            expected: RowRange::new(4, 9).ok(),
            found: None,
        };
        assert_eq!(
            err.to_string(),
            "rank 3 returned no work for dispatched rows 4 - 9"
        );
    }
}
