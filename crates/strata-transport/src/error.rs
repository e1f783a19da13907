//! Error types for transports and the wire codec.

use std::io;

use strata_core::Rank;
use thiserror::Error;

use crate::message::Tag;

/// Errors from encoding or decoding a frame.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Read or write on the underlying stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The tag byte is not a known [`Tag`].
    #[error("unknown tag byte {tag}")]
    UnknownTag {
        /// The unrecognised byte.
        tag: u8,
    },
    /// A message body does not fit the tag it is sent under.
    #[error("{kind} message cannot be sent under tag {tag}")]
    TagMismatch {
        /// Tag the message was framed with.
        tag: Tag,
        /// [`Message::kind`](crate::Message::kind) of the body.
        kind: &'static str,
    },
    /// A payload exceeds the `u32` length prefix.
    #[error("payload of {len} cells does not fit a frame")]
    PayloadTooLarge {
        /// Cell count of the rejected payload.
        len: usize,
    },
    /// A connection announcement was malformed.
    #[error("bad announcement: {detail}")]
    BadAnnouncement {
        /// What was wrong with it.
        detail: String,
    },
}

/// Errors from [`Transport`](crate::Transport) operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer is gone: its channel closed or its socket hit EOF.
    #[error("peer {peer} disconnected")]
    Disconnected {
        /// Rank of the vanished peer.
        peer: Rank,
    },
    /// The addressed rank is not reachable from this endpoint.
    #[error("rank {peer} is not reachable from rank {rank} (world size {size})")]
    UnknownPeer {
        /// Local rank.
        rank: Rank,
        /// Addressed rank.
        peer: Rank,
        /// World size.
        size: usize,
    },
    /// A message arrived under a different tag than the receiver expected.
    #[error("expected tag {expected} from rank {peer}, got {found}")]
    UnexpectedTag {
        /// Sending rank.
        peer: Rank,
        /// Tag the receiver asked for.
        expected: Tag,
        /// Tag that arrived.
        found: Tag,
    },
    /// A message body does not fit the tag it is sent under.
    #[error("{kind} message cannot be sent under tag {tag}")]
    TagMismatch {
        /// Tag the message was sent with.
        tag: Tag,
        /// [`Message::kind`](crate::Message::kind) of the body.
        kind: &'static str,
    },
    /// Framing failed on a stream transport.
    #[error("codec error with rank {peer}: {source}")]
    Codec {
        /// Rank on the other end of the stream.
        peer: Rank,
        /// Underlying codec error.
        source: CodecError,
    },
    /// A connecting rank's announcement was rejected.
    #[error("connection announcement failed: {0}")]
    Announcement(CodecError),
    /// Setting up a stream transport failed.
    #[error("connection setup failed: {0}")]
    Setup(#[from] io::Error),
}

impl TransportError {
    /// Classify a codec failure on the stream to `peer`. A truncated stream
    /// means the peer went away.
    pub(crate) fn from_codec(peer: Rank, source: CodecError) -> Self {
        match source {
            CodecError::Io(ref e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::UnexpectedEof
                        | io::ErrorKind::BrokenPipe
                        | io::ErrorKind::ConnectionReset
                        | io::ErrorKind::ConnectionAborted
                ) =>
            {
                TransportError::Disconnected { peer }
            }
            CodecError::TagMismatch { tag, kind } => TransportError::TagMismatch { tag, kind },
            source => TransportError::Codec { peer, source },
        }
    }
}
