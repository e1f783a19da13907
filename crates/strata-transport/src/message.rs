//! Message tags, payloads and the transport trait.

use std::fmt;

use strata_core::{Rank, RunConfig};

use crate::error::TransportError;

/// Channel tag identifying the role of a message within an exchange.
///
/// A receiver names the tag it expects; a message arriving with any other
/// tag is a protocol desynchronisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// First row of a dispatched or returned range.
    StartRow,
    /// Last row of a dispatched or returned range.
    EndRow,
    /// Cell payload of a block.
    Payload,
    /// Run configuration sent by the coordinator before the first round.
    Handshake,
    /// Worker's acknowledgement of the handshake.
    HandshakeAck,
}

impl Tag {
    /// Wire value of this tag.
    pub fn to_u8(self) -> u8 {
        match self {
            Tag::StartRow => 1,
            Tag::EndRow => 2,
            Tag::Payload => 3,
            Tag::Handshake => 4,
            Tag::HandshakeAck => 5,
        }
    }

    /// Parse a wire value.
    pub fn from_u8(v: u8) -> Option<Tag> {
        match v {
            1 => Some(Tag::StartRow),
            2 => Some(Tag::EndRow),
            3 => Some(Tag::Payload),
            4 => Some(Tag::Handshake),
            5 => Some(Tag::HandshakeAck),
            _ => None,
        }
    }

    /// Whether `message` is a valid body for this tag.
    pub fn accepts(self, message: &Message) -> bool {
        matches!(
            (self, message),
            (Tag::StartRow | Tag::EndRow, Message::Row(_))
                | (Tag::Payload, Message::Cells(_))
                | (Tag::Handshake, Message::Handshake(_))
                | (Tag::HandshakeAck, Message::HandshakeAck { .. })
        )
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::StartRow => "start-row",
            Tag::EndRow => "end-row",
            Tag::Payload => "payload",
            Tag::Handshake => "handshake",
            Tag::HandshakeAck => "handshake-ack",
        };
        f.write_str(name)
    }
}

/// Body of a single message.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    /// A row index (start or end of a range, per the tag).
    Row(u32),
    /// Row-major cell values of a block. Empty for the no-work sentinel.
    Cells(Vec<f64>),
    /// Run parameters proposed by the coordinator.
    Handshake(RunConfig),
    /// Fingerprint of the configuration the worker will run with.
    HandshakeAck {
        /// [`RunConfig::fingerprint`] on the worker side.
        fingerprint: u64,
    },
}

impl Message {
    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Row(_) => "row",
            Message::Cells(_) => "cells",
            Message::Handshake(_) => "handshake",
            Message::HandshakeAck { .. } => "handshake-ack",
        }
    }
}

/// Blocking point-to-point messaging between ranks.
///
/// Rank 0 is the coordinator; ranks `1..size` are workers. Both calls block
/// until the exchange completes or the peer is gone. There is no timeout.
pub trait Transport {
    /// This endpoint's rank.
    fn rank(&self) -> Rank;

    /// Total number of ranks, coordinator included.
    fn size(&self) -> usize;

    /// Send `message` to `dest` under `tag`.
    fn send(&mut self, dest: Rank, tag: Tag, message: Message) -> Result<(), TransportError>;

    /// Receive the next message from `source`, which must carry `tag`.
    fn receive(&mut self, source: Rank, tag: Tag) -> Result<Message, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn rank(&self) -> Rank {
        (**self).rank()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn send(&mut self, dest: Rank, tag: Tag, message: Message) -> Result<(), TransportError> {
        (**self).send(dest, tag, message)
    }

    fn receive(&mut self, source: Rank, tag: Tag) -> Result<Message, TransportError> {
        (**self).receive(source, tag)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn rank(&self) -> Rank {
        (**self).rank()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn send(&mut self, dest: Rank, tag: Tag, message: Message) -> Result<(), TransportError> {
        (**self).send(dest, tag, message)
    }

    fn receive(&mut self, source: Rank, tag: Tag) -> Result<Message, TransportError> {
        (**self).receive(source, tag)
    }
}
