//! In-process transport over zero-capacity crossbeam channels.
//!
//! [`ChannelTransport::mesh`] builds one endpoint per rank with a dedicated
//! `bounded(0)` channel for every ordered `(source, dest)` pair. A send
//! blocks until the destination takes the message, matching the blocking
//! semantics of a cluster message-passing runtime, and per-pair channels
//! keep messages FIFO. Dropping an endpoint (for example when a worker
//! thread panics) closes its channels, so peers blocked on it see
//! [`TransportError::Disconnected`] instead of hanging.

use crossbeam_channel::{bounded, Receiver, Sender};
use log::trace;
use strata_core::Rank;

use crate::error::TransportError;
use crate::message::{Message, Tag, Transport};

type Envelope = (Tag, Message);

/// One rank's endpoint in an in-process mesh.
pub struct ChannelTransport {
    rank: Rank,
    outboxes: Vec<Option<Sender<Envelope>>>,
    inboxes: Vec<Option<Receiver<Envelope>>>,
}

impl ChannelTransport {
    /// Build `size` fully connected endpoints; element `i` has rank `i`.
    pub fn mesh(size: usize) -> Vec<ChannelTransport> {
        let mut endpoints: Vec<ChannelTransport> = (0..size)
            .map(|i| ChannelTransport {
                rank: Rank(i as u32),
                outboxes: (0..size).map(|_| None).collect(),
                inboxes: (0..size).map(|_| None).collect(),
            })
            .collect();

        for src in 0..size {
            for dst in 0..size {
                if src == dst {
                    continue;
                }
                let (tx, rx) = bounded(0);
                endpoints[src].outboxes[dst] = Some(tx);
                endpoints[dst].inboxes[src] = Some(rx);
            }
        }
        endpoints
    }

    fn unknown(&self, peer: Rank) -> TransportError {
        TransportError::UnknownPeer {
            rank: self.rank,
            peer,
            size: self.size(),
        }
    }
}

impl Transport for ChannelTransport {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.outboxes.len()
    }

    fn send(&mut self, dest: Rank, tag: Tag, message: Message) -> Result<(), TransportError> {
        if !tag.accepts(&message) {
            return Err(TransportError::TagMismatch {
                tag,
                kind: message.kind(),
            });
        }
        let tx = self
            .outboxes
            .get(dest.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| self.unknown(dest))?;
        trace!("rank {} -> {}: {} ({})", self.rank, dest, tag, message.kind());
        tx.send((tag, message))
            .map_err(|_| TransportError::Disconnected { peer: dest })
    }

    fn receive(&mut self, source: Rank, tag: Tag) -> Result<Message, TransportError> {
        let rx = self
            .inboxes
            .get(source.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| self.unknown(source))?;
        let (found, message) = rx
            .recv()
            .map_err(|_| TransportError::Disconnected { peer: source })?;
        trace!("rank {} <- {}: {} ({})", self.rank, source, found, message.kind());
        if found != tag {
            return Err(TransportError::UnexpectedTag {
                peer: source,
                expected: tag,
                found,
            });
        }
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn mesh_assigns_ranks_in_order() {
        let mesh = ChannelTransport::mesh(4);
        let ranks: Vec<u32> = mesh.iter().map(|t| t.rank().0).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
        assert!(mesh.iter().all(|t| t.size() == 4));
    }

    #[test]
    fn send_receive_across_threads() {
        let mut mesh = ChannelTransport::mesh(2);
        let mut worker = mesh.pop().unwrap();
        let mut coord = mesh.pop().unwrap();

        let handle = thread::spawn(move || {
            let row = worker.receive(Rank(0), Tag::StartRow).unwrap();
            let cells = worker.receive(Rank(0), Tag::Payload).unwrap();
            worker.send(Rank(0), Tag::Payload, cells).unwrap();
            row
        });

        coord.send(Rank(1), Tag::StartRow, Message::Row(7)).unwrap();
        coord
            .send(Rank(1), Tag::Payload, Message::Cells(vec![1.0, 2.0]))
            .unwrap();
        let echoed = coord.receive(Rank(1), Tag::Payload).unwrap();
        assert_eq!(echoed, Message::Cells(vec![1.0, 2.0]));
        assert_eq!(handle.join().unwrap(), Message::Row(7));
    }

    #[test]
    fn wrong_tag_is_reported() {
        let mut mesh = ChannelTransport::mesh(2);
        let mut b = mesh.pop().unwrap();
        let mut a = mesh.pop().unwrap();
        let handle = thread::spawn(move || a.send(Rank(1), Tag::EndRow, Message::Row(3)));
        match b.receive(Rank(0), Tag::StartRow) {
            Err(TransportError::UnexpectedTag {
                peer: Rank(0),
                expected: Tag::StartRow,
                found: Tag::EndRow,
            }) => {}
            other => panic!("expected UnexpectedTag, got {other:?}"),
        }
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn dropped_peer_disconnects_instead_of_blocking() {
        let mut mesh = ChannelTransport::mesh(2);
        drop(mesh.pop());
        let mut coord = mesh.pop().unwrap();
        match coord.receive(Rank(1), Tag::Payload) {
            Err(TransportError::Disconnected { peer }) => assert_eq!(peer, Rank(1)),
            other => panic!("expected Disconnected, got {other:?}"),
        }
        match coord.send(Rank(1), Tag::StartRow, Message::Row(0)) {
            Err(TransportError::Disconnected { peer }) => assert_eq!(peer, Rank(1)),
            other => panic!("expected Disconnected, got {other:?}"),
        }
    }

    #[test]
    fn self_and_out_of_range_peers_rejected() {
        let mut mesh = ChannelTransport::mesh(2);
        let coord = &mut mesh[0];
        assert!(matches!(
            coord.send(Rank(0), Tag::StartRow, Message::Row(0)),
            Err(TransportError::UnknownPeer { .. })
        ));
        assert!(matches!(
            coord.receive(Rank(5), Tag::StartRow),
            Err(TransportError::UnknownPeer { .. })
        ));
    }

    #[test]
    fn body_must_fit_tag() {
        let mut mesh = ChannelTransport::mesh(2);
        match mesh[0].send(Rank(1), Tag::StartRow, Message::Cells(vec![])) {
            Err(TransportError::TagMismatch {
                tag: Tag::StartRow,
                kind: "cells",
            }) => {}
            other => panic!("expected TagMismatch, got {other:?}"),
        }
    }
}
