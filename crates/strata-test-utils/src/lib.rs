//! Test utilities and mock types for Strata development.
//!
//! Provides mock implementations of the engine's seams
//! ([`SnapshotSink`], [`Transport`]) and grid/config fixtures for building
//! test scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::PathBuf;

use strata_core::{Grid, Rank};
use strata_engine::{SnapshotError, SnapshotId, SnapshotSink};
use strata_transport::{Message, Tag, Transport, TransportError};

/// Keeps a copy of every snapshot handed to it.
#[derive(Default)]
pub struct RecordingSink {
    pub snapshots: Vec<(String, Grid)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot ids in the order they were written.
    pub fn ids(&self) -> Vec<&str> {
        self.snapshots.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Grid> {
        self.snapshots
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, g)| g)
    }
}

impl SnapshotSink for RecordingSink {
    fn write(&mut self, id: &SnapshotId<'_>, grid: &Grid) -> Result<(), SnapshotError> {
        self.snapshots.push((id.to_string(), grid.clone()));
        Ok(())
    }
}

/// Rejects every snapshot as if the output location were unwritable.
#[derive(Default)]
pub struct FailingSink {
    pub attempts: u64,
}

impl SnapshotSink for FailingSink {
    fn write(&mut self, id: &SnapshotId<'_>, _grid: &Grid) -> Result<(), SnapshotError> {
        self.attempts += 1;
        Err(SnapshotError::Io {
            path: PathBuf::from(format!("/unwritable/{id}.csv")),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        })
    }
}

/// A transport that replays scripted incoming messages and records what
/// is sent.
///
/// Receiving from a source with nothing left in its script behaves like a
/// vanished peer.
pub struct ScriptedTransport {
    rank: Rank,
    size: usize,
    incoming: HashMap<Rank, VecDeque<(Tag, Message)>>,
    pub sent: Vec<(Rank, Tag, Message)>,
}

impl ScriptedTransport {
    pub fn new(rank: Rank, size: usize) -> Self {
        Self {
            rank,
            size,
            incoming: HashMap::new(),
            sent: Vec::new(),
        }
    }

    /// Queue one message from `source`.
    pub fn push(&mut self, source: Rank, tag: Tag, message: Message) -> &mut Self {
        self.incoming
            .entry(source)
            .or_default()
            .push_back((tag, message));
        self
    }

    /// Queue a full block exchange (start, end, payload) from `source`.
    pub fn push_block(&mut self, source: Rank, start: u32, end: u32, cells: Vec<f64>) -> &mut Self {
        self.push(source, Tag::StartRow, Message::Row(start))
            .push(source, Tag::EndRow, Message::Row(end))
            .push(source, Tag::Payload, Message::Cells(cells))
    }

    /// Messages sent under `tag`, in order.
    pub fn sent_with(&self, tag: Tag) -> Vec<&Message> {
        self.sent
            .iter()
            .filter(|(_, t, _)| *t == tag)
            .map(|(_, _, m)| m)
            .collect()
    }
}

impl Transport for ScriptedTransport {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&mut self, dest: Rank, tag: Tag, message: Message) -> Result<(), TransportError> {
        self.sent.push((dest, tag, message));
        Ok(())
    }

    fn receive(&mut self, source: Rank, tag: Tag) -> Result<Message, TransportError> {
        let (found, message) = self
            .incoming
            .get_mut(&source)
            .and_then(VecDeque::pop_front)
            .ok_or(TransportError::Disconnected { peer: source })?;
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
