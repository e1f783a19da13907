//! TCP transport for multi-process runs.
//!
//! Rank 0 listens and accepts one connection per worker; each worker
//! connects and announces its rank, and the coordinator answers with the
//! world size. The result is a star: workers can only address rank 0,
//! which is all the coordinator/worker protocol needs.
//!
//! ```text
//! worker -> coordinator   "STRA" u32 rank
//! coordinator -> worker   "STRA" u32 size
//! ```
//!
//! After the announcement every message is one [`codec`](crate::codec)
//! frame. Unlike [`ChannelTransport`](crate::ChannelTransport) a send
//! returns once the frame is flushed to the socket rather than when the
//! peer consumes it; ordering per connection is still FIFO.

use std::io::{BufReader, BufWriter, Read, Write};
use std::net::{TcpListener, TcpStream, ToSocketAddrs};

use log::{debug, info, trace};
use strata_core::Rank;

use crate::codec::{decode_frame, encode_frame, read_u32_le, write_u32_le};
use crate::error::{CodecError, TransportError};
use crate::message::{Message, Tag, Transport};

/// Magic bytes opening both directions of the announcement.
pub const ANNOUNCE_MAGIC: [u8; 4] = *b"STRA";

struct Peer {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Peer {
    fn new(stream: TcpStream) -> Result<Self, TransportError> {
        stream.set_nodelay(true)?;
        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
        })
    }
}

/// One rank's endpoint in a TCP star.
pub struct TcpTransport {
    rank: Rank,
    peers: Vec<Option<Peer>>,
}

impl TcpTransport {
    /// Bind `addr` and accept `size - 1` workers. Blocks until every worker
    /// rank has connected.
    pub fn listen(addr: impl ToSocketAddrs, size: usize) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)?;
        info!("listening on {} for {} workers", listener.local_addr()?, size.saturating_sub(1));
        Self::accept(&listener, size)
    }

    /// Accept `size - 1` workers on an already bound listener.
    pub fn accept(listener: &TcpListener, size: usize) -> Result<Self, TransportError> {
        let world = u32::try_from(size).map_err(|_| {
            TransportError::Announcement(CodecError::BadAnnouncement {
                detail: format!("world size {size} exceeds u32"),
            })
        })?;
        let mut peers: Vec<Option<Peer>> = (0..size).map(|_| None).collect();

        for _ in 1..size {
            let (stream, addr) = listener.accept()?;
            let mut peer = Peer::new(stream)?;
            let rank = read_announcement(&mut peer.reader).map_err(TransportError::Announcement)?;
            let slot = match peers.get_mut(rank as usize) {
                Some(slot) if rank != 0 && slot.is_none() => slot,
                _ => {
                    return Err(TransportError::Announcement(CodecError::BadAnnouncement {
                        detail: format!("{addr} announced rank {rank} (world size {size})"),
                    }))
                }
            };
            write_announcement(&mut peer.writer, world).map_err(TransportError::Announcement)?;
            debug!("worker {rank} connected from {addr}");
            *slot = Some(peer);
        }

        Ok(Self {
            rank: Rank::COORDINATOR,
            peers,
        })
    }

    /// Connect to the coordinator at `addr` as worker `rank`. The world size
    /// is learned from the coordinator's reply.
    pub fn connect(addr: impl ToSocketAddrs, rank: Rank) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)?;
        let mut peer = Peer::new(stream)?;
        write_announcement(&mut peer.writer, rank.0).map_err(TransportError::Announcement)?;
        let size = read_announcement(&mut peer.reader).map_err(TransportError::Announcement)? as usize;
        if rank.is_coordinator() || rank.index() >= size {
            return Err(TransportError::Announcement(CodecError::BadAnnouncement {
                detail: format!("rank {rank} outside world size {size}"),
            }));
        }
        debug!("rank {rank} joined world of {size}");

        let mut peers: Vec<Option<Peer>> = (0..size).map(|_| None).collect();
        peers[0] = Some(peer);
        Ok(Self { rank, peers })
    }

    fn peer(&mut self, peer: Rank) -> Result<&mut Peer, TransportError> {
        let (rank, size) = (self.rank, self.peers.len());
        self.peers
            .get_mut(peer.index())
            .and_then(Option::as_mut)
            .ok_or(TransportError::UnknownPeer { rank, peer, size })
    }
}

impl Transport for TcpTransport {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> usize {
        self.peers.len()
    }

    fn send(&mut self, dest: Rank, tag: Tag, message: Message) -> Result<(), TransportError> {
        let rank = self.rank;
        let peer = self.peer(dest)?;
        trace!("rank {rank} -> {dest}: {tag} ({})", message.kind());
        encode_frame(&mut peer.writer, tag, &message)
            .map_err(|e| TransportError::from_codec(dest, e))?;
        peer.writer
            .flush()
            .map_err(|e| TransportError::from_codec(dest, e.into()))
    }

    fn receive(&mut self, source: Rank, tag: Tag) -> Result<Message, TransportError> {
        let rank = self.rank;
        let peer = self.peer(source)?;
        let (found, message) =
            decode_frame(&mut peer.reader).map_err(|e| TransportError::from_codec(source, e))?;
        trace!("rank {rank} <- {source}: {found} ({})", message.kind());
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

fn write_announcement(w: &mut BufWriter<TcpStream>, value: u32) -> Result<(), CodecError> {
    w.write_all(&ANNOUNCE_MAGIC)?;
    write_u32_le(w, value)?;
    w.flush()?;
    Ok(())
}

fn read_announcement(r: &mut BufReader<TcpStream>) -> Result<u32, CodecError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != ANNOUNCE_MAGIC {
        return Err(CodecError::BadAnnouncement {
            detail: format!("bad magic {magic:02x?}"),
        });
    }
    read_u32_le(r)
}
