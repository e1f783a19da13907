//! Point-to-point message transports for Strata.
//!
//! The coordinator and workers talk only through the [`Transport`] trait:
//! `send(dest, tag, message)` and `receive(source, tag)`. Two
//! implementations are provided:
//!
//! - [`ChannelTransport`] wires ranks inside one process through
//!   zero-capacity crossbeam channels, so every send is a rendezvous
//!   with its matching receive.
//! - [`TcpTransport`] connects separate processes in a star around
//!   rank 0, framing messages with the binary [`codec`].
//!
//! Messages between a given `(source, dest)` pair are delivered in send
//! order on both transports.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod channel;
pub mod codec;
pub mod error;
pub mod message;
pub mod tcp;

pub use channel::ChannelTransport;
pub use error::{CodecError, TransportError};
pub use message::{Message, Tag, Transport};
pub use tcp::TcpTransport;
