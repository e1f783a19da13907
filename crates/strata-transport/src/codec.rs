//! Binary frame encoding for stream transports.
//!
//! All integers and floats are little-endian. A frame is a `u8` tag byte
//! followed by a body whose layout the tag determines:
//!
//! ```text
//! StartRow / EndRow   u32 row
//! Payload             u32 cell count, then that many f64
//! Handshake           u64 rows, u64 cols, f64 cx, f64 cy, u64 timesteps
//! HandshakeAck        u64 fingerprint
//! ```

use std::io::{Read, Write};

use strata_core::{Coefficients, RunConfig};

use crate::error::CodecError;
use crate::message::{Message, Tag};

/// Upper bound on the capacity reserved up front for a decoded payload.
/// Larger payloads grow as cells arrive.
const MAX_PREALLOC_CELLS: usize = 1 << 16;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), CodecError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian u64.
pub fn write_u64_le(w: &mut dyn Write, v: u64) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), CodecError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, CodecError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, CodecError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian u64.
pub fn read_u64_le(r: &mut dyn Read) -> Result<u64, CodecError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a little-endian f64.
pub fn read_f64_le(r: &mut dyn Read) -> Result<f64, CodecError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

// ── Frame encode/decode ─────────────────────────────────────────

/// Encode one frame. Fails with [`CodecError::TagMismatch`] before writing
/// anything if `message` is not a valid body for `tag`.
pub fn encode_frame(w: &mut dyn Write, tag: Tag, message: &Message) -> Result<(), CodecError> {
    if !tag.accepts(message) {
        return Err(CodecError::TagMismatch {
            tag,
            kind: message.kind(),
        });
    }
    write_u8(w, tag.to_u8())?;
    match message {
        Message::Row(row) => write_u32_le(w, *row)?,
        Message::Cells(cells) => {
            let len = u32::try_from(cells.len())
                .map_err(|_| CodecError::PayloadTooLarge { len: cells.len() })?;
            write_u32_le(w, len)?;
            for &v in cells {
                write_f64_le(w, v)?;
            }
        }
        Message::Handshake(config) => {
            write_u64_le(w, config.rows as u64)?;
            write_u64_le(w, config.cols as u64)?;
            write_f64_le(w, config.coefficients.cx)?;
            write_f64_le(w, config.coefficients.cy)?;
            write_u64_le(w, config.timesteps)?;
        }
        Message::HandshakeAck { fingerprint } => write_u64_le(w, *fingerprint)?,
    }
    Ok(())
}

/// Decode one frame.
pub fn decode_frame(r: &mut dyn Read) -> Result<(Tag, Message), CodecError> {
    let byte = read_u8(r)?;
    let tag = Tag::from_u8(byte).ok_or(CodecError::UnknownTag { tag: byte })?;
    let message = match tag {
        Tag::StartRow | Tag::EndRow => Message::Row(read_u32_le(r)?),
        Tag::Payload => {
            let len = read_u32_le(r)? as usize;
            let mut cells = Vec::with_capacity(len.min(MAX_PREALLOC_CELLS));
            for _ in 0..len {
                cells.push(read_f64_le(r)?);
            }
            Message::Cells(cells)
        }
        Tag::Handshake => {
            let rows = read_u64_le(r)? as usize;
            let cols = read_u64_le(r)? as usize;
            let cx = read_f64_le(r)?;
            let cy = read_f64_le(r)?;
            let timesteps = read_u64_le(r)?;
            Message::Handshake(RunConfig::new(
                rows,
                cols,
                Coefficients::new(cx, cy),
                timesteps,
            ))
        }
        Tag::HandshakeAck => Message::HandshakeAck {
            fingerprint: read_u64_le(r)?,
        },
    };
    Ok((tag, message))
}
