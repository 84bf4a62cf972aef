//! Protocol codec
//!
//! Encoding and decoding functions for RCON packets.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────────────────┬───────────┐
//! │ Size (4) │  Id (4)  │ Type (4) │        Body         │ 0x00 0x00 │
//! └──────────┴──────────┴──────────┴─────────────────────┴───────────┘
//! ```
//! All integers are signed 32-bit little-endian.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{GateError, Result};
use super::{Packet, PacketType};

/// Size prefix length
pub const HEADER_SIZE: usize = 4;

/// Smallest legal `Size` value: id (4) + type (4) + two NUL terminators
pub const MIN_PACKET_SIZE: usize = 10;

/// Largest `Size` value accepted from the server (4096 byte body + framing)
pub const MAX_PACKET_SIZE: usize = 4096 + MIN_PACKET_SIZE;

// =============================================================================
// Packet Encoding/Decoding
// =============================================================================

/// Encode a packet to bytes
///
/// Format: size (4) + id (4) + type (4) + body + 0x00 0x00
pub fn encode_packet(packet: &Packet) -> Vec<u8> {
    let body = packet.body.as_bytes();
    let size = MIN_PACKET_SIZE + body.len();

    let mut message = BytesMut::with_capacity(HEADER_SIZE + size);
    message.put_i32_le(size as i32);
    message.put_i32_le(packet.id);
    message.put_i32_le(packet.packet_type as i32);
    message.put_slice(body);
    message.put_u8(0);
    message.put_u8(0);

    message.to_vec()
}

/// Decode a packet from bytes
///
/// `bytes` must hold at least one complete packet; trailing bytes are ignored.
pub fn decode_packet(bytes: &[u8]) -> Result<Packet> {
    if bytes.len() < HEADER_SIZE {
        return Err(GateError::Protocol(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut header = &bytes[..HEADER_SIZE];
    let size = validate_size(header.get_i32_le())?;

    let total_len = HEADER_SIZE + size;
    if bytes.len() < total_len {
        return Err(GateError::Protocol(format!(
            "Incomplete packet: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    decode_payload(&bytes[HEADER_SIZE..total_len])
}

/// Check a `Size` field read off the wire
fn validate_size(size: i32) -> Result<usize> {
    if size < MIN_PACKET_SIZE as i32 {
        return Err(GateError::Protocol(format!(
            "Packet too small: {} bytes (min {})",
            size, MIN_PACKET_SIZE
        )));
    }

    let size = size as usize;
    if size > MAX_PACKET_SIZE {
        return Err(GateError::Protocol(format!(
            "Packet too large: {} bytes (max {})",
            size, MAX_PACKET_SIZE
        )));
    }

    Ok(size)
}

/// Decode everything after the size prefix
fn decode_payload(mut payload: &[u8]) -> Result<Packet> {
    let body_len = payload.len() - MIN_PACKET_SIZE;

    let id = payload.get_i32_le();
    let raw_type = payload.get_i32_le();
    let packet_type = PacketType::from_i32(raw_type).ok_or_else(|| {
        GateError::Protocol(format!("Unknown packet type: {}", raw_type))
    })?;

    let (body, terminator) = payload.split_at(body_len);
    if terminator != [0u8, 0u8] {
        return Err(GateError::Protocol(format!(
            "Missing packet terminator for id {}",
            id
        )));
    }

    Ok(Packet {
        id,
        packet_type,
        body: String::from_utf8_lossy(body).into_owned(),
    })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete packet from a stream
///
/// Blocks until a complete packet is received or an error occurs
pub fn read_packet<R: Read>(reader: &mut R) -> Result<Packet> {
    // Read size prefix first
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let size = validate_size(i32::from_le_bytes(header))?;

    let mut payload = vec![0u8; size];
    reader.read_exact(&mut payload)?;

    decode_payload(&payload)
}

/// Write a packet to a stream
pub fn write_packet<W: Write>(writer: &mut W, packet: &Packet) -> Result<()> {
    let bytes = encode_packet(packet);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
