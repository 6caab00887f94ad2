//! Protocol codec
//!
//! Encoding and decoding functions for the RCON wire protocol.
//!
//! ## Wire Format
//! ```text
//! ┌──────────┬──────────────┬──────────┬─────────────────┬──────┐
//! │ Len (4)  │ RequestId(4) │ Type (4) │ Payload         │ 0 0  │
//! └──────────┴──────────────┴──────────┴─────────────────┴──────┘
//! ```
//!
//! `encode` produces the whole frame including the length prefix.
//! `decode` takes the frame *without* the length prefix, which is what a
//! stream reader has in hand after it used the prefix to size its read.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{Packet, PacketType};
use crate::error::{RconError, Result};

/// Length prefix size
pub const HEADER_SIZE: usize = 4;

/// Request id (4) + type (4) + two terminators (2)
pub const FRAME_OVERHEAD: usize = 10;

/// Largest payload a peer may send
pub const MAX_PAYLOAD_SIZE: usize = 4096;

/// Largest declared frame length accepted from a stream
pub const MAX_FRAME_LENGTH: usize = MAX_PAYLOAD_SIZE + FRAME_OVERHEAD;

// =============================================================================
// Frame Encoding/Decoding
// =============================================================================

/// Encode a packet to bytes
///
/// Format: len (4) + request_id (4) + type (4) + payload + 0x00 0x00
pub fn encode(request_id: i32, packet_type: PacketType, payload: &str) -> Result<Bytes> {
    let payload = payload.as_bytes();
    let frame_len = i32::try_from(FRAME_OVERHEAD + payload.len()).map_err(|_| {
        RconError::Encoding(format!(
            "payload of {} bytes does not fit an RCON frame",
            payload.len()
        ))
    })?;

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + FRAME_OVERHEAD + payload.len());
    buf.put_i32_le(frame_len);
    buf.put_i32_le(request_id);
    buf.put_i32_le(packet_type.as_i32());
    buf.put_slice(payload);
    buf.put_bytes(0, 2);

    Ok(buf.freeze())
}

/// Encode a [`Packet`] value
pub fn encode_packet(packet: &Packet) -> Result<Bytes> {
    encode(packet.request_id, packet.packet_type, &packet.payload)
}

/// Decode a frame (without its length prefix) into a packet
pub fn decode(frame: &[u8]) -> Result<Packet> {
    if frame.len() < FRAME_OVERHEAD {
        return Err(RconError::MalformedPacket(format!(
            "frame too short: expected at least {} bytes, got {}",
            FRAME_OVERHEAD,
            frame.len()
        )));
    }

    let mut buf = frame;
    let request_id = buf.get_i32_le();
    let packet_type = PacketType::from_i32(buf.get_i32_le());

    // Trailing two terminators carry no data
    let payload = &buf[..buf.len() - 2];

    Ok(Packet {
        request_id,
        packet_type,
        payload: String::from_utf8_lossy(payload).into_owned(),
    })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete packet from a stream
///
/// Suspends until the whole declared frame has arrived. The declared
/// length is validated before any body bytes are read.
pub async fn read_packet<R>(reader: &mut R) -> Result<Packet>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_SIZE];
    read_full(reader, &mut header).await?;

    let length = i32::from_le_bytes(header);

    if length > MAX_FRAME_LENGTH as i32 {
        return Err(RconError::OversizedPacket {
            length,
            max: MAX_FRAME_LENGTH,
        });
    }
    if length < FRAME_OVERHEAD as i32 {
        return Err(RconError::MalformedPacket(format!(
            "declared frame length {} below minimum {}",
            length, FRAME_OVERHEAD
        )));
    }

    let mut body = vec![0u8; length as usize];
    read_full(reader, &mut body).await?;

    decode(&body)
}

/// Write a packet to a stream
pub async fn write_packet<W>(writer: &mut W, packet: &Packet) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let bytes = encode_packet(packet)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(())
}

/// `read_exact` with EOF reported as a closed connection
async fn read_full<R>(reader: &mut R, buf: &mut [u8]) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    match reader.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(RconError::ConnectionClosed),
        Err(e) => Err(RconError::Io(e)),
    }
}
