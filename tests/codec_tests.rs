//! Codec Tests
//!
//! Tests for packet encoding/decoding and stream framing.

use std::io::Cursor;

use rconkit::protocol::{
    decode, encode, encode_packet, read_packet, write_packet, Packet, PacketType,
    MAX_FRAME_LENGTH, MAX_PAYLOAD_SIZE,
};
use rconkit::RconError;
use tokio::io::AsyncWriteExt;

// =============================================================================
// Frame Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_exact_bytes() {
    let encoded = encode(7, PacketType::Command, "list").unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&14i32.to_le_bytes());
    expected.extend_from_slice(&7i32.to_le_bytes());
    expected.extend_from_slice(&2i32.to_le_bytes());
    expected.extend_from_slice(b"list");
    expected.extend_from_slice(&[0, 0]);
    assert_eq!(&encoded[..], &expected[..]);
}

#[test]
fn test_length_prefix_matches_frame() {
    let long = "x".repeat(MAX_PAYLOAD_SIZE);
    for payload in ["", "tps", "say héllo wörld", long.as_str()] {
        let encoded = encode(1, PacketType::Command, payload).unwrap();
        let declared = i32::from_le_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]);
        assert_eq!(declared as usize, encoded.len() - 4);
        assert_eq!(declared as usize, 4 + 4 + payload.len() + 2);
    }
}

#[test]
fn test_encode_decode_login() {
    let encoded = encode(1, PacketType::Login, "hunter2").unwrap();
    let decoded = decode(&encoded[4..]).unwrap();
    assert_eq!(decoded, Packet::login(1, "hunter2"));
}

#[test]
fn test_encode_decode_response_negative_id() {
    let packet = Packet::new(-1, PacketType::Response, "denied");
    let encoded = encode_packet(&packet).unwrap();
    assert_eq!(decode(&encoded[4..]).unwrap(), packet);
}

#[test]
fn test_encode_decode_multibyte_payload() {
    let payload = "§aGrüße 世界 🎮";
    let encoded = encode(42, PacketType::Response, payload).unwrap();
    let decoded = decode(&encoded[4..]).unwrap();
    assert_eq!(decoded.payload, payload);
    assert_eq!(decoded.request_id, 42);
}

#[test]
fn test_encode_decode_empty_payload() {
    let encoded = encode(3, PacketType::Command, "").unwrap();
    assert_eq!(encoded.len(), 14);
    assert_eq!(decode(&encoded[4..]).unwrap().payload, "");
}

#[test]
fn test_decode_too_short() {
    let err = decode(&[0u8; 9]).unwrap_err();
    assert!(matches!(err, RconError::MalformedPacket(_)));
}

#[test]
fn test_decode_minimum_frame() {
    let mut frame = Vec::new();
    frame.extend_from_slice(&5i32.to_le_bytes());
    frame.extend_from_slice(&0i32.to_le_bytes());
    frame.extend_from_slice(&[0, 0]);

    let packet = decode(&frame).unwrap();
    assert_eq!(packet.request_id, 5);
    assert_eq!(packet.packet_type, PacketType::Response);
    assert!(packet.payload.is_empty());
}

#[test]
fn test_decode_nonstandard_type_is_kept() {
    let mut frame = Vec::new();
    frame.extend_from_slice(&4i32.to_le_bytes());
    frame.extend_from_slice(&1i32.to_le_bytes());
    frame.extend_from_slice(b"ok");
    frame.extend_from_slice(&[0, 0]);

    let packet = decode(&frame).unwrap();
    assert_eq!(packet.request_id, 4);
    assert_eq!(packet.packet_type, PacketType::Other(1));
    assert_eq!(packet.payload, "ok");
}

#[test]
fn test_decode_invalid_utf8_is_lossy() {
    let mut frame = Vec::new();
    frame.extend_from_slice(&1i32.to_le_bytes());
    frame.extend_from_slice(&0i32.to_le_bytes());
    frame.extend_from_slice(&[b'o', b'k', 0xFF]);
    frame.extend_from_slice(&[0, 0]);

    let packet = decode(&frame).unwrap();
    assert!(packet.payload.starts_with("ok"));
    assert!(packet.payload.contains('\u{FFFD}'));
}

#[test]
fn test_packet_type_values() {
    assert_eq!(PacketType::Login.as_i32(), 3);
    assert_eq!(PacketType::Command.as_i32(), 2);
    assert_eq!(PacketType::Response.as_i32(), 0);
    assert_eq!(PacketType::from_i32(3), PacketType::Login);
    assert_eq!(PacketType::from_i32(1), PacketType::Other(1));
    assert_eq!(PacketType::Other(-7).as_i32(), -7);
}

// =============================================================================
// Stream-based I/O Tests
// =============================================================================

#[tokio::test]
async fn test_write_then_read_packet() {
    let mut buf = Vec::new();
    let packet = Packet::command(9, "weather clear");
    write_packet(&mut buf, &packet).await.unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(read_packet(&mut cursor).await.unwrap(), packet);
}

#[tokio::test]
async fn test_read_rejects_oversized_before_reading_body() {
    // Only the header exists; a reader that tried to fill 5000 bytes would
    // report a closed connection instead.
    let header = 5000i32.to_le_bytes().to_vec();
    let mut cursor = Cursor::new(header);

    match read_packet(&mut cursor).await {
        Err(RconError::OversizedPacket { length, max }) => {
            assert_eq!(length, 5000);
            assert_eq!(max, MAX_FRAME_LENGTH);
        }
        other => panic!("expected OversizedPacket, got {:?}", other),
    }
}

#[tokio::test]
async fn test_read_accepts_max_frame() {
    let payload = "y".repeat(MAX_PAYLOAD_SIZE);
    let encoded = encode(1, PacketType::Response, &payload).unwrap();

    let mut cursor = Cursor::new(encoded.to_vec());
    assert_eq!(read_packet(&mut cursor).await.unwrap().payload, payload);
}

#[tokio::test]
async fn test_read_rejects_negative_length() {
    let mut cursor = Cursor::new((-4i32).to_le_bytes().to_vec());
    assert!(matches!(
        read_packet(&mut cursor).await,
        Err(RconError::MalformedPacket(_))
    ));
}

#[tokio::test]
async fn test_read_truncated_frame_is_connection_closed() {
    let encoded = encode(1, PacketType::Response, "partial").unwrap();
    let mut cursor = Cursor::new(encoded[..encoded.len() - 3].to_vec());

    assert!(matches!(
        read_packet(&mut cursor).await,
        Err(RconError::ConnectionClosed)
    ));
}

#[tokio::test]
async fn test_read_empty_stream_is_connection_closed() {
    let mut cursor = Cursor::new(Vec::new());
    assert!(matches!(
        read_packet(&mut cursor).await,
        Err(RconError::ConnectionClosed)
    ));
}

#[tokio::test]
async fn test_read_accumulates_partial_writes() {
    let (mut reader, mut writer) = tokio::io::duplex(64);
    let encoded = encode(11, PacketType::Response, "There are 0 of a max of 20 players online: ")
        .unwrap();

    let feeder = tokio::spawn(async move {
        for byte in encoded.iter() {
            writer.write_all(&[*byte]).await.unwrap();
            tokio::task::yield_now().await;
        }
        writer
    });

    let packet = read_packet(&mut reader).await.unwrap();
    assert_eq!(packet.request_id, 11);
    assert_eq!(packet.payload, "There are 0 of a max of 20 players online: ");
    drop(feeder.await.unwrap());
}

#[tokio::test]
async fn test_read_back_to_back_packets() {
    let mut buf = Vec::new();
    write_packet(&mut buf, &Packet::new(1, PacketType::Response, "first")).await.unwrap();
    write_packet(&mut buf, &Packet::new(2, PacketType::Response, "second")).await.unwrap();

    let mut cursor = Cursor::new(buf);
    assert_eq!(read_packet(&mut cursor).await.unwrap().payload, "first");
    assert_eq!(read_packet(&mut cursor).await.unwrap().payload, "second");
}
