//! Protocol Module
//!
//! Defines the RCON wire protocol.
//!
//! ## Frame Format
//! ```text
//! ┌──────────┬──────────────┬──────────┬─────────────────┬──────┐
//! │ Len (4)  │ RequestId(4) │ Type (4) │ Payload (UTF-8) │ 0 0  │
//! └──────────┴──────────────┴──────────┴─────────────────┴──────┘
//! ```
//!
//! All integers are little-endian `i32`. `Len` counts every byte after
//! itself: `4 + 4 + payload.len() + 2`.
//!
//! ### Packet Types
//! - 3: LOGIN    - Payload: password
//! - 2: COMMAND  - Payload: command text (also the type of the auth reply)
//! - 0: RESPONSE - Payload: command output
//!
//! Any other type value decodes as `PacketType::Other`.

mod packet;
mod codec;

pub use packet::{Packet, PacketType};
pub use codec::{
    decode, encode, encode_packet, read_packet, write_packet, FRAME_OVERHEAD, HEADER_SIZE,
    MAX_FRAME_LENGTH, MAX_PAYLOAD_SIZE,
};
