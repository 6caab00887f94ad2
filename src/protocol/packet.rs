//! Packet definitions
//!
//! The unit of exchange on an RCON stream.

/// RCON packet types
///
/// Servers are free to answer with other type values; those are kept as
/// [`PacketType::Other`] since replies are matched by request id only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    Response,
    Command,
    Login,
    Other(i32),
}

impl PacketType {
    /// Map a wire value to a packet type
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => PacketType::Response,
            2 => PacketType::Command,
            3 => PacketType::Login,
            other => PacketType::Other(other),
        }
    }

    /// Wire value of this type
    pub fn as_i32(self) -> i32 {
        match self {
            PacketType::Response => 0,
            PacketType::Command => 2,
            PacketType::Login => 3,
            PacketType::Other(value) => value,
        }
    }
}

/// A decoded RCON packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Correlates a response with its request
    pub request_id: i32,

    /// Packet type
    pub packet_type: PacketType,

    /// Text payload, without the trailing terminators
    pub payload: String,
}

impl Packet {
    /// Create a new packet
    pub fn new(request_id: i32, packet_type: PacketType, payload: impl Into<String>) -> Self {
        Self {
            request_id,
            packet_type,
            payload: payload.into(),
        }
    }

    /// Create a login packet carrying the password
    pub fn login(request_id: i32, password: &str) -> Self {
        Self::new(request_id, PacketType::Login, password)
    }

    /// Create a command packet
    pub fn command(request_id: i32, command: &str) -> Self {
        Self::new(request_id, PacketType::Command, command)
    }
}
