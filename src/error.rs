//! Error types for rconkit
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RconError
pub type Result<T> = std::result::Result<T, RconError>;

/// Unified error type for rconkit operations
#[derive(Debug, Error)]
pub enum RconError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("RCON connection closed")]
    ConnectionClosed,

    #[error("Not connected or not authenticated")]
    NotConnected,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    #[error("RCON packet too large: {length} bytes (max {max})")]
    OversizedPacket { length: i32, max: usize },

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    #[error("RCON authentication failed")]
    AuthenticationFailed,

    #[error("Connection has been disposed")]
    Disposed,

    #[error("RCON client already has a connection")]
    AlreadyConnected,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RconError {
    /// True for failures that a fresh connection can recover from.
    /// Protocol violations are not included.
    pub fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            RconError::Io(_)
                | RconError::Connect { .. }
                | RconError::ConnectionClosed
                | RconError::NotConnected
        )
    }
}
