//! # rconkit
//!
//! A resilient client for the RCON remote-console protocol:
//! - Bit-exact packet codec for the length-prefixed RCON frame
//! - Raw client with login handshake and one command in flight
//! - Managed connection with auto-reconnect, backoff and retry-once
//! - Parsers for `tps`, `mspt`, `list` and `worlds` replies
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Caller                              │
//! │               send_command(text) -> String                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   RconConnection                             │
//! │        (reconnect lock, backoff, retry once, stats)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     RconClient                               │
//! │          (send lock: id → write → read, login)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Codec    │          │  Connector  │
//!   │ (encode/    │          │   (TCP)     │
//!   │  decode)    │          └─────────────┘
//!   └─────────────┘
//! ```
//!
//! Replies can be piped through [`parser`] to get structured values.
//!
//! ## Example
//!
//! ```no_run
//! use rconkit::{parser, RconConfig, RconConnection};
//!
//! # async fn run() -> rconkit::Result<()> {
//! let config = RconConfig::from_connection_string("host=localhost;port=25575;password=secret")?;
//! let connection = RconConnection::new(config);
//!
//! let reply = connection.send_command("list").await?;
//! let players = parser::parse_player_list(&reply);
//! println!("{}/{} online", players.online, players.max);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod parser;
pub mod health;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RconError, Result};
pub use config::RconConfig;
pub use health::HealthStatus;
pub use network::{BackoffSchedule, RconClient, RconConnection};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of rconkit
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
