//! Network Module
//!
//! RCON clients over a byte stream.
//!
//! ## Architecture
//! - `RconClient`: one stream, one command in flight
//! - `RconConnection`: owns the current client, reconnects with backoff
//! - `Connector`: opens streams (TCP in production)

mod backoff;
mod client;
mod connection;
mod connector;
mod stats;

pub use backoff::BackoffSchedule;
pub use client::RconClient;
pub use connection::RconConnection;
pub use connector::{Connector, TcpConnector, Transport};
pub use stats::{ConnectionStats, StatsSnapshot};
