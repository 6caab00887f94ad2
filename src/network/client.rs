//! Raw RCON client
//!
//! One transport stream, one login, one command in flight at a time.
//!
//! ## State Machine
//! ```text
//! Unconnected --connect--> Connected --authenticate--> Authenticated
//!                              │                            │
//!                              └──── I/O error / dispose ───┴──> Closed
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::OnceLock;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::{watch, Mutex, MutexGuard};

use super::connector::{Connector, TcpConnector, Transport};
use crate::error::{RconError, Result};
use crate::protocol::{read_packet, write_packet, Packet, PacketType};

/// Low-level RCON protocol client
///
/// ## Concurrency
///
/// The transport lives inside an async mutex. Every exchange holds the
/// guard for the whole "allocate id → write → read" sequence, so request
/// and response pairs never interleave on the wire no matter how many
/// tasks share the client.
///
/// An exchange that fails, or whose future is dropped mid-flight, drops
/// the stream: the client is `Closed` afterwards and never reused.
///
/// `dispose` does not wait for the send lock. It raises the `closed` signal
/// first, which aborts an exchange stuck on a silent server.
pub struct RconClient<S = TcpStream> {
    /// Transport stream (the mutex is the send lock)
    stream: Mutex<Option<S>>,

    /// Last allocated request id
    next_request_id: AtomicI32,

    /// Set by a successful login, cleared on any failure
    authenticated: AtomicBool,

    /// Peer address, set by the one successful connect
    peer_addr: OnceLock<String>,

    /// Raised once by `dispose`
    closed: watch::Sender<bool>,
}

impl RconClient<TcpStream> {
    /// Create an unconnected TCP client
    pub fn new() -> Self {
        Self::unconnected()
    }

    /// Open a TCP connection to the RCON server
    pub async fn connect(&self, host: &str, port: u16) -> Result<()> {
        self.connect_with(&TcpConnector::new(), host, port).await
    }
}

impl Default for RconClient<TcpStream> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Transport> RconClient<S> {
    /// Create a client with no transport yet
    pub fn unconnected() -> Self {
        Self {
            stream: Mutex::new(None),
            next_request_id: AtomicI32::new(0),
            authenticated: AtomicBool::new(false),
            peer_addr: OnceLock::new(),
            closed: watch::channel(false).0,
        }
    }

    /// Wrap an already-open stream (Connected, not yet authenticated)
    pub fn from_stream(stream: S) -> Self {
        let mut client = Self::unconnected();
        *client.stream.get_mut() = Some(stream);
        client
    }

    /// Open a transport through `connector`
    ///
    /// No retry happens here. A client connects at most once: later calls
    /// fail with `AlreadyConnected`, or `Disposed` after `dispose`.
    pub async fn connect_with<C>(&self, connector: &C, host: &str, port: u16) -> Result<()>
    where
        C: Connector<Stream = S> + ?Sized,
    {
        self.check_unused().await?;
        let stream = connector.connect(host, port).await?;

        let mut slot = self.stream.lock().await;
        self.check_unused_locked(&slot)?;
        if self.peer_addr.set(format!("{}:{}", host, port)).is_err() {
            return Err(RconError::AlreadyConnected);
        }
        *slot = Some(stream);
        Ok(())
    }

    /// Log in with the RCON password
    ///
    /// Returns `Ok(false)` when the server rejects the password (it answers
    /// with request id `-1`, which never matches an allocated id).
    pub async fn authenticate(&self, password: &str) -> Result<bool> {
        let (request_id, response) = self.exchange(PacketType::Login, password).await?;

        let accepted = response.request_id == request_id;
        self.authenticated.store(accepted, Ordering::Release);

        if accepted {
            tracing::debug!("RCON authenticated with {}", self.peer());
        } else {
            tracing::warn!(
                "RCON authentication rejected by {} (request id {}, response id {})",
                self.peer(),
                request_id,
                response.request_id
            );
        }

        Ok(accepted)
    }

    /// Send a command and return the server's reply verbatim
    ///
    /// Formatting codes are left in place.
    pub async fn send_command(&self, command: &str) -> Result<String> {
        if !self.is_connected() {
            return Err(RconError::NotConnected);
        }

        let (request_id, response) = self.exchange(PacketType::Command, command).await?;
        tracing::trace!(
            "RCON {} #{} {:?} -> {} bytes",
            self.peer(),
            request_id,
            command,
            response.payload.len()
        );

        Ok(response.payload)
    }

    /// Authenticated and not closed. Does not touch the network.
    pub fn is_connected(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }

    /// Close the transport
    ///
    /// Idempotent. An in-flight exchange is aborted with `ConnectionClosed`.
    pub async fn dispose(&self) {
        self.authenticated.store(false, Ordering::Release);
        self.closed.send_replace(true);

        let stream = self.stream.lock().await.take();
        if let Some(mut stream) = stream {
            if let Err(e) = stream.shutdown().await {
                tracing::debug!("Error shutting down RCON stream to {}: {}", self.peer(), e);
            }
            tracing::debug!("RCON connection to {} closed", self.peer());
        }
    }

    /// Run one request/response pair under the send lock
    async fn exchange(&self, packet_type: PacketType, payload: &str) -> Result<(i32, Packet)> {
        let closed = self.closed.subscribe();

        let mut exchange = Exchange {
            slot: self.stream.lock().await,
            authenticated: &self.authenticated,
            completed: false,
        };
        let stream = exchange.slot.as_mut().ok_or(RconError::NotConnected)?;

        let request_id = self.allocate_request_id();
        let request = Packet::new(request_id, packet_type, payload);

        let response = tokio::select! {
            response = round_trip(stream, &request) => response?,
            _ = closed_signal(closed) => return Err(RconError::ConnectionClosed),
        };

        exchange.completed = true;
        Ok((request_id, response))
    }

    async fn check_unused(&self) -> Result<()> {
        let slot = self.stream.lock().await;
        self.check_unused_locked(&slot)
    }

    fn check_unused_locked(&self, slot: &Option<S>) -> Result<()> {
        if *self.closed.borrow() {
            Err(RconError::Disposed)
        } else if slot.is_some() || self.peer_addr.get().is_some() {
            Err(RconError::AlreadyConnected)
        } else {
            Ok(())
        }
    }

    /// Ids start at 1 and are never reused within a client
    fn allocate_request_id(&self) -> i32 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    fn peer(&self) -> &str {
        self.peer_addr.get().map(String::as_str).unwrap_or("unknown")
    }
}

impl<S> fmt::Debug for RconClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RconClient")
            .field("peer_addr", &self.peer_addr.get())
            .field("authenticated", &self.authenticated.load(Ordering::Relaxed))
            .finish()
    }
}

async fn round_trip<S: Transport>(stream: &mut S, request: &Packet) -> Result<Packet> {
    write_packet(stream, request).await?;
    read_packet(stream).await
}

/// Resolves once `dispose` has raised the signal
async fn closed_signal(mut closed: watch::Receiver<bool>) {
    while !*closed.borrow_and_update() {
        if closed.changed().await.is_err() {
            return;
        }
    }
}

/// Send-lock guard that closes the client unless the exchange completes
struct Exchange<'a, S> {
    slot: MutexGuard<'a, Option<S>>,
    authenticated: &'a AtomicBool,
    completed: bool,
}

impl<S> Drop for Exchange<'_, S> {
    fn drop(&mut self) {
        if !self.completed {
            // Stream position is unknown after a failed or cancelled exchange
            self.authenticated.store(false, Ordering::Release);
            self.slot.take();
        }
    }
}
