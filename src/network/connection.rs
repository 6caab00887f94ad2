//! Managed Connection
//!
//! Keeps one authenticated [`RconClient`] alive behind a stable handle.
//!
//! ## Responsibilities
//! - Reconnect transparently with backoff, without an attempt limit
//! - Retry a command exactly once after a lost connection
//! - Serialize reconnects so concurrent callers never open duplicate sockets
//! - Publish the connected state and command metrics

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tokio::sync::{watch, Mutex};

use super::client::RconClient;
use super::connector::{Connector, TcpConnector};
use super::stats::{ConnectionStats, StatsSnapshot};
use crate::config::RconConfig;
use crate::error::{RconError, Result};

/// Auto-reconnecting RCON connection
///
/// ## Locking
///
/// - `current` is a short-lived `RwLock` slot, never held across an await.
///   Swapping the client is atomic for readers.
/// - `reconnect` is an async mutex held for the whole reconnect loop. It
///   also owns the backoff attempt counter. Callers on the fast path
///   (client already connected) never touch it.
/// - The per-command send lock lives inside each [`RconClient`].
pub struct RconConnection<C: Connector = TcpConnector> {
    /// Endpoint and backoff settings
    config: RconConfig,

    /// Opens transport streams
    connector: C,

    /// Current authenticated client, if any
    current: RwLock<Option<Arc<RconClient<C::Stream>>>>,

    /// Serializes reconnect attempts
    reconnect: Mutex<ReconnectState>,

    /// `connected` observable
    connected_tx: watch::Sender<bool>,

    /// Set once by `dispose`
    disposed: AtomicBool,

    /// Command metrics
    stats: ConnectionStats,
}

/// Reconnect policy state, guarded by the reconnect lock
#[derive(Debug, Default)]
struct ReconnectState {
    /// Failed attempts since the last successful connect
    attempt: usize,
}

impl RconConnection<TcpConnector> {
    /// Create a TCP connection manager. Nothing is dialed until first use.
    pub fn new(config: RconConfig) -> Self {
        let connector = TcpConnector::with_timeout(config.connect_timeout());
        Self::with_connector(config, connector)
    }
}

impl<C: Connector> RconConnection<C> {
    /// Create a connection manager over a custom connector
    pub fn with_connector(config: RconConfig, connector: C) -> Self {
        let (connected_tx, _) = watch::channel(false);

        Self {
            config,
            connector,
            current: RwLock::new(None),
            reconnect: Mutex::new(ReconnectState::default()),
            connected_tx,
            disposed: AtomicBool::new(false),
            stats: ConnectionStats::default(),
        }
    }

    /// Send a command, reconnecting if necessary
    ///
    /// A command that fails because the connection dropped is retried once
    /// on a fresh connection. A second failure is returned.
    pub async fn send_command(&self, command: &str) -> Result<String> {
        let started = Instant::now();

        match self.send_with_retry(command).await {
            Ok(response) => {
                self.stats.record_success(started.elapsed());
                Ok(response)
            }
            Err(e) => {
                self.stats.record_failure();
                tracing::error!("RCON command failed: {:?}: {}", command, e);
                Err(e)
            }
        }
    }

    async fn send_with_retry(&self, command: &str) -> Result<String> {
        let client = self.ensure_connected().await?;

        match client.send_command(command).await {
            Err(e) if e.is_connection_lost() => {
                tracing::warn!("RCON connection lost ({}), reconnecting", e);
                self.stats.record_retry();
                self.discard(&client).await;

                let client = self.ensure_connected().await?;
                client.send_command(command).await
            }
            result => result,
        }
    }

    /// Return the current client, connecting and logging in if needed
    ///
    /// Retries forever with backoff; drop the future to give up. A
    /// cancelled backoff sleep does not count as a failed attempt.
    pub async fn ensure_connected(&self) -> Result<Arc<RconClient<C::Stream>>> {
        if let Some(client) = self.connected_client() {
            return Ok(client);
        }
        self.check_disposed()?;

        let mut state = self.reconnect.lock().await;

        // Another caller may have reconnected while we waited
        if let Some(client) = self.connected_client() {
            return Ok(client);
        }

        let stale = self.current.write().take();
        if let Some(stale) = stale {
            stale.dispose().await;
            self.publish(false);
        }

        loop {
            self.check_disposed()?;

            match self.open_client().await {
                Ok(client) => {
                    let client = Arc::new(client);

                    if self.disposed.load(Ordering::Acquire) {
                        client.dispose().await;
                        return Err(RconError::Disposed);
                    }

                    *self.current.write() = Some(Arc::clone(&client));
                    state.attempt = 0;
                    self.stats.record_connect();
                    self.publish(true);

                    tracing::info!("RCON connected to {}", self.config.addr());
                    return Ok(client);
                }
                Err(e) => {
                    let delay = self.config.backoff.delay_for(state.attempt);
                    tracing::warn!(
                        "RCON connection attempt {} to {} failed: {}, retrying in {:?}",
                        state.attempt + 1,
                        self.config.addr(),
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    state.attempt = state.attempt.saturating_add(1);
                }
            }
        }
    }

    /// Connected and authenticated, as last observed. Non-blocking.
    pub fn is_connected(&self) -> bool {
        self.current.read().as_ref().is_some_and(|c| c.is_connected())
    }

    /// Watch the connected state
    ///
    /// Flips to `true` after every successful connect and to `false` when a
    /// client is dropped or the connection is disposed.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.connected_tx.subscribe()
    }

    /// Command metrics so far
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn config(&self) -> &RconConfig {
        &self.config
    }

    /// Close the current client. Later commands fail with `Disposed`.
    pub async fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);

        let client = self.current.write().take();
        if let Some(client) = client {
            client.dispose().await;
        }
        self.publish(false);
    }

    /// Dial, then log in
    async fn open_client(&self) -> Result<RconClient<C::Stream>> {
        let client = RconClient::unconnected();
        client
            .connect_with(&self.connector, &self.config.host, self.config.port)
            .await?;

        if !client.authenticate(&self.config.password).await? {
            client.dispose().await;
            return Err(RconError::AuthenticationFailed);
        }

        Ok(client)
    }

    /// Drop `failed` if it is still the current client
    async fn discard(&self, failed: &Arc<RconClient<C::Stream>>) {
        let removed = {
            let mut current = self.current.write();
            match current.as_ref() {
                Some(c) if Arc::ptr_eq(c, failed) => current.take(),
                _ => None,
            }
        };

        failed.dispose().await;
        if removed.is_some() {
            self.publish(false);
        }
    }

    fn connected_client(&self) -> Option<Arc<RconClient<C::Stream>>> {
        self.current
            .read()
            .as_ref()
            .filter(|c| c.is_connected())
            .map(Arc::clone)
    }

    fn check_disposed(&self) -> Result<()> {
        if self.disposed.load(Ordering::Acquire) {
            Err(RconError::Disposed)
        } else {
            Ok(())
        }
    }

    fn publish(&self, connected: bool) {
        self.connected_tx.send_if_modified(|current| {
            if *current == connected {
                false
            } else {
                *current = connected;
                true
            }
        });
    }
}

impl<C: Connector> std::fmt::Debug for RconConnection<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RconConnection")
            .field("addr", &self.config.addr())
            .field("connected", &self.is_connected())
            .field("disposed", &self.disposed.load(Ordering::Relaxed))
            .finish()
    }
}
