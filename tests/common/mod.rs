//! Shared test fixtures
//!
//! An in-process RCON server over `tokio::io::duplex` and a connector that
//! hands out streams to it.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rconkit::error::{RconError, Result};
use rconkit::network::{Connector, RconClient};
use rconkit::protocol::{read_packet, write_packet, Packet, PacketType};
use tokio::io::{AsyncRead, AsyncWrite, DuplexStream};
use tokio::time::Instant;

pub const PASSWORD: &str = "secret";

/// Maps a command to the server's reply
pub type Handler = Arc<dyn Fn(&str) -> String + Send + Sync>;

pub fn echo_handler() -> Handler {
    Arc::new(|command| format!("echo:{}", command))
}

pub fn fixed_handler(reply: &'static str) -> Handler {
    Arc::new(move |_| reply.to_string())
}

/// Serve RCON on `stream`
///
/// Returns (closing the stream) when the peer hangs up, or instead of
/// answering once `max_commands` commands have been served.
pub async fn serve<S>(mut stream: S, password: String, handler: Handler, max_commands: Option<usize>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut served = 0;
    loop {
        let Ok(packet) = read_packet(&mut stream).await else {
            return;
        };

        let reply = match packet.packet_type {
            PacketType::Login => {
                let id = if packet.payload == password { packet.request_id } else { -1 };
                Packet::new(id, PacketType::Command, "")
            }
            _ => {
                if max_commands.is_some_and(|max| served >= max) {
                    return;
                }
                served += 1;
                Packet::new(packet.request_id, PacketType::Response, handler(&packet.payload))
            }
        };

        if write_packet(&mut stream, &reply).await.is_err() {
            return;
        }
    }
}

/// Answer logins, then read commands without ever replying
///
/// Returns when the peer hangs up.
pub async fn serve_silently<S>(mut stream: S, password: String)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    while let Ok(packet) = read_packet(&mut stream).await {
        if packet.packet_type == PacketType::Login {
            let id = if packet.payload == password { packet.request_id } else { -1 };
            if write_packet(&mut stream, &Packet::new(id, PacketType::Command, "")).await.is_err() {
                return;
            }
        }
    }
}

/// Raw client wired to an in-process server
pub fn client_with_server(handler: Handler) -> RconClient<DuplexStream> {
    let (client, server) = tokio::io::duplex(64 * 1024);
    tokio::spawn(serve(server, PASSWORD.to_string(), handler, None));
    RconClient::from_stream(client)
}

/// Connector handing out in-process servers
#[derive(Clone)]
pub struct MockConnector {
    /// Refuse this many connection attempts before accepting
    pub fail_first: usize,

    /// Password the servers accept
    pub password: String,

    pub handler: Handler,

    /// Each server drops its stream after this many commands
    pub commands_per_connection: Option<usize>,

    /// Servers log in but never answer commands
    pub silent: bool,

    attempts: Arc<Mutex<Vec<Instant>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self {
            fail_first: 0,
            password: PASSWORD.to_string(),
            handler: echo_handler(),
            commands_per_connection: None,
            silent: false,
            attempts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_first(mut self, n: usize) -> Self {
        self.fail_first = n;
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.password = password.to_string();
        self
    }

    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = handler;
        self
    }

    pub fn commands_per_connection(mut self, n: usize) -> Self {
        self.commands_per_connection = Some(n);
        self
    }

    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    /// When each connection attempt started
    pub fn attempts(&self) -> Vec<Instant> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Stream = DuplexStream;

    async fn connect(&self, host: &str, port: u16) -> Result<DuplexStream> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(Instant::now());
            attempts.len()
        };

        if attempt <= self.fail_first {
            return Err(RconError::Connect {
                addr: format!("{}:{}", host, port),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            });
        }

        let (client, server) = tokio::io::duplex(64 * 1024);
        if self.silent {
            tokio::spawn(serve_silently(server, self.password.clone()));
        } else {
            tokio::spawn(serve(
                server,
                self.password.clone(),
                Arc::clone(&self.handler),
                self.commands_per_connection,
            ));
        }
        Ok(client)
    }
}
