//! Transport connectors
//!
//! A connector turns `host:port` into a byte stream. Production code dials
//! TCP; tests plug in in-memory streams.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use crate::error::{RconError, Result};

/// Byte stream an RCON client can run over
pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send + 'static {}

impl<T> Transport for T where T: AsyncRead + AsyncWrite + Unpin + Send + 'static {}

/// Opens transport streams to an RCON endpoint
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Stream: Transport;

    /// Open a stream. Failures are reported as [`RconError::Connect`].
    async fn connect(&self, host: &str, port: u16) -> Result<Self::Stream>;
}

/// Plain TCP connector
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    /// Upper bound on the TCP handshake, `None` waits for the OS
    timeout: Option<Duration>,
}

impl TcpConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector that gives up after `timeout`
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, host: &str, port: u16) -> Result<TcpStream> {
        let addr = format!("{}:{}", host, port);

        match self.dial(host, port).await {
            Ok(stream) => {
                tracing::debug!("TCP connection established to {}", addr);
                Ok(stream)
            }
            Err(source) => Err(RconError::Connect { addr, source }),
        }
    }
}

impl TcpConnector {
    /// Open and configure the socket; every failure here is a connect failure
    async fn dial(&self, host: &str, port: u16) -> std::io::Result<TcpStream> {
        let stream = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, TcpStream::connect((host, port)))
                .await
                .map_err(|_| {
                    std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("connect timed out after {:?}", limit),
                    )
                })??,
            None => TcpStream::connect((host, port)).await?,
        };

        // Every frame is a complete request
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}
