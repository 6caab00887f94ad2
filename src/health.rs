//! Health probe
//!
//! One-shot liveness check: connect, log in, run `list`, disconnect.
//! Uses its own short-lived client so it never disturbs a managed
//! connection to the same server.

use std::fmt;

use crate::config::RconConfig;
use crate::error::Result;
use crate::network::{Connector, RconClient, TcpConnector};
use crate::parser::parse_player_list;

/// Probe outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Server answered `list`
    Healthy { online: u32, max: u32 },

    /// Server reachable but refused the password
    AuthenticationFailed,

    /// Connect or exchange failed
    Unreachable(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy { .. })
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy { online, max } => {
                write!(f, "Server online. {}/{} players.", online, max)
            }
            HealthStatus::AuthenticationFailed => write!(f, "RCON authentication failed."),
            HealthStatus::Unreachable(reason) => {
                write!(f, "Cannot connect to server: {}", reason)
            }
        }
    }
}

/// Probe a server over TCP
pub async fn probe(config: &RconConfig) -> HealthStatus {
    probe_with(&TcpConnector::with_timeout(config.connect_timeout()), config).await
}

/// Probe a server through `connector`
pub async fn probe_with<C: Connector>(connector: &C, config: &RconConfig) -> HealthStatus {
    let client = RconClient::unconnected();
    let status = match run_probe(&client, connector, config).await {
        Ok(status) => status,
        Err(e) => HealthStatus::Unreachable(e.to_string()),
    };
    client.dispose().await;

    tracing::debug!("Health probe of {}: {}", config.addr(), status);
    status
}

async fn run_probe<C: Connector>(
    client: &RconClient<C::Stream>,
    connector: &C,
    config: &RconConfig,
) -> Result<HealthStatus> {
    client.connect_with(connector, &config.host, config.port).await?;

    if !client.authenticate(&config.password).await? {
        return Ok(HealthStatus::AuthenticationFailed);
    }

    let players = parse_player_list(&client.send_command("list").await?);
    Ok(HealthStatus::Healthy {
        online: players.online,
        max: players.max,
    })
}
