//! Configuration for rconkit
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{RconError, Result};
use crate::network::BackoffSchedule;

/// Default RCON port used by Minecraft servers
pub const DEFAULT_PORT: u16 = 25575;

/// Connection settings for one remote RCON endpoint
#[derive(Debug, Clone)]
pub struct RconConfig {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Hostname or IP address of the RCON server
    pub host: String,

    /// RCON port
    pub port: u16,

    /// Plaintext RCON password
    pub password: String,

    // -------------------------------------------------------------------------
    // Resilience Configuration
    // -------------------------------------------------------------------------
    /// Delays between reconnect attempts
    pub backoff: BackoffSchedule,

    /// Connect timeout (milliseconds, 0 = wait for the OS)
    pub connect_timeout_ms: u64,
}

impl Default for RconConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            password: String::new(),
            backoff: BackoffSchedule::default(),
            connect_timeout_ms: 5000,
        }
    }
}

impl RconConfig {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse a `host=...;port=...;password=...` connection string.
    ///
    /// Keys are case-insensitive. Parts without `=` and unknown keys are
    /// skipped; missing keys keep their defaults.
    pub fn from_connection_string(s: &str) -> Result<Self> {
        let mut config = Self::default();

        for part in s.split(';').filter(|p| !p.is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "host" => config.host = value.to_string(),
                "port" => {
                    config.port = value.parse().map_err(|_| {
                        RconError::Config(format!("invalid port in connection string: {:?}", value))
                    })?;
                }
                "password" => config.password = value.to_string(),
                _ => {}
            }
        }

        Ok(config)
    }

    /// Connect timeout, `None` when disabled
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_ms > 0).then(|| Duration::from_millis(self.connect_timeout_ms))
    }

    /// `host:port` as used for logging and dialing
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for RconConfig
#[derive(Default)]
pub struct ConfigBuilder {
    config: RconConfig,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the RCON port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the RCON password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// Set the reconnect backoff schedule
    pub fn backoff(mut self, backoff: BackoffSchedule) -> Self {
        self.config.backoff = backoff;
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Result<RconConfig> {
        if self.config.host.is_empty() {
            return Err(RconError::Config("host must not be empty".to_string()));
        }
        if self.config.backoff.is_empty() {
            return Err(RconError::Config("backoff schedule must not be empty".to_string()));
        }
        Ok(self.config)
    }
}
