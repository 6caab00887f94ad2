//! Command metrics
//!
//! Lock-free counters updated by the managed connection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Live counters for one managed connection
#[derive(Debug, Default)]
pub struct ConnectionStats {
    commands_sent: AtomicU64,
    commands_failed: AtomicU64,
    retries: AtomicU64,
    connects: AtomicU64,
    total_latency_us: AtomicU64,
    last_latency_us: AtomicU64,
}

/// Point-in-time copy of [`ConnectionStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Commands that returned a response
    pub commands_sent: u64,

    /// Commands that surfaced an error to the caller
    pub commands_failed: u64,

    /// Commands retried after a lost connection
    pub retries: u64,

    /// Successful connect + login cycles, the first connect included
    pub connects: u64,

    /// Round-trip time of the most recent successful command
    pub last_latency_us: u64,

    /// Mean round-trip time of successful commands
    pub mean_latency_us: u64,
}

impl ConnectionStats {
    pub fn record_success(&self, latency: Duration) {
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.commands_sent.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us.fetch_add(micros, Ordering::Relaxed);
        self.last_latency_us.store(micros, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.commands_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_connect(&self) {
        self.connects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let commands_sent = self.commands_sent.load(Ordering::Relaxed);
        let total = self.total_latency_us.load(Ordering::Relaxed);

        StatsSnapshot {
            commands_sent,
            commands_failed: self.commands_failed.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            connects: self.connects.load(Ordering::Relaxed),
            last_latency_us: self.last_latency_us.load(Ordering::Relaxed),
            mean_latency_us: total.checked_div(commands_sent).unwrap_or(0),
        }
    }
}
