//! Reconnect backoff schedule
//!
//! A fixed table of delays indexed by attempt number. Attempts past the end
//! of the table reuse its last entry.

use std::time::Duration;

/// Delays between reconnect attempts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffSchedule {
    delays: Vec<Duration>,
}

impl Default for BackoffSchedule {
    fn default() -> Self {
        Self::new(vec![
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(5),
            Duration::from_secs(10),
            Duration::from_secs(30),
        ])
    }
}

impl BackoffSchedule {
    /// Create a schedule from explicit delays
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    /// Delay to wait after failed attempt `attempt` (0-based)
    ///
    /// Clamped to the final entry; an empty schedule yields zero.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        match self.delays.last() {
            Some(last) => self.delays.get(attempt).copied().unwrap_or(*last),
            None => Duration::ZERO,
        }
    }

    /// Number of distinct entries
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }
}
