//! Reconnect backoff

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Exponential backoff between re-subscription attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconnectPolicy {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Consecutive failed attempts allowed; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            max_attempts: Some(10),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before the 1-based `attempt`, or `None` once attempts are used up
    pub fn delay(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || self.max_attempts.is_some_and(|max| attempt > max) {
            return None;
        }
        let factor = 1u64.checked_shl(attempt - 1).unwrap_or(u64::MAX);
        let millis = self.initial_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Some(Duration::from_millis(millis))
    }
}
