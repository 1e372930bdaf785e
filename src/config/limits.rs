//! Queue depth and timeout limits.

use serde::Deserialize;
use std::time::Duration;

use super::defaults::{default_event_queue, default_idle_timeout_secs, default_outbound_queue};

/// Resource limits applied per connection and to the hub.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Frames that may wait for one destination before it is treated as a
    /// slow consumer and disconnected (default: 1024).
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,

    /// Depth of the hub's inbound event channel (default: 4096).
    #[serde(default = "default_event_queue")]
    pub event_queue: usize,

    /// Seconds a client may stay silent before it is disconnected.
    /// 0 disables the timeout (default).
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

impl LimitsConfig {
    /// The idle timeout, if enabled.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            outbound_queue: default_outbound_queue(),
            event_queue: default_event_queue(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}
