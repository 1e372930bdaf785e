//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use std::net::{Ipv4Addr, SocketAddr};

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_server_name() -> String {
    "relayd".to_string()
}

// =============================================================================
// Listen Defaults
// =============================================================================

/// Port the relay has always listened on.
pub const DEFAULT_PORT: u16 = 8888;

pub fn default_listen_address() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
}

// =============================================================================
// Limits Defaults
// =============================================================================

pub fn default_outbound_queue() -> usize {
    1024
}

pub fn default_event_queue() -> usize {
    4096
}

/// Idle timeout is disabled unless configured.
pub fn default_idle_timeout_secs() -> u64 {
    0
}
