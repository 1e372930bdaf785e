//! Network module.
//!
//! Contains the Gateway (TCP listener), the per-socket Connection tasks, and
//! the Hub that owns all relay state.

mod connection;
mod gateway;
mod hub;

pub use connection::Connection;
pub use gateway::Gateway;
pub use hub::{CloseReason, Event, Hub, Outbound};
