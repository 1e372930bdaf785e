//! relayd - a relay for named text-chat clients.
//!
//! Clients speak length-prefixed frames (see [`relay_proto`]) carrying one
//! command each. A single hub task owns the name registry and the block
//! relation; every socket gets its own reader and writer tasks.

pub mod config;
pub mod error;
pub mod handlers;
pub mod network;
pub mod server;
pub mod state;

pub use server::Server;
