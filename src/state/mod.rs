//! State management module.
//!
//! Contains the structures the hub owns for the lifetime of the process: the
//! name registry and the block relation, plus connection handles.

mod blocks;
mod conn_id;
mod registry;

pub use blocks::BlockStore;
pub use conn_id::{ConnId, ConnIdGenerator};
pub use registry::{Assigned, Registry, RegistryError};
