//! Connection <-> display name registry.
//!
//! Names are unique: at most one connection holds a given name, and each
//! connection holds at most one name. Lookups work in both directions, and
//! [`Registry::all_names`] reports names in the order they were registered.

use relay_proto::is_broadcast;
use std::collections::HashMap;
use thiserror::Error;

use super::ConnId;

/// Reasons a name cannot be assigned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("name cannot be empty")]
    EmptyName,

    #[error("name is reserved: {0}")]
    ReservedName(String),

    #[error("name already in use: {0}")]
    DuplicateName(String),
}

/// Outcome of a successful [`Registry::assign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assigned {
    /// The connection had no name before.
    New,
    /// The connection already held exactly this name.
    Unchanged,
    /// The connection swapped `old` for the new name; `old` is free again.
    Renamed { old: String },
}

/// Bidirectional connection/name mapping.
#[derive(Debug, Default)]
pub struct Registry {
    by_conn: HashMap<ConnId, String>,
    by_name: HashMap<String, ConnId>,
    /// Named connections in registration order.
    order: Vec<ConnId>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `conn`.
    ///
    /// A connection that already has a name is renamed in place and keeps its
    /// position in [`all_names`](Self::all_names).
    pub fn assign(&mut self, conn: ConnId, name: &str) -> Result<Assigned, RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if is_broadcast(name) {
            return Err(RegistryError::ReservedName(name.to_string()));
        }
        if let Some(&owner) = self.by_name.get(name) {
            return if owner == conn {
                Ok(Assigned::Unchanged)
            } else {
                Err(RegistryError::DuplicateName(name.to_string()))
            };
        }

        self.by_name.insert(name.to_string(), conn);
        match self.by_conn.insert(conn, name.to_string()) {
            Some(old) => {
                self.by_name.remove(&old);
                Ok(Assigned::Renamed { old })
            }
            None => {
                self.order.push(conn);
                Ok(Assigned::New)
            }
        }
    }

    /// Release whatever name `conn` holds. Idempotent.
    pub fn unassign(&mut self, conn: ConnId) -> Option<String> {
        let name = self.by_conn.remove(&conn)?;
        self.by_name.remove(&name);
        self.order.retain(|c| *c != conn);
        Some(name)
    }

    /// The name `conn` holds, if any.
    pub fn name_of(&self, conn: ConnId) -> Option<&str> {
        self.by_conn.get(&conn).map(String::as_str)
    }

    /// The connection holding `name`, if any.
    pub fn conn_of(&self, name: &str) -> Option<ConnId> {
        self.by_name.get(name).copied()
    }

    /// Named connections in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ConnId, &str)> + '_ {
        self.order
            .iter()
            .filter_map(|conn| self.by_conn.get(conn).map(|name| (*conn, name.as_str())))
    }

    /// Current names in registration order.
    pub fn all_names(&self) -> Vec<&str> {
        self.iter().map(|(_, name)| name).collect()
    }

    /// Number of named connections.
    pub fn len(&self) -> usize {
        self.by_conn.len()
    }

    /// Whether no connection has a name.
    pub fn is_empty(&self) -> bool {
        self.by_conn.is_empty()
    }
}
