//! Connection handle allocation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque handle for one accepted client connection.
///
/// Handles are never reused within a process, so a stale handle can never
/// address a newer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnId(u64);

impl ConnId {
    /// Build a handle from a raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Generates connection handles in accept order.
pub struct ConnIdGenerator {
    counter: AtomicU64,
}

/// Start counter at 1 so that 0 never names a live connection.
const CONN_COUNTER_START: u64 = 1;

impl ConnIdGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(CONN_COUNTER_START),
        }
    }

    /// Allocate the next unique handle.
    pub fn next(&self) -> ConnId {
        ConnId(self.counter.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conn_id_generation() {
        let generator = ConnIdGenerator::new();
        assert_eq!(generator.next(), ConnId::new(1));
        assert_eq!(generator.next(), ConnId::new(2));
        assert_eq!(generator.next(), ConnId::new(3));
    }

    #[test]
    fn test_conn_id_display() {
        assert_eq!(ConnId::new(42).to_string(), "c42");
    }
}
