//! Directed block relation between display names.
//!
//! `block(a, b)` records that `a` refuses messages from `b`. The relation is
//! asymmetric and keyed by name, so the dispatcher keeps it in step with the
//! registry when names are released or changed.

use std::collections::{HashMap, HashSet};

/// Blocker name -> names it has blocked.
#[derive(Debug, Default)]
pub struct BlockStore {
    blocked: HashMap<String, HashSet<String>>,
}

impl BlockStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `blocker` refuses messages from `blockee`.
    ///
    /// Returns `false` if the relation already existed. Self-blocks are not
    /// rejected here.
    pub fn block(&mut self, blocker: &str, blockee: &str) -> bool {
        self.blocked
            .entry(blocker.to_string())
            .or_default()
            .insert(blockee.to_string())
    }

    /// Whether `blocker` has blocked `blockee`. Unknown names are never blocked.
    pub fn is_blocked(&self, blocker: &str, blockee: &str) -> bool {
        self.blocked
            .get(blocker)
            .is_some_and(|set| set.contains(blockee))
    }

    /// Drop the block list owned by `name`.
    ///
    /// Blocks other names hold against `name` stay in place, so leaving and
    /// reclaiming a name does not lift them.
    pub fn forget(&mut self, name: &str) {
        self.blocked.remove(name);
    }

    /// Move every relation involving `old` over to `new`.
    pub fn rename(&mut self, old: &str, new: &str) {
        if old == new {
            return;
        }
        if let Some(set) = self.blocked.remove(old) {
            self.blocked.insert(new.to_string(), set);
        }
        for set in self.blocked.values_mut() {
            if set.remove(old) {
                set.insert(new.to_string());
            }
        }
    }

    /// Number of names with a non-empty block list.
    pub fn blocker_count(&self) -> usize {
        self.blocked.len()
    }
}
