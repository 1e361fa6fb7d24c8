//! # Subscriber registry - copy-on-write set of subscribers.
//!
//! The registry is the only shared mutable state between the generation loop and
//! callers of `subscribe`/`unsubscribe`.
//!
//! ## Architecture
//! ```text
//! RwLock<Arc<Vec<Arc<dyn Subscriber>>>>
//!   ├─► snapshot():    read lock → Arc::clone          (O(1), lock held for a clone)
//!   ├─► insert(sub):   write lock → clone vec → push → swap
//!   ├─► remove(&sub):  write lock → clone vec → remove first ptr-equal → swap
//!   └─► clear():       write lock → swap with empty
//! ```
//!
//! ## Rules
//! - A snapshot never changes after it is taken; writers replace the `Arc`.
//! - The lock is never held while a subscriber runs.
//! - Duplicates are allowed; `remove` takes out one entry per call.
//! - Identity is pointer identity of the `Arc` (`Arc::ptr_eq`).

use std::sync::Arc;

use parking_lot::RwLock;

use crate::subscribers::Subscriber;

/// Immutable view of the registry taken at the start of a round.
pub type Snapshot = Arc<Vec<Arc<dyn Subscriber>>>;

/// Copy-on-write registry of subscribers.
#[derive(Default)]
pub struct Registry {
    subs: RwLock<Snapshot>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current contents without copying them.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.subs.read())
    }

    /// Appends `sub`; returns the new length.
    pub fn insert(&self, sub: Arc<dyn Subscriber>) -> usize {
        let mut guard = self.subs.write();
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(sub);
        let len = next.len();
        *guard = Arc::new(next);
        len
    }

    /// Removes the first entry pointer-equal to `sub`. Returns `false` if absent.
    pub fn remove(&self, sub: &Arc<dyn Subscriber>) -> bool {
        let mut guard = self.subs.write();
        let Some(idx) = guard.iter().position(|s| Arc::ptr_eq(s, sub)) else {
            return false;
        };
        let mut next: Vec<_> = guard.iter().cloned().collect();
        next.remove(idx);
        *guard = Arc::new(next);
        true
    }

    /// Drops every entry; returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut guard = self.subs.write();
        let n = guard.len();
        *guard = Arc::new(Vec::new());
        n
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.subs.read().len()
    }

    /// Returns true if registry is empty.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.subs.read().is_empty()
    }

    /// Number of entries pointer-equal to `sub`.
    pub fn count_of(&self, sub: &Arc<dyn Subscriber>) -> usize {
        self.subs
            .read()
            .iter()
            .filter(|s| Arc::ptr_eq(s, sub))
            .count()
    }
}
