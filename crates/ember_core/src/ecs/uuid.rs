//! # UUID Manager
//!
//! Issues identifiers that are unique for the lifetime of the manager.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of unique 64-bit identifiers.
///
/// Takes `&self` so a single manager can be shared (through `Rc`) by every
/// entity manager that needs identifiers. `0` is never issued.
#[derive(Debug)]
pub struct UuidMgr {
    next: AtomicU64,
}

impl UuidMgr {
    /// Creates a manager whose first identifier is `1`.
    #[must_use]
    pub const fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a manager whose first identifier is `seed` (or `1` if `seed`
    /// is zero).
    #[must_use]
    pub const fn starting_at(seed: u64) -> Self {
        let seed = if seed == 0 { 1 } else { seed };
        Self {
            next: AtomicU64::new(seed),
        }
    }

    /// Issues a new identifier.
    ///
    /// # Panics
    ///
    /// Panics if the 64-bit space is exhausted.
    #[inline]
    pub fn new_id(&self) -> u64 {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        assert!(id != 0, "UUID space exhausted");
        id
    }

    /// Returns the identifier the next call to [`new_id`](Self::new_id)
    /// will issue.
    #[inline]
    #[must_use]
    pub fn peek_next(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for UuidMgr {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let uuids = UuidMgr::new();
        let ids: HashSet<u64> = (0..10_000).map(|_| uuids.new_id()).collect();
        assert_eq!(ids.len(), 10_000);
        assert!(!ids.contains(&0));
    }

    #[test]
    fn test_zero_seed_is_skipped() {
        let uuids = UuidMgr::starting_at(0);
        assert_eq!(uuids.new_id(), 1);

        let uuids = UuidMgr::starting_at(500);
        assert_eq!(uuids.new_id(), 500);
        assert_eq!(uuids.peek_next(), 501);
    }
}
