//! # Instance Handles
//!
//! An [`Instance`] names one row of a component definition's dense arrays.
//! Rows move during swap-and-pop compaction, so each row also carries a stamp
//! that changes whenever the row is created or overwritten. A handle is only
//! honored while its stamp matches, which turns "instance used after the row
//! moved" into a detectable miss instead of silent aliasing.
//!
//! Stamps come from a per-definition `u32` counter that wraps. An instance
//! held across 2^32 row creations and moves may match again, the same way an
//! [`Entity`](super::Entity) generation can wrap after 2^32 reuses of a slot.

use std::fmt;

/// Handle to one component row.
///
/// - Lower 32 bits: Dense row index
/// - Upper 32 bits: Row stamp at the time the handle was issued
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Instance(u64);

impl Instance {
    /// Sentinel returned by failed assignments and lookup misses.
    pub const INVALID: Self = Self(u64::MAX);

    #[inline]
    pub(crate) const fn new(index: u32, stamp: u32) -> Self {
        Self(((stamp as u64) << 32) | (index as u64))
    }

    /// Returns the dense row index.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the row stamp.
    #[inline]
    #[must_use]
    pub const fn stamp(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Checks if this is the sentinel.
    ///
    /// A non-sentinel instance may still be stale; ask the owning definition.
    #[inline]
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            f.write_str("Instance(INVALID)")
        } else {
            write!(f, "Instance({}#{})", self.index(), self.stamp())
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            f.write_str("INVALID")
        } else {
            write!(f, "{}#{}", self.index(), self.stamp())
        }
    }
}
