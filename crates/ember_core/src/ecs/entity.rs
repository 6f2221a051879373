//! # Entity Handles
//!
//! Entities are lightweight identifiers consisting of:
//! - An index into the entity manager's slot table
//! - A generation counter for safe reuse

use std::fmt;

/// Handle identifying a logical object, independent of any component data.
///
/// The handle is split into two parts:
/// - Lower 32 bits: Index into the slot table
/// - Upper 32 bits: Generation counter for detecting stale references
///
/// Two entities are equal iff both parts match.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Null/invalid entity. Never issued and never alive.
    pub const NULL: Self = Self(u64::MAX);

    /// Creates an entity from index and generation.
    ///
    /// # Arguments
    ///
    /// * `index` - The slot index (0 to 2^32-1)
    /// * `generation` - The generation counter (0 to 2^32-1)
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the handle.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Checks if this is the null handle.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }

    /// Returns the packed 64-bit representation.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Rebuilds a handle from [`to_bits`](Self::to_bits).
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Entity(NULL)")
        } else {
            write!(f, "Entity({}v{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("NULL")
        } else {
            write!(f, "{}v{}", self.index(), self.generation())
        }
    }
}

/// One row of the entity manager's slot table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct EntitySlot {
    /// Generation the next handle for this slot will carry.
    pub(crate) generation: u32,
    /// Whether a handle with `generation` is currently live.
    pub(crate) alive: bool,
}

impl EntitySlot {
    /// Checks a handle against this slot.
    #[inline]
    pub(crate) const fn matches(self, entity: Entity) -> bool {
        self.alive && self.generation == entity.generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_roundtrip() {
        let entity = Entity::new(12345, 67890);
        assert_eq!(entity.index(), 12345);
        assert_eq!(entity.generation(), 67890);
        assert_eq!(Entity::from_bits(entity.to_bits()), entity);
    }

    #[test]
    fn test_equality_needs_both_parts() {
        assert_ne!(Entity::new(3, 0), Entity::new(3, 1));
        assert_ne!(Entity::new(3, 0), Entity::new(4, 0));
        assert_eq!(Entity::new(3, 1), Entity::new(3, 1));
    }

    #[test]
    fn test_null_is_default() {
        assert!(Entity::default().is_null());
        assert!(!Entity::new(0, 0).is_null());
        assert_eq!(Entity::NULL.to_string(), "NULL");
        assert_eq!(Entity::new(7, 2).to_string(), "7v2");
    }

    #[test]
    fn test_slot_matches() {
        let slot = EntitySlot {
            generation: 4,
            alive: true,
        };
        assert!(slot.matches(Entity::new(0, 4)));
        assert!(!slot.matches(Entity::new(0, 3)));
        assert!(!EntitySlot { alive: false, ..slot }.matches(Entity::new(0, 4)));
    }
}
