//! # Entity Manager
//!
//! The authoritative table of entity validity plus the destructor registry.
//!
//! ## Slot States
//!
//! ```text
//! Free --spawn--> Alive --despawn--> Free (generation + 1)
//! ```
//!
//! A despawned slot goes straight back on the free list; "dead" and "free"
//! are the same stored state.
//!
//! ## Destructor Fan-out
//!
//! Every live [`ComponentDefinition`](super::ComponentDefinition) registers
//! one callback here. Despawning an entity invokes all of them, so component
//! data disappears without the caller enumerating component types.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use super::entity::{Entity, EntitySlot};
use super::uuid::UuidMgr;
use crate::config::EmberConfig;
use crate::error::{EmberError, EmberResult};

/// Callback invoked with every despawned entity.
pub type DestructorCallback = Rc<dyn Fn(Entity)>;

/// Key returned by [`EntityMgr::register_destructor_callback`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegistrationHandle(u64);

impl RegistrationHandle {
    /// Returns the raw UUID behind the handle.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Slot table and free list.
#[derive(Default)]
struct EntityTable {
    slots: Vec<EntitySlot>,
    free_indices: Vec<u32>,
    alive_count: usize,
}

impl EntityTable {
    fn slot(&self, entity: Entity) -> Option<EntitySlot> {
        if entity.is_null() {
            return None;
        }
        self.slots.get(entity.index() as usize).copied()
    }

    fn is_alive(&self, entity: Entity) -> bool {
        self.slot(entity).is_some_and(|slot| slot.matches(entity))
    }
}

/// Registered callbacks, densely packed.
///
/// Unregistration swap-removes from `entries` and patches `positions`, so
/// both directions are O(1).
#[derive(Default)]
struct DestructorRegistry {
    entries: Vec<(RegistrationHandle, DestructorCallback)>,
    positions: HashMap<RegistrationHandle, usize>,
}

impl DestructorRegistry {
    fn insert(&mut self, handle: RegistrationHandle, callback: DestructorCallback) {
        self.positions.insert(handle, self.entries.len());
        self.entries.push((handle, callback));
    }

    fn remove(&mut self, handle: RegistrationHandle) -> bool {
        let Some(position) = self.positions.remove(&handle) else {
            return false;
        };
        self.entries.swap_remove(position);
        if let Some((moved, _)) = self.entries.get(position) {
            self.positions.insert(*moved, position);
        }
        true
    }

    fn snapshot(&self) -> Vec<DestructorCallback> {
        self.entries.iter().map(|(_, cb)| Rc::clone(cb)).collect()
    }
}

/// State shared with the component definitions bound to a manager.
struct Shared {
    table: RefCell<EntityTable>,
    destructors: RefCell<DestructorRegistry>,
}

/// Non-owning link from a component definition back to its manager.
///
/// Every query answers as if all entities were dead once the manager is gone.
#[derive(Clone)]
pub(crate) struct ManagerLink {
    shared: Weak<Shared>,
    manager_id: u64,
}

impl ManagerLink {
    pub(crate) fn is_alive(&self, entity: Entity) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.table.borrow().is_alive(entity))
    }

    pub(crate) fn unregister(&self, handle: RegistrationHandle) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.destructors.borrow_mut().remove(handle))
    }

    pub(crate) const fn manager_id(&self) -> u64 {
        self.manager_id
    }
}

/// Owner of entity validity and of the destructor registry.
///
/// # Example
///
/// ```rust
/// use ember_core::EntityMgr;
///
/// let mut entities = EntityMgr::new();
/// let e = entities.spawn_entity();
/// assert!(entities.is_alive(e));
///
/// assert!(entities.despawn_entity(e));
/// assert!(!entities.is_alive(e));
/// ```
pub struct EntityMgr {
    id: u64,
    uuids: Rc<UuidMgr>,
    shared: Rc<Shared>,
    config: EmberConfig,
}

impl EntityMgr {
    /// Creates a manager with the default configuration and its own UUID
    /// source.
    #[must_use]
    pub fn new() -> Self {
        Self::build(EmberConfig::default(), Rc::new(UuidMgr::new()))
    }

    /// Creates a manager drawing identifiers from a shared UUID source.
    #[must_use]
    pub fn with_uuids(uuids: Rc<UuidMgr>) -> Self {
        Self::build(EmberConfig::default(), uuids)
    }

    /// Creates a manager with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::InvalidConfig`] if `config` fails
    /// [`EmberConfig::validate`].
    pub fn with_config(config: EmberConfig, uuids: Rc<UuidMgr>) -> EmberResult<Self> {
        config.validate()?;
        Ok(Self::build(config, uuids))
    }

    fn build(config: EmberConfig, uuids: Rc<UuidMgr>) -> Self {
        let table = EntityTable {
            slots: Vec::with_capacity(config.entity_capacity),
            free_indices: Vec::new(),
            alive_count: 0,
        };
        let id = uuids.new_id();
        tracing::debug!(
            manager = id,
            entity_capacity = config.entity_capacity,
            "created entity manager"
        );

        Self {
            id,
            uuids,
            shared: Rc::new(Shared {
                table: RefCell::new(table),
                destructors: RefCell::new(DestructorRegistry::default()),
            }),
            config,
        }
    }

    /// Returns the UUID identifying this manager.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the configuration this manager was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EmberConfig {
        &self.config
    }

    /// Returns the UUID source shared by this manager.
    #[inline]
    #[must_use]
    pub fn uuids(&self) -> &Rc<UuidMgr> {
        &self.uuids
    }

    /// Spawns a new entity.
    ///
    /// Reuses a free slot when one exists (its generation was already bumped
    /// by the despawn that freed it), else appends a slot with generation 0.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX - 1` slots would be needed.
    pub fn spawn_entity(&mut self) -> Entity {
        let mut table = self.shared.table.borrow_mut();

        let index = if let Some(index) = table.free_indices.pop() {
            index
        } else {
            let index = u32::try_from(table.slots.len())
                .ok()
                .filter(|&index| index != u32::MAX)
                .unwrap_or_else(|| panic!("entity slot table exhausted"));
            table.slots.push(EntitySlot::default());
            index
        };

        let slot = &mut table.slots[index as usize];
        slot.alive = true;
        let entity = Entity::new(index, slot.generation);
        table.alive_count += 1;

        tracing::debug!(%entity, "spawned entity");
        entity
    }

    /// Despawns an entity and notifies every registered destructor.
    ///
    /// Stale, dead, or foreign handles are rejected: the call logs a warning
    /// and returns `false` (or panics when
    /// [`strict_handles`](EmberConfig::strict_handles) is set).
    pub fn despawn_entity(&mut self, entity: Entity) -> bool {
        match self.try_despawn_entity(entity) {
            Ok(()) => true,
            Err(err) => {
                self.reject(&err);
                false
            }
        }
    }

    /// Despawns an entity and notifies every registered destructor.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::StaleEntity`] if `entity` is not alive.
    pub fn try_despawn_entity(&mut self, entity: Entity) -> EmberResult<()> {
        {
            let mut table = self.shared.table.borrow_mut();
            if !table.is_alive(entity) {
                return Err(EmberError::StaleEntity(entity));
            }

            let slot = &mut table.slots[entity.index() as usize];
            slot.alive = false;
            slot.generation = slot.generation.wrapping_add(1);
            table.free_indices.push(entity.index());
            table.alive_count -= 1;
        }

        // Callbacks may register or unregister; iterate a snapshot.
        let callbacks = self.shared.destructors.borrow().snapshot();
        tracing::debug!(%entity, destructors = callbacks.len(), "despawned entity");
        for callback in callbacks {
            callback(entity);
        }
        Ok(())
    }

    /// Checks if an entity is alive. Never mutates.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.shared.table.borrow().is_alive(entity)
    }

    /// Returns the number of currently alive entities.
    #[inline]
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.shared.table.borrow().alive_count
    }

    /// Returns the number of slots in the table, alive or free.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.table.borrow().slots.len()
    }

    /// Collects every alive entity in slot order.
    #[must_use]
    pub fn alive_entities(&self) -> Vec<Entity> {
        let table = self.shared.table.borrow();
        table
            .slots
            .iter()
            .zip(0_u32..)
            .filter(|(slot, _)| slot.alive)
            .map(|(slot, index)| Entity::new(index, slot.generation))
            .collect()
    }

    /// Registers a callback invoked with every despawned entity.
    pub fn register_destructor_callback(
        &self,
        callback: impl Fn(Entity) + 'static,
    ) -> RegistrationHandle {
        let handle = RegistrationHandle(self.uuids.new_id());
        self.shared
            .destructors
            .borrow_mut()
            .insert(handle, Rc::new(callback));
        tracing::debug!(manager = self.id, handle = handle.0, "registered destructor");
        handle
    }

    /// Removes a callback. Returns `false` if the handle was not registered.
    pub fn unregister_destructor_callback(&self, handle: RegistrationHandle) -> bool {
        let removed = self.shared.destructors.borrow_mut().remove(handle);
        if removed {
            tracing::debug!(manager = self.id, handle = handle.0, "unregistered destructor");
        }
        removed
    }

    /// Returns the number of registered destructor callbacks.
    #[inline]
    #[must_use]
    pub fn num_registered_destructors(&self) -> usize {
        self.shared.destructors.borrow().entries.len()
    }

    pub(crate) fn link(&self) -> ManagerLink {
        ManagerLink {
            shared: Rc::downgrade(&self.shared),
            manager_id: self.id,
        }
    }

    fn reject(&self, err: &EmberError) {
        assert!(!self.config.strict_handles, "{err}");
        tracing::warn!(manager = self.id, %err, "rejected entity operation");
    }
}

impl Default for EntityMgr {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityMgr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMgr")
            .field("id", &self.id)
            .field("alive", &self.alive_count())
            .field("capacity", &self.capacity())
            .field("destructors", &self.num_registered_destructors())
            .finish_non_exhaustive()
    }
}
