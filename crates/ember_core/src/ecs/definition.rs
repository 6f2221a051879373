//! # Component Definitions
//!
//! A [`ComponentDefinition`] owns every row of one component type:
//!
//! ```text
//! sparse:   Entity -> dense index        (HashMap)
//! columns:  [F0...] [F1...] ... [Fk...]  (one Vec per field, length N)
//! reverse:  dense index -> Entity        (Vec, length N)
//! stamps:   dense index -> row stamp     (Vec, length N)
//! ```
//!
//! Rows stay packed. Removing row `i` moves the last row into `i` and patches
//! the moved entity's sparse entry, so iteration over a column never sees a
//! hole.
//!
//! ## Lifetime
//!
//! The definition registers a destructor with its [`EntityMgr`] when built
//! and unregisters it on drop. The callback only holds a `Weak` to the
//! storage, and the definition only holds a `Weak` to the manager, so either
//! side may be dropped first.
//!
//! ## Deferred Removal
//!
//! A field guard from [`ComponentDefinition::get`] may still be alive when the
//! manager despawns an entity. The callback then cannot compact the rows, so
//! it queues the entity instead. Queries treat queued entities as gone, and
//! the queue is drained by the first call made after the guard is dropped.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::entity::Entity;
use super::entity_mgr::{EntityMgr, ManagerLink, RegistrationHandle};
use super::instance::Instance;
use super::storage::{Field, Row};
use crate::error::{EmberError, EmberResult};

/// Dense rows plus the maps tying them to entities.
struct Storage<R: Row> {
    columns: R::Columns,
    reverse: Vec<Entity>,
    stamps: Vec<u32>,
    sparse: HashMap<Entity, u32>,
    next_stamp: u32,
}

impl<R: Row> Storage<R> {
    fn with_capacity(capacity: usize) -> Self {
        let mut columns = R::Columns::default();
        R::reserve(&mut columns, capacity);
        Self {
            columns,
            reverse: Vec::with_capacity(capacity),
            stamps: Vec::with_capacity(capacity),
            sparse: HashMap::with_capacity(capacity),
            next_stamp: 0,
        }
    }

    fn fresh_stamp(&mut self) -> u32 {
        let stamp = self.next_stamp;
        self.next_stamp = self.next_stamp.wrapping_add(1);
        stamp
    }

    /// Maps an instance to its dense index if the row stamp still matches.
    fn resolve(&self, instance: Instance) -> Option<usize> {
        if instance.is_invalid() {
            return None;
        }
        let index = instance.index() as usize;
        (self.stamps.get(index) == Some(&instance.stamp())).then_some(index)
    }

    fn instance_at(&self, index: u32) -> Instance {
        Instance::new(index, self.stamps[index as usize])
    }

    /// Appends a default row for `entity`. The caller checks it is unmapped.
    fn insert(&mut self, entity: Entity) -> Instance {
        let index = u32::try_from(self.reverse.len())
            .ok()
            .filter(|&index| index != u32::MAX)
            .unwrap_or_else(|| panic!("component row table exhausted"));

        R::push_default(&mut self.columns);
        self.reverse.push(entity);
        let stamp = self.fresh_stamp();
        self.stamps.push(stamp);
        self.sparse.insert(entity, index);

        Instance::new(index, stamp)
    }

    /// Swap-and-pop removal of `entity`'s row. Returns `false` if unmapped.
    fn remove(&mut self, entity: Entity) -> bool {
        let Some(index) = self.sparse.remove(&entity) else {
            return false;
        };
        let slot = index as usize;
        let last = self.reverse.len() - 1;

        R::swap_remove(&mut self.columns, slot);
        self.reverse.swap_remove(slot);
        self.stamps.swap_remove(slot);

        if slot == last {
            tracing::trace!(%entity, row = slot, "popped component row");
        } else {
            let moved = self.reverse[slot];
            self.sparse.insert(moved, index);
            // Handles issued for the moved row must not reach its new slot.
            let stamp = self.fresh_stamp();
            self.stamps[slot] = stamp;
            tracing::trace!(%entity, %moved, from = last, to = slot, "compacted component row");
        }

        debug_assert_eq!(R::len(&self.columns), self.reverse.len());
        true
    }

    /// Drops every row. The stamp counter keeps running.
    fn clear(&mut self) {
        R::clear(&mut self.columns);
        self.reverse.clear();
        self.stamps.clear();
        self.sparse.clear();
    }
}

/// Storage plus the despawns it could not apply yet.
struct Shared<R: Row> {
    storage: RefCell<Storage<R>>,
    pending: RefCell<Vec<Entity>>,
}

impl<R: Row> Shared<R> {
    /// Destructor callback body. Never panics on a live field guard.
    fn on_despawn(&self, entity: Entity) {
        if let Ok(mut storage) = self.storage.try_borrow_mut() {
            storage.remove(entity);
        } else {
            tracing::debug!(%entity, "component storage borrowed, deferring row removal");
            self.pending.borrow_mut().push(entity);
        }
    }

    /// Applies queued removals if no guard is alive.
    fn settle(&self) {
        let mut pending = self.pending.borrow_mut();
        if pending.is_empty() {
            return;
        }
        if let Ok(mut storage) = self.storage.try_borrow_mut() {
            for entity in pending.drain(..) {
                storage.remove(entity);
            }
        }
    }

    fn read(&self) -> Ref<'_, Storage<R>> {
        self.settle();
        self.storage.borrow()
    }

    fn write(&self) -> RefMut<'_, Storage<R>> {
        self.settle();
        self.storage.borrow_mut()
    }

    fn is_pending(&self, entity: Entity) -> bool {
        self.pending.borrow().contains(&entity)
    }

    /// Resolves an instance whose row is not queued for removal.
    fn live(&self, storage: &Storage<R>, instance: Instance) -> Option<usize> {
        storage
            .resolve(instance)
            .filter(|&index| !self.is_pending(storage.reverse[index]))
    }
}

/// Structure-of-arrays storage for one component type.
///
/// `R` is a tuple of field types, e.g. `(Vec3, Quat)`. Fields are addressed by
/// their position in the tuple: `get::<0>` reads the first field.
///
/// # Example
///
/// ```rust
/// use ember_core::{ComponentDefinition, EntityMgr};
///
/// let mut entities = EntityMgr::new();
/// let mut health: ComponentDefinition<(u32, bool)> = ComponentDefinition::new(&entities);
///
/// let e = entities.spawn_entity();
/// let row = health.assign(e);
/// health.set::<0>(row, 100).unwrap();
/// assert_eq!(*health.get::<0>(health.lookup(e)).unwrap(), 100);
///
/// entities.despawn_entity(e);
/// assert!(health.is_empty());
/// ```
pub struct ComponentDefinition<R: Row> {
    shared: Rc<Shared<R>>,
    link: ManagerLink,
    registration: RegistrationHandle,
    strict: bool,
}

impl<R: Row> ComponentDefinition<R> {
    /// Creates an empty definition bound to `entities`.
    ///
    /// Registers the despawn callback and reserves
    /// [`component_capacity`](crate::EmberConfig::component_capacity) rows.
    #[must_use]
    pub fn new(entities: &EntityMgr) -> Self {
        let config = entities.config();
        let shared = Rc::new(Shared {
            storage: RefCell::new(Storage::<R>::with_capacity(config.component_capacity)),
            pending: RefCell::new(Vec::new()),
        });

        let weak = Rc::downgrade(&shared);
        let registration = entities.register_destructor_callback(move |entity| {
            if let Some(shared) = weak.upgrade() {
                shared.on_despawn(entity);
            }
        });

        Self {
            shared,
            link: entities.link(),
            registration,
            strict: config.strict_handles,
        }
    }

    /// Gives `entity` a default-initialized row.
    ///
    /// Returns [`Instance::INVALID`] (after logging a warning) if the entity
    /// already has a row here or is not alive in the bound manager.
    ///
    /// # Panics
    ///
    /// Panics instead of returning the sentinel when
    /// [`strict_handles`](crate::EmberConfig::strict_handles) is set.
    pub fn assign(&mut self, entity: Entity) -> Instance {
        match self.try_assign(entity) {
            Ok(instance) => instance,
            Err(err) => {
                self.reject(&err);
                Instance::INVALID
            }
        }
    }

    /// Gives `entity` a default-initialized row.
    ///
    /// # Errors
    ///
    /// - [`EmberError::StaleEntity`] if `entity` is not alive
    /// - [`EmberError::AlreadyAssigned`] if `entity` already has a row
    pub fn try_assign(&mut self, entity: Entity) -> EmberResult<Instance> {
        if !self.link.is_alive(entity) {
            return Err(EmberError::StaleEntity(entity));
        }
        let mut storage = self.shared.write();
        if storage.sparse.contains_key(&entity) {
            return Err(EmberError::AlreadyAssigned(entity));
        }
        Ok(storage.insert(entity))
    }

    /// Returns the current instance for `entity`, or [`Instance::INVALID`].
    ///
    /// Always look up afresh after a despawn: compaction may have moved the
    /// row.
    #[inline]
    #[must_use]
    pub fn lookup(&self, entity: Entity) -> Instance {
        let storage = self.shared.read();
        if self.shared.is_pending(entity) {
            return Instance::INVALID;
        }
        storage
            .sparse
            .get(&entity)
            .map_or(Instance::INVALID, |&index| storage.instance_at(index))
    }

    /// Checks if `entity` has a row here.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.shared.read().sparse.contains_key(&entity) && !self.shared.is_pending(entity)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        let storage = self.shared.read();
        let queued = self
            .shared
            .pending
            .borrow()
            .iter()
            .filter(|entity| storage.sparse.contains_key(entity))
            .count();
        storage.reverse.len() - queued
    }

    /// Checks if there are no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if `instance` still names the row it was issued for.
    #[inline]
    #[must_use]
    pub fn is_valid(&self, instance: Instance) -> bool {
        let storage = self.shared.read();
        self.shared.live(&storage, instance).is_some()
    }

    /// Returns the entity owning `instance`'s row.
    #[must_use]
    pub fn entity_of(&self, instance: Instance) -> Option<Entity> {
        let storage = self.shared.read();
        self.shared
            .live(&storage, instance)
            .map(|index| storage.reverse[index])
    }

    /// Returns every entity with a row here, in dense order.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        let storage = self.shared.read();
        storage
            .reverse
            .iter()
            .copied()
            .filter(|&entity| !self.shared.is_pending(entity))
            .collect()
    }

    /// Borrows field `N` of a row.
    ///
    /// Returns `None` for a stale or invalid instance. Rows of entities
    /// despawned while the guard is alive are removed once it is dropped.
    #[must_use]
    pub fn get<const N: usize>(&self, instance: Instance) -> Option<Ref<'_, <R as Field<N>>::Type>>
    where
        R: Field<N>,
    {
        let storage = self.shared.read();
        let index = self.shared.live(&storage, instance)?;
        Some(Ref::map(storage, |s| &<R as Field<N>>::column(&s.columns)[index]))
    }

    /// Mutably borrows field `N` of a row. `None` for a stale instance.
    #[must_use]
    pub fn get_mut<const N: usize>(
        &mut self,
        instance: Instance,
    ) -> Option<RefMut<'_, <R as Field<N>>::Type>>
    where
        R: Field<N>,
    {
        let storage = self.shared.write();
        let index = storage.resolve(instance)?;
        Some(RefMut::map(storage, |s| {
            &mut <R as Field<N>>::column_mut(&mut s.columns)[index]
        }))
    }

    /// Overwrites field `N` of a row.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::StaleInstance`] if `instance` no longer names a
    /// row.
    pub fn set<const N: usize>(
        &mut self,
        instance: Instance,
        value: <R as Field<N>>::Type,
    ) -> EmberResult<()>
    where
        R: Field<N>,
    {
        let mut slot = self
            .get_mut::<N>(instance)
            .ok_or(EmberError::StaleInstance(instance))?;
        *slot = value;
        Ok(())
    }

    /// Borrows the whole dense column for field `N`.
    ///
    /// While another guard is alive the column may still hold rows of
    /// entities despawned in the meantime.
    #[must_use]
    pub fn column<const N: usize>(&self) -> Ref<'_, [<R as Field<N>>::Type]>
    where
        R: Field<N>,
    {
        Ref::map(self.shared.read(), |s| {
            <R as Field<N>>::column(&s.columns).as_slice()
        })
    }

    /// Copies the dense column for field `N` out as raw bytes.
    #[must_use]
    pub fn column_bytes<const N: usize>(&self) -> Vec<u8>
    where
        R: Field<N>,
        <R as Field<N>>::Type: bytemuck::Pod,
    {
        let storage = self.shared.read();
        bytemuck::cast_slice(<R as Field<N>>::column(&storage.columns)).to_vec()
    }

    /// Removes `entity`'s row without despawning the entity.
    ///
    /// Returns `false` if the entity had no row.
    pub fn unassign(&mut self, entity: Entity) -> bool {
        self.try_unassign(entity).is_ok()
    }

    /// Removes `entity`'s row without despawning the entity.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::NotAssigned`] if the entity had no row.
    pub fn try_unassign(&mut self, entity: Entity) -> EmberResult<()> {
        if self.shared.write().remove(entity) {
            Ok(())
        } else {
            Err(EmberError::NotAssigned(entity))
        }
    }

    /// Removes every row. Entities stay alive and instances go stale.
    pub fn clear(&mut self) {
        let mut storage = self.shared.write();
        let rows = storage.reverse.len();
        storage.clear();
        tracing::debug!(manager = self.link.manager_id(), rows, "cleared component rows");
    }

    /// Returns the handle of this definition's despawn callback.
    #[inline]
    #[must_use]
    pub const fn registration(&self) -> RegistrationHandle {
        self.registration
    }

    /// Returns the id of the manager this definition is bound to.
    #[inline]
    #[must_use]
    pub const fn manager_id(&self) -> u64 {
        self.link.manager_id()
    }

    fn reject(&self, err: &EmberError) {
        assert!(!self.strict, "{err}");
        tracing::warn!(manager = self.link.manager_id(), %err, "rejected component operation");
    }
}

impl<R: Row> Drop for ComponentDefinition<R> {
    fn drop(&mut self) {
        // Silent when the manager is already gone.
        if self.link.unregister(self.registration) {
            tracing::debug!(
                manager = self.link.manager_id(),
                handle = self.registration.id(),
                "unregistered component definition"
            );
        }
    }
}

impl<R: Row> fmt::Debug for ComponentDefinition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("fields", &R::ARITY)
            .field("len", &self.len())
            .field("manager", &self.link.manager_id())
            .field("registration", &self.registration)
            .finish_non_exhaustive()
    }
}
