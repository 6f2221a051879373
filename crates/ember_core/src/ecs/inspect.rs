//! # Capability Probing
//!
//! Tools ask "does this entity have X?" without knowing which component types
//! exist. An [`EntityComposite`] groups the component stores holding rows for
//! one entity and answers the probe:
//!
//! ```text
//! inspect(cap) -> components[0] -> components[1] -> ... -> the Entity itself
//! ```
//!
//! The first store that recognizes the capability wins.

use std::any::{type_name, Any, TypeId};
use std::fmt;

use super::component::{ScriptComponent, TransformComponent};
use super::entity::Entity;
use ember_mirror::Reflect;

/// A type being probed for.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capability {
    id: TypeId,
    name: &'static str,
}

impl Capability {
    /// Returns the capability of being a `T`.
    #[inline]
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the probed type's id.
    #[inline]
    #[must_use]
    pub const fn type_id(self) -> TypeId {
        self.id
    }

    /// Checks if this is the capability of being a `T`.
    #[inline]
    #[must_use]
    pub fn is<T: Any>(self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capability({})", self.name)
    }
}

/// Answers capability probes.
pub trait Inspect: Any + Sized {
    /// Returns a view of `self` as the probed type, if it has one.
    ///
    /// By default only the implementing type itself is recognized.
    fn inspect(&self, capability: Capability) -> Option<&dyn Any> {
        capability.is::<Self>().then_some(self as &dyn Any)
    }
}

impl Inspect for Entity {}

/// One component store attached to an [`EntityComposite`].
#[derive(Clone, Copy)]
pub enum ComponentKind<'a> {
    /// Position and rotation.
    Transform(&'a TransformComponent),
    /// Script resource.
    Script(&'a ScriptComponent),
}

impl<'a> ComponentKind<'a> {
    /// Returns the reflected name of the component type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Transform(_) => TransformComponent::TYPE_NAME,
            Self::Script(_) => ScriptComponent::TYPE_NAME,
        }
    }

    /// Checks if the store holds a row for `entity`.
    #[must_use]
    pub fn contains(self, entity: Entity) -> bool {
        match self {
            Self::Transform(transforms) => transforms.contains(entity),
            Self::Script(scripts) => scripts.contains(entity),
        }
    }

    /// Forwards the probe to the store.
    #[must_use]
    pub fn inspect(self, capability: Capability) -> Option<&'a dyn Any> {
        match self {
            Self::Transform(transforms) => transforms.inspect(capability),
            Self::Script(scripts) => scripts.inspect(capability),
        }
    }
}

impl<'a> From<&'a TransformComponent> for ComponentKind<'a> {
    fn from(transforms: &'a TransformComponent) -> Self {
        Self::Transform(transforms)
    }
}

impl<'a> From<&'a ScriptComponent> for ComponentKind<'a> {
    fn from(scripts: &'a ScriptComponent) -> Self {
        Self::Script(scripts)
    }
}

impl fmt::Debug for ComponentKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An entity together with the component stores attached to it.
///
/// # Example
///
/// ```rust
/// use ember_core::{EntityComposite, EntityMgr, TransformComponent};
///
/// let mut entities = EntityMgr::new();
/// let mut transforms = TransformComponent::new(&entities);
/// let e = entities.spawn_entity();
/// transforms.assign(e);
///
/// let mut composite = EntityComposite::new(e);
/// composite.attach(&transforms);
/// assert!(composite.inspect_as::<TransformComponent>().is_some());
/// ```
#[derive(Debug)]
pub struct EntityComposite<'a> {
    entity: Entity,
    components: Vec<ComponentKind<'a>>,
}

impl<'a> EntityComposite<'a> {
    /// Creates a composite with no attached stores.
    #[must_use]
    pub const fn new(entity: Entity) -> Self {
        Self {
            entity,
            components: Vec::new(),
        }
    }

    /// Attaches a component store. Probe order is attachment order.
    pub fn attach(&mut self, component: impl Into<ComponentKind<'a>>) -> &mut Self {
        self.components.push(component.into());
        self
    }

    /// Returns the entity.
    #[inline]
    #[must_use]
    pub const fn entity(&self) -> Entity {
        self.entity
    }

    /// Returns the attached stores in attachment order.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[ComponentKind<'a>] {
        &self.components
    }

    /// Probes every attached store holding a row for the entity, then the
    /// entity handle itself.
    #[must_use]
    pub fn inspect(&self, capability: Capability) -> Option<&dyn Any> {
        self.components
            .iter()
            .filter(|component| component.contains(self.entity))
            .find_map(|component| component.inspect(capability))
            .or_else(|| self.entity.inspect(capability))
    }

    /// Typed [`inspect`](Self::inspect).
    #[must_use]
    pub fn inspect_as<T: Any>(&self) -> Option<&T> {
        self.inspect(Capability::of::<T>())?.downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{ComponentDefinition, EntityMgr};
    use crate::math::{Quat, Vec3};
    use crate::resource::ResourceRef;

    #[test]
    fn test_capability_identity() {
        assert!(Capability::of::<Entity>().is::<Entity>());
        assert!(!Capability::of::<Entity>().is::<u64>());
        assert_eq!(Capability::of::<Vec3>().type_id(), TypeId::of::<Vec3>());
    }

    #[test]
    fn test_falls_back_to_entity() {
        let mut entities = EntityMgr::new();
        let e = entities.spawn_entity();
        let composite = EntityComposite::new(e);

        assert_eq!(composite.inspect_as::<Entity>(), Some(&e));
        assert!(composite.inspect_as::<TransformComponent>().is_none());
    }

    #[test]
    fn test_probes_in_attachment_order() {
        let mut entities = EntityMgr::new();
        let mut transforms = TransformComponent::new(&entities);
        let mut scripts = ScriptComponent::new(&entities);
        let e = entities.spawn_entity();
        transforms.assign(e);
        let row = scripts.assign(e);
        scripts.set_script(row, ResourceRef::new("a.lua")).unwrap();

        let mut composite = EntityComposite::new(e);
        composite.attach(&scripts).attach(&transforms);
        assert_eq!(
            composite.components().iter().map(|c| c.name()).collect::<Vec<_>>(),
            ["ScriptComponent", "TransformComponent"]
        );

        let found = composite.inspect_as::<ScriptComponent>().unwrap();
        assert_eq!(found.script(found.lookup(e)).unwrap().path(), "a.lua");
        assert!(composite
            .inspect_as::<ComponentDefinition<(Vec3, Quat)>>()
            .is_some());
        assert_eq!(composite.inspect_as::<Entity>(), Some(&e));
    }

    #[test]
    fn test_skips_stores_without_a_row() {
        let mut entities = EntityMgr::new();
        let mut transforms = TransformComponent::new(&entities);
        let e = entities.spawn_entity();
        let other = entities.spawn_entity();
        transforms.assign(other);

        let mut composite = EntityComposite::new(e);
        composite.attach(&transforms);
        assert!(composite.inspect_as::<TransformComponent>().is_none());
        assert!(ComponentKind::from(&transforms).contains(other));
    }
}
