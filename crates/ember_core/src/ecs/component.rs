//! # Built-in Components
//!
//! Thin wrappers over [`ComponentDefinition`] that name their fields.
//! Generic operations (`assign`, `lookup`, `len`, ...) are reached through
//! `Deref`.

use std::any::Any;
use std::cell::Ref;
use std::ops::{Deref, DerefMut};

use ember_mirror::{Reflect, TypeBuilder, TypeRegistry};

use super::definition::ComponentDefinition;
use super::entity_mgr::EntityMgr;
use super::inspect::{Capability, Inspect};
use super::instance::Instance;
use crate::error::EmberResult;
use crate::math::{Quat, Vec3};
use crate::resource::ResourceRef;

/// Position and rotation of an entity.
///
/// # Example
///
/// ```rust
/// use ember_core::{EntityMgr, TransformComponent, Vec3};
///
/// let mut entities = EntityMgr::new();
/// let mut transforms = TransformComponent::new(&entities);
///
/// let e = entities.spawn_entity();
/// let row = transforms.assign(e);
/// transforms.set_position(row, Vec3::splat(9001.0)).unwrap();
/// assert_eq!(transforms.position(row), Some(Vec3::splat(9001.0)));
/// ```
pub struct TransformComponent {
    definition: ComponentDefinition<(Vec3, Quat)>,
}

impl TransformComponent {
    /// Field index of the position column.
    pub const POSITION: usize = 0;
    /// Field index of the rotation column.
    pub const ROTATION: usize = 1;

    /// Creates an empty transform store bound to `entities`.
    #[must_use]
    pub fn new(entities: &EntityMgr) -> Self {
        Self {
            definition: ComponentDefinition::new(entities),
        }
    }

    /// Returns the position of a row, or `None` for a stale instance.
    #[inline]
    #[must_use]
    pub fn position(&self, instance: Instance) -> Option<Vec3> {
        self.definition
            .get::<{ TransformComponent::POSITION }>(instance)
            .map(|p| *p)
    }

    /// Sets the position of a row.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::StaleInstance`](crate::EmberError::StaleInstance)
    /// for a stale instance.
    #[inline]
    pub fn set_position(&mut self, instance: Instance, position: Vec3) -> EmberResult<()> {
        self.definition
            .set::<{ TransformComponent::POSITION }>(instance, position)
    }

    /// Returns the rotation of a row, or `None` for a stale instance.
    #[inline]
    #[must_use]
    pub fn rotation(&self, instance: Instance) -> Option<Quat> {
        self.definition
            .get::<{ TransformComponent::ROTATION }>(instance)
            .map(|r| *r)
    }

    /// Sets the rotation of a row.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::StaleInstance`](crate::EmberError::StaleInstance)
    /// for a stale instance.
    #[inline]
    pub fn set_rotation(&mut self, instance: Instance, rotation: Quat) -> EmberResult<()> {
        self.definition
            .set::<{ TransformComponent::ROTATION }>(instance, rotation)
    }

    /// Borrows every position in dense order.
    #[must_use]
    pub fn positions(&self) -> Ref<'_, [Vec3]> {
        self.definition.column::<{ TransformComponent::POSITION }>()
    }
}

impl Deref for TransformComponent {
    type Target = ComponentDefinition<(Vec3, Quat)>;

    fn deref(&self) -> &Self::Target {
        &self.definition
    }
}

impl DerefMut for TransformComponent {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.definition
    }
}

impl Reflect for TransformComponent {
    const TYPE_NAME: &'static str = "TransformComponent";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder.base::<ComponentDefinition<(Vec3, Quat)>>()
    }
}

impl Inspect for TransformComponent {
    fn inspect(&self, capability: Capability) -> Option<&dyn Any> {
        if capability.is::<Self>() {
            Some(self)
        } else if capability.is::<ComponentDefinition<(Vec3, Quat)>>() {
            Some(&self.definition)
        } else {
            None
        }
    }
}

/// Script resource attached to an entity.
pub struct ScriptComponent {
    definition: ComponentDefinition<(ResourceRef,)>,
}

impl ScriptComponent {
    /// Field index of the script column.
    pub const SCRIPT: usize = 0;

    /// Creates an empty script store bound to `entities`.
    #[must_use]
    pub fn new(entities: &EntityMgr) -> Self {
        Self {
            definition: ComponentDefinition::new(entities),
        }
    }

    /// Borrows the script reference of a row.
    #[must_use]
    pub fn script(&self, instance: Instance) -> Option<Ref<'_, ResourceRef>> {
        self.definition.get::<{ ScriptComponent::SCRIPT }>(instance)
    }

    /// Points a row at a different script.
    ///
    /// # Errors
    ///
    /// Returns [`EmberError::StaleInstance`](crate::EmberError::StaleInstance)
    /// for a stale instance.
    pub fn set_script(&mut self, instance: Instance, script: ResourceRef) -> EmberResult<()> {
        self.definition
            .set::<{ ScriptComponent::SCRIPT }>(instance, script)
    }
}

impl Deref for ScriptComponent {
    type Target = ComponentDefinition<(ResourceRef,)>;

    fn deref(&self) -> &Self::Target {
        &self.definition
    }
}

impl DerefMut for ScriptComponent {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.definition
    }
}

impl Reflect for ScriptComponent {
    const TYPE_NAME: &'static str = "ScriptComponent";

    fn describe(builder: TypeBuilder<Self>) -> TypeBuilder<Self> {
        builder.base::<ComponentDefinition<(ResourceRef,)>>()
    }
}

impl Inspect for ScriptComponent {
    fn inspect(&self, capability: Capability) -> Option<&dyn Any> {
        if capability.is::<Self>() {
            Some(self)
        } else if capability.is::<ComponentDefinition<(ResourceRef,)>>() {
            Some(&self.definition)
        } else {
            None
        }
    }
}

/// Registers every reflected type of this crate with `registry`.
///
/// # Errors
///
/// Returns [`EmberError::Mirror`](crate::EmberError::Mirror) if any of the
/// types is already registered.
pub fn register_reflection(registry: &TypeRegistry) -> EmberResult<()> {
    registry.register::<Vec3>()?;
    registry.register::<Quat>()?;
    registry.register::<ResourceRef>()?;
    registry.register::<TransformComponent>()?;
    registry.register::<ScriptComponent>()?;
    tracing::info!(types = registry.len(), "registered core reflection types");
    Ok(())
}
