//! # EMBER Core
//!
//! Entity lifecycle and structure-of-arrays component storage.
//!
//! ## Architecture Rules
//!
//! 1. **Handles are checked** - a stale [`Entity`] or [`Instance`] is a miss, never an alias
//! 2. **Storage stays dense** - every component field is a packed `Vec`
//! 3. **Despawn is one call** - the [`EntityMgr`] notifies every bound [`ComponentDefinition`]
//!
//! ## Example
//!
//! ```rust
//! use ember_core::{EntityMgr, TransformComponent, Vec3};
//!
//! let mut entities = EntityMgr::new();
//! let mut transforms = TransformComponent::new(&entities);
//!
//! let e = entities.spawn_entity();
//! let row = transforms.assign(e);
//! transforms.set_position(row, Vec3::new(1.0, 2.0, 3.0)).unwrap();
//!
//! entities.despawn_entity(e);
//! assert!(transforms.is_empty());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod math;
pub mod resource;

pub use config::EmberConfig;
pub use ecs::{
    register_reflection, Capability, ComponentDefinition, ComponentKind, DestructorCallback,
    Entity, EntityComposite, EntityMgr, Field, Inspect, Instance, RegistrationHandle, Row,
    ScriptComponent, TransformComponent, UuidMgr,
};
pub use error::{EmberError, EmberResult};
pub use math::{Quat, Vec3};
pub use resource::ResourceRef;
